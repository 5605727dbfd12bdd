//! Recording bus, pins and delay for host tests.

use std::{cell::RefCell, rc::Rc};

use embedded_hal::{
    delay::DelayNs,
    digital::{self, OutputPin},
    spi::{self, ErrorKind, SpiBus},
};

use crate::interface::Interface;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Line {
    Cs,
    Cd,
    Rst,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Event {
    Pin(Line, bool),
    Byte(u8),
    Flush,
    DelayMs(u32),
}

/// A byte as the controller sees it, tagged by the CD level at transfer time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transfer {
    Command(u8),
    Data(u8),
}

#[derive(Default)]
struct Log {
    events: Vec<Event>,
    fail_writes: bool,
}

#[derive(Clone, Default)]
pub struct Bus {
    log: Rc<RefCell<Log>>,
}

pub type MockInterface = Interface<MockSpi, MockPin, MockPin, MockPin, MockDelay>;

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interface(&self, with_reset: bool) -> MockInterface {
        Interface::new(
            MockSpi { log: self.clone() },
            self.pin(Line::Cs),
            self.pin(Line::Cd),
            with_reset.then(|| self.pin(Line::Rst)),
            MockDelay { log: self.clone() },
        )
    }

    fn pin(&self, line: Line) -> MockPin {
        MockPin {
            line,
            log: self.clone(),
        }
    }

    fn push(&self, event: Event) {
        self.log.borrow_mut().events.push(event);
    }

    pub fn fail_writes(&self) {
        self.log.borrow_mut().fail_writes = true;
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().events.clone()
    }

    pub fn reset_events(&self) {
        self.log.borrow_mut().events.clear();
    }

    /// Bytes on the wire, decoded as command or data by the last CD level.
    pub fn transfers(&self) -> Vec<Transfer> {
        let mut cd_high = false;
        let mut out = Vec::new();

        for event in self.log.borrow().events.iter() {
            match *event {
                Event::Pin(Line::Cd, level) => cd_high = level,
                Event::Byte(b) if cd_high => out.push(Transfer::Data(b)),
                Event::Byte(b) => out.push(Transfer::Command(b)),
                _ => {}
            }
        }

        out
    }

    pub fn commands(&self) -> Vec<u8> {
        self.transfers()
            .into_iter()
            .filter_map(|t| match t {
                Transfer::Command(b) => Some(b),
                Transfer::Data(_) => None,
            })
            .collect()
    }

    pub fn data(&self) -> Vec<u8> {
        self.transfers()
            .into_iter()
            .filter_map(|t| match t {
                Transfer::Data(b) => Some(b),
                Transfer::Command(_) => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MockSpiError;

impl spi::Error for MockSpiError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct MockSpi {
    log: Bus,
}

impl spi::ErrorType for MockSpi {
    type Error = MockSpiError;
}

impl SpiBus<u8> for MockSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        if self.log.log.borrow().fail_writes {
            return Err(MockSpiError);
        }

        for &b in words {
            self.log.push(Event::Byte(b));
        }
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        read.fill(0);
        self.write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let copy = words.to_vec();
        words.fill(0);
        self.write(&copy)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::Flush);
        Ok(())
    }
}

pub struct MockPin {
    line: Line,
    log: Bus,
}

impl digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::Pin(self.line, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::Pin(self.line, true));
        Ok(())
    }
}

pub struct MockDelay {
    log: Bus,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::DelayMs(ms));
    }
}
