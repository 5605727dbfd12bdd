//! Command/data byte framing over a raw SPI bus.

use core::convert::Infallible;

use embedded_hal::{
    delay::DelayNs,
    digital::{self, OutputPin},
    spi::{self, SpiBus},
};

use crate::Error;

/// Placeholder for an unconnected reset line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NoPin;

impl digital::ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Owned bus, control pins and delay source for one controller.
///
/// The bus is expected to be configured for [`SPI_MODE`](crate::protocol::SPI_MODE)
/// at the rate in [`Config::spi_hz`](crate::Config::spi_hz). Chip select is
/// driven here, once per byte.
#[derive(Debug)]
pub struct Interface<SPI, CS, CD, RST, D> {
    spi: SPI,
    cs: CS,
    cd: CD,
    rst: Option<RST>,
    delay: D,
}

/// [`Error`] keyed by the bus and pin types rather than their error types.
pub type InterfaceError<SPI, CS, CD, RST> = Error<
    <SPI as spi::ErrorType>::Error,
    <CS as digital::ErrorType>::Error,
    <CD as digital::ErrorType>::Error,
    <RST as digital::ErrorType>::Error,
>;

pub type InterfaceResult<SPI, CS, CD, RST> = Result<(), InterfaceError<SPI, CS, CD, RST>>;

impl<SPI, CS, CD, RST, D> Interface<SPI, CS, CD, RST, D>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    CD: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    /// Creates a new interface. Pass `None` when the reset line is not wired.
    pub fn new(spi: SPI, cs: CS, cd: CD, rst: Option<RST>, delay: D) -> Self {
        Self {
            spi,
            cs,
            cd,
            rst,
            delay,
        }
    }

    /// Releases owned bus, pins and delay.
    pub fn release(self) -> (SPI, CS, CD, Option<RST>, D) {
        (self.spi, self.cs, self.cd, self.rst, self.delay)
    }

    pub fn has_reset(&self) -> bool {
        self.rst.is_some()
    }

    /// Idle levels: chip deselected, CD low.
    pub fn configure_idle(&mut self) -> InterfaceResult<SPI, CS, CD, RST> {
        self.cs.set_high().map_err(Error::Cs)?;
        self.cd.set_low().map_err(Error::Cd)
    }

    /// Pulses the reset line low. No-op without a reset pin.
    pub fn hardware_reset(&mut self, pulse_ms: u32) -> InterfaceResult<SPI, CS, CD, RST> {
        let Some(rst) = self.rst.as_mut() else {
            return Ok(());
        };

        rst.set_low().map_err(Error::Rst)?;
        self.delay.delay_ms(pulse_ms);
        rst.set_high().map_err(Error::Rst)?;
        self.delay.delay_ms(pulse_ms);
        Ok(())
    }

    /// Drives every control line low so the panel draws no current.
    pub fn power_down_pins(&mut self) -> InterfaceResult<SPI, CS, CD, RST> {
        if let Some(rst) = self.rst.as_mut() {
            rst.set_low().map_err(Error::Rst)?;
        }
        self.cs.set_low().map_err(Error::Cs)?;
        self.cd.set_low().map_err(Error::Cd)
    }

    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Sends one instruction byte (CD low).
    pub fn send_command(&mut self, byte: u8) -> InterfaceResult<SPI, CS, CD, RST> {
        self.cd.set_low().map_err(Error::Cd)?;
        self.transfer(byte)
    }

    /// Sends a sequence of instruction bytes, each framed on its own.
    pub fn send_commands(&mut self, bytes: &[u8]) -> InterfaceResult<SPI, CS, CD, RST> {
        for &byte in bytes {
            self.send_command(byte)?;
        }

        Ok(())
    }

    /// Sends one display data byte (CD high).
    pub fn send_data(&mut self, byte: u8) -> InterfaceResult<SPI, CS, CD, RST> {
        self.cd.set_high().map_err(Error::Cd)?;
        self.transfer(byte)
    }

    fn transfer(&mut self, byte: u8) -> InterfaceResult<SPI, CS, CD, RST> {
        self.cs.set_low().map_err(Error::Cs)?;
        self.spi.write(&[byte]).map_err(Error::Spi)?;
        self.spi.flush().map_err(Error::Spi)?;
        self.cs.set_high().map_err(Error::Cs)
    }
}
