#![cfg_attr(not(test), no_std)]

//! UC1701 (102x64 monochrome dot-matrix LCD) driver primitives.
//!
//! Pixels are drawn into an in-memory [`FrameBuffer`] and pushed to the
//! controller page by page with [`Uc1701::flush`] or [`Uc1701::flush_region`].
//! Shapes and text come from an external graphics library through
//! [`Uc1701::set_pixel`] (or `DrawTarget` with the `embedded-graphics` feature).

mod framebuffer;
pub mod interface;
pub mod protocol;
mod rotation;

#[cfg(feature = "embedded-graphics")]
mod graphics;

#[cfg(test)]
mod mock;

pub use framebuffer::FrameBuffer;
pub use interface::{Interface, NoPin};
pub use rotation::Rotation;

use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};
use log::{debug, error, info, trace};

use crate::{
    interface::{InterfaceError, InterfaceResult},
    protocol::{HEIGHT, PAGE_ROWS, WIDTH, cmd},
};

/// Driver configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// Expected SPI clock in Hz (documented for board glue).
    pub spi_hz: u32,
    /// Reverse SEG (column) scan direction.
    pub x_flip: bool,
    /// Reverse COM (row) scan direction.
    pub y_flip: bool,
    /// Initial drawing orientation.
    pub rotation: Rotation,
    /// Electronic volume written during init (0..=63).
    pub contrast: u8,
    /// VLCD resistor ratio written during init (0..=7).
    pub resistor_ratio: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Unflipped panel at 4 MHz with the vendor's contrast and resistor ratio.
    pub const fn new() -> Self {
        Self {
            spi_hz: 4_000_000,
            x_flip: false,
            y_flip: false,
            rotation: Rotation::Deg0,
            contrast: protocol::DEFAULT_CONTRAST,
            resistor_ratio: protocol::DEFAULT_RESISTOR_RATIO,
        }
    }

    /// Column the controller must be pointed at for buffer column 0.
    pub const fn column_offset(&self) -> u8 {
        protocol::column_offset(self.x_flip)
    }
}

/// Driver errors.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Error<SpiErr, CsErr, CdErr, RstErr> {
    /// SPI transfer failed.
    Spi(SpiErr),
    /// CS pin operation failed.
    Cs(CsErr),
    /// CD pin operation failed.
    Cd(CdErr),
    /// RST pin operation failed.
    Rst(RstErr),
    /// No interface attached; [`Uc1701::begin`] has not run.
    NotInitialized,
}

pub type DriverResult<SpiErr, CsErr, CdErr, RstErr> =
    Result<(), Error<SpiErr, CsErr, CdErr, RstErr>>;

/// Controller lifecycle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum State {
    #[default]
    Uninitialized,
    Initializing,
    Enabled,
    Disabled,
}

/// UC1701 driver.
///
/// Owns the framebuffer and, after [`begin`](Self::begin), the bus interface.
/// Buffer operations never touch the bus; only init, the enable/contrast
/// setters and flushes do.
#[derive(Debug)]
pub struct Uc1701<SPI, CS, CD, RST, D> {
    interface: Option<Interface<SPI, CS, CD, RST, D>>,
    config: Config,
    frame: FrameBuffer,
    rotation: Rotation,
    state: State,
    enabled: bool,
    flush_holds: u16,
}

impl<SPI, CS, CD, RST, D> Default for Uc1701<SPI, CS, CD, RST, D> {
    fn default() -> Self {
        Self::new()
    }
}

// Buffer-side operations: no bus access, no trait bounds.
impl<SPI, CS, CD, RST, D> Uc1701<SPI, CS, CD, RST, D> {
    /// Creates a driver with no interface attached.
    pub const fn new() -> Self {
        Self {
            interface: None,
            config: Config::new(),
            frame: FrameBuffer::new(),
            rotation: Rotation::Deg0,
            state: State::Uninitialized,
            enabled: false,
            flush_holds: 0,
        }
    }

    /// Returns current configuration.
    pub fn config(&self) -> Config {
        self.config
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Logical `(width, height)` for the current rotation.
    pub fn size(&self) -> (usize, usize) {
        self.rotation.logical_size()
    }

    /// Turns every pixel off and re-arms flushing.
    pub fn clear(&mut self) {
        self.flush_holds = 0;
        self.frame.clear();
    }

    /// Writes one pixel in logical coordinates. Out-of-range points are ignored.
    ///
    /// While the driver is disabled, `on` pixels are written as off; off
    /// pixels are always cleared.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        let Some((px, py)) = self.rotation.to_physical(x, y) else {
            return;
        };

        let _ = self.frame.set_pixel(px, py, on && self.enabled);
    }

    /// Reads one pixel in logical coordinates.
    pub fn pixel(&self, x: i32, y: i32) -> Option<bool> {
        let (px, py) = self.rotation.to_physical(x, y)?;
        self.frame.pixel(px, py)
    }

    /// Suppresses flushes until [`release_flush`](Self::release_flush) or
    /// [`clear`](Self::clear). Nests.
    pub fn hold_flush(&mut self) {
        self.flush_holds = self.flush_holds.saturating_add(1);
    }

    pub fn release_flush(&mut self) {
        self.flush_holds = self.flush_holds.saturating_sub(1);
    }

    pub fn is_flush_held(&self) -> bool {
        self.flush_holds > 0
    }

    /// Detaches and returns the interface, leaving the driver uninitialized.
    pub fn release(&mut self) -> Option<Interface<SPI, CS, CD, RST, D>> {
        self.state = State::Uninitialized;
        self.enabled = false;
        self.interface.take()
    }
}

impl<SPI, CS, CD, RST, D> Uc1701<SPI, CS, CD, RST, D>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    CD: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    /// Attaches the interface, stores `config` and initializes the panel.
    pub fn begin(
        &mut self,
        interface: Interface<SPI, CS, CD, RST, D>,
        config: Config,
    ) -> InterfaceResult<SPI, CS, CD, RST> {
        self.interface = Some(interface);
        self.config = config;
        self.rotation = config.rotation;
        self.init()
    }

    /// Enables (full re-init, clears the buffer) or powers down the panel.
    ///
    /// Disabling keeps the buffer contents.
    pub fn set_enabled(&mut self, enabled: bool) -> InterfaceResult<SPI, CS, CD, RST> {
        if enabled {
            return self.init();
        }

        let iface = Self::attached(&mut self.interface)?;
        iface.send_command(cmd::POWER_CONTROL_OFF)?;
        iface.delay_ms(protocol::SETTLE_MS);
        iface.send_command(cmd::DISPLAY_OFF)?;
        iface.power_down_pins()?;
        iface.delay_ms(protocol::RESET_MS);

        self.enabled = false;
        self.state = State::Disabled;
        info!("uc1701: display disabled");
        Ok(())
    }

    /// Sets electronic volume (0..=63, higher bits ignored).
    pub fn set_contrast(&mut self, value: u8) -> InterfaceResult<SPI, CS, CD, RST> {
        let iface = Self::attached(&mut self.interface)?;
        iface.send_command(cmd::ELECTRONIC_VOLUME)?;
        iface.send_data(protocol::contrast_value(value))
    }

    /// Sets VLCD resistor ratio (0..=7, higher bits ignored).
    pub fn set_resistor(&mut self, value: u8) -> InterfaceResult<SPI, CS, CD, RST> {
        Self::attached(&mut self.interface)?.send_command(protocol::resistor_ratio(value))
    }

    pub fn set_inverted(&mut self, inverted: bool) -> InterfaceResult<SPI, CS, CD, RST> {
        Self::attached(&mut self.interface)?.send_command(protocol::inverse(inverted))
    }

    /// Flushes the full framebuffer.
    pub fn flush(&mut self) -> InterfaceResult<SPI, CS, CD, RST> {
        self.flush_region(0, 0, WIDTH as i32 - 1, HEIGHT as i32 - 1)
    }

    /// Flushes the inclusive physical box `(x0, y0)..=(x1, y1)`.
    ///
    /// Rows are rounded out to whole pages. Does nothing while a flush hold
    /// is active.
    pub fn flush_region(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
    ) -> InterfaceResult<SPI, CS, CD, RST> {
        if self.flush_holds > 0 {
            trace!("uc1701: flush held ({})", self.flush_holds);
            return Ok(());
        }

        let iface = Self::attached(&mut self.interface)?;

        let x0 = x0.max(0) as usize;
        let x1 = x1.min(WIDTH as i32 - 1);
        let y1 = y1.min(HEIGHT as i32 - 1);
        if x1 < 0 || y1 < 0 || x0 > x1 as usize {
            return Ok(());
        }
        let x1 = x1 as usize;

        let p0 = y0.max(0) as usize / PAGE_ROWS;
        let p1 = y1 as usize / PAGE_ROWS;
        debug!("uc1701: flush cols {}..={} pages {}..={}", x0, x1, p0, p1);

        let column = x0 as u8 + self.config.column_offset();
        for page in p0..=p1 {
            let (Some(address), Some(bytes)) = (protocol::page_address(page), self.frame.page(page))
            else {
                break;
            };

            iface.send_commands(&protocol::column_address(column))?;
            iface.send_command(address)?;

            for &byte in &bytes[x0..=x1] {
                iface.send_data(byte)?;
            }
        }

        Ok(())
    }

    fn init(&mut self) -> InterfaceResult<SPI, CS, CD, RST> {
        let config = self.config;
        let iface = Self::attached(&mut self.interface)?;

        iface.configure_idle()?;
        self.enabled = true;
        self.state = State::Initializing;

        iface.hardware_reset(protocol::RESET_MS)?;

        iface.send_command(cmd::SYSTEM_RESET)?;
        iface.delay_ms(protocol::SETTLE_MS);
        iface.send_commands(&[
            cmd::DISPLAY_OFF,
            cmd::SCROLL_LINE,
            protocol::seg_direction(config.x_flip),
            protocol::com_direction(config.y_flip),
            cmd::ALL_PIXEL_OFF,
            cmd::INVERSE_OFF,
            cmd::BIAS_1_9,
            cmd::POWER_CONTROL_ON,
        ])?;
        iface.delay_ms(protocol::SETTLE_MS);
        iface.send_commands(&[
            protocol::resistor_ratio(config.resistor_ratio),
            cmd::ELECTRONIC_VOLUME,
            protocol::contrast_value(config.contrast),
            cmd::ADV_PROGRAM_CONTROL,
            cmd::ADV_PROGRAM_CONTROL_VALUE,
            cmd::ALL_PIXEL_OFF,
            cmd::DISPLAY_ON,
        ])?;

        self.clear();
        self.state = State::Enabled;
        info!(
            "uc1701: initialized (x_flip={}, y_flip={})",
            config.x_flip, config.y_flip
        );
        Ok(())
    }

    fn attached(
        interface: &mut Option<Interface<SPI, CS, CD, RST, D>>,
    ) -> Result<&mut Interface<SPI, CS, CD, RST, D>, InterfaceError<SPI, CS, CD, RST>> {
        interface.as_mut().ok_or_else(|| {
            error!("uc1701: SPI interface not set");
            Error::NotInitialized
        })
    }
}
