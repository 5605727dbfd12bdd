//! Wire-level protocol helpers for the UC1701.

use embedded_hal::spi::{MODE_3, Mode};

/// Panel width in pixels (visible SEG columns).
pub const WIDTH: usize = 102;
/// Panel height in pixels (visible COM rows).
pub const HEIGHT: usize = 64;
/// Rows packed into one page byte.
pub const PAGE_ROWS: usize = 8;
/// Number of 8-row pages.
pub const PAGES: usize = HEIGHT / PAGE_ROWS;
/// Total framebuffer size in bytes.
pub const BUFFER_SIZE: usize = WIDTH * PAGES;

/// Bus mode required by the controller: CPOL = 1, CPHA = 1, MSB first.
pub const SPI_MODE: Mode = MODE_3;

/// Column added to logical column 0 when SEG direction is reversed.
///
/// Panels wired to the far end of the 132-column RAM need this raised to 30.
pub const MIRRORED_COLUMN_OFFSET: u8 = 0;

/// Delay after system reset and after power control, in milliseconds.
pub const SETTLE_MS: u32 = 10;
/// Reset pulse half-period and power-down hold, in milliseconds.
pub const RESET_MS: u32 = 1;

/// UC1701 command set.
pub mod cmd {
    pub const SET_COLUMN_LSB: u8 = 0x00;
    pub const SET_COLUMN_MSB: u8 = 0x10;
    pub const RESISTOR_RATIO: u8 = 0x20;
    pub const POWER_CONTROL_OFF: u8 = 0x28;
    pub const POWER_CONTROL_ON: u8 = 0x2F;
    pub const SCROLL_LINE: u8 = 0x40;
    pub const ELECTRONIC_VOLUME: u8 = 0x81;
    pub const SEG_NORMAL: u8 = 0xA0;
    pub const SEG_MIRROR: u8 = 0xA1;
    pub const BIAS_1_9: u8 = 0xA2;
    pub const ALL_PIXEL_OFF: u8 = 0xA4;
    pub const ALL_PIXEL_ON: u8 = 0xA5;
    pub const INVERSE_OFF: u8 = 0xA6;
    pub const INVERSE_ON: u8 = 0xA7;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_PAGE: u8 = 0xB0;
    pub const COM_NORMAL: u8 = 0xC0;
    pub const COM_MIRROR: u8 = 0xC8;
    pub const SYSTEM_RESET: u8 = 0xE2;
    pub const ADV_PROGRAM_CONTROL: u8 = 0xFA;

    /// Temperature compensation and column wrap, as the panel vendor sets it.
    pub const ADV_PROGRAM_CONTROL_VALUE: u8 = 0x90;
}

/// Default electronic volume written during init.
pub const DEFAULT_CONTRAST: u8 = 0x06;
/// Default VLCD resistor ratio written during init.
pub const DEFAULT_RESISTOR_RATIO: u8 = 0x07;

/// Builds the two-command column address pair (MSB nibble, LSB nibble).
#[inline]
pub const fn column_address(column: u8) -> [u8; 2] {
    [
        cmd::SET_COLUMN_MSB | (column >> 4),
        cmd::SET_COLUMN_LSB | (column & 0x0F),
    ]
}

/// Builds the page address command.
///
/// Returns `None` for pages past the visible area.
#[inline]
pub fn page_address(page: usize) -> Option<u8> {
    if page >= PAGES {
        return None;
    }

    Some(cmd::SET_PAGE | page as u8)
}

/// Masks an electronic volume value to its 6-bit range.
#[inline]
pub const fn contrast_value(value: u8) -> u8 {
    value & 0x3F
}

/// Builds the resistor ratio command for a 3-bit ratio.
#[inline]
pub const fn resistor_ratio(value: u8) -> u8 {
    cmd::RESISTOR_RATIO | (value & 0x07)
}

/// SEG direction command.
#[inline]
pub const fn seg_direction(mirrored: bool) -> u8 {
    if mirrored { cmd::SEG_MIRROR } else { cmd::SEG_NORMAL }
}

/// COM direction command.
#[inline]
pub const fn com_direction(mirrored: bool) -> u8 {
    if mirrored { cmd::COM_MIRROR } else { cmd::COM_NORMAL }
}

/// Inverse display command.
#[inline]
pub const fn inverse(inverted: bool) -> u8 {
    if inverted { cmd::INVERSE_ON } else { cmd::INVERSE_OFF }
}

/// Column that logical column 0 lands on for a given SEG direction.
#[inline]
pub const fn column_offset(x_flip: bool) -> u8 {
    if x_flip { MIRRORED_COLUMN_OFFSET } else { 0 }
}
