//! In-memory framebuffer for the UC1701.

use core::convert::TryFrom;

use crate::protocol::{BUFFER_SIZE, HEIGHT, PAGE_ROWS, PAGES, WIDTH};

/// 1bpp framebuffer in controller page order.
///
/// Byte `x + page * WIDTH` holds column `x` of rows `page * 8 ..= page * 8 + 7`;
/// bit 0 is the top row of the page.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    bytes: [u8; BUFFER_SIZE],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Creates a new framebuffer with every pixel off.
    pub const fn new() -> Self {
        Self {
            bytes: [0u8; BUFFER_SIZE],
        }
    }

    /// Returns the underlying framebuffer bytes.
    pub fn bytes(&self) -> &[u8; BUFFER_SIZE] {
        &self.bytes
    }

    /// Returns mutable framebuffer bytes.
    pub fn bytes_mut(&mut self) -> &mut [u8; BUFFER_SIZE] {
        &mut self.bytes
    }

    /// Turns every pixel off.
    pub fn clear(&mut self) {
        self.bytes.fill(0x00);
    }

    /// Sets a pixel state in physical coordinates.
    ///
    /// Returns `true` when pixel is in bounds, `false` otherwise.
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) -> bool {
        let Some((index, mask)) = Self::locate(x, y) else {
            return false;
        };

        if on {
            self.bytes[index] |= mask;
        } else {
            self.bytes[index] &= !mask;
        }

        true
    }

    /// Reads a pixel state in physical coordinates.
    pub fn pixel(&self, x: usize, y: usize) -> Option<bool> {
        let (index, mask) = Self::locate(x, y)?;
        Some((self.bytes[index] & mask) != 0)
    }

    /// Returns the column bytes of page 0..8.
    pub fn page(&self, page: usize) -> Option<&[u8; WIDTH]> {
        if page >= PAGES {
            return None;
        }

        let start = page * WIDTH;
        <&[u8; WIDTH]>::try_from(&self.bytes[start..start + WIDTH]).ok()
    }

    fn locate(x: usize, y: usize) -> Option<(usize, u8)> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }

        Some((x + (y / PAGE_ROWS) * WIDTH, 1u8 << (y % PAGE_ROWS)))
    }
}
