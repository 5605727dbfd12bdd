//! Logical-to-physical pixel mapping.

use crate::protocol::{HEIGHT, WIDTH};

/// Logical orientation of the drawing surface.
///
/// Rotation is applied in software on every pixel write. Mirroring is a
/// controller setting (`Config::x_flip`, `Config::y_flip`).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Maps an index to a rotation, wrapping modulo 4.
    pub const fn from_index(index: u8) -> Self {
        match index & 3 {
            0 => Self::Deg0,
            1 => Self::Deg90,
            2 => Self::Deg180,
            _ => Self::Deg270,
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Whether logical axes are swapped relative to the panel.
    pub const fn is_transposed(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }

    /// Logical `(width, height)` of the drawing surface.
    pub const fn logical_size(self) -> (usize, usize) {
        if self.is_transposed() {
            (HEIGHT, WIDTH)
        } else {
            (WIDTH, HEIGHT)
        }
    }

    /// Maps a logical coordinate to a physical buffer coordinate.
    ///
    /// Returns `None` when the point falls outside the logical surface.
    pub fn to_physical(self, x: i32, y: i32) -> Option<(usize, usize)> {
        let (lw, lh) = self.logical_size();
        if x < 0 || y < 0 || x as usize >= lw || y as usize >= lh {
            return None;
        }

        let (x, y) = (x as usize, y as usize);
        let (px, py) = match self {
            Self::Deg0 => (x, y),
            Self::Deg90 => (lh - 1 - y, x),
            Self::Deg180 => (WIDTH - 1 - x, HEIGHT - 1 - y),
            Self::Deg270 => (y, lw - 1 - x),
        };

        (px < WIDTH && py < HEIGHT).then_some((px, py))
    }
}
