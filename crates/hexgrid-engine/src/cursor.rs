use crate::grid::{GridGeometry, GridPos};

/// Which half of a byte the next keystroke overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nibble {
    #[default]
    High,
    Low,
}

impl Nibble {
    /// Replace this half of `byte` with `value` (0..=15).
    pub fn apply(self, byte: u8, value: u8) -> u8 {
        match self {
            Nibble::High => (byte & 0x0F) | (value << 4),
            Nibble::Low => (byte & 0xF0) | (value & 0x0F),
        }
    }
}

/// The edit cursor: `High` is idle on a byte, `Low` is waiting for the
/// second digit of the same byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditCursor {
    pub offset: u64,
    pub nibble: Nibble,
}

impl EditCursor {
    pub fn new(offset: u64) -> Self {
        Self {
            offset,
            nibble: Nibble::High,
        }
    }

    pub fn position(&self, grid: &GridGeometry) -> GridPos {
        grid.compute_grid(self.offset)
    }

    pub fn is_waiting_low(&self) -> bool {
        self.nibble == Nibble::Low
    }

    /// Where the cursor goes once `nibble` of the byte at `offset` is written.
    pub fn after_commit(offset: u64, nibble: Nibble, file_size: u64) -> Self {
        match nibble {
            Nibble::High => Self {
                offset,
                nibble: Nibble::Low,
            },
            Nibble::Low => Self::new((offset + 1).min(file_size.saturating_sub(1))),
        }
    }
}

/// Cursor movement keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    RowStart,
    RowEnd,
    FileStart,
    FileEnd,
}

pub fn hex_value(ch: char) -> Option<u8> {
    ch.to_digit(16).map(|d| d as u8)
}
