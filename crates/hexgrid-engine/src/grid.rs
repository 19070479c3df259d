use std::ops::{Range, RangeInclusive};

pub const BYTES_PER_ROW: usize = 16;

/// A cell in the hex grid. Ordering is row-major, matching file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GridPos {
    pub row: u64,
    pub col: usize,
}

impl GridPos {
    pub fn new(row: u64, col: usize) -> Self {
        Self { row, col }
    }
}

/// Maps file offsets to grid cells and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    bytes_per_row: usize,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            bytes_per_row: BYTES_PER_ROW,
        }
    }
}

impl GridGeometry {
    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    fn row_bytes(&self) -> u64 {
        self.bytes_per_row as u64
    }

    pub fn compute_grid(&self, offset: u64) -> GridPos {
        GridPos {
            row: offset / self.row_bytes(),
            col: (offset % self.row_bytes()) as usize,
        }
    }

    pub fn compute_offset(&self, pos: GridPos) -> u64 {
        pos.row
            .saturating_mul(self.row_bytes())
            .saturating_add(pos.col as u64)
    }

    /// File offset of the first byte in `row`.
    pub fn row_offset(&self, row: u64) -> u64 {
        row.saturating_mul(self.row_bytes())
    }

    /// Rows needed to show `file_size` bytes; the last one may be partial.
    pub fn row_count(&self, file_size: u64) -> u64 {
        file_size.div_ceil(self.row_bytes())
    }

    /// Bytes covered by an inclusive row range, cut off at the end of the file.
    pub fn byte_range(&self, rows: RangeInclusive<u64>, file_size: u64) -> Range<u64> {
        let start = self.row_offset(*rows.start()).min(file_size);
        let end = self.row_offset(rows.end().saturating_add(1)).min(file_size);
        start..end.max(start)
    }
}
