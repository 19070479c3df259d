use crate::grid::GridPos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Every cell between the two ends in row-major order
    Linear,
    /// The rectangle spanned by the two corners
    Block,
}

/// A selection made with the pointer: started on press, grown while
/// dragging and frozen on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: GridPos,
    pub end: GridPos,
    pub mode: SelectionMode,
    dragging: bool,
}

impl Selection {
    pub fn begin(at: GridPos, mode: SelectionMode) -> Self {
        Self {
            start: at,
            end: at,
            mode,
            dragging: true,
        }
    }

    /// Move the free end. Ignored once the selection is frozen.
    pub fn extend(&mut self, to: GridPos) {
        if self.dragging {
            self.end = to;
        }
    }

    pub fn finish(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// The two ends in row-major order.
    pub fn ordered(&self) -> (GridPos, GridPos) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        match self.mode {
            SelectionMode::Linear => {
                let (first, last) = self.ordered();
                first <= pos && pos <= last
            }
            SelectionMode::Block => {
                let rows = self.start.row.min(self.end.row)..=self.start.row.max(self.end.row);
                let cols = self.start.col.min(self.end.col)..=self.start.col.max(self.end.col);
                rows.contains(&pos.row) && cols.contains(&pos.col)
            }
        }
    }
}
