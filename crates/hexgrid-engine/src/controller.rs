//! The hex grid controller.
//!
//! [`HexGrid`] sits between a presentation layer and a [`LargeFile`]. It owns
//! the visible row range, the edit cursor and the selection, keeps the file's
//! mapped window over whatever rows are of interest, and commits nibble edits
//! both to the mapped view and directly to disk.
//!
//! A renderer polls it each frame: [`HexGrid::visible_rows`],
//! [`HexGrid::read_byte`], [`HexGrid::is_selected`] and [`HexGrid::cursor`].

use crate::cursor::{CursorMove, EditCursor, Nibble, hex_value};
use crate::error::{AccessError, EditError, OpenError};
use crate::grid::{GridGeometry, GridPos};
use crate::io::write_byte_at;
use crate::search::Pattern;
use crate::selection::{Selection, SelectionMode};
use crate::window::{DEFAULT_WINDOW_PAGES, LargeFile, WindowInfo};
use std::ops::{Range, RangeInclusive};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridOptions {
    pub window_pages: u32,
    pub visible_rows: u64,
    pub scroll_step: u64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            window_pages: DEFAULT_WINDOW_PAGES,
            visible_rows: 32,
            scroll_step: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Snapshot of what a status bar shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub path: PathBuf,
    pub file_size: u64,
    pub top_offset: u64,
    pub cursor: EditCursor,
    pub cursor_pos: GridPos,
    pub window: Option<WindowInfo>,
}

#[derive(Debug)]
pub struct HexGrid {
    file: LargeFile,
    grid: GridGeometry,
    top_row: u64,
    visible_row_count: u64,
    scroll_step: u64,
    cursor: EditCursor,
    selection: Option<Selection>,
}

impl HexGrid {
    pub fn open<P: AsRef<Path>>(path: P, options: GridOptions) -> Result<Self, OpenError> {
        let file = LargeFile::open_with_pages(path, options.window_pages)?;
        Ok(Self::new(file, options))
    }

    pub fn new(file: LargeFile, options: GridOptions) -> Self {
        Self {
            file,
            grid: GridGeometry::default(),
            top_row: 0,
            visible_row_count: options.visible_rows.max(1),
            scroll_step: options.scroll_step.max(1),
            cursor: EditCursor::default(),
            selection: None,
        }
    }

    pub fn file(&self) -> &LargeFile {
        &self.file
    }

    pub fn grid(&self) -> GridGeometry {
        self.grid
    }

    pub fn bytes_per_row(&self) -> usize {
        self.grid.bytes_per_row()
    }

    pub fn file_size(&self) -> u64 {
        self.file.file_size()
    }

    pub fn total_rows(&self) -> u64 {
        self.grid.row_count(self.file_size())
    }

    pub fn scroll_step(&self) -> u64 {
        self.scroll_step
    }

    pub fn row_offset(&self, row: u64) -> u64 {
        self.grid.row_offset(row)
    }

    /// Rows currently on screen, never past the last row of the file.
    pub fn visible_rows(&self) -> RangeInclusive<u64> {
        let last_row = self.total_rows() - 1;
        let end = self
            .top_row
            .saturating_add(self.visible_row_count - 1)
            .min(last_row);
        self.top_row..=end
    }

    pub fn set_visible_row_count(&mut self, rows: u64) -> Result<(), AccessError> {
        self.visible_row_count = rows.max(1);
        self.top_row = self.top_row.min(self.max_top_row());
        self.refresh()
    }

    /// Make sure the visible rows are mapped.
    pub fn refresh(&mut self) -> Result<(), AccessError> {
        self.ensure_visible(self.visible_rows())
    }

    fn max_top_row(&self) -> u64 {
        self.total_rows().saturating_sub(self.visible_row_count)
    }

    /// Map the bytes of `rows` unless the current window already holds them.
    ///
    /// A remap is centred on the middle of the requested rows so that
    /// scrolling either way stays inside the new window for a while.
    /// A reversed range is taken in row order.
    pub fn ensure_visible(&mut self, rows: RangeInclusive<u64>) -> Result<(), AccessError> {
        let (first, last) = rows.into_inner();
        let rows = first.min(last)..=first.max(last);
        let file_size = self.file_size();
        let bytes = self.grid.byte_range(rows, file_size);
        if bytes.is_empty() {
            return Err(AccessError::OutOfRange {
                offset: bytes.start,
                file_size,
            });
        }
        if self.file.covers(bytes.clone()) {
            return Ok(());
        }
        let middle = bytes.start + (bytes.end - bytes.start) / 2;
        self.file.visit(middle)?;
        Ok(())
    }

    /// The byte at `offset`, if it is in the file and currently mapped.
    pub fn read_byte(&self, offset: u64) -> Option<u8> {
        if offset >= self.file_size() {
            return None;
        }
        self.file.peek(offset)
    }

    pub fn scroll(&mut self, direction: ScrollDirection, amount: u64) -> Result<(), AccessError> {
        self.top_row = match direction {
            ScrollDirection::Up => self.top_row.saturating_sub(amount),
            ScrollDirection::Down => self.top_row.saturating_add(amount).min(self.max_top_row()),
        };
        self.refresh()
    }

    /// Scroll just enough to bring the row holding `offset` on screen.
    pub fn scroll_to_offset(&mut self, offset: u64) -> Result<(), AccessError> {
        let last = self.file_size() - 1;
        let row = self.grid.compute_grid(offset.min(last)).row;
        if row < self.top_row {
            self.top_row = row;
        } else if row >= self.top_row.saturating_add(self.visible_row_count) {
            self.top_row = row + 1 - self.visible_row_count;
        }
        self.refresh()
    }

    pub fn cursor(&self) -> EditCursor {
        self.cursor
    }

    pub fn cursor_pos(&self) -> GridPos {
        self.cursor.position(&self.grid)
    }

    /// Put the cursor on the high nibble of `offset` (clamped to the file).
    pub fn move_cursor_to(&mut self, offset: u64) -> Result<(), AccessError> {
        let offset = offset.min(self.file_size() - 1);
        self.cursor = EditCursor::new(offset);
        self.scroll_to_offset(offset)
    }

    /// Put the cursor at a grid cell. Columns past the end of a row land on
    /// its last byte.
    pub fn set_cursor(&mut self, row: u64, col: usize) -> Result<(), AccessError> {
        let col = col.min(self.bytes_per_row() - 1);
        self.move_cursor_to(self.grid.compute_offset(GridPos::new(row, col)))
    }

    pub fn move_cursor(&mut self, movement: CursorMove) -> Result<(), AccessError> {
        let offset = self.cursor.offset;
        let last = self.file_size() - 1;
        let row_len = self.bytes_per_row() as u64;
        let page = self.visible_row_count.saturating_mul(row_len);
        let row_start = self.grid.row_offset(self.grid.compute_grid(offset).row);

        let target = match movement {
            CursorMove::Left => offset.saturating_sub(1),
            CursorMove::Right => offset + 1,
            CursorMove::Up => offset.checked_sub(row_len).unwrap_or(offset),
            CursorMove::Down => offset + row_len,
            CursorMove::PageUp => offset.saturating_sub(page),
            CursorMove::PageDown => offset.saturating_add(page),
            CursorMove::RowStart => row_start,
            CursorMove::RowEnd => row_start + row_len - 1,
            CursorMove::FileStart => 0,
            CursorMove::FileEnd => last,
        };
        self.move_cursor_to(target)
    }

    /// Drop a half-typed byte: the cursor goes back to the high nibble.
    pub fn cancel_edit(&mut self) {
        self.cursor.nibble = Nibble::High;
    }

    /// Feed a keystroke to the edit cursor. Anything but a hex digit is
    /// ignored and returns `Ok(None)`.
    pub fn input_hex(&mut self, ch: char) -> Result<Option<EditCursor>, EditError> {
        let Some(value) = hex_value(ch) else {
            return Ok(None);
        };
        let EditCursor { offset, nibble } = self.cursor;
        self.apply_nibble(offset, nibble, value).map(Some)
    }

    /// Overwrite one nibble of the byte at `offset` and move the cursor on.
    ///
    /// The mapped byte and the cursor are updated before the byte is written
    /// to disk; if that write fails they stay updated and
    /// [`EditError::Persist`] is returned.
    pub fn apply_nibble(
        &mut self,
        offset: u64,
        nibble: Nibble,
        value: u8,
    ) -> Result<EditCursor, EditError> {
        if value > 0x0F {
            return Err(EditError::InvalidNibble(value));
        }
        let view = self.file.visit(offset)?;
        view[0] = nibble.apply(view[0], value);
        let byte = view[0];

        self.cursor = EditCursor::after_commit(offset, nibble, self.file_size());
        let persisted = self.persist(offset, byte);
        self.scroll_to_offset(self.cursor.offset)?;
        persisted?;
        Ok(self.cursor)
    }

    /// Overwrite a whole byte. The cursor does not move.
    pub fn set_byte(&mut self, offset: u64, value: u8) -> Result<(), EditError> {
        let view = self.file.visit(offset)?;
        view[0] = value;
        self.persist(offset, value)
    }

    fn persist(&self, offset: u64, value: u8) -> Result<(), EditError> {
        write_byte_at(self.file.path(), offset, value).map_err(|source| {
            log::warn!(
                "Byte {value:#04x} at {offset:#x} not written to {}: {source}",
                self.file.path().display()
            );
            EditError::Persist { offset, source }
        })
    }

    pub fn begin_selection(&mut self, row: u64, col: usize, block_mode: bool) {
        let mode = if block_mode {
            SelectionMode::Block
        } else {
            SelectionMode::Linear
        };
        self.selection = Some(Selection::begin(GridPos::new(row, col), mode));
    }

    pub fn extend_selection(&mut self, row: u64, col: usize) {
        if let Some(selection) = self.selection.as_mut() {
            selection.extend(GridPos::new(row, col));
        }
    }

    pub fn end_selection(&mut self) {
        if let Some(selection) = self.selection.as_mut() {
            selection.finish();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn is_selected(&self, row: u64, col: usize) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|s| s.contains(GridPos::new(row, col)))
    }

    /// File bytes covered by a linear selection.
    pub fn selected_byte_range(&self) -> Option<Range<u64>> {
        let selection = self.selection.as_ref()?;
        if selection.mode != SelectionMode::Linear {
            return None;
        }
        let (first, last) = selection.ordered();
        let file_size = self.file_size();
        let start = self.grid.compute_offset(first).min(file_size);
        let end = (self.grid.compute_offset(last) + 1).min(file_size);
        Some(start..end)
    }

    /// Search the file from `from` for `pattern`, one window at a time.
    ///
    /// The last `pattern.len() - 1` bytes of each window are carried into the
    /// next so matches straddling a window boundary are found.
    pub fn find(&mut self, pattern: &Pattern, from: u64) -> Result<Option<u64>, AccessError> {
        let file_size = self.file_size();
        if pattern.is_empty() {
            return Ok((from < file_size).then_some(from));
        }
        let overlap = pattern.len() - 1;

        let mut carry: Vec<u8> = Vec::new();
        let mut carry_start = from;
        let mut pos = from;
        while pos < file_size {
            let chunk = self.file.visit(pos)?;
            pos += chunk.len() as u64;
            let mut buf = std::mem::take(&mut carry);
            buf.extend_from_slice(chunk);

            if let Some(index) = pattern.find_in(&buf) {
                return Ok(Some(carry_start + index as u64));
            }

            let keep = overlap.min(buf.len());
            carry_start += (buf.len() - keep) as u64;
            carry = buf.split_off(buf.len() - keep);
        }
        Ok(None)
    }

    pub fn status(&self) -> Status {
        Status {
            path: self.file.path().to_path_buf(),
            file_size: self.file_size(),
            top_offset: self.grid.row_offset(self.top_row),
            cursor: self.cursor,
            cursor_pos: self.cursor_pos(),
            window: self.file.window(),
        }
    }

    pub fn close(&mut self) {
        self.file.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{counting_bytes, create_test_file};
    use crate::window::PageGeometry;
    use pretty_assertions::assert_eq;

    /// 64 byte pages: four grid rows per page, twelve per window.
    fn open_grid(path: &Path, visible_rows: u64) -> HexGrid {
        let file = LargeFile::open_with_geometry(path, PageGeometry::new(64, 3)).unwrap();
        let options = GridOptions {
            visible_rows,
            ..GridOptions::default()
        };
        HexGrid::new(file, options)
    }

    #[test]
    fn test_read_byte_needs_mapped_window() {
        let (_dir, path) = create_test_file(&counting_bytes(1000));
        let mut hex = open_grid(&path, 2);

        assert_eq!(hex.read_byte(0), None);

        hex.refresh().unwrap();
        assert_eq!(hex.read_byte(0), Some(0));
        assert_eq!(hex.read_byte(31), Some(31));
        assert_eq!(hex.read_byte(1000), None);
    }

    #[test]
    fn test_ensure_visible_centres_on_middle_row() {
        let (_dir, path) = create_test_file(&counting_bytes(1000));
        let mut hex = open_grid(&path, 2);

        // Rows 20..=21 are bytes 320..352, middle byte 336
        hex.ensure_visible(20..=21).unwrap();

        assert_eq!(hex.file().window(), Some(WindowInfo { start: 256, len: 192 }));
    }

    #[test]
    fn test_ensure_visible_reuses_window_while_scrolling() {
        let (_dir, path) = create_test_file(&counting_bytes(1000));
        let mut hex = open_grid(&path, 2);
        hex.ensure_visible(0..=1).unwrap();
        assert_eq!(hex.file().remap_count(), 1);

        // The first window spans rows 0..=11
        for top in 1..=10 {
            hex.ensure_visible(top..=top + 1).unwrap();
        }
        assert_eq!(hex.file().remap_count(), 1);

        hex.ensure_visible(11..=12).unwrap();
        assert_eq!(hex.file().remap_count(), 2);
    }

    #[test]
    fn test_ensure_visible_past_end_of_file() {
        let (_dir, path) = create_test_file(&counting_bytes(100));
        let mut hex = open_grid(&path, 2);

        let result = hex.ensure_visible(7..=8);

        assert!(matches!(result, Err(AccessError::OutOfRange { .. })));
    }

    #[test]
    fn test_apply_nibbles_writes_byte_to_disk() {
        // Given a file of zeros
        let (_dir, path) = create_test_file(&[0u8; 40]);
        let mut hex = open_grid(&path, 2);

        // When writing the high then the low nibble of byte 17
        let cursor = hex.apply_nibble(17, Nibble::High, 0xC).unwrap();
        assert_eq!(cursor, EditCursor { offset: 17, nibble: Nibble::Low });
        let cursor = hex.apply_nibble(17, Nibble::Low, 0x4).unwrap();

        // Then the byte is on disk and in the view, and the cursor moved on
        assert_eq!(std::fs::read(&path).unwrap()[17], 0xC4);
        assert_eq!(hex.read_byte(17), Some(0xC4));
        assert_eq!(cursor, EditCursor::new(18));
    }

    #[test]
    fn test_apply_nibble_keeps_other_half() {
        let (_dir, path) = create_test_file(&[0xAB; 4]);
        let mut hex = open_grid(&path, 2);

        hex.apply_nibble(1, Nibble::Low, 0x0).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), vec![0xAB, 0xA0, 0xAB, 0xAB]);
    }

    #[test]
    fn test_apply_nibble_at_last_byte_keeps_cursor_in_file() {
        let (_dir, path) = create_test_file(&[0u8; 4]);
        let mut hex = open_grid(&path, 2);

        let cursor = hex.apply_nibble(3, Nibble::Low, 0x1).unwrap();

        assert_eq!(cursor, EditCursor::new(3));
    }

    #[test]
    fn test_apply_nibble_rejects_large_value() {
        let (_dir, path) = create_test_file(&[0u8; 4]);
        let mut hex = open_grid(&path, 2);

        let result = hex.apply_nibble(0, Nibble::High, 16);

        assert!(matches!(result, Err(EditError::InvalidNibble(16))));
        assert_eq!(std::fs::read(&path).unwrap(), vec![0u8; 4]);
        assert_eq!(hex.cursor(), EditCursor::new(0));
    }

    #[test]
    fn test_apply_nibble_out_of_range() {
        let (_dir, path) = create_test_file(&[0u8; 4]);
        let mut hex = open_grid(&path, 2);

        let result = hex.apply_nibble(4, Nibble::High, 1);

        assert!(matches!(
            result,
            Err(EditError::Access(AccessError::OutOfRange { offset: 4, .. }))
        ));
    }

    #[test]
    fn test_typing_hex_digits() {
        let (_dir, path) = create_test_file(&[0u8; 20]);
        let mut hex = open_grid(&path, 2);

        for ch in "dEAd".chars() {
            hex.input_hex(ch).unwrap();
        }

        assert_eq!(&std::fs::read(&path).unwrap()[..3], &[0xDEu8, 0xAD, 0x00]);
        assert_eq!(hex.cursor(), EditCursor::new(2));
    }

    #[test]
    fn test_non_hex_input_while_waiting_low_is_ignored() {
        let (_dir, path) = create_test_file(&[0u8; 20]);
        let mut hex = open_grid(&path, 2);
        hex.input_hex('7').unwrap();

        assert_eq!(hex.input_hex('x').unwrap(), None);
        assert_eq!(hex.input_hex(' ').unwrap(), None);
        assert_eq!(hex.cursor(), EditCursor { offset: 0, nibble: Nibble::Low });

        hex.input_hex('1').unwrap();
        assert_eq!(std::fs::read(&path).unwrap()[0], 0x71);
    }

    #[test]
    fn test_cancel_edit_returns_to_high_nibble() {
        let (_dir, path) = create_test_file(&[0u8; 20]);
        let mut hex = open_grid(&path, 2);
        hex.input_hex('f').unwrap();

        hex.cancel_edit();
        hex.input_hex('1').unwrap();

        assert_eq!(std::fs::read(&path).unwrap()[0], 0x10);
        assert_eq!(hex.cursor(), EditCursor { offset: 0, nibble: Nibble::Low });
    }

    #[test]
    fn test_failed_disk_write_keeps_mapped_change() {
        let (_dir, path) = create_test_file(&[0u8; 20]);
        let mut hex = open_grid(&path, 2);
        hex.refresh().unwrap();
        std::fs::remove_file(&path).unwrap();

        let result = hex.set_byte(5, 0x99);

        assert!(matches!(result, Err(EditError::Persist { offset: 5, .. })));
        assert_eq!(hex.read_byte(5), Some(0x99));
    }

    #[test]
    fn test_failed_nibble_write_keeps_change_and_advances() {
        let (_dir, path) = create_test_file(&[0x30u8; 20]);
        let mut hex = open_grid(&path, 2);
        hex.refresh().unwrap();
        std::fs::remove_file(&path).unwrap();

        let result = hex.apply_nibble(7, Nibble::Low, 0xA);

        assert!(matches!(result, Err(EditError::Persist { offset: 7, .. })));
        assert_eq!(hex.read_byte(7), Some(0x3A));
        assert_eq!(hex.cursor(), EditCursor::new(8));
    }

    #[test]
    fn test_huge_scroll_lands_on_last_page() {
        let (_dir, path) = create_test_file(&counting_bytes(4096));
        let mut hex = open_grid(&path, 10);

        hex.scroll(ScrollDirection::Down, u64::MAX).unwrap();

        assert_eq!(hex.visible_rows(), 246..=255);
        assert_eq!(hex.read_byte(4095), Some((4095 % 251) as u8));

        hex.scroll(ScrollDirection::Up, u64::MAX).unwrap();
        assert_eq!(hex.visible_rows(), 0..=9);
    }

    #[test]
    fn test_huge_row_counts_are_clamped() {
        let (_dir, path) = create_test_file(&counting_bytes(1000));
        let file = LargeFile::open_with_geometry(&path, PageGeometry::new(64, 3)).unwrap();
        let options = GridOptions {
            visible_rows: u64::MAX,
            ..GridOptions::default()
        };
        let mut hex = HexGrid::new(file, options);

        assert_eq!(hex.visible_rows(), 0..=62);
        hex.refresh().unwrap();
        hex.ensure_visible(60..=u64::MAX).unwrap();
        hex.move_cursor(CursorMove::PageDown).unwrap();
        assert_eq!(hex.cursor().offset, 999);
    }

    #[test]
    fn test_ensure_visible_accepts_reversed_rows() {
        let (_dir, path) = create_test_file(&counting_bytes(1000));
        let mut hex = open_grid(&path, 2);

        hex.ensure_visible(21..=20).unwrap();

        assert_eq!(hex.file().window(), Some(WindowInfo { start: 256, len: 192 }));
    }

    #[test]
    fn test_set_cursor_clamps_column_to_row() {
        let (_dir, path) = create_test_file(&counting_bytes(100));
        let mut hex = open_grid(&path, 2);

        hex.set_cursor(0, 20).unwrap();

        assert_eq!(hex.cursor_pos(), GridPos::new(0, 15));
        assert_eq!(hex.cursor().offset, 15);
    }

    #[test]
    fn test_set_byte_does_not_move_cursor() {
        let (_dir, path) = create_test_file(&[0u8; 20]);
        let mut hex = open_grid(&path, 2);

        hex.set_byte(9, 0x5A).unwrap();

        assert_eq!(std::fs::read(&path).unwrap()[9], 0x5A);
        assert_eq!(hex.cursor(), EditCursor::new(0));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let (_dir, path) = create_test_file(&counting_bytes(1000));
        let mut hex = open_grid(&path, 10);
        assert_eq!(hex.total_rows(), 63);

        hex.scroll(ScrollDirection::Down, 100).unwrap();
        assert_eq!(hex.visible_rows(), 53..=62);
        assert_eq!(hex.read_byte(999), Some((999 % 251) as u8));

        hex.scroll(ScrollDirection::Up, 20).unwrap();
        assert_eq!(hex.visible_rows(), 33..=42);

        hex.scroll(ScrollDirection::Up, 100).unwrap();
        assert_eq!(hex.visible_rows(), 0..=9);
    }

    #[test]
    fn test_short_file_shows_only_its_rows() {
        let (_dir, path) = create_test_file(&counting_bytes(40));
        let mut hex = open_grid(&path, 10);

        hex.scroll(ScrollDirection::Down, 5).unwrap();

        assert_eq!(hex.visible_rows(), 0..=2);
    }

    #[test]
    fn test_cursor_movement_scrolls_view() {
        let (_dir, path) = create_test_file(&counting_bytes(1000));
        let mut hex = open_grid(&path, 4);

        for _ in 0..5 {
            hex.move_cursor(CursorMove::Down).unwrap();
        }
        assert_eq!(hex.cursor_pos(), GridPos::new(5, 0));
        assert_eq!(hex.visible_rows(), 2..=5);

        hex.move_cursor(CursorMove::RowEnd).unwrap();
        assert_eq!(hex.cursor_pos(), GridPos::new(5, 15));
        hex.move_cursor(CursorMove::Right).unwrap();
        assert_eq!(hex.cursor_pos(), GridPos::new(6, 0));
        hex.move_cursor(CursorMove::Left).unwrap();
        hex.move_cursor(CursorMove::RowStart).unwrap();
        assert_eq!(hex.cursor_pos(), GridPos::new(5, 0));

        hex.move_cursor(CursorMove::FileEnd).unwrap();
        assert_eq!(hex.cursor().offset, 999);
        assert_eq!(hex.visible_rows(), 59..=62);
        hex.move_cursor(CursorMove::Right).unwrap();
        assert_eq!(hex.cursor().offset, 999);

        hex.move_cursor(CursorMove::FileStart).unwrap();
        hex.move_cursor(CursorMove::Up).unwrap();
        assert_eq!(hex.cursor().offset, 0);
        assert_eq!(hex.visible_rows(), 0..=3);
    }

    #[test]
    fn test_moving_cursor_abandons_half_typed_byte() {
        let (_dir, path) = create_test_file(&[0u8; 40]);
        let mut hex = open_grid(&path, 2);
        hex.input_hex('a').unwrap();

        hex.move_cursor(CursorMove::Right).unwrap();

        assert_eq!(hex.cursor(), EditCursor::new(1));
    }

    #[test]
    fn test_set_cursor_clamps_to_file() {
        let (_dir, path) = create_test_file(&[0u8; 40]);
        let mut hex = open_grid(&path, 2);

        hex.set_cursor(2, 15).unwrap();

        assert_eq!(hex.cursor(), EditCursor::new(39));
    }

    #[test]
    fn test_selection_through_controller() {
        let (_dir, path) = create_test_file(&counting_bytes(100));
        let mut hex = open_grid(&path, 2);

        hex.begin_selection(0, 3, false);
        hex.extend_selection(1, 2);
        hex.end_selection();
        hex.extend_selection(4, 4);

        assert!(hex.is_selected(0, 3));
        assert!(hex.is_selected(1, 2));
        assert!(!hex.is_selected(0, 2));
        assert!(!hex.is_selected(1, 3));
        assert_eq!(hex.selected_byte_range(), Some(3..19));

        hex.begin_selection(0, 3, true);
        hex.extend_selection(1, 2);
        assert!(!hex.is_selected(0, 5));
        assert_eq!(hex.selected_byte_range(), None);

        hex.clear_selection();
        assert!(hex.selection().is_none());
        assert!(!hex.is_selected(0, 3));
    }

    #[test]
    fn test_find_across_window_boundary() {
        // Given a pattern straddling the end of the first 192 byte window
        let mut data = vec![0u8; 1000];
        data[190..194].copy_from_slice(b"FIND");
        data[700..704].copy_from_slice(b"find");
        let (_dir, path) = create_test_file(&data);
        let mut hex = open_grid(&path, 2);

        let exact = Pattern::new(b"FIND", true);
        assert_eq!(hex.find(&exact, 0).unwrap(), Some(190));
        assert_eq!(hex.find(&exact, 191).unwrap(), None);

        let folded = Pattern::new(b"FIND", false);
        assert_eq!(hex.find(&folded, 191).unwrap(), Some(700));
    }

    #[test]
    fn test_find_from_end_of_file() {
        let (_dir, path) = create_test_file(b"abc");
        let mut hex = open_grid(&path, 2);

        assert_eq!(hex.find(&Pattern::new(b"c", true), 3).unwrap(), None);
        assert_eq!(hex.find(&Pattern::new(b"", true), 1).unwrap(), Some(1));
    }

    #[test]
    fn test_status_reports_view() {
        let (_dir, path) = create_test_file(&counting_bytes(1000));
        let mut hex = open_grid(&path, 4);
        hex.move_cursor_to(100).unwrap();

        let status = hex.status();

        assert_eq!(status.path, path);
        assert_eq!(status.file_size, 1000);
        assert_eq!(status.top_offset, 48);
        assert_eq!(status.cursor_pos, GridPos::new(6, 4));
        assert!(status.window.is_some());
    }
}
