//! Core of the hexgrid editor: a sliding memory-mapped window over files of
//! any size, and the grid/cursor/selection state a hex view is drawn from.

pub mod controller;
pub mod cursor;
pub mod error;
pub mod grid;
pub mod io;
pub mod search;
pub mod selection;
pub mod window;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use controller::{GridOptions, HexGrid, ScrollDirection, Status};
pub use cursor::{CursorMove, EditCursor, Nibble};
pub use error::{AccessError, EditError, OpenError};
pub use grid::{BYTES_PER_ROW, GridGeometry, GridPos};
pub use search::Pattern;
pub use selection::{Selection, SelectionMode};
pub use window::{DEFAULT_WINDOW_PAGES, LargeFile, PageGeometry, WindowInfo};
