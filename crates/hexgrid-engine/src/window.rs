//! Windowed access to files far larger than anything we want to hold in memory.
//!
//! A [`LargeFile`] keeps at most one small, page-aligned, copy-on-write mapping
//! of the file alive at a time. [`LargeFile::visit`] hands out a mutable slice
//! into that mapping, relocating the window first when the requested offset is
//! not comfortably inside it. The slice borrows the session mutably, so it
//! cannot outlive the next visit: a remap can never leave a dangling view
//! behind.

use crate::error::{AccessError, OpenError};
use memmap2::{MmapMut, MmapOptions};
use std::fs::{File, OpenOptions};
use std::ops::Range;
use std::path::{Path, PathBuf};

pub const DEFAULT_WINDOW_PAGES: u32 = 3;

/// Page size and window size, fixed when a session is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    pub page_size: u32,
    pub window_page_count: u32,
}

impl PageGeometry {
    /// Geometry with an explicit page size. A page count of 0 is raised to 1.
    pub fn new(page_size: u32, window_page_count: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            window_page_count: window_page_count.max(1),
        }
    }

    /// Geometry using the operating system's page size.
    pub fn from_system(window_page_count: u32) -> Self {
        Self::new(system_page_size(), window_page_count)
    }

    /// Full size of a mapped window, before clamping to the end of the file.
    pub fn window_len(&self) -> u64 {
        u64::from(self.page_size) * u64::from(self.window_page_count)
    }

    /// Pages kept on either side of the visited page.
    pub fn slack_pages(&self) -> u32 {
        (self.window_page_count - 1) / 2
    }

    fn slack_bytes(&self) -> u64 {
        u64::from(self.slack_pages()) * u64::from(self.page_size)
    }

    pub fn align_down(&self, offset: u64) -> u64 {
        offset - offset % u64::from(self.page_size)
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::from_system(DEFAULT_WINDOW_PAGES)
    }
}

#[cfg(unix)]
fn system_page_size() -> u32 {
    u32::try_from(rustix::param::page_size()).unwrap_or(4096)
}

// Views on Windows must start on the allocation granularity, not the page size.
#[cfg(not(unix))]
fn system_page_size() -> u32 {
    64 * 1024
}

/// Position of the currently mapped window, for status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowInfo {
    pub start: u64,
    pub len: u64,
}

impl WindowInfo {
    pub fn end(&self) -> u64 {
        self.start + self.len
    }
}

#[derive(Debug)]
struct MappedWindow {
    start: u64,
    map: MmapMut,
}

impl MappedWindow {
    fn end(&self) -> u64 {
        self.start + self.map.len() as u64
    }

    /// Whether `offset` can be served without remapping: it must lie in the
    /// window with `slack` bytes of room on each side that has more file beyond it.
    fn serves(&self, offset: u64, slack: u64, file_size: u64) -> bool {
        let lower = if self.start == 0 {
            0
        } else {
            self.start + slack
        };
        let end = self.end();
        let upper = if end >= file_size {
            end
        } else {
            end.saturating_sub(slack)
        };
        (lower..upper).contains(&offset)
    }
}

/// An open file session with a sliding mapped window.
#[derive(Debug)]
pub struct LargeFile {
    path: PathBuf,
    file: Option<File>,
    file_size: u64,
    geometry: PageGeometry,
    window: Option<MappedWindow>,
    remaps: u64,
}

impl LargeFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, OpenError> {
        Self::open_with_geometry(path, PageGeometry::default())
    }

    pub fn open_with_pages<P: AsRef<Path>>(
        path: P,
        window_page_count: u32,
    ) -> Result<Self, OpenError> {
        Self::open_with_geometry(path, PageGeometry::from_system(window_page_count))
    }

    /// Open `path` read-write. No window is mapped until the first visit.
    pub fn open_with_geometry<P: AsRef<Path>>(
        path: P,
        geometry: PageGeometry,
    ) -> Result<Self, OpenError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| OpenError::from_io(path.clone(), e))?;
        let file_size = file
            .metadata()
            .map_err(|e| OpenError::from_io(path.clone(), e))?
            .len();
        if file_size == 0 {
            return Err(OpenError::EmptyFile(path));
        }

        log::info!(
            "Opened {} ({file_size} bytes, {} x {} byte window)",
            path.display(),
            geometry.window_page_count,
            geometry.page_size
        );

        Ok(Self {
            path,
            file: Some(file),
            file_size,
            geometry,
            window: None,
            remaps: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    pub fn window(&self) -> Option<WindowInfo> {
        self.window.as_ref().map(|w| WindowInfo {
            start: w.start,
            len: w.map.len() as u64,
        })
    }

    /// Number of windows mapped since the session was opened.
    pub fn remap_count(&self) -> u64 {
        self.remaps
    }

    /// Return the bytes from `offset` to the end of the (possibly new) window.
    ///
    /// The slice is never empty and never extends past the end of the file.
    /// Writes through it land in a private copy of the page and are not
    /// persisted.
    pub fn visit(&mut self, offset: u64) -> Result<&mut [u8], AccessError> {
        if self.file.is_none() {
            return Err(AccessError::Closed);
        }
        if offset >= self.file_size {
            return Err(AccessError::OutOfRange {
                offset,
                file_size: self.file_size,
            });
        }

        let slack = self.geometry.slack_bytes();
        let reusable = self
            .window
            .as_ref()
            .is_some_and(|w| w.serves(offset, slack, self.file_size));
        if !reusable {
            self.remap(offset)?;
        }

        let window = self.window.as_mut().ok_or(AccessError::Closed)?;
        let local = (offset - window.start) as usize;
        Ok(&mut window.map[local..])
    }

    /// Read a byte from the current window without remapping.
    pub fn peek(&self, offset: u64) -> Option<u8> {
        let window = self.window.as_ref()?;
        if offset < window.start || offset >= window.end() {
            return None;
        }
        window.map.get((offset - window.start) as usize).copied()
    }

    /// Whether the whole byte range is inside the current window.
    pub fn covers(&self, range: Range<u64>) -> bool {
        if range.is_empty() {
            return true;
        }
        self.window
            .as_ref()
            .is_some_and(|w| w.start <= range.start && range.end <= w.end())
    }

    /// Unmap the window and release the file handle, in that order.
    pub fn close(&mut self) {
        if let Some(window) = self.window.take() {
            drop(window);
        }
        if self.file.take().is_some() {
            log::info!("Closed {}", self.path.display());
        }
    }

    fn remap(&mut self, offset: u64) -> Result<(), AccessError> {
        let file = self.file.as_ref().ok_or(AccessError::Closed)?;

        if let Some(old) = self.window.take() {
            log::debug!("Unmapping window {:#x}..{:#x}", old.start, old.end());
        }

        let start = self
            .geometry
            .align_down(offset)
            .saturating_sub(self.geometry.slack_bytes());
        let len = self.geometry.window_len().min(self.file_size - start);
        let map_err = |source| AccessError::Map {
            start,
            len: len as usize,
            source,
        };
        let len = usize::try_from(len).map_err(|e| map_err(std::io::Error::other(e)))?;

        // SAFETY: the mapping is private (copy-on-write) and owned by this
        // session alone; slices into it are only handed out behind `&mut self`.
        let map = unsafe { MmapOptions::new().offset(start).len(len).map_copy(file) }
            .map_err(map_err)?;

        log::debug!(
            "Mapped window {start:#x}..{:#x} for offset {offset:#x}",
            start + len as u64
        );
        self.window = Some(MappedWindow { start, map });
        self.remaps += 1;
        Ok(())
    }
}

impl Drop for LargeFile {
    fn drop(&mut self) {
        self.close();
    }
}
