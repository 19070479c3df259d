use std::path::PathBuf;

/// Failure to start a session on a file. Fatal to the open attempt.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Access denied: {0}")]
    AccessDenied(PathBuf),
    #[error("Refusing to open empty file: {0}")]
    EmptyFile(PathBuf),
    #[error("IO error opening {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OpenError {
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::AccessDenied(path),
            _ => Self::Io { path, source },
        }
    }
}

/// Failure to obtain a view of a file offset.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// The offset lies at or beyond the end of the file.
    #[error("Offset {offset:#x} is out of range for file of {file_size} bytes")]
    OutOfRange { offset: u64, file_size: u64 },
    /// Mapping a new window failed. The view is unavailable until a later
    /// visit succeeds.
    #[error("Failed to map {len} bytes at {start:#x}: {source}")]
    Map {
        start: u64,
        len: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("File session is closed")]
    Closed,
}

/// Failure while committing an edit.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("Nibble value {0} is not in 0..=15")]
    InvalidNibble(u8),
    /// The mapped byte was changed but the direct write to the file failed.
    #[error("Failed to write byte at {offset:#x} to disk: {source}")]
    Persist {
        offset: u64,
        #[source]
        source: std::io::Error,
    },
}
