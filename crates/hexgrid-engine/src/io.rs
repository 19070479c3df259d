use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

/// Write one byte straight to the file at `offset`, bypassing any mapping.
///
/// The file is opened for the duration of the write only and synced before
/// returning, so the byte is on disk whatever the state of a private mapping.
pub fn write_byte_at(path: &Path, offset: u64, value: u8) -> std::io::Result<()> {
    let mut file = OpenOptions::new().write(true).open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    file.write_all(&[value])?;
    file.sync_data()
}
