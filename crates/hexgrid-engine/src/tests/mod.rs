use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a scratch file holding `content`; keep the TempDir alive while using the path
pub fn create_test_file(content: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");
    fs::write(&path, content).unwrap();
    (dir, path)
}

/// Bytes 0, 1, 2, ... wrapping at 251 so page boundaries don't line up with repeats
pub fn counting_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
