//! I/O utility functions

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Sibling path used while a write is in flight, e.g. `pareto.svg.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write bytes to a file atomically using write-then-rename pattern.
///
/// The content is first written to a temporary sibling file, then renamed
/// onto the target path, so readers never observe a half-written file.
pub fn atomic_write_bytes(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let temp = temp_path(path);
    fs::write(&temp, content)?;
    fs::rename(&temp, path)
}

/// Write text to a file atomically using write-then-rename pattern.
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    atomic_write_bytes(path, content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pareto.svg");

        atomic_write(&path, "<svg/>").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<svg/>");
        assert!(!dir.path().join("pareto.svg.tmp").exists());
    }

    #[test]
    fn test_atomic_write_creates_parent_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("params.npy");

        atomic_write_bytes(&path, &[1, 2, 3]).unwrap();
        atomic_write_bytes(&path, &[4]).unwrap();

        assert_eq!(fs::read(&path).unwrap(), vec![4]);
    }
}
