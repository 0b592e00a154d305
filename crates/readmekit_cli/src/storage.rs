//! Thin storage adapter.
//!
//! The only filesystem access in the pipeline lives here; the core crates
//! operate on in-memory values only.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Input unreadable or output unwritable, with the path and cause.
#[derive(Error, Debug)]
#[error("storage error at {}: {source}", .path.display())]
pub struct StorageError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

pub fn read(path: &Path) -> Result<String, StorageError> {
    debug!("Reading {:?}", path);
    fs::read_to_string(path).map_err(|source| StorageError {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write(path: &Path, contents: &str) -> Result<(), StorageError> {
    debug!("Writing {:?}", path);
    fs::write(path, contents).map_err(|source| StorageError {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_carries_path() {
        let missing = Path::new("definitely/not/here.yaml");
        let error = read(missing).unwrap_err();
        assert_eq!(error.path, missing);
    }

    #[test]
    fn test_write_then_read() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("out.md");
        write(&path, "# Title\n").unwrap();
        assert_eq!(read(&path).unwrap(), "# Title\n");
    }
}
