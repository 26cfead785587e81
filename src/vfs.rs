//! Storage adapters for snapshot files.
//!
//! The engine only ever talks to the [`Vfs`] trait, so snapshots can live on
//! the real filesystem ([`OsFs`]) or in memory ([`MemFs`]) for tests of the
//! library itself. A missing snapshot is a first-class condition and is
//! reported as [`VfsError::NotFound`], distinct from any other I/O failure.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

/// Errors produced by a storage adapter.
#[derive(Debug, Error)]
pub enum VfsError {
    /// The path holds no snapshot. Expected on the first run of a test.
    #[error("snapshot not found: {0}")]
    NotFound(String),
    /// Any other storage failure. The engine treats these as fatal.
    #[error("storage failure on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl VfsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, VfsError::NotFound(_))
    }

    fn io(path: &str, source: io::Error) -> Self {
        VfsError::Io {
            path: path.to_string(),
            source,
        }
    }
}

/// A path-keyed blob store holding snapshot files.
pub trait Vfs {
    fn exists(&self, path: &str) -> Result<bool, VfsError>;
    /// Writes with overwrite semantics, creating intermediate directories
    /// where the backing store has such a concept.
    fn write_file(&self, path: &str, data: &[u8]) -> Result<(), VfsError>;
    /// Must return [`VfsError::NotFound`] when the path is absent.
    fn read_file(&self, path: &str) -> Result<Vec<u8>, VfsError>;
}

// ============================================================================
// MemFs - in-memory storage for testing the library itself
// ============================================================================

/// In-memory storage adapter. Cloning yields another handle onto the same
/// backing map, so a test can keep one handle for inspection while the
/// engine owns the other.
#[derive(Clone, Default)]
pub struct MemFs {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored bytes for a path, if any.
    pub fn snapshot(&self, path: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    /// Panics unless a snapshot was created at `path`.
    pub fn assert_snapshot_was_created(&self, path: &str) {
        assert!(
            self.snapshot(path).is_some(),
            "path not found '{path}'"
        );
    }

    /// Panics unless the snapshot at `path` holds exactly `expected`.
    pub fn assert_content_was_stored(&self, path: &str, expected: &[u8]) {
        let content = self
            .snapshot(path)
            .unwrap_or_else(|| panic!("path not found '{path}'"));
        assert_eq!(
            expected,
            content.as_slice(),
            "content doesn't match for '{path}'"
        );
    }

    /// Panics unless the snapshot at `path` contains `needle` as text.
    pub fn assert_snapshot_contains(&self, path: &str, needle: &str) {
        let content = self
            .snapshot(path)
            .unwrap_or_else(|| panic!("path not found '{path}'"));
        let text = String::from_utf8_lossy(&content);
        assert!(
            text.contains(needle),
            "snapshot '{path}' doesn't contain '{needle}':\n{text}"
        );
    }
}

impl Vfs for MemFs {
    fn exists(&self, path: &str) -> Result<bool, VfsError> {
        Ok(self
            .files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path))
    }

    fn write_file(&self, path: &str, data: &[u8]) -> Result<(), VfsError> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>, VfsError> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| VfsError::NotFound(path.to_string()))
    }
}

// ============================================================================
// OsFs - real filesystem storage
// ============================================================================

/// Real-filesystem storage adapter. `write_file` creates the snapshot
/// folder on demand.
#[derive(Clone, Copy, Default)]
pub struct OsFs;

impl OsFs {
    pub fn new() -> Self {
        OsFs
    }
}

impl Vfs for OsFs {
    fn exists(&self, path: &str) -> Result<bool, VfsError> {
        match fs::metadata(path) {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(VfsError::io(path, err)),
        }
    }

    fn write_file(&self, path: &str, data: &[u8]) -> Result<(), VfsError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| VfsError::io(path, err))?;
            }
        }
        fs::write(path, data).map_err(|err| VfsError::io(path, err))
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>, VfsError> {
        match fs::read(path) {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(VfsError::NotFound(path.to_string()))
            }
            Err(err) => Err(VfsError::io(path, err)),
        }
    }
}
