//! Persistence seam for the history cache.
//!
//! The cache itself only sees opaque bytes behind [`HistoryStorage`], so it
//! can run against a file in production and plain memory in tests.

use std::fmt;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::PathBuf;

/// Byte-level storage for the persisted history payload.
pub trait HistoryStorage {
    /// Load the persisted payload, `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the persisted payload in full.
    fn save(&mut self, bytes: &[u8]) -> Result<(), StorageError>;
}

#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "history storage io error: {}", err),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
        }
    }
}

/// In-memory storage backend for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    payload: Option<Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded with a payload, as if something had persisted it earlier.
    pub fn with_payload(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: Some(bytes.into()),
        }
    }
}

impl HistoryStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.payload.clone())
    }

    fn save(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        self.payload = Some(bytes.to_vec());
        Ok(())
    }
}

/// Single-file storage backend.
///
/// Saves write a sibling temp file first and rename over the target, so a
/// crash mid-write leaves the previous payload intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl HistoryStorage for FileStorage {
    fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.flush()?;
        fs::rename(tmp_path, &self.path)?;
        Ok(())
    }
}
