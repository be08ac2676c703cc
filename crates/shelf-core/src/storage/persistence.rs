//! Library file persistence
//!
//! Loads and saves the whole collection as one JSON array. Every save
//! rewrites the full file; there are no partial writes and no locking, so
//! two processes saving the same file end up with whichever wrote last.
//!
//! Storage location: `~/.local/share/shelf/library.json` (configurable via `Config`)

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::{StorageError, StorageResult};
use crate::config::Config;
use crate::models::Book;

/// Persistence layer for the library file
pub struct JsonPersistence {
    path: PathBuf,
}

impl JsonPersistence {
    /// Create a persistence handler for the library file named by the configuration
    pub fn new(config: &Config) -> Self {
        Self::at_path(config.library_path())
    }

    /// Create a persistence handler for an explicit file path
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the library file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the library file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the full collection
    ///
    /// Returns an empty collection if the file doesn't exist yet.
    /// Returns an error if the file exists but can't be read or parsed.
    pub fn load(&self) -> StorageResult<Vec<Book>> {
        if !self.exists() {
            warn!("No library file at {:?}, starting empty", self.path);
            return Ok(Vec::new());
        }

        let bytes = fs::read(&self.path).map_err(|e| StorageError::read(e, self.path.clone()))?;

        let books: Vec<Book> =
            serde_json::from_slice(&bytes).map_err(|source| StorageError::InvalidFormat {
                path: self.path.clone(),
                source,
            })?;

        debug!("Loaded {} books from {:?}", books.len(), self.path);
        Ok(books)
    }

    /// Overwrite the library file with the full collection
    pub fn save(&self, books: &[Book]) -> StorageResult<()> {
        let bytes = serde_json::to_vec(books).map_err(StorageError::Serialize)?;
        atomic_write(&self.path, &bytes)?;
        debug!("Saved {} books to {:?}", books.len(), self.path);
        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    // Temp file lives next to the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::write(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::write(e, temp_path.clone()))?;

    file.sync_all()
        .map_err(|e| StorageError::write(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::Rename {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
