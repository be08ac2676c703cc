//! Library file errors

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading or saving the library file
#[derive(Error, Debug)]
pub enum StorageError {
    /// The directory holding the library file could not be created
    #[error("Could not create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The OS refused access to the library file or its temp file
    #[error("Permission denied for '{path}'")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The library file exists but could not be read
    #[error("Could not read library '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the temp file failed
    #[error("Could not write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Moving the temp file over the library file failed
    #[error("Could not replace '{to}' with '{from}': {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Library file exists but is not a JSON array of books
    #[error("Invalid library format in '{path}': {source}")]
    InvalidFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Collection could not be serialized
    #[error("Failed to serialize library: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StorageError {
    /// Wrap an I/O failure while reading `path`
    pub fn read(source: io::Error, path: PathBuf) -> Self {
        match source.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied { path, source },
            _ => StorageError::Read { path, source },
        }
    }

    /// Wrap an I/O failure while writing `path`
    pub fn write(source: io::Error, path: PathBuf) -> Self {
        match source.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied { path, source },
            _ => StorageError::Write { path, source },
        }
    }

    /// A hint for the user, when there is something they can do
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::PermissionDenied { .. } | StorageError::CreateDirectory { .. } => {
                Some("Check permissions on the data directory, or point data_dir elsewhere with `shelf config set data_dir <path>`.")
            }
            StorageError::InvalidFormat { .. } => {
                Some("Fix or move the library file. It must contain a JSON array of books.")
            }
            _ => None,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_classification() {
        let err = StorageError::write(
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            PathBuf::from("/data/library.json.tmp"),
        );
        assert!(matches!(err, StorageError::PermissionDenied { .. }));
        assert!(err.to_string().contains("library.json.tmp"));
        assert!(err.recovery_suggestion().is_some());

        let err = StorageError::read(
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            PathBuf::from("/data/library.json"),
        );
        assert!(matches!(err, StorageError::PermissionDenied { .. }));
    }

    #[test]
    fn test_other_io_errors() {
        let err = StorageError::read(
            io::Error::new(io::ErrorKind::Other, "bad sector"),
            PathBuf::from("/data/library.json"),
        );
        assert!(matches!(err, StorageError::Read { .. }));
        assert!(err.recovery_suggestion().is_none());

        let err = StorageError::write(
            io::Error::new(io::ErrorKind::Other, "no space left on device"),
            PathBuf::from("/data/library.json.tmp"),
        );
        assert!(matches!(err, StorageError::Write { .. }));
    }

    #[test]
    fn test_invalid_format_display() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = StorageError::InvalidFormat {
            path: PathBuf::from("/data/library.json"),
            source,
        };

        let msg = err.to_string();
        assert!(msg.contains("Invalid library format"));
        assert!(msg.contains("library.json"));
        assert!(err.recovery_suggestion().is_some());
    }
}
