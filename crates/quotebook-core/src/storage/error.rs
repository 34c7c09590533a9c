//! Storage error handling
//!
//! Errors from the SQLite key-value store and from export/import files.
//! Each carries the path or key involved, and some come with a hint the
//! CLI prints under the error.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Parent directory of the database or an export could not be made
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied: cannot access '{path}'")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Stored value under a key cannot be encoded or decoded
    #[error("Invalid value stored under '{key}': {details}")]
    InvalidValue { key: String, details: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Import file does not exist
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Export was written but could not be moved into place
    #[error("Could not move '{from}' to '{to}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Classify an I/O error on a write to `path`
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied {
                path,
                source: error,
            },
            io::ErrorKind::NotFound => StorageError::NotFound { path },
            _ => StorageError::WriteError {
                path,
                source: error,
            },
        }
    }

    /// A hint for the user, when there is something they can do
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::NotFound { .. } => {
                Some("Check the path of the file you are importing.")
            }
            StorageError::PermissionDenied { .. } | StorageError::CreateDirectory { .. } => {
                Some("Check that you can write to the directory, or pick another path.")
            }
            StorageError::Database(_) => Some(
                "quotebook.db may be locked or damaged. Close other quotebook sessions, \
                 or point data_dir somewhere else with `quotebook config set data_dir <path>`.",
            ),
            StorageError::InvalidValue { .. } => {
                Some("The stored value will be replaced on the next save.")
            }
            StorageError::AtomicWriteFailed { .. } => {
                Some("A partial export was left next to the target; it is safe to delete.")
            }
            StorageError::ReadError { .. } | StorageError::WriteError { .. } => None,
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
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = StorageError::from_io(io_err, PathBuf::from("/test/quotes.json"));

        assert!(matches!(err, StorageError::PermissionDenied { .. }));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_not_found_points_at_import_path() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = StorageError::from_io(io_err, PathBuf::from("/missing/quotes.json"));

        assert!(matches!(err, StorageError::NotFound { .. }));
        assert!(err.to_string().contains("/missing/quotes.json"));
        assert!(err.recovery_suggestion().unwrap().contains("importing"));
    }

    #[test]
    fn test_other_io_is_write_error_without_hint() {
        let io_err = io::Error::new(io::ErrorKind::Other, "No space left on device");
        let err = StorageError::from_io(io_err, PathBuf::from("/full/quotes.json"));

        assert!(matches!(err, StorageError::WriteError { .. }));
        assert!(err.recovery_suggestion().is_none());
    }

    #[test]
    fn test_database_error_suggests_data_dir() {
        let err = StorageError::from(rusqlite::Error::InvalidQuery);
        assert!(err.recovery_suggestion().unwrap().contains("data_dir"));
    }

    #[test]
    fn test_invalid_value_display() {
        let err = StorageError::InvalidValue {
            key: "quotes".to_string(),
            details: "expected a sequence".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("quotes"));
        assert!(msg.contains("expected a sequence"));
        assert!(err.recovery_suggestion().is_some());
    }
}
