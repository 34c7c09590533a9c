//! Error types for Quotebook operations
//!
//! Every failure the core can report. None of them are fatal: callers
//! recover locally and the collection is left unchanged.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by quote operations
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Text or category missing on the add path
    #[error("Please enter both a quote and a category.")]
    MissingField,

    /// Import file could not be parsed as a list of quotes
    #[error("Invalid JSON file: {0}")]
    InvalidImport(String),

    /// Request to the remote endpoint failed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Durable storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// JSON encoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File I/O failure (import/export)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuoteError {
    /// True for errors caused by user input rather than the environment
    pub fn is_user_error(&self) -> bool {
        matches!(self, QuoteError::MissingField | QuoteError::InvalidImport(_))
    }

    /// A hint to print under the error, if any
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            QuoteError::Storage(e) => e.recovery_suggestion(),
            QuoteError::InvalidImport(_) => {
                Some("The file must hold a JSON array of {\"text\", \"category\"} objects.")
            }
            _ => None,
        }
    }
}

/// Result type for quote operations
pub type Result<T> = std::result::Result<T, QuoteError>;
