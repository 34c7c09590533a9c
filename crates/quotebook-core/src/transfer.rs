//! JSON import and export
//!
//! The file format is a JSON array of `{text, category}` objects for both
//! directions. Imported entries are not checked for empty fields.

use std::path::Path;

use serde_json::Value;

use crate::error::{QuoteError, Result};
use crate::models::Quote;
use crate::storage::{atomic_write, read_text};

/// Default file name offered for downloads
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Serialize the collection as pretty-printed JSON (2-space indent)
pub fn export_json(quotes: &[Quote]) -> Result<String> {
    Ok(serde_json::to_string_pretty(quotes)?)
}

/// Write the collection to `path`
pub fn export_to_file(quotes: &[Quote], path: &Path) -> Result<()> {
    let json = export_json(quotes)?;
    atomic_write(path, json.as_bytes())?;
    Ok(())
}

/// Parse file contents as a list of quotes
///
/// Fails with [`QuoteError::InvalidImport`] when the text is not JSON, the
/// top-level value is not an array, or an element is not an object.
pub fn parse_import(contents: &str) -> Result<Vec<Quote>> {
    let value: Value =
        serde_json::from_str(contents).map_err(|e| QuoteError::InvalidImport(e.to_string()))?;

    if !value.is_array() {
        return Err(QuoteError::InvalidImport(
            "top-level value is not an array".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| QuoteError::InvalidImport(e.to_string()))
}

/// Read and parse an import file
pub fn read_import_file(path: &Path) -> Result<Vec<Quote>> {
    let contents = read_text(path)?;
    parse_import(&contents)
}
