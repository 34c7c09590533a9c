//! Wire types for the remote endpoint
//!
//! The endpoint returns a list of records; only `title` is read. Writes send
//! a quote as-is (`{text, category}`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Quote, SYNCED_CATEGORY};

/// A record as returned by `GET` on the endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteRecord {
    /// Becomes the quote text
    #[serde(default)]
    pub title: String,
}

impl RemoteRecord {
    /// Read the title from one element of the response array
    ///
    /// Elements that are not objects, or lack a title, give an empty title.
    /// Non-string titles keep their JSON text.
    pub fn from_value(value: &Value) -> Self {
        let title = match value.get("title") {
            Some(Value::String(title)) => title.clone(),
            None | Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
        };
        Self { title }
    }

    /// Map the record to a quote filed under "Synced"
    pub fn into_quote(self) -> Quote {
        Quote::unchecked(self.title, SYNCED_CATEGORY)
    }
}

/// Decode a `GET` response body, keeping the first `limit` records
///
/// The body must be a JSON array. One malformed element does not fail the
/// rest.
pub fn decode_records(body: &str, limit: usize) -> serde_json::Result<Vec<Quote>> {
    let records: Vec<Value> = serde_json::from_str(body)?;
    Ok(records
        .iter()
        .take(limit)
        .map(|value| RemoteRecord::from_value(value).into_quote())
        .collect())
}
