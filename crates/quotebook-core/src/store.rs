//! Quote collection storage
//!
//! The `QuoteStore` owns the in-memory collection and mirrors it to durable
//! key-value storage after every mutation.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = QuoteStore::load(Box::new(SqliteKv::open(&path)?));
//!
//! store.append(Quote::new("Do X", "A")?);
//! let quotes = store.quotes();
//! ```

use tracing::{debug, warn};

use crate::models::{default_quotes, Quote};
use crate::storage::{KeyValueStore, StorageError, StorageResult, QUOTES_KEY};

/// Owned collection of quotes backed by durable storage
///
/// All mutations go through `append`, `extend` or `replace_all`, each of
/// which persists the whole collection before returning.
pub struct QuoteStore {
    quotes: Vec<Quote>,
    durable: Box<dyn KeyValueStore>,
}

impl QuoteStore {
    /// Load the collection from durable storage
    ///
    /// Missing or unreadable data seeds the two default quotes. Absence is a
    /// normal case and never an error.
    pub fn load(durable: Box<dyn KeyValueStore>) -> Self {
        let quotes = match read_quotes(durable.as_ref()) {
            Ok(Some(quotes)) => {
                debug!("Loaded {} quotes from durable storage", quotes.len());
                quotes
            }
            Ok(None) => {
                debug!("No stored quotes, seeding defaults");
                default_quotes()
            }
            Err(e) => {
                warn!("Stored quotes unreadable, seeding defaults: {}", e);
                default_quotes()
            }
        };

        Self { quotes, durable }
    }

    /// The current collection, in insertion order
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Most recently added quote
    pub fn last(&self) -> Option<&Quote> {
        self.quotes.last()
    }

    /// Append one quote and persist
    pub fn append(&mut self, quote: Quote) {
        self.quotes.push(quote);
        self.persist();
    }

    /// Append many quotes (no dedup) and persist
    pub fn extend(&mut self, quotes: impl IntoIterator<Item = Quote>) {
        self.quotes.extend(quotes);
        self.persist();
    }

    /// Replace the whole collection and persist
    pub fn replace_all(&mut self, quotes: Vec<Quote>) {
        self.quotes = quotes;
        self.persist();
    }

    /// Write the collection to durable storage
    pub fn save(&mut self) -> StorageResult<()> {
        let json = serde_json::to_string(&self.quotes).map_err(|e| StorageError::InvalidValue {
            key: QUOTES_KEY.to_string(),
            details: e.to_string(),
        })?;
        self.durable.set(QUOTES_KEY, &json)
    }

    /// Durable storage shared with other components (selected category)
    pub fn durable(&self) -> &dyn KeyValueStore {
        self.durable.as_ref()
    }

    pub fn durable_mut(&mut self) -> &mut dyn KeyValueStore {
        self.durable.as_mut()
    }

    // Storage failures leave the in-memory collection authoritative.
    fn persist(&mut self) {
        if let Err(e) = self.save() {
            warn!("Failed to persist quotes: {}", e);
        }
    }
}

fn read_quotes(durable: &dyn KeyValueStore) -> StorageResult<Option<Vec<Quote>>> {
    let Some(raw) = durable.get(QUOTES_KEY)? else {
        return Ok(None);
    };

    if raw.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| StorageError::InvalidValue {
            key: QUOTES_KEY.to_string(),
            details: e.to_string(),
        })
}
