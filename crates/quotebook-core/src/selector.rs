//! Random quote selection
//!
//! Picks a quote uniformly from a candidate list (the whole collection or
//! one category) and remembers it as the session's last viewed quote.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::models::{Quote, ALL_CATEGORIES};
use crate::storage::{KeyValueStore, StorageResult, LAST_QUOTE_KEY};

/// Text rendered when the candidate list is empty
pub const NO_QUOTES_MESSAGE: &str = "No quotes found.";

/// What the display region shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Quote(Quote),
    NoQuotes,
}

impl Rendered {
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            Rendered::Quote(quote) => Some(quote),
            Rendered::NoQuotes => None,
        }
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rendered::Quote(quote) => write!(f, "{}", quote),
            Rendered::NoQuotes => f.write_str(NO_QUOTES_MESSAGE),
        }
    }
}

/// Build the candidate list for a category filter
///
/// `None`, an empty name and the `"all"` sentinel select the whole collection.
pub fn candidates<'a>(quotes: &'a [Quote], category: Option<&str>) -> Vec<&'a Quote> {
    match category {
        Some(category) if !category.is_empty() && category != ALL_CATEGORIES => {
            quotes.iter().filter(|q| q.in_category(category)).collect()
        }
        _ => quotes.iter().collect(),
    }
}

/// Uniform random picker
pub struct Selector {
    rng: StdRng,
    draws: u64,
}

impl Selector {
    /// Selector seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            draws: 0,
        }
    }

    /// Deterministic selector for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            draws: 0,
        }
    }

    /// Pick one candidate, drawing an index uniformly from `[0, len)`
    ///
    /// An empty list performs no draw.
    pub fn pick<'a>(&mut self, candidates: &[&'a Quote]) -> Option<&'a Quote> {
        if candidates.is_empty() {
            return None;
        }
        self.draws += 1;
        let index = self.rng.gen_range(0..candidates.len());
        Some(candidates[index])
    }

    /// Number of random draws made so far
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new()
    }
}

/// Record the quote as the session's last viewed quote
pub fn remember_last(session: &mut dyn KeyValueStore, quote: &Quote) -> StorageResult<()> {
    match serde_json::to_string(quote) {
        Ok(json) => session.set(LAST_QUOTE_KEY, &json),
        Err(e) => {
            warn!("Could not encode last viewed quote: {}", e);
            Ok(())
        }
    }
}

/// Read back the session's last viewed quote, if any
pub fn last_viewed(session: &dyn KeyValueStore) -> StorageResult<Option<Quote>> {
    let Some(raw) = session.get(LAST_QUOTE_KEY)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(quote) => Ok(Some(quote)),
        Err(e) => {
            warn!("Ignoring unreadable last viewed quote: {}", e);
            Ok(None)
        }
    }
}
