//! Data models for Quotebook
//!
//! A quote is a piece of text and the category it is filed under.
//! Quotes carry no identity: two quotes with the same text and category
//! are equal, and duplicates are allowed in a collection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, Result};

/// Sentinel category meaning "no filter"
pub const ALL_CATEGORIES: &str = "all";

/// Category assigned to quotes pulled from the remote endpoint
pub const SYNCED_CATEGORY: &str = "Synced";

/// A single quote
///
/// Fields default to empty strings when missing from imported JSON;
/// only [`Quote::new`] enforces non-empty values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Quote {
    /// The quote itself
    #[serde(default)]
    pub text: String,
    /// The category the quote is filed under
    #[serde(default)]
    pub category: String,
}

impl Quote {
    /// Create a quote from user input
    ///
    /// Both values are trimmed. Fails with [`QuoteError::MissingField`] when
    /// either is empty after trimming.
    pub fn new(text: impl AsRef<str>, category: impl AsRef<str>) -> Result<Self> {
        let text = text.as_ref().trim();
        let category = category.as_ref().trim();

        if text.is_empty() || category.is_empty() {
            return Err(QuoteError::MissingField);
        }

        Ok(Self {
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    /// Build a quote without validation (remote records, stored data)
    pub fn unchecked(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Check whether the quote belongs to a category
    pub fn in_category(&self, category: &str) -> bool {
        self.category == category
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"\n- {}", self.text, self.category)
    }
}

/// The two quotes a fresh collection starts with
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote::unchecked(
            "The best way to get started is to quit talking and begin doing.",
            "Motivation",
        ),
        Quote::unchecked(
            "Life is what happens when you're busy making other plans.",
            "Life",
        ),
    ]
}
