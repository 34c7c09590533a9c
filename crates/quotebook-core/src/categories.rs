//! Category index
//!
//! Derives the category filter options from the collection and tracks which
//! option is selected. The index is rebuilt from scratch on every populate;
//! nothing is cached between populates.

use serde::Serialize;

use crate::models::{Quote, ALL_CATEGORIES};
use crate::storage::{KeyValueStore, StorageResult, SELECTED_CATEGORY_KEY};

/// Distinct categories in order of first appearance
pub fn distinct_categories(quotes: &[Quote]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for quote in quotes {
        if !seen.iter().any(|c| *c == quote.category) {
            seen.push(quote.category.clone());
        }
    }
    seen
}

/// State of the category filter control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryFilter {
    /// Options, `"all"` first
    pub options: Vec<String>,
    /// Currently selected option
    pub selected: String,
}

impl CategoryFilter {
    /// Rebuild the control from the collection
    ///
    /// The selection is restored from, in order: the durably stored
    /// selection, the control's prior value, then `"all"`. The stored value
    /// wins even if no quote carries that category any more.
    pub fn populate(quotes: &[Quote], stored: Option<String>, prior: Option<&str>) -> Self {
        let mut options = vec![ALL_CATEGORIES.to_string()];
        options.extend(distinct_categories(quotes));

        let selected = stored
            .filter(|s| !s.is_empty())
            .or_else(|| prior.filter(|p| !p.is_empty()).map(str::to_string))
            .unwrap_or_else(|| ALL_CATEGORIES.to_string());

        Self { options, selected }
    }

    /// Categories without the `"all"` sentinel
    pub fn categories(&self) -> &[String] {
        &self.options[1..]
    }

    pub fn contains(&self, category: &str) -> bool {
        self.options.iter().any(|o| o == category)
    }

    pub fn is_filtered(&self) -> bool {
        self.selected != ALL_CATEGORIES
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self {
            options: vec![ALL_CATEGORIES.to_string()],
            selected: ALL_CATEGORIES.to_string(),
        }
    }
}

/// Read the durably stored category selection
pub fn stored_selection(durable: &dyn KeyValueStore) -> StorageResult<Option<String>> {
    durable.get(SELECTED_CATEGORY_KEY)
}

/// Persist the category selection
pub fn store_selection(durable: &mut dyn KeyValueStore, category: &str) -> StorageResult<()> {
    durable.set(SELECTED_CATEGORY_KEY, category)
}
