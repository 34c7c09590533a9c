//! The quote book
//!
//! `QuoteBook` ties the store, the selector and the category index together
//! and keeps the state the display shows: the filter control and the last
//! rendered quote. Every user action is one method here.
//!
//! ```ignore
//! let mut book = QuoteBook::open(&config)?;
//! book.add_quote("Do Z", "A")?;
//! book.filter_by("A");
//! println!("{}", book.show_random_quote(true));
//! ```

use std::path::Path;

use tracing::{info, warn};

use crate::categories::{self, CategoryFilter};
use crate::config::Config;
use crate::error::Result;
use crate::models::Quote;
use crate::selector::{self, candidates, Rendered, Selector};
use crate::storage::{KeyValueStore, MemoryKv, SqliteKv};
use crate::store::QuoteStore;
use crate::transfer;

/// Quote collection plus the view state derived from it
pub struct QuoteBook {
    store: QuoteStore,
    session: Box<dyn KeyValueStore>,
    selector: Selector,
    filter: CategoryFilter,
    display: Option<Rendered>,
}

impl QuoteBook {
    /// Open the book using the durable database named by `config`
    ///
    /// Session storage starts empty: one process is one session.
    pub fn open(config: &Config) -> Result<Self> {
        let durable = SqliteKv::open(&config.database_path())?;
        Ok(Self::new(
            Box::new(durable),
            Box::new(MemoryKv::new()),
            Selector::new(),
        ))
    }

    /// Build a book from explicit storage backends
    ///
    /// Loads the collection (seeding defaults when absent) and populates the
    /// category filter.
    pub fn new(
        durable: Box<dyn KeyValueStore>,
        session: Box<dyn KeyValueStore>,
        selector: Selector,
    ) -> Self {
        let mut book = Self {
            store: QuoteStore::load(durable),
            session,
            selector,
            filter: CategoryFilter::default(),
            display: None,
        };
        book.populate_categories();
        book
    }

    /// In-memory book, handy for tests and dry runs
    pub fn in_memory(selector: Selector) -> Self {
        Self::new(
            Box::new(MemoryKv::new()),
            Box::new(MemoryKv::new()),
            selector,
        )
    }

    pub fn quotes(&self) -> &[Quote] {
        self.store.quotes()
    }

    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    /// Current state of the category filter control
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// What the display region currently shows, if anything
    pub fn display(&self) -> Option<&Rendered> {
        self.display.as_ref()
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Category selection persisted in durable storage
    pub fn selected_category(&self) -> Option<String> {
        categories::stored_selection(self.store.durable()).unwrap_or_else(|e| {
            warn!("Could not read selected category: {}", e);
            None
        })
    }

    // ==================== Selector ====================

    /// Render a random quote
    ///
    /// With `use_filter`, candidates are limited to the stored category
    /// selection unless it is `"all"`. An empty candidate list renders
    /// "No quotes found." and does not touch the session's last quote.
    pub fn show_random_quote(&mut self, use_filter: bool) -> Rendered {
        let category = if use_filter {
            self.selected_category()
        } else {
            None
        };

        let pool = candidates(self.store.quotes(), category.as_deref());
        let rendered = match self.selector.pick(&pool) {
            Some(quote) => Rendered::Quote(quote.clone()),
            None => Rendered::NoQuotes,
        };

        if let Rendered::Quote(ref quote) = rendered {
            if let Err(e) = selector::remember_last(self.session.as_mut(), quote) {
                warn!("Could not remember last viewed quote: {}", e);
            }
        }

        self.display = Some(rendered.clone());
        rendered
    }

    /// Re-render the session's last viewed quote
    ///
    /// Returns `None` and leaves the display untouched when the session has
    /// no last quote.
    pub fn show_last_viewed_quote(&mut self) -> Option<Rendered> {
        let last = selector::last_viewed(self.session.as_ref()).unwrap_or_else(|e| {
            warn!("Could not read last viewed quote: {}", e);
            None
        })?;

        let rendered = Rendered::Quote(last);
        self.display = Some(rendered.clone());
        Some(rendered)
    }

    // ==================== Category index ====================

    /// Rebuild the filter options from the current collection
    pub fn populate_categories(&mut self) -> &CategoryFilter {
        let stored = self.selected_category();
        let prior = self.filter.selected.clone();
        self.filter =
            CategoryFilter::populate(self.store.quotes(), stored, Some(prior.as_str()));
        &self.filter
    }

    /// Change the filter control's value without applying it
    pub fn select_category(&mut self, category: impl Into<String>) {
        self.filter.selected = category.into();
    }

    /// Persist the control's value and render a filtered quote
    pub fn filter_quotes(&mut self) -> Rendered {
        let selected = self.filter.selected.clone();
        if let Err(e) = categories::store_selection(self.store.durable_mut(), &selected) {
            warn!("Could not persist selected category: {}", e);
        }
        self.show_random_quote(true)
    }

    /// Select a category and apply it
    pub fn filter_by(&mut self, category: impl Into<String>) -> Rendered {
        self.select_category(category);
        self.filter_quotes()
    }

    // ==================== Mutations ====================

    /// Add a quote from user input
    ///
    /// Fails with `MissingField` (no state change) if either value is blank.
    pub fn add_quote(&mut self, text: &str, category: &str) -> Result<Quote> {
        let quote = Quote::new(text, category)?;
        self.store.append(quote.clone());
        self.populate_categories();
        self.show_random_quote(true);
        info!("Added quote in category {:?}", quote.category);
        Ok(quote)
    }

    /// Append quotes parsed from an import file
    ///
    /// Returns the number of quotes added. Parse failures change nothing.
    pub fn import_json(&mut self, contents: &str) -> Result<usize> {
        let imported = transfer::parse_import(contents)?;
        Ok(self.append_imported(imported))
    }

    /// Read and import a file
    pub fn import_file(&mut self, path: &Path) -> Result<usize> {
        let imported = transfer::read_import_file(path)?;
        Ok(self.append_imported(imported))
    }

    fn append_imported(&mut self, imported: Vec<Quote>) -> usize {
        let count = imported.len();
        self.store.extend(imported);
        self.populate_categories();
        self.show_random_quote(true);
        info!("Imported {} quotes", count);
        count
    }

    /// Replace the whole collection with a server snapshot
    pub fn replace_from_server(&mut self, quotes: Vec<Quote>) -> Rendered {
        info!(
            "Replacing {} local quotes with {} from server",
            self.store.len(),
            quotes.len()
        );
        self.store.replace_all(quotes);
        self.populate_categories();
        self.show_random_quote(true)
    }

    // ==================== Export ====================

    /// Pretty-printed JSON of the whole collection
    pub fn export_json(&self) -> Result<String> {
        transfer::export_json(self.store.quotes())
    }

    /// Write the collection to a file
    pub fn export_to_file(&self, path: &Path) -> Result<()> {
        transfer::export_to_file(self.store.quotes(), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuoteError;
    use crate::models::default_quotes;
    use crate::selector::NO_QUOTES_MESSAGE;
    use crate::storage::{QUOTES_KEY, SELECTED_CATEGORY_KEY};

    /// Book seeded with `[{"Do X","A"},{"Do Y","B"}]`
    fn seeded_book() -> QuoteBook {
        let mut durable = MemoryKv::new();
        durable
            .set(
                QUOTES_KEY,
                r#"[{"text":"Do X","category":"A"},{"text":"Do Y","category":"B"}]"#,
            )
            .unwrap();
        QuoteBook::new(
            Box::new(durable),
            Box::new(MemoryKv::new()),
            Selector::seeded(1),
        )
    }

    #[test]
    fn test_new_seeds_and_populates() {
        let book = QuoteBook::in_memory(Selector::seeded(1));
        assert_eq!(book.quotes(), default_quotes().as_slice());
        assert_eq!(book.filter().options, vec!["all", "Motivation", "Life"]);
        assert_eq!(book.filter().selected, "all");
        assert!(book.display().is_none());
    }

    #[test]
    fn test_show_random_quote_records_last() {
        let mut book = seeded_book();
        let rendered = book.show_random_quote(false);
        let quote = rendered.quote().unwrap().clone();

        assert!(book.quotes().contains(&quote));
        assert_eq!(book.display(), Some(&rendered));
        assert_eq!(book.show_last_viewed_quote(), Some(Rendered::Quote(quote)));
    }

    #[test]
    fn test_empty_stored_selection_shows_any_quote() {
        let mut book = seeded_book();
        book.store
            .durable_mut()
            .set(SELECTED_CATEGORY_KEY, "")
            .unwrap();

        let rendered = book.show_random_quote(true);
        assert!(book.quotes().contains(rendered.quote().unwrap()));
    }

    #[test]
    fn test_show_random_quote_empty_candidates() {
        let mut book = seeded_book();
        let draws = book.selector().draws();

        let rendered = book.filter_by("Nope");
        assert_eq!(rendered, Rendered::NoQuotes);
        assert_eq!(rendered.to_string(), NO_QUOTES_MESSAGE);
        assert_eq!(book.selector().draws(), draws);
        assert!(book.show_last_viewed_quote().is_none());
    }

    #[test]
    fn test_show_last_viewed_without_session_quote() {
        let mut book = seeded_book();
        assert!(book.show_last_viewed_quote().is_none());
        assert!(book.display().is_none());
    }

    #[test]
    fn test_add_then_filter_scenario() {
        let mut book = seeded_book();
        book.add_quote("Do Z", "A").unwrap();
        assert_eq!(book.quotes().len(), 3);

        book.filter_by("A");
        for _ in 0..100 {
            let rendered = book.show_random_quote(true);
            let text = &rendered.quote().unwrap().text;
            assert!(text == "Do X" || text == "Do Z", "unexpected {}", text);
        }
    }

    #[test]
    fn test_add_rejects_blank_input() {
        let mut book = seeded_book();
        let err = book.add_quote("   ", "A").unwrap_err();

        assert!(matches!(err, QuoteError::MissingField));
        assert_eq!(book.quotes().len(), 2);
        assert!(book.display().is_none());
    }

    #[test]
    fn test_filter_persists_selection() {
        let mut book = seeded_book();
        book.filter_by("B");

        assert_eq!(book.selected_category().as_deref(), Some("B"));
        assert_eq!(book.filter().selected, "B");

        // Survives a repopulate
        book.populate_categories();
        assert_eq!(book.filter().selected, "B");
    }

    #[test]
    fn test_filter_motivation_only() {
        let mut book = QuoteBook::in_memory(Selector::seeded(9));
        book.add_quote("Keep going", "Motivation").unwrap();
        book.filter_by("Motivation");

        for _ in 0..50 {
            let rendered = book.show_random_quote(true);
            assert_eq!(rendered.quote().unwrap().category, "Motivation");
        }
    }

    #[test]
    fn test_unfiltered_render_ignores_selection() {
        let mut book = seeded_book();
        book.filter_by("A");

        let mut saw_b = false;
        for _ in 0..100 {
            if book.show_random_quote(false).quote().unwrap().category == "B" {
                saw_b = true;
            }
        }
        assert!(saw_b);
    }

    #[test]
    fn test_import_appends_and_indexes() {
        let mut book = seeded_book();
        book.add_quote("Do Z", "A").unwrap();

        let added = book
            .import_json(r#"[{"text":"Imported Q","category":"C"}]"#)
            .unwrap();

        assert_eq!(added, 1);
        assert_eq!(book.quotes().len(), 4);
        assert!(book.filter().contains("C"));
        assert!(book.display().is_some());
    }

    #[test]
    fn test_import_invalid_changes_nothing() {
        let mut book = seeded_book();
        let before = book.quotes().to_vec();

        assert!(book.import_json("not json").is_err());
        assert!(book.import_json(r#"{"text":"x"}"#).is_err());

        assert_eq!(book.quotes(), before.as_slice());
        assert!(book.display().is_none());
    }

    #[test]
    fn test_export_then_import_doubles() {
        let mut book = seeded_book();
        let original = book.quotes().to_vec();

        let exported = book.export_json().unwrap();
        book.import_json(&exported).unwrap();

        let doubled: Vec<Quote> = original.iter().chain(original.iter()).cloned().collect();
        assert_eq!(book.quotes(), doubled.as_slice());
    }

    #[test]
    fn test_replace_from_server() {
        let mut book = seeded_book();
        book.filter_by("A");

        let rendered = book.replace_from_server(vec![Quote::unchecked("T1", "Synced")]);

        assert_eq!(book.quotes(), &[Quote::unchecked("T1", "Synced")]);
        assert_eq!(book.filter().options, vec!["all", "Synced"]);
        // Stored selection still points at "A"
        assert_eq!(rendered, Rendered::NoQuotes);
    }
}
