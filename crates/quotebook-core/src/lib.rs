//! Quotebook Core Library
//!
//! This crate provides the core functionality for Quotebook, a local-first
//! quote collection that shows a random quote, filters by category,
//! imports and exports JSON, and syncs with a remote endpoint.
//!
//! # Architecture
//!
//! - **Durable storage**: SQLite key-value table (`quotes`, `selectedCategory`)
//! - **Session storage**: in-memory map (`lastQuote`)
//! - **Sync**: periodic remote-wins replace over HTTP
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut book = QuoteBook::open(&config)?;
//!
//! book.add_quote("Do Z", "A")?;
//! println!("{}", book.filter_by("A"));
//! ```
//!
//! # Modules
//!
//! - `book`: The quote book facade (main entry point)
//! - `models`: The quote record and default collection
//! - `store`: Collection ownership and persistence
//! - `selector`: Uniform random selection and last-viewed tracking
//! - `categories`: Category index and filter control
//! - `transfer`: JSON import and export
//! - `storage`: Key-value backends and file helpers
//! - `sync`: Remote endpoint client and sync engine
//! - `config`: Application configuration

pub mod book;
pub mod categories;
pub mod config;
pub mod error;
pub mod models;
pub mod selector;
pub mod storage;
pub mod store;
pub mod sync;
pub mod transfer;

pub use book::QuoteBook;
pub use categories::CategoryFilter;
pub use config::Config;
pub use error::{QuoteError, Result};
pub use models::{Quote, ALL_CATEGORIES, SYNCED_CATEGORY};
pub use selector::{Rendered, Selector, NO_QUOTES_MESSAGE};
pub use storage::{KeyValueStore, MemoryKv, SqliteKv, StorageError};
pub use store::QuoteStore;
