//! Storage layer
//!
//! Key-value storage in two lifetimes plus file helpers.
//!
//! ## Architecture
//!
//! - **Durable**: SQLite `kv` table, survives across sessions
//! - **Ephemeral**: in-memory map, cleared when the session ends
//! - **Files**: atomic writes for exported collections

pub mod error;
pub mod file;
pub mod kv;
pub mod schema;

pub use error::{StorageError, StorageResult};
pub use file::{atomic_write, read_text};
pub use kv::{KeyValueStore, MemoryKv, SqliteKv};
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};

/// Durable key holding the JSON-encoded collection
pub const QUOTES_KEY: &str = "quotes";

/// Durable key holding the selected category filter
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";

/// Ephemeral key holding the last quote shown this session
pub const LAST_QUOTE_KEY: &str = "lastQuote";
