//! Sync with the remote quote endpoint
//!
//! ## Policy
//!
//! Remote wins: a non-empty remote snapshot replaces the local collection
//! outright. Newly added quotes are posted once and never retried.
//!
//! ## Usage
//!
//! ```ignore
//! let engine = Arc::new(SyncEngine::from_config(&config, book)?.unwrap());
//! let handle = spawn_periodic_sync(Arc::clone(&engine), config.sync_interval());
//! // ...
//! handle.stop().await;
//! ```

mod client;
mod engine;
mod message;
mod status;
mod task;

pub use client::RemoteClient;
pub use engine::{
    SharedBook, SyncEngine, SyncEvent, SyncOutcome, SyncStatus, FETCH_FAILED_MESSAGE,
    SYNC_SUCCESS_MESSAGE,
};
pub use message::{decode_records, RemoteRecord};
pub use status::{StatusBoard, StatusLevel, StatusMessage};
pub use task::{spawn_periodic_sync, SyncCommand, SyncHandle};
