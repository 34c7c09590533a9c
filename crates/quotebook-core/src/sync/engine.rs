//! Sync engine
//!
//! Reconciles the local collection with the remote endpoint. The policy is
//! "remote wins": a non-empty remote snapshot replaces the whole local
//! collection, with no merge and no local-change preservation.
//!
//! All access to the book goes through one `tokio::sync::Mutex`, and syncs
//! are serialized by a second lock. A slow sync never overlaps another
//! sync, and an add lands wholly before or after a replace. Posts run in
//! detached tasks and never hold either lock.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::client::RemoteClient;
use super::status::StatusBoard;
use crate::book::QuoteBook;
use crate::config::Config;
use crate::error::Result;
use crate::models::Quote;
use crate::selector::Rendered;

/// Status text shown after a successful sync
pub const SYNC_SUCCESS_MESSAGE: &str = "Quotes synced with server!";

/// Status text shown when the fetch fails
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch from server";

/// The book shared between the UI and the sync engine
pub type SharedBook = Arc<Mutex<QuoteBook>>;

/// Engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Idle,
    Syncing,
}

/// Events emitted by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// Engine state changed
    StatusChanged(SyncStatus),
    /// Local collection replaced with this many remote quotes
    Synced(usize),
    /// Fetch failed; collection untouched
    FetchFailed(String),
    /// Quote accepted by the transport
    Posted(Quote),
    /// Quote could not be sent
    PostFailed(String),
}

/// Result of one sync attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Collection replaced; `display` is the re-rendered quote
    Replaced { count: usize, display: Rendered },
    /// Fetch empty or failed; collection untouched
    Unchanged,
}

impl SyncOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, SyncOutcome::Replaced { .. })
    }
}

/// Remote-wins sync engine
pub struct SyncEngine {
    client: RemoteClient,
    book: SharedBook,
    board: StatusBoard,
    sync_lock: Mutex<()>,
    status: watch::Sender<SyncStatus>,
    status_rx: watch::Receiver<SyncStatus>,
    event_tx: mpsc::UnboundedSender<SyncEvent>,
    event_rx: Option<mpsc::UnboundedReceiver<SyncEvent>>,
}

impl SyncEngine {
    pub fn new(client: RemoteClient, book: SharedBook, board: StatusBoard) -> Self {
        let (status_tx, status_rx) = watch::channel(SyncStatus::Idle);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            client,
            book,
            board,
            sync_lock: Mutex::new(()),
            status: status_tx,
            status_rx,
            event_tx,
            event_rx: Some(event_rx),
        }
    }

    /// Build an engine from configuration
    ///
    /// Returns `Ok(None)` when sync is disabled or no endpoint is set.
    pub fn from_config(config: &Config, book: SharedBook) -> Result<Option<Self>> {
        let Some(url) = config.sync_url.as_deref().filter(|_| config.sync_enabled) else {
            return Ok(None);
        };

        let client = RemoteClient::new(url)?.with_fetch_limit(config.fetch_limit);
        let board = StatusBoard::new(config.status_ttl());
        Ok(Some(Self::new(client, book, board)))
    }

    pub fn book(&self) -> SharedBook {
        Arc::clone(&self.book)
    }

    pub fn client(&self) -> &RemoteClient {
        &self.client
    }

    pub fn status_board(&self) -> &StatusBoard {
        &self.board
    }

    /// Get the current engine state
    pub fn status(&self) -> SyncStatus {
        *self.status_rx.borrow()
    }

    /// Subscribe to engine state changes
    pub fn subscribe_status(&self) -> watch::Receiver<SyncStatus> {
        self.status_rx.clone()
    }

    /// Take the event receiver (can only be called once)
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<SyncEvent>> {
        self.event_rx.take()
    }

    /// Fetch the remote snapshot
    ///
    /// Failures are reported on the status board and yield an empty list;
    /// they never propagate.
    pub async fn fetch_quotes_from_server(&self) -> Vec<Quote> {
        match self.client.fetch_quotes().await {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!("Fetch from {} failed: {}", self.client.url(), e);
                self.board.error(FETCH_FAILED_MESSAGE);
                self.emit(SyncEvent::FetchFailed(e.to_string()));
                Vec::new()
            }
        }
    }

    /// Send a newly added quote to the endpoint and wait for the transport
    ///
    /// Attempted once. The outcome goes to the event channel and the log,
    /// never to the status board.
    pub async fn post_quote_to_server(&self, quote: &Quote) -> Result<()> {
        post_and_report(&self.client, &self.event_tx, quote).await
    }

    /// Post a quote from a detached task
    ///
    /// Returns at once; the outcome arrives later as `Posted` or
    /// `PostFailed`. A hanging endpoint only ever holds the spawned task.
    pub fn spawn_post(&self, quote: Quote) -> JoinHandle<()> {
        let client = self.client.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let _ = post_and_report(&client, &event_tx, &quote).await;
        })
    }

    /// Run one sync
    ///
    /// A non-empty fetch replaces the collection, persists it, repopulates
    /// the category index, re-renders the filtered quote and shows the
    /// success message. An empty or failed fetch changes nothing.
    pub async fn sync_quotes(&self) -> SyncOutcome {
        let _serialized = self.sync_lock.lock().await;
        self.set_status(SyncStatus::Syncing);

        let remote = self.fetch_quotes_from_server().await;

        let outcome = if remote.is_empty() {
            SyncOutcome::Unchanged
        } else {
            let count = remote.len();
            let display = self.book.lock().await.replace_from_server(remote);
            self.board.success(SYNC_SUCCESS_MESSAGE);
            self.emit(SyncEvent::Synced(count));
            info!("Sync replaced collection with {} quotes", count);
            SyncOutcome::Replaced { count, display }
        };

        self.set_status(SyncStatus::Idle);
        outcome
    }

    /// Add a quote locally, then post it in the background
    ///
    /// The add succeeds or fails on its own and returns without waiting
    /// for the server; a failed post is only logged and reported as an
    /// event.
    pub async fn add_quote(&self, text: &str, category: &str) -> Result<Quote> {
        let quote = self.book.lock().await.add_quote(text, category)?;
        self.spawn_post(quote.clone());
        Ok(quote)
    }

    fn set_status(&self, status: SyncStatus) {
        let _ = self.status.send(status);
        self.emit(SyncEvent::StatusChanged(status));
    }

    fn emit(&self, event: SyncEvent) {
        let _ = self.event_tx.send(event);
    }
}

async fn post_and_report(
    client: &RemoteClient,
    event_tx: &mpsc::UnboundedSender<SyncEvent>,
    quote: &Quote,
) -> Result<()> {
    match client.post_quote(quote).await {
        Ok(()) => {
            info!("Posted quote to server");
            let _ = event_tx.send(SyncEvent::Posted(quote.clone()));
            Ok(())
        }
        Err(e) => {
            warn!("Post to {} failed: {}", client.url(), e);
            let _ = event_tx.send(SyncEvent::PostFailed(e.to_string()));
            Err(e)
        }
    }
}
