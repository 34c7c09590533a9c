//! Transient status messages
//!
//! The status region shows one message at a time. Each message clears
//! itself after a fixed lifetime unless a newer one replaced it first.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

/// Message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Success,
    Error,
}

impl StatusLevel {
    /// Display color for the status region
    pub fn color(&self) -> &'static str {
        match self {
            StatusLevel::Success => "green",
            StatusLevel::Error => "red",
        }
    }
}

/// A message in the status region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub shown_at: DateTime<Utc>,
}

/// Observable status region with auto-clearing messages
#[derive(Debug, Clone)]
pub struct StatusBoard {
    tx: Arc<watch::Sender<Option<StatusMessage>>>,
    generation: Arc<AtomicU64>,
    ttl: Duration,
}

impl StatusBoard {
    pub fn new(ttl: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            ttl,
        }
    }

    /// How long a message stays visible
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Subscribe to message changes (including clears)
    pub fn subscribe(&self) -> watch::Receiver<Option<StatusMessage>> {
        self.tx.subscribe()
    }

    /// The message currently shown
    pub fn current(&self) -> Option<StatusMessage> {
        self.tx.borrow().clone()
    }

    /// Show a message and schedule its removal
    ///
    /// Outside a tokio runtime the message stays until replaced or cleared.
    pub fn show(&self, text: impl Into<String>, level: StatusLevel) {
        let message = StatusMessage {
            text: text.into(),
            level,
            shown_at: Utc::now(),
        };

        let mut id = 0;
        self.tx.send_modify(|current| {
            id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *current = Some(message);
        });

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let tx = Arc::clone(&self.tx);
        let generation = Arc::clone(&self.generation);
        let ttl = self.ttl;
        runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            tx.send_if_modified(|current| {
                if generation.load(Ordering::SeqCst) == id && current.is_some() {
                    *current = None;
                    true
                } else {
                    false
                }
            });
        });
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(text, StatusLevel::Success);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(text, StatusLevel::Error);
    }
}
