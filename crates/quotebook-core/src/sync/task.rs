//! Periodic sync task
//!
//! Runs `SyncEngine::sync_quotes` on a fixed interval in a background task
//! owned by a `SyncHandle`. Dropping the handle's sender or calling `stop`
//! ends the task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::engine::SyncEngine;
use crate::config::DEFAULT_SYNC_INTERVAL_SECS;

/// Commands sent to the sync task
#[derive(Debug)]
pub enum SyncCommand {
    /// Sync immediately, outside the schedule
    SyncNow,
    /// Shutdown the sync task
    Shutdown,
}

/// Handle for controlling the background sync task
pub struct SyncHandle {
    command_tx: mpsc::Sender<SyncCommand>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Ask the task to sync now
    pub async fn sync_now(&self) {
        let _ = self.command_tx.send(SyncCommand::SyncNow).await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the task and wait for it to exit
    ///
    /// A sync already in flight is allowed to finish first.
    pub async fn stop(self) {
        let _ = self.command_tx.send(SyncCommand::Shutdown).await;
        let _ = self.task.await;
    }
}

/// Spawn a task that syncs every `period`
///
/// The first sync happens one full period after spawning, like a browser
/// interval timer. A zero period falls back to the default interval.
pub fn spawn_periodic_sync(engine: Arc<SyncEngine>, period: Duration) -> SyncHandle {
    let period = if period.is_zero() {
        warn!(
            "Sync interval of zero ignored, using {}s",
            DEFAULT_SYNC_INTERVAL_SECS
        );
        Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS)
    } else {
        period
    };
    let (command_tx, command_rx) = mpsc::channel(16);
    let task = tokio::spawn(periodic_sync_task(engine, period, command_rx));

    SyncHandle { command_tx, task }
}

async fn periodic_sync_task(
    engine: Arc<SyncEngine>,
    period: Duration,
    mut command_rx: mpsc::Receiver<SyncCommand>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                debug!("Periodic sync fired");
                engine.sync_quotes().await;
            }
            cmd = command_rx.recv() => {
                match cmd {
                    Some(SyncCommand::SyncNow) => {
                        engine.sync_quotes().await;
                    }
                    Some(SyncCommand::Shutdown) | None => break,
                }
            }
        }
    }

    debug!("Periodic sync stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::QuoteBook;
    use crate::models::Quote;
    use crate::selector::Selector;
    use crate::sync::{RemoteClient, StatusBoard};
    use mockito::Server;
    use tokio::sync::Mutex;

    #[tokio::test]
    async fn test_periodic_sync_runs_and_stops() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/posts")
            .with_status(200)
            .with_body(r#"[{"title":"T1"}]"#)
            .expect_at_least(2)
            .create_async()
            .await;

        let book = Arc::new(Mutex::new(QuoteBook::in_memory(Selector::seeded(5))));
        let client = RemoteClient::new(&format!("{}/posts", server.url())).unwrap();
        let engine = Arc::new(SyncEngine::new(
            client,
            Arc::clone(&book),
            StatusBoard::new(Duration::from_secs(5)),
        ));

        let handle = spawn_periodic_sync(Arc::clone(&engine), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(!handle.is_finished());
        handle.stop().await;

        m.assert_async().await;
        assert_eq!(
            book.lock().await.quotes(),
            &[Quote::unchecked("T1", "Synced")]
        );
    }

    #[tokio::test]
    async fn test_sync_now_and_no_sync_before_first_period() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/posts")
            .with_status(200)
            .with_body(r#"[{"title":"Now"}]"#)
            .expect(1)
            .create_async()
            .await;

        let book = Arc::new(Mutex::new(QuoteBook::in_memory(Selector::seeded(5))));
        let client = RemoteClient::new(&format!("{}/posts", server.url())).unwrap();
        let engine = Arc::new(SyncEngine::new(
            client,
            Arc::clone(&book),
            StatusBoard::new(Duration::from_secs(5)),
        ));

        let handle = spawn_periodic_sync(engine, Duration::from_secs(3600));
        handle.sync_now().await;
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.stop().await;

        m.assert_async().await;
        assert_eq!(book.lock().await.quotes()[0].text, "Now");
    }
    #[tokio::test]
    async fn test_zero_period_does_not_panic_or_spin() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/posts")
            .with_status(200)
            .with_body(r#"[{"title":"T1"}]"#)
            .expect(0)
            .create_async()
            .await;

        let book = Arc::new(Mutex::new(QuoteBook::in_memory(Selector::seeded(5))));
        let client = RemoteClient::new(&format!("{}/posts", server.url())).unwrap();
        let engine = Arc::new(SyncEngine::new(
            client,
            Arc::clone(&book),
            StatusBoard::new(Duration::from_secs(5)),
        ));

        let handle = spawn_periodic_sync(engine, Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Still running on the default interval, nothing fetched yet
        assert!(!handle.is_finished());
        handle.stop().await;
        m.assert_async().await;
    }
}
