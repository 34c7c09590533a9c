//! Sync command handler

use anyhow::{bail, Result};

use quotebook_core::sync::{SyncEngine, SyncOutcome};

use crate::output::Output;

/// Replace the collection with the server's quotes
pub async fn sync(engine: Option<&SyncEngine>, output: &Output) -> Result<()> {
    let Some(engine) = engine else {
        bail!(
            "Sync is not enabled. Enable it with:\n  \
             quotebook config set sync_enabled true\n  \
             quotebook config set sync_url https://your-server/posts"
        );
    };

    output.message(&format!("Fetching quotes from {}...", engine.client().url()));

    match engine.sync_quotes().await {
        SyncOutcome::Replaced { count, display } => {
            if let Some(status) = engine.status_board().current() {
                output.print_status(&status);
            }
            output.message(&format!("  {} quote(s) from server", count));
            output.print_rendered(&display);
        }
        SyncOutcome::Unchanged => match engine.status_board().current() {
            Some(status) => output.print_status(&status),
            None => output.message("Server returned no quotes; collection unchanged"),
        },
    }

    Ok(())
}
