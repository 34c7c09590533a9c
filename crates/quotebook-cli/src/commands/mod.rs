//! Command handlers
//!
//! Each module handles one group of subcommands. Handlers take the shared
//! book, do their work under its lock, and print through `Output`.

use anyhow::Result;

use quotebook_core::QuoteError;

use crate::output::Output;

pub mod category;
pub mod config;
pub mod quote;
pub mod status;
pub mod sync;
pub mod transfer;

/// Report a failed core operation
///
/// Mistakes in user input are shown as warnings and the command still
/// succeeds. Anything else fails the command with `context`. A recovery
/// hint is printed in both cases when there is one.
pub fn report(err: QuoteError, context: impl FnOnce() -> String, output: &Output) -> Result<()> {
    if err.is_user_error() {
        output.warning(&err.to_string());
        if let Some(hint) = err.recovery_suggestion() {
            output.hint(hint);
        }
        return Ok(());
    }

    if let Some(hint) = err.recovery_suggestion() {
        output.hint(hint);
    }
    Err(anyhow::Error::new(err).context(context()))
}
