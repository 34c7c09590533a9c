//! Interactive session
//!
//! One session is one process: the last viewed quote lives only as long as
//! this loop does. Input lines drive the book, while a background task syncs
//! with the server every `sync_interval_secs`. Status messages and sync
//! results are printed as they arrive.

use std::io::{self, Write as _};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use quotebook_core::sync::{
    spawn_periodic_sync, SharedBook, StatusBoard, SyncEngine, SyncEvent, SyncHandle,
};
use quotebook_core::Config;

use crate::commands;
use crate::output::Output;

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionCommand {
    /// Random quote from the selected category
    Next,
    /// Random quote from the whole collection
    NextAll,
    /// Re-show the last viewed quote
    Last,
    List,
    Add { text: String, category: String },
    Categories,
    Filter(String),
    Export(Option<PathBuf>),
    Import(PathBuf),
    Sync,
    Status,
    Help,
    Quit,
    Unknown(String),
}

impl SessionCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" | "n" | "next" => SessionCommand::Next,
            "any" => SessionCommand::NextAll,
            "last" => SessionCommand::Last,
            "list" | "ls" => SessionCommand::List,
            "add" => {
                let (text, category) = rest.split_once('|').unwrap_or((rest, ""));
                SessionCommand::Add {
                    text: text.trim().to_string(),
                    category: category.trim().to_string(),
                }
            }
            "categories" | "cats" => SessionCommand::Categories,
            "filter" | "f" if !rest.is_empty() => SessionCommand::Filter(rest.to_string()),
            "export" => SessionCommand::Export(if rest.is_empty() {
                None
            } else {
                Some(PathBuf::from(rest))
            }),
            "import" if !rest.is_empty() => SessionCommand::Import(PathBuf::from(rest)),
            "sync" => SessionCommand::Sync,
            "status" => SessionCommand::Status,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            _ => SessionCommand::Unknown(line.to_string()),
        }
    }
}

const HELP: &str = "\
Commands:
  next, n, <enter>         Show a random quote from the selected category
  any                      Show a random quote from every category
  last                     Show the last viewed quote
  list                     List all quotes
  add <text> | <category>  Add a quote
  categories               List categories
  filter <category|all>    Select a category
  export [path]            Export quotes as JSON (default quotes.json)
  import <path>            Append quotes from a JSON file
  sync                     Sync with the server now
  status                   Show collection and sync status
  quit, exit               Leave the session";

/// Run the interactive session until EOF or `quit`
pub async fn run(
    config: &Config,
    book: SharedBook,
    engine: Option<Arc<SyncEngine>>,
    mut events: Option<UnboundedReceiver<SyncEvent>>,
    output: &Output,
) -> Result<()> {
    let show_prompt = !output.is_json() && !output.is_quiet();

    if show_prompt {
        println!();
        println!("  Quotebook");
        println!("  Type \"help\" for commands, \"quit\" to exit.");
        println!();
    }

    // A fresh session has no last quote; nothing is shown until asked
    let last = book.lock().await.show_last_viewed_quote();
    if let Some(rendered) = last {
        output.print_rendered(&rendered);
    }

    // Without an engine the board never changes, but keeps the loop uniform
    let local_board = StatusBoard::new(config.status_ttl());
    let mut status_rx = match &engine {
        Some(engine) => engine.status_board().subscribe(),
        None => local_board.subscribe(),
    };

    let handle = engine
        .as_ref()
        .map(|engine| spawn_periodic_sync(Arc::clone(engine), config.sync_interval()));
    if handle.is_some() {
        info!("Periodic sync every {:?}", config.sync_interval());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if show_prompt {
            print!("> ");
            io::stdout().flush()?;
        }

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let command = SessionCommand::parse(&line);
                if command == SessionCommand::Quit {
                    break;
                }
                let engine = engine.as_deref();
                let result = dispatch(command, config, &book, engine, handle.as_ref(), output).await;
                if let Err(e) = result {
                    output.warning(&format!("{:#}", e));
                }
            }
            changed = status_rx.changed() => {
                if changed.is_err() {
                    continue;
                }
                let status = status_rx.borrow_and_update().clone();
                if let Some(status) = status {
                    println!();
                    output.print_status(&status);
                }
            }
            Some(event) = next_event(&mut events) => {
                handle_event(event, &book, output).await;
            }
        }
    }

    if let Some(handle) = handle {
        handle.stop().await;
    }
    debug!("Session ended");

    Ok(())
}

async fn dispatch(
    command: SessionCommand,
    config: &Config,
    book: &SharedBook,
    engine: Option<&SyncEngine>,
    handle: Option<&SyncHandle>,
    output: &Output,
) -> Result<()> {
    match command {
        SessionCommand::Next => commands::quote::show(book, true, output).await,
        SessionCommand::NextAll => commands::quote::show(book, false, output).await,
        SessionCommand::Last => commands::quote::last(book, output).await,
        SessionCommand::List => commands::quote::list(book, output).await,
        SessionCommand::Add { text, category } => {
            commands::quote::add(book, engine, &text, &category, false, output).await
        }
        SessionCommand::Categories => commands::category::list(book, output).await,
        SessionCommand::Filter(category) => {
            commands::category::filter(book, category, output).await
        }
        SessionCommand::Export(path) => {
            let path =
                path.unwrap_or_else(|| PathBuf::from(quotebook_core::transfer::EXPORT_FILE_NAME));
            commands::transfer::export(book, Some(path), output).await
        }
        SessionCommand::Import(path) => commands::transfer::import(book, &path, output).await,
        SessionCommand::Sync => match handle {
            // Results arrive through the status board and event channel
            Some(handle) => {
                handle.sync_now().await;
                Ok(())
            }
            None => commands::sync::sync(engine, output).await,
        },
        SessionCommand::Status => commands::status::show(config, book, output).await,
        SessionCommand::Help => {
            output.message(HELP);
            Ok(())
        }
        SessionCommand::Quit => Ok(()),
        SessionCommand::Unknown(line) => {
            output.warning(&format!("Unknown command: {} (try \"help\")", line));
            Ok(())
        }
    }
}

async fn next_event(events: &mut Option<UnboundedReceiver<SyncEvent>>) -> Option<SyncEvent> {
    match events {
        Some(rx) => {
            let event = rx.recv().await;
            if event.is_none() {
                *events = None;
            }
            event
        }
        None => std::future::pending().await,
    }
}

async fn handle_event(event: SyncEvent, book: &SharedBook, output: &Output) {
    match event {
        SyncEvent::Synced(count) => {
            debug!("Sync delivered {} quotes", count);
            let display = book.lock().await.display().cloned();
            if let Some(rendered) = display {
                output.print_rendered(&rendered);
            }
        }
        SyncEvent::PostFailed(e) => debug!("Post failed: {}", e),
        SyncEvent::FetchFailed(e) => debug!("Fetch failed: {}", e),
        SyncEvent::Posted(_) | SyncEvent::StatusChanged(_) => {}
    }
}
