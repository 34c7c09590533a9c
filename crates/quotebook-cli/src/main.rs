//! Quotebook CLI
//!
//! Command-line interface for Quotebook - a local quote collection with
//! category filtering, JSON import/export and remote sync.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quotebook_core::sync::SyncEngine;
use quotebook_core::transfer::EXPORT_FILE_NAME;
use quotebook_core::{Config, QuoteBook};

mod commands;
mod output;
mod session;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "quotebook")]
#[command(about = "Quotebook - random quotes by category, with import, export and sync")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session with periodic sync (default)
    Run,
    /// Show a random quote from the selected category
    #[command(alias = "next")]
    Show {
        /// Ignore the selected category
        #[arg(short, long)]
        all: bool,
    },
    /// List every quote in the collection
    #[command(alias = "ls")]
    List,
    /// Add a quote (and post it to the server when sync is on)
    Add {
        /// Quote text
        text: String,
        /// Quote category
        #[arg(short, long)]
        category: String,
    },
    /// List categories and the current selection
    Categories,
    /// Select a category and show a quote from it
    Filter {
        /// Category name, or "all"
        category: String,
    },
    /// Export the collection as JSON
    Export {
        /// Output file
        #[arg(short, long, default_value = EXPORT_FILE_NAME)]
        output: PathBuf,
        /// Write to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },
    /// Append quotes from a JSON file
    Import {
        /// JSON file containing an array of quotes
        file: PathBuf,
    },
    /// Replace the collection with the server's quotes
    Sync,
    /// Show collection and sync status
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, sync_url, sync_enabled, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands don't need the book
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);

    let book = match QuoteBook::open(&config) {
        Ok(book) => Arc::new(Mutex::new(book)),
        Err(e) => {
            if let Some(hint) = e.recovery_suggestion() {
                output.hint(hint);
            }
            return Err(anyhow::Error::new(e).context(format!(
                "Failed to open quote storage at {}",
                config.database_path().display()
            )));
        }
    };

    let mut engine = SyncEngine::from_config(&config, Arc::clone(&book))
        .context("Failed to set up sync")?;
    let events = engine.as_mut().and_then(SyncEngine::take_events);
    let engine = engine.map(Arc::new);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => session::run(&config, book, engine, events, &output).await,
        Commands::Show { all } => commands::quote::show(&book, !all, &output).await,
        Commands::List => commands::quote::list(&book, &output).await,
        Commands::Add { text, category } => {
            commands::quote::add(&book, engine.as_deref(), &text, &category, true, &output)
                .await
        }
        Commands::Categories => commands::category::list(&book, &output).await,
        Commands::Filter { category } => {
            commands::category::filter(&book, category, &output).await
        }
        Commands::Export { output: path, stdout } => {
            let target = if stdout { None } else { Some(path) };
            commands::transfer::export(&book, target, &output).await
        }
        Commands::Import { file } => commands::transfer::import(&book, &file, &output).await,
        Commands::Sync => commands::sync::sync(engine.as_deref(), &output).await,
        Commands::Status => commands::status::show(&config, &book, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging
///
/// Only initializes if the QUOTEBOOK_LOG environment variable is set.
/// Logs to `config.log_file` when set, stderr otherwise.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("QUOTEBOOK_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "quotebook_core={},quotebook={}",
        log_level, log_level
    ));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    match &config.log_file {
        Some(log_path) => {
            let log_file = match File::create(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
                    return;
                }
            };
            let _ = builder.with_ansi(false).with_writer(log_file).try_init();
            info!("Logging initialized to {:?}", log_path);
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}
