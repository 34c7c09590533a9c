//! Status command handler

use anyhow::Result;

use quotebook_core::sync::SharedBook;
use quotebook_core::Config;

use crate::output::{Output, OutputFormat};

/// Show collection and sync status
pub async fn show(config: &Config, book: &SharedBook, output: &Output) -> Result<()> {
    let mut book = book.lock().await;
    let quote_count = book.quotes().len();
    let filter = book.populate_categories().clone();
    let database = config.database_path();
    let database_size = std::fs::metadata(&database).map(|m| m.len()).unwrap_or(0);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "quotes": quote_count,
                    "categories": filter.categories(),
                    "selected_category": filter.selected,
                    "filtered": filter.is_filtered(),
                    "sync_enabled": config.is_sync_active(),
                    "sync_url": config.sync_url,
                    "sync_interval_secs": config.sync_interval_secs,
                    "storage": {
                        "database": database,
                        "database_size": database_size
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", quote_count);
        }
        OutputFormat::Human => {
            println!("Quotebook Status");
            println!("================");
            println!();
            println!("Collection:");
            println!("  Quotes:     {}", quote_count);
            println!("  Categories: {}", filter.categories().len());
            if filter.is_filtered() {
                println!("  Filter:     {}", filter.selected);
            } else {
                println!("  Filter:     none");
            }
            println!();
            println!("Sync:");
            println!(
                "  Status:   {}",
                if config.is_sync_active() {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            if let Some(ref url) = config.sync_url {
                println!("  Server:   {}", url);
            }
            println!("  Interval: {}s", config.sync_interval_secs);
            println!();
            println!("Storage:");
            println!("  Database: {}", database.display());
            println!("  Size:     {} bytes", database_size);
        }
    }

    Ok(())
}
