//! Import and export command handlers

use std::path::{Path, PathBuf};

use anyhow::Result;

use quotebook_core::sync::SharedBook;

use crate::output::Output;

/// Message shown after a successful import
pub const IMPORT_SUCCESS_MESSAGE: &str = "Quotes imported successfully!";

/// Export the collection to a file, or stdout when `target` is `None`
pub async fn export(book: &SharedBook, target: Option<PathBuf>, output: &Output) -> Result<()> {
    let book = book.lock().await;

    match target {
        Some(path) => {
            if let Err(e) = book.export_to_file(&path) {
                return super::report(
                    e,
                    || format!("Failed to export to {}", path.display()),
                    output,
                );
            }
            output.success(&format!(
                "Exported {} quotes to {}",
                book.quotes().len(),
                path.display()
            ));
        }
        None => {
            println!("{}", book.export_json()?);
        }
    }

    Ok(())
}

/// Append quotes from a JSON file
pub async fn import(book: &SharedBook, path: &Path, output: &Output) -> Result<()> {
    let mut book = book.lock().await;

    match book.import_file(path) {
        Ok(count) => {
            output.success(IMPORT_SUCCESS_MESSAGE);
            output.message(&format!("  {} quote(s) added", count));
            if let Some(rendered) = book.display() {
                output.print_rendered(rendered);
            }
            Ok(())
        }
        Err(e) => super::report(e, || format!("Failed to import {}", path.display()), output),
    }
}
