//! Category command handlers

use anyhow::Result;

use quotebook_core::sync::SharedBook;

use crate::output::Output;

/// List categories, marking the selected one
pub async fn list(book: &SharedBook, output: &Output) -> Result<()> {
    let mut book = book.lock().await;
    output.print_categories(book.populate_categories());
    Ok(())
}

/// Persist a category selection and show a quote from it
pub async fn filter(book: &SharedBook, category: String, output: &Output) -> Result<()> {
    let mut book = book.lock().await;
    if !book.filter().contains(&category) {
        output.warning(&format!("No quotes in category '{}'", category));
    }
    let rendered = book.filter_by(category);
    output.print_rendered(&rendered);
    Ok(())
}
