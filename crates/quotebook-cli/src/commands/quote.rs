//! Quote command handlers

use anyhow::Result;

use quotebook_core::sync::{SharedBook, SyncEngine};

use crate::output::Output;

/// Show a random quote, optionally limited to the selected category
pub async fn show(book: &SharedBook, use_filter: bool, output: &Output) -> Result<()> {
    let rendered = book.lock().await.show_random_quote(use_filter);
    output.print_rendered(&rendered);
    Ok(())
}

/// Re-show the session's last viewed quote
pub async fn last(book: &SharedBook, output: &Output) -> Result<()> {
    let last = book.lock().await.show_last_viewed_quote();
    match last {
        Some(rendered) => output.print_rendered(&rendered),
        None => output.message("No quote viewed yet in this session."),
    }
    Ok(())
}

/// List every quote
pub async fn list(book: &SharedBook, output: &Output) -> Result<()> {
    let book = book.lock().await;
    output.print_quotes(book.quotes());
    Ok(())
}

/// Add a quote
///
/// With an engine the quote is also posted to the server. A failed post
/// does not fail the add. The session leaves the post running in the
/// background; a one-shot command sets `wait_for_post` so the process does
/// not exit before the request is sent.
pub async fn add(
    book: &SharedBook,
    engine: Option<&SyncEngine>,
    text: &str,
    category: &str,
    wait_for_post: bool,
    output: &Output,
) -> Result<()> {
    let added = match engine {
        Some(engine) if wait_for_post => {
            let added = book.lock().await.add_quote(text, category);
            if let Ok(quote) = &added {
                // Outcome is logged and sent as an event by the engine
                let _ = engine.post_quote_to_server(quote).await;
            }
            added
        }
        Some(engine) => engine.add_quote(text, category).await,
        None => book.lock().await.add_quote(text, category),
    };

    match added {
        Ok(quote) => {
            output.success(&format!("Added quote to {}", quote.category));
            if let Some(rendered) = book.lock().await.display() {
                output.print_rendered(rendered);
            }
            Ok(())
        }
        Err(e) => super::report(e, || "Failed to add quote".to_string(), output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use quotebook_core::{QuoteBook, Selector};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn book() -> SharedBook {
        Arc::new(Mutex::new(QuoteBook::in_memory(Selector::seeded(3))))
    }

    #[tokio::test]
    async fn test_add_blank_is_a_warning_not_a_failure() {
        let book = book();
        let output = Output::new(OutputFormat::Quiet);

        add(&book, None, "  ", "Life", true, &output).await.unwrap();
        assert_eq!(book.lock().await.quotes().len(), 2);
    }

    #[tokio::test]
    async fn test_add_without_engine() {
        let book = book();
        let output = Output::new(OutputFormat::Quiet);

        add(&book, None, "Do Z", "A", true, &output).await.unwrap();
        let book = book.lock().await;
        assert_eq!(book.quotes().len(), 3);
        assert_eq!(book.quotes()[2].text, "Do Z");
    }
}
