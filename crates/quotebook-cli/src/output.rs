//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use chrono::Local;

use quotebook_core::sync::{StatusLevel, StatusMessage};
use quotebook_core::{CategoryFilter, Quote, Rendered};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in JSON mode
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print the display region
    pub fn print_rendered(&self, rendered: &Rendered) {
        match self.format {
            OutputFormat::Human => {
                println!();
                println!("{}", indent(&rendered.to_string()));
                println!();
            }
            OutputFormat::Json => match rendered {
                Rendered::Quote(quote) => {
                    println!("{}", serde_json::json!({ "quote": quote }));
                }
                Rendered::NoQuotes => {
                    println!(
                        "{}",
                        serde_json::json!({ "quote": null, "message": rendered.to_string() })
                    );
                }
            },
            OutputFormat::Quiet => match rendered {
                Rendered::Quote(quote) => println!("{}", quote.text),
                Rendered::NoQuotes => println!("{}", rendered),
            },
        }
    }

    /// Print a list of quotes
    pub fn print_quotes(&self, quotes: &[Quote]) {
        match self.format {
            OutputFormat::Human => {
                if quotes.is_empty() {
                    println!("No quotes found.");
                    return;
                }
                for (i, quote) in quotes.iter().enumerate() {
                    println!(
                        "{:>3}  {:<14} {}",
                        i + 1,
                        truncate(&quote.category, 14),
                        truncate_line(&quote.text, 60)
                    );
                }
                println!("\n{} quote(s)", quotes.len());
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(quotes).unwrap_or_else(|_| "[]".to_string())
                );
            }
            OutputFormat::Quiet => {
                for quote in quotes {
                    println!("{}", quote.text);
                }
            }
        }
    }

    /// Print the category filter options, marking the selected one
    pub fn print_categories(&self, filter: &CategoryFilter) {
        match self.format {
            OutputFormat::Human => {
                for option in &filter.options {
                    let marker = if *option == filter.selected { "*" } else { " " };
                    println!("{} {}", marker, option);
                }
                if !filter.contains(&filter.selected) {
                    println!("* {} (no quotes)", filter.selected);
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(filter).unwrap_or_else(|_| "{}".to_string())
                );
            }
            OutputFormat::Quiet => {
                for category in filter.categories() {
                    println!("{}", category);
                }
            }
        }
    }

    /// Print a transient status message, stamped with local time
    pub fn print_status(&self, status: &StatusMessage) {
        let text = match self.format {
            OutputFormat::Human => format!(
                "[{}] {}",
                status.shown_at.with_timezone(&Local).format("%H:%M:%S"),
                status.text
            ),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "status": status.text,
                        "color": status.level.color(),
                        "shown_at": status.shown_at.to_rfc3339()
                    })
                );
                return;
            }
            OutputFormat::Quiet => return,
        };
        match status.level {
            StatusLevel::Success => self.success(&text),
            StatusLevel::Error => self.warning(&text),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning (stderr in human mode)
    pub fn warning(&self, message: &str) {
        match self.format {
            OutputFormat::Human => eprintln!("⚠ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "error", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a recovery hint under an error (stderr in human mode)
    pub fn hint(&self, hint: &str) {
        match self.format {
            OutputFormat::Human => eprintln!("  hint: {}", hint),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "hint": hint }));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}
