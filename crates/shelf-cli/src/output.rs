//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use shelf_core::{Book, ImportSummary, Statistics};

/// Shown wherever a listing or report needs at least one book
pub const EMPTY_LIBRARY: &str = "Your library is empty! Add some books first.";

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

    /// Print a single book
    pub fn print_book(&self, book: &Book) {
        match self.format {
            OutputFormat::Human => {
                println!("Title:  {}", book.title);
                println!("Author: {}", book.author);
                println!("Year:   {}", book.year);
                println!("Genre:  {}", book.genre);
                println!("Status: {}", read_label(book.read));
            }
            OutputFormat::Json => print_json(book),
            OutputFormat::Quiet => {
                println!("{}", book.title);
            }
        }
    }

    /// Print a list of books
    pub fn print_books(&self, books: &[Book]) {
        match self.format {
            OutputFormat::Human => {
                if books.is_empty() {
                    println!("No books found.");
                    return;
                }
                for book in books {
                    println!("{}", format_book_line(book));
                }
                println!("\n{} book(s)", books.len());
            }
            OutputFormat::Json => print_json(books),
            OutputFormat::Quiet => {
                for book in books {
                    println!("{}", book.title);
                }
            }
        }
    }

    /// Print collection statistics
    pub fn print_stats(&self, stats: &Statistics) {
        match self.format {
            OutputFormat::Human => {
                println!("Library Statistics");
                println!("==================");
                println!();
                println!("  Total Books: {}", stats.total);
                println!("  Read:        {}", stats.read);
                println!("  Unread:      {}", stats.unread);
                println!();
                println!("Genres:");

                let entries = stats.genres_by_count();
                let width = entries.iter().map(|(g, _)| g.len()).max().unwrap_or(0);
                for (genre, count) in entries {
                    println!(
                        "  {:<width$}  {} {}",
                        genre,
                        "█".repeat(count),
                        count,
                        width = width
                    );
                }
            }
            OutputFormat::Json => print_json(stats),
            OutputFormat::Quiet => {
                println!("{} {} {}", stats.total, stats.read, stats.unread);
            }
        }
    }

    /// Print the result of an import
    pub fn print_import(&self, summary: &ImportSummary) {
        match self.format {
            OutputFormat::Human => {
                println!("✓ Imported {} books!", summary.received);
                println!(
                    "  Mode: {}  Added: {}  Library now has {} book(s)",
                    summary.mode, summary.added, summary.total
                );
            }
            OutputFormat::Json => print_json(summary),
            OutputFormat::Quiet => {
                println!("{}", summary.added);
            }
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

    /// Print a warning (empty library, nothing matched, ...)
    pub fn warning(&self, message: &str) {
        match self.format {
            OutputFormat::Human => eprintln!("⚠ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "warning", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
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

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to format JSON output: {}", e),
    }
}

/// Label for the read flag
pub fn read_label(read: bool) -> &'static str {
    if read {
        "Read"
    } else {
        "Unread"
    }
}

/// One-line listing: title, author, year, genre and read status
pub fn format_book_line(book: &Book) -> String {
    format!(
        "{} | {} | {} | {} | {}",
        truncate(&book.title, 35),
        truncate(&book.author, 25),
        book.year,
        book.genre,
        read_label(book.read)
    )
}

/// Truncate a string to max characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
