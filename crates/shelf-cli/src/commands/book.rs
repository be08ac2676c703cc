//! Book command handlers

use anyhow::{Context, Result};

use shelf_core::{year_range, Book, Genre, Store};

use crate::output::{Output, EMPTY_LIBRARY};
use crate::prompt::{self, confirm, prompt_until};

/// Fields for a new book as given on the command line
///
/// Anything left as `None` is asked for interactively.
#[derive(Debug, Default)]
pub struct NewBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<Genre>,
    pub read: bool,
}

/// Parse and bound-check a publication year
pub fn parse_year(s: &str) -> Result<i32, String> {
    let year: i32 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a year", s.trim()))?;
    let range = year_range();
    if range.contains(&year) {
        Ok(year)
    } else {
        Err(format!(
            "Year must be between {} and {}",
            range.start(),
            range.end()
        ))
    }
}

/// Parse one of the known genres
pub fn parse_genre(s: &str) -> Result<Genre, String> {
    s.parse::<Genre>().map_err(|e| e.to_string())
}

/// Add a new book
pub fn add(store: &mut Store, new_book: NewBook, output: &Output) -> Result<()> {
    let title = match new_book.title {
        Some(t) => t,
        None => prompt_until("Title", prompt::non_empty("Title"))?,
    };
    let author = match new_book.author {
        Some(a) => a,
        None => prompt_until("Author", prompt::non_empty("Author"))?,
    };
    let year = match new_book.year {
        Some(y) => y,
        None => {
            let range = year_range();
            prompt_until(
                &format!("Publication Year ({}-{})", range.start(), range.end()),
                parse_year,
            )?
        }
    };
    let genre = match new_book.genre {
        Some(g) => g,
        None => {
            let choices: Vec<&str> = Genre::ALL.iter().map(Genre::as_str).collect();
            prompt_until(&format!("Genre [{}]", choices.join(", ")), parse_genre)?
        }
    };

    let book = Book::new(title, author, year, genre, new_book.read);
    store.add_book(book.clone()).context("Failed to add book")?;

    output.success("Book added successfully!");
    output.print_book(&book);

    Ok(())
}

/// Remove every book with the given title
pub fn remove(store: &mut Store, title: String, yes: bool, output: &Output) -> Result<()> {
    let matching = store.books().iter().filter(|b| b.title == title).count();

    if matching > 0 && !yes && output.should_prompt() {
        println!("Remove {} book(s) titled '{}'", matching, title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let removed = store
        .remove_by_title(&title)
        .context("Failed to remove book")?;

    if removed == 0 {
        output.warning(&format!("No book titled '{}'", title));
    } else {
        output.success(&format!("Removed {} book(s) titled '{}'", removed, title));
    }

    Ok(())
}

/// Search books by title, author or genre
pub fn search(store: &Store, term: String, output: &Output) -> Result<()> {
    if term.is_empty() {
        output.message("Enter a title, author or genre to search for.");
        return Ok(());
    }

    let results = store.search(&term);
    if results.is_empty() {
        output.warning("No books found matching your search");
        return Ok(());
    }

    output.print_books(&results);
    Ok(())
}

/// List all books
pub fn list(store: &Store, output: &Output) -> Result<()> {
    if store.is_empty() {
        output.warning(EMPTY_LIBRARY);
        return Ok(());
    }

    output.print_books(store.books());
    Ok(())
}
