//! Collection operations
//!
//! Plain functions over the in-memory collection. They never touch disk;
//! `Store` wraps the mutating ones and persists after each call.

use crate::models::Book;

/// Append a book to the end of the collection
pub fn add(books: &mut Vec<Book>, book: Book) {
    books.push(book);
}

/// Remove every book whose title exactly equals `title`
///
/// Returns how many books were removed. Books with other titles keep
/// their relative order.
pub fn remove_by_title(books: &mut Vec<Book>, title: &str) -> usize {
    let before = books.len();
    books.retain(|b| b.title != title);
    before - books.len()
}

/// Case-insensitive substring search over title, author and genre
///
/// Results keep collection order. An empty term matches every book;
/// callers that want "no search" for empty input check before calling.
pub fn search(books: &[Book], term: &str) -> Vec<Book> {
    let needle = term.to_lowercase();
    books
        .iter()
        .filter(|b| {
            b.title.to_lowercase().contains(&needle)
                || b.author.to_lowercase().contains(&needle)
                || b.genre.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Titles in collection order, for picking a book to remove
pub fn titles(books: &[Book]) -> Vec<String> {
    books.iter().map(|b| b.title.clone()).collect()
}
