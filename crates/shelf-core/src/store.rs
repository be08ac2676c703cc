//! Session store
//!
//! The `Store` owns the collection for one session. It is loaded from the
//! library file exactly once when opened, and every mutating method writes
//! the full collection back before returning. Mutations need `&mut self`,
//! so one `Store` value has a single writer.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;  // Loads existing library or starts empty
//!
//! store.add_book(Book::new("Dune", "Frank Herbert", 1965, Genre::ScienceFiction, true))?;
//!
//! let hits = store.search("herbert");
//! let stats = store.statistics();
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::import::{self, ImportError, ImportMode, ImportSummary};
use crate::library;
use crate::models::Book;
use crate::stats::{Statistics, Summary};
use crate::storage::JsonPersistence;

/// Session store for the book collection
pub struct Store {
    /// The in-memory collection, in insertion order
    books: Vec<Book>,
    /// Library file persistence
    persistence: JsonPersistence,
    /// Configuration
    config: Config,
}

impl Store {
    /// Open the store using the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    ///
    /// A missing library file gives an empty collection. A library file that
    /// is not valid JSON is an error; nothing is overwritten in that case.
    pub fn open_with_config(config: Config) -> Result<Self> {
        let persistence = JsonPersistence::new(&config);
        let books = persistence
            .load()
            .context("Failed to load library")?;

        Ok(Self {
            books,
            persistence,
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the persistence handler
    pub fn persistence(&self) -> &JsonPersistence {
        &self.persistence
    }

    // ==================== Queries ====================

    /// All books in insertion order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Titles in collection order
    pub fn titles(&self) -> Vec<String> {
        library::titles(&self.books)
    }

    /// Case-insensitive search over title, author and genre
    pub fn search(&self, term: &str) -> Vec<Book> {
        library::search(&self.books, term)
    }

    /// Read/unread counters (always defined)
    pub fn summary(&self) -> Summary {
        Summary::of(&self.books)
    }

    /// Full statistics, or `None` when the library is empty
    pub fn statistics(&self) -> Option<Statistics> {
        Statistics::compute(&self.books)
    }

    // ==================== Mutations ====================

    /// Append a book and save
    ///
    /// If the save fails the session keeps its previous collection.
    pub fn add_book(&mut self, book: Book) -> Result<()> {
        let mut next = self.books.clone();
        library::add(&mut next, book);
        self.commit(next)
    }

    /// Remove every book with exactly this title and save
    ///
    /// Saves even when nothing matched. Returns the number removed.
    pub fn remove_by_title(&mut self, title: &str) -> Result<usize> {
        let mut next = self.books.clone();
        let removed = library::remove_by_title(&mut next, title);
        self.commit(next)?;
        Ok(removed)
    }

    /// Import an uploaded document and save
    ///
    /// The document is validated, the new collection computed and written
    /// to disk before the session changes. On error, the store is untouched.
    pub fn import(&mut self, mode: ImportMode, raw: &[u8]) -> Result<ImportSummary, ImportError> {
        let incoming = import::parse(raw)?;
        let received = incoming.len();
        let kept = match mode {
            ImportMode::Replace => 0,
            ImportMode::Merge => self.books.len(),
        };

        let result = import::apply(mode, incoming, &self.books);
        self.persistence.save(&result)?;

        let summary = ImportSummary {
            mode,
            received,
            added: result.len() - kept,
            total: result.len(),
        };
        self.books = result;

        info!(
            "Imported {} books ({} mode, {} added)",
            summary.received, summary.mode, summary.added
        );
        Ok(summary)
    }

    /// Import a `.json` file from disk and save
    pub fn import_file(
        &mut self,
        mode: ImportMode,
        path: &Path,
    ) -> Result<ImportSummary, ImportError> {
        let raw = import::read_file(path)?;
        self.import(mode, &raw)
    }

    /// Pretty-printed JSON of the whole collection, for export
    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.books).context("Failed to serialize library")
    }

    /// Discard the in-memory collection and re-read the library file
    pub fn reload(&mut self) -> Result<()> {
        self.books = self
            .persistence
            .load()
            .context("Failed to reload library")?;
        Ok(())
    }

    /// Write `next` to disk, then make it the session collection
    fn commit(&mut self, next: Vec<Book>) -> Result<()> {
        self.persistence
            .save(&next)
            .context("Failed to save library")?;
        self.books = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Genre;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config::with_data_dir(temp_dir.path())
    }

    fn dune() -> Book {
        Book::new("Dune", "Herbert", 1965, Genre::ScienceFiction, true)
    }

    fn orwell() -> Book {
        Book::new("1984", "Orwell", 1949, Genre::Fiction, false)
    }

    #[test]
    fn test_open_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        // Opening alone doesn't create the file
        assert!(!store.persistence().exists());
    }

    #[test]
    fn test_open_invalid_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        std::fs::write(config.library_path(), "not json").unwrap();

        assert!(Store::open_with_config(config.clone()).is_err());
        // File is left as it was
        assert_eq!(
            std::fs::read_to_string(config.library_path()).unwrap(),
            "not json"
        );
    }

    #[test]
    fn test_add_persists_immediately() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let mut store = Store::open_with_config(config.clone()).unwrap();

        store.add_book(dune()).unwrap();
        store.add_book(orwell()).unwrap();

        let reopened = Store::open_with_config(config).unwrap();
        assert_eq!(reopened.books().last(), Some(&orwell()));
        assert_eq!(reopened.books(), store.books());
    }

    #[test]
    fn test_remove_by_title_persists() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let mut store = Store::open_with_config(config.clone()).unwrap();

        let other_dune = Book::new("Dune", "Someone Else", 2001, Genre::Other, false);
        store.add_book(dune()).unwrap();
        store.add_book(orwell()).unwrap();
        store.add_book(other_dune).unwrap();

        let removed = store.remove_by_title("Dune").unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.books(), &[orwell()]);

        let reopened = Store::open_with_config(config).unwrap();
        assert_eq!(reopened.books(), &[orwell()]);
    }

    #[test]
    fn test_remove_missing_title_still_saves() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        assert!(!store.persistence().exists());
        assert_eq!(store.remove_by_title("Nothing").unwrap(), 0);
        assert!(store.persistence().exists());
    }

    #[test]
    fn test_failed_save_keeps_previous_collection() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let mut store = Store::open_with_config(config.clone()).unwrap();

        // A directory where the temp file goes makes every save fail
        let blocker = config.library_path().with_extension("json.tmp");
        std::fs::create_dir(&blocker).unwrap();

        assert!(store.add_book(dune()).is_err());
        assert!(store.add_book(dune()).is_err());
        assert!(store.is_empty());

        std::fs::remove_dir(&blocker).unwrap();
        store.add_book(dune()).unwrap();
        assert_eq!(store.books(), &[dune()]);

        let reopened = Store::open_with_config(config.clone()).unwrap();
        assert_eq!(reopened.books(), &[dune()]);

        std::fs::create_dir(&blocker).unwrap();
        assert!(store.remove_by_title("Dune").is_err());
        assert_eq!(store.books(), &[dune()]);
        let reopened = Store::open_with_config(config).unwrap();
        assert_eq!(reopened.books(), &[dune()]);
    }

    #[test]
    fn test_search_and_titles() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();
        store.add_book(dune()).unwrap();
        store.add_book(orwell()).unwrap();

        assert_eq!(store.search("ORWELL"), vec![orwell()]);
        assert_eq!(store.search("science"), vec![dune()]);
        assert_eq!(store.titles(), vec!["Dune", "1984"]);
    }

    #[test]
    fn test_statistics() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        assert!(store.statistics().is_none());
        assert_eq!(store.summary().total, 0);

        store.add_book(dune()).unwrap();
        store.add_book(orwell()).unwrap();
        store
            .add_book(Book::new("Emma", "Austen", 1815, Genre::Romance, true))
            .unwrap();

        let stats = store.statistics().unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.read, 2);
        assert_eq!(stats.unread, 1);
        assert_eq!(stats.genre_histogram.get("Romance"), Some(&1));
    }

    #[test]
    fn test_import_merge_example() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let mut store = Store::open_with_config(config.clone()).unwrap();
        store.add_book(dune()).unwrap();

        let raw = br#"[
            {"title": "Dune", "author": "Herbert", "year": 1965, "genre": "Science Fiction", "read": false},
            {"title": "1984", "author": "Orwell", "year": 1949, "genre": "Fiction", "read": false}
        ]"#;

        let summary = store.import(ImportMode::Merge, raw).unwrap();

        assert_eq!(summary.received, 2);
        assert_eq!(summary.added, 1);
        assert_eq!(summary.total, 2);
        assert_eq!(store.books(), &[dune(), orwell()]);
        assert!(store.books()[0].read);

        let reopened = Store::open_with_config(config).unwrap();
        assert_eq!(reopened.books(), store.books());
    }

    #[test]
    fn test_import_replace() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();
        store.add_book(dune()).unwrap();

        let raw = serde_json::to_vec(&vec![orwell()]).unwrap();
        let summary = store.import(ImportMode::Replace, &raw).unwrap();

        assert_eq!(summary.added, 1);
        assert_eq!(store.books(), &[orwell()]);
    }

    #[test]
    fn test_import_failure_leaves_store_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let mut store = Store::open_with_config(config.clone()).unwrap();
        store.add_book(dune()).unwrap();

        let raw = br#"[
            {"title": "1984", "author": "Orwell", "year": 1949, "genre": "Fiction", "read": false},
            {"title": "No Author", "year": 2000, "genre": "Other", "read": false}
        ]"#;

        let err = store.import(ImportMode::Replace, raw).unwrap_err();
        assert!(matches!(err, ImportError::MissingField { index: 1, .. }));
        assert_eq!(store.books(), &[dune()]);

        let reopened = Store::open_with_config(config).unwrap();
        assert_eq!(reopened.books(), &[dune()]);
    }

    #[test]
    fn test_import_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        let path = temp_dir.path().join("incoming.json");
        std::fs::write(&path, serde_json::to_vec(&vec![dune(), orwell()]).unwrap()).unwrap();

        let summary = store.import_file(ImportMode::Merge, &path).unwrap();
        assert_eq!(summary.added, 2);
        assert_eq!(store.len(), 2);

        // Importing the same file again adds nothing
        let again = store.import_file(ImportMode::Merge, &path).unwrap();
        assert_eq!(again.received, 2);
        assert_eq!(again.added, 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_export_json_is_pretty_and_loadable() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();
        store.add_book(dune()).unwrap();

        let json = store.export_json().unwrap();
        assert!(json.contains("\n  {"));
        assert!(json.contains("\"genre\": \"Science Fiction\""));

        let parsed: Vec<Book> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, store.books());
    }

    #[test]
    fn test_reload_picks_up_external_edit() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let mut store = Store::open_with_config(config.clone()).unwrap();
        store.add_book(dune()).unwrap();

        // Another session writes the file
        let mut other = Store::open_with_config(config).unwrap();
        other.add_book(orwell()).unwrap();

        assert_eq!(store.len(), 1);
        store.reload().unwrap();
        assert_eq!(store.books(), &[dune(), orwell()]);
    }
}
