//! shelf core library
//!
//! This crate provides the core functionality for shelf, a single-user
//! catalog of the books you own and whether you've read them.
//!
//! # Architecture
//!
//! - **JSON file**: the whole collection, rewritten on every change
//! - **Store**: the in-memory collection for one session
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open()?;
//!
//! // Add a book
//! store.add_book(Book::new("Dune", "Frank Herbert", 1965, Genre::ScienceFiction, true))?;
//!
//! // Query books
//! let hits = store.search("dune");
//! ```
//!
//! # Modules
//!
//! - `store`: Session store (main entry point)
//! - `models`: Book record and genres
//! - `library`: Add, remove and search over a collection
//! - `stats`: Counters and genre histogram
//! - `import`: Import file validation and replace/merge
//! - `storage`: Library file persistence
//! - `config`: Application configuration

pub mod config;
pub mod import;
pub mod library;
pub mod models;
pub mod stats;
pub mod storage;
pub mod store;

pub use config::Config;
pub use import::{ImportError, ImportMode, ImportSummary};
pub use models::{year_range, Book, Genre, UnknownGenre};
pub use stats::{Statistics, Summary};
pub use storage::{JsonPersistence, StorageError, StorageResult};
pub use store::Store;
