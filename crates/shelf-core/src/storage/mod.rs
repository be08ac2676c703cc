//! Storage layer
//!
//! Handles persistence of the library file.
//!
//! The whole collection lives in one JSON array on disk. It is read once
//! when a session opens and rewritten in full after every change.

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::JsonPersistence;
