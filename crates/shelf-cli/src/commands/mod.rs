//! Command handlers

pub mod book;
pub mod config;
pub mod stats;
pub mod transfer;

use anyhow::Result;
use shelf_core::{Config, StorageError, Store};

/// Open the library, printing a hint when the storage error has one
pub fn open_store(config: Config) -> Result<Store> {
    Store::open_with_config(config).inspect_err(|e| {
        if let Some(hint) = e
            .downcast_ref::<StorageError>()
            .and_then(StorageError::recovery_suggestion)
        {
            eprintln!("Hint: {}", hint);
        }
    })
}
