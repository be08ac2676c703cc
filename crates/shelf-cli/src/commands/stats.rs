//! Statistics command handler

use anyhow::Result;

use shelf_core::Store;

use crate::output::{Output, EMPTY_LIBRARY};

/// Show library statistics
pub fn show(store: &Store, output: &Output) -> Result<()> {
    match store.statistics() {
        Some(stats) => output.print_stats(&stats),
        None => output.warning(EMPTY_LIBRARY),
    }
    Ok(())
}
