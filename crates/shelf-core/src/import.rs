//! Import and merge of uploaded library files
//!
//! An import runs in two steps, and both finish before the session is touched:
//!
//! 1. [`parse`] checks the whole document and turns it into books, or
//!    returns one [`ImportError`] naming the first bad record.
//! 2. [`apply`] computes the resulting collection from the mode, the
//!    incoming books and the current ones.
//!
//! Merge matches on `(title, author)` against the current collection only.
//! The existing record always wins; an incoming duplicate never updates it.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{Book, Genre};
use crate::storage::StorageError;

/// How incoming books combine with the current collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Discard the current collection and keep exactly the incoming books
    Replace,
    /// Keep the current collection and append incoming books with new merge keys
    #[default]
    Merge,
}

impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Replace => "replace",
            ImportMode::Merge => "merge",
        }
    }

    /// The other mode (for toggles)
    pub fn toggle(self) -> Self {
        match self {
            ImportMode::Replace => ImportMode::Merge,
            ImportMode::Merge => ImportMode::Replace,
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "replace" => Ok(ImportMode::Replace),
            "merge" => Ok(ImportMode::Merge),
            other => Err(format!(
                "Unknown import mode '{}'. Use 'replace' or 'merge'.",
                other
            )),
        }
    }
}

/// Why an import was rejected
#[derive(Error, Debug)]
pub enum ImportError {
    /// The import file could not be read
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file does not have a .json extension
    #[error("'{path}' is not a JSON file (expected a .json extension)")]
    NotJsonFile { path: PathBuf },

    /// The document is not valid JSON
    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document is valid JSON but not an array
    #[error("Expected a JSON array of books, found {found}")]
    NotAnArray { found: &'static str },

    /// A record lacks one of the merge key fields
    #[error("Book #{} is missing required field '{field}'", .index + 1)]
    MissingField { index: usize, field: &'static str },

    /// A record has the wrong shape
    #[error("Book #{} is invalid: {reason}", .index + 1)]
    InvalidRecord { index: usize, reason: String },

    /// The merged collection could not be saved
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Outcome of a committed import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub mode: ImportMode,
    /// Number of books in the imported document
    pub received: usize,
    /// Number of books that ended up added to the collection
    pub added: usize,
    /// Collection size after the import
    pub total: usize,
}

/// Read an import file, accepting only `.json` files
pub fn read_file(path: &Path) -> Result<Vec<u8>, ImportError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(ImportError::NotJsonFile {
            path: path.to_path_buf(),
        });
    }

    std::fs::read(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse and validate an uploaded document
pub fn parse(raw: &[u8]) -> Result<Vec<Book>, ImportError> {
    let document: Value = serde_json::from_slice(raw)?;

    let records = match document {
        Value::Array(records) => records,
        other => {
            return Err(ImportError::NotAnArray {
                found: json_kind(&other),
            })
        }
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| parse_record(index, record))
        .collect()
}

fn parse_record(index: usize, record: Value) -> Result<Book, ImportError> {
    let Some(fields) = record.as_object() else {
        return Err(ImportError::InvalidRecord {
            index,
            reason: format!("expected an object, found {}", json_kind(&record)),
        });
    };

    let title = required_text(index, fields, "title")?;
    let author = required_text(index, fields, "author")?;

    let invalid = |reason: String| ImportError::InvalidRecord { index, reason };

    // Only title and author are required; the rest fall back to defaults
    let year = match fields.get("year") {
        None | Some(Value::Null) => 0,
        Some(value) => whole_year(value)
            .ok_or_else(|| invalid(format!("year must be a whole number, found {}", value)))?,
    };
    let genre = match fields.get("genre") {
        None | Some(Value::Null) => Genre::Other.as_str().to_string(),
        Some(Value::String(genre)) => genre.clone(),
        Some(value) => return Err(invalid(format!("genre must be a string, found {}", value))),
    };
    let read = match fields.get("read") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(read)) => *read,
        Some(value) => return Err(invalid(format!("read must be true or false, found {}", value))),
    };

    Ok(Book::new(title, author, year, genre, read))
}

fn required_text(
    index: usize,
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<String, ImportError> {
    fields
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ImportError::MissingField { index, field })
}

/// Integers, or floats with no fractional part such as `1965.0`
fn whole_year(value: &Value) -> Option<i32> {
    let year = match value.as_i64() {
        Some(year) => year,
        None => {
            let year = value.as_f64().filter(|y| y.fract() == 0.0)?;
            if year.abs() > f64::from(i32::MAX) {
                return None;
            }
            year as i64
        }
    };
    i32::try_from(year).ok()
}

/// Combine incoming books with the current collection
pub fn apply(mode: ImportMode, incoming: Vec<Book>, current: &[Book]) -> Vec<Book> {
    match mode {
        ImportMode::Replace => incoming,
        ImportMode::Merge => {
            let existing: HashSet<(&str, &str)> = current.iter().map(Book::merge_key).collect();
            let new_books: Vec<Book> = incoming
                .into_iter()
                .filter(|b| !existing.contains(&b.merge_key()))
                .collect();

            let mut merged = current.to_vec();
            merged.extend(new_books);
            merged
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
