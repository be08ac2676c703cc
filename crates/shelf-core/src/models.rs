//! Data models for shelf
//!
//! Defines the book record and the closed genre set offered at entry time.
//! Records are stored exactly as they come in: the data layer does not
//! re-check `year` bounds or `genre` membership, so imported values survive.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Earliest publication year accepted by the entry surfaces
pub const MIN_YEAR: i32 = 1800;

/// A book in the collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    /// Book title (not unique)
    pub title: String,
    /// Author name
    pub author: String,
    /// Publication year
    pub year: i32,
    /// Genre label, free-form once stored
    pub genre: String,
    /// Whether the book has been read
    pub read: bool,
}

impl Book {
    /// Create a new book record
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        genre: impl Into<String>,
        read: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            genre: genre.into(),
            read,
        }
    }

    /// The `(title, author)` pair used to detect duplicates on merge import
    pub fn merge_key(&self) -> (&str, &str) {
        (&self.title, &self.author)
    }
}

/// Genres offered when entering a new book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Genre {
    Fiction,
    NonFiction,
    ScienceFiction,
    Mystery,
    Romance,
    #[default]
    Other,
}

impl Genre {
    /// All genres in selector order
    pub const ALL: [Genre; 6] = [
        Genre::Fiction,
        Genre::NonFiction,
        Genre::ScienceFiction,
        Genre::Mystery,
        Genre::Romance,
        Genre::Other,
    ];

    /// Canonical label, as written to storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Fiction => "Fiction",
            Genre::NonFiction => "Non-Fiction",
            Genre::ScienceFiction => "Science Fiction",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::Other => "Other",
        }
    }

    /// Next genre in selector order (wrapping)
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|g| *g == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous genre in selector order (wrapping)
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|g| *g == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a string is not one of the known genres
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown genre '{0}'. Valid genres: Fiction, Non-Fiction, Science Fiction, Mystery, Romance, Other")]
pub struct UnknownGenre(pub String);

impl FromStr for Genre {
    type Err = UnknownGenre;

    /// Accepts the label in any case, with spaces, dashes or underscores
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "fiction" => Ok(Genre::Fiction),
            "nonfiction" => Ok(Genre::NonFiction),
            "sciencefiction" | "scifi" => Ok(Genre::ScienceFiction),
            "mystery" => Ok(Genre::Mystery),
            "romance" => Ok(Genre::Romance),
            "other" => Ok(Genre::Other),
            _ => Err(UnknownGenre(s.to_string())),
        }
    }
}

impl From<Genre> for String {
    fn from(genre: Genre) -> Self {
        genre.as_str().to_string()
    }
}

/// Publication years accepted at entry time: 1800 through the current year
pub fn year_range() -> RangeInclusive<i32> {
    MIN_YEAR..=Utc::now().year()
}
