//! Collection statistics

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Book;

/// Read/unread counters, defined for any collection including an empty one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub total: usize,
    pub read: usize,
    pub unread: usize,
}

impl Summary {
    pub fn of(books: &[Book]) -> Self {
        let total = books.len();
        let read = books.iter().filter(|b| b.read).count();
        Self {
            total,
            read,
            unread: total - read,
        }
    }
}

/// Full statistics for a non-empty collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub read: usize,
    pub unread: usize,
    /// Number of books per genre label, sorted by label
    pub genre_histogram: BTreeMap<String, usize>,
}

impl Statistics {
    /// Compute statistics, or `None` for an empty collection
    pub fn compute(books: &[Book]) -> Option<Self> {
        if books.is_empty() {
            return None;
        }

        let Summary {
            total,
            read,
            unread,
        } = Summary::of(books);

        let mut genre_histogram = BTreeMap::new();
        for book in books {
            *genre_histogram.entry(book.genre.clone()).or_insert(0) += 1;
        }

        Some(Self {
            total,
            read,
            unread,
            genre_histogram,
        })
    }

    /// Histogram entries with the most common genre first (ties by label)
    pub fn genres_by_count(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<_> = self
            .genre_histogram
            .iter()
            .map(|(genre, count)| (genre.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(genre: &str, read: bool) -> Book {
        Book::new("T", "A", 2000, genre, read)
    }

    #[test]
    fn test_summary_empty() {
        assert_eq!(Summary::of(&[]), Summary::default());
    }

    #[test]
    fn test_statistics_empty_is_none() {
        assert!(Statistics::compute(&[]).is_none());
    }

    #[test]
    fn test_statistics_counts() {
        let books = vec![
            book("Fiction", true),
            book("Fiction", true),
            book("Mystery", false),
        ];

        let stats = Statistics::compute(&books).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.read, 2);
        assert_eq!(stats.unread, 1);
    }

    #[test]
    fn test_genre_histogram() {
        let books = vec![
            book("Mystery", false),
            book("Fiction", true),
            book("Poetry", false),
            book("Mystery", true),
        ];

        let stats = Statistics::compute(&books).unwrap();
        let histogram: Vec<_> = stats
            .genre_histogram
            .iter()
            .map(|(g, c)| (g.as_str(), *c))
            .collect();
        assert_eq!(
            histogram,
            vec![("Fiction", 1), ("Mystery", 2), ("Poetry", 1)]
        );
    }

    #[test]
    fn test_genres_by_count() {
        let books = vec![
            book("Romance", false),
            book("Mystery", false),
            book("Mystery", true),
            book("Fiction", true),
        ];

        let stats = Statistics::compute(&books).unwrap();
        assert_eq!(
            stats.genres_by_count(),
            vec![("Mystery", 2), ("Fiction", 1), ("Romance", 1)]
        );
    }

    #[test]
    fn test_summary_matches_statistics() {
        let books = vec![book("Fiction", true), book("Other", false)];
        let summary = Summary::of(&books);
        let stats = Statistics::compute(&books).unwrap();

        assert_eq!(summary.total, stats.total);
        assert_eq!(summary.read, stats.read);
        assert_eq!(summary.unread, stats.unread);
    }
}
