//! Generated catalogue seed types.
//!
//! These types are deliberately independent of the client's domain model so
//! that the fixture crate carries no dependency on it.

use serde::{Deserialize, Serialize};

/// Publication status of a generated book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatusSeed {
    /// New chapters are still being published.
    #[default]
    Serializing,
    /// The book is finished.
    Completed,
}

/// A generated chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSeed {
    /// One-based chapter number within its book.
    pub id: u32,
    /// Display title including the Chinese chapter numeral.
    pub title: String,
    /// Publication age in days relative to the generation date.
    pub days_ago: u32,
    /// Character count shown to readers.
    pub word_count: u32,
    /// Body paragraphs.
    pub paragraphs: Vec<String>,
}

/// A generated book with its chapters.
///
/// # Example
///
/// ```
/// use catalogue_fixtures::{BookSeed, BookStatusSeed};
///
/// let book = BookSeed {
///     id: 1,
///     title: "星穹传说".to_owned(),
///     author_name: "Ada Lovelace".to_owned(),
///     author_id: "100000001".to_owned(),
///     views: 2_458_000,
///     rating_tenths: 89,
///     word_count: 320,
///     chapter_count: 1205,
///     description: "A journey across the stars.".to_owned(),
///     tags: vec!["玄幻".to_owned()],
///     cover: "📚".to_owned(),
///     status: BookStatusSeed::Serializing,
///     updated_days_ago: 3,
///     chapters: vec![],
/// };
///
/// assert_eq!(book.title, "星穹传说");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSeed {
    /// One-based book identifier.
    pub id: u64,
    /// Unique book title.
    pub title: String,
    /// Author pen name.
    pub author_name: String,
    /// Nine-digit author identifier.
    pub author_id: String,
    /// Lifetime view count.
    pub views: u64,
    /// Rating in tenths of a point (89 means 8.9).
    pub rating_tenths: u8,
    /// Total length in units of ten thousand characters.
    pub word_count: u32,
    /// Chapter count advertised for the book; may exceed `chapters.len()`.
    pub chapter_count: u32,
    /// Blurb shown on the detail page.
    pub description: String,
    /// Category tags drawn from the registry.
    pub tags: Vec<String>,
    /// Single-glyph cover.
    pub cover: String,
    /// Publication status.
    pub status: BookStatusSeed,
    /// Age of the latest update in days.
    pub updated_days_ago: u32,
    /// Generated chapters, capped by the seed definition.
    pub chapters: Vec<ChapterSeed>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_serializing() {
        assert_eq!(BookStatusSeed::default(), BookStatusSeed::Serializing);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&BookStatusSeed::Completed).expect("serialize");
        assert_eq!(json, "\"completed\"");
    }
}
