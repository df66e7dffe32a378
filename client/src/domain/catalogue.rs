//! Books, chapters, and comments served by the mock backend.
//!
//! The catalogue is owned by the gateway; page code only sees these values in
//! response payloads. Inputs (`NewBook`, `BookUpdate`, ...) are validated
//! before the backend mutates its state.

use std::fmt;
use std::str::FromStr;

use catalogue_fixtures::{is_valid_title, TITLE_MAX, TITLE_MIN};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{AuthorId, ProgressPercent, UserId};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw identifier.
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Raw identifier value.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }
    };
}

define_id!(
    /// Book identifier.
    BookId
);
define_id!(
    /// Chapter identifier, unique within its book.
    ChapterId
);
define_id!(
    /// Comment identifier.
    CommentId
);

/// Publication status of a book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    /// Chapters are still being published.
    #[default]
    Serializing,
    /// The book is finished.
    Completed,
}

/// A book in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Catalogue id.
    pub id: BookId,
    /// Display title.
    pub title: String,
    /// Author pen name.
    pub author_name: String,
    /// Owning author.
    pub author_id: AuthorId,
    /// Total reads.
    pub views: u64,
    /// Score out of ten with one decimal place.
    pub rating: f32,
    /// Length in units of ten thousand characters.
    pub word_count: u32,
    /// Published chapters.
    pub chapter_count: u32,
    /// Blurb.
    pub description: String,
    /// Category tags.
    pub tags: Vec<String>,
    /// Cover image path.
    pub cover: String,
    /// Publication status.
    pub status: BookStatus,
    /// Date of the latest change.
    pub updated_on: NaiveDate,
}

/// A chapter including its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Chapter id within the book.
    pub id: ChapterId,
    /// Owning book.
    pub book_id: BookId,
    /// Chapter title.
    pub title: String,
    /// Publication date.
    pub published_on: NaiveDate,
    /// Characters in the body.
    pub word_count: u32,
    /// Body paragraphs.
    pub content: Vec<String>,
}

impl Chapter {
    /// Listing entry without the body.
    pub fn summary(&self) -> ChapterSummary {
        ChapterSummary {
            id: self.id,
            title: self.title.clone(),
            published_on: self.published_on,
            word_count: self.word_count,
        }
    }
}

/// Chapter listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSummary {
    /// Chapter id within the book.
    pub id: ChapterId,
    /// Chapter title.
    pub title: String,
    /// Publication date.
    pub published_on: NaiveDate,
    /// Characters in the body.
    pub word_count: u32,
}

/// A chapter together with its neighbours for reader navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterView {
    /// The requested chapter.
    pub chapter: Chapter,
    /// Chapter before it, if any.
    pub previous: Option<ChapterId>,
    /// Chapter after it, if any.
    pub next: Option<ChapterId>,
}

/// A reader comment on a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment id.
    pub id: CommentId,
    /// Book commented on.
    pub book_id: BookId,
    /// Author of the comment.
    pub user_id: UserId,
    /// Display name of the author.
    pub username: String,
    /// Comment text.
    pub content: String,
    /// Like count.
    pub likes: u32,
    /// Posting time.
    pub created_at: DateTime<Utc>,
}

/// One entry of the reading history, newest first when listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Reader who saved the progress.
    pub user_id: UserId,
    /// Book read.
    pub book_id: BookId,
    /// Chapter read.
    pub chapter_id: ChapterId,
    /// Percent of the chapter read.
    pub progress: ProgressPercent,
    /// When the progress was saved.
    pub timestamp: DateTime<Utc>,
}

/// Fields searched by a catalogue query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// Title, author, tags, and description.
    #[default]
    All,
    /// Titles only.
    Title,
    /// Author pen names only.
    Author,
    /// Category tags only.
    Tag,
}

impl SearchScope {
    /// Query-string representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Title => "title",
            Self::Author => "author",
            Self::Tag => "tag",
        }
    }

    /// Case-insensitive substring match of `query` against `book`.
    ///
    /// A blank query matches nothing.
    pub fn matches(self, book: &Book, query: &str) -> bool {
        if query.trim().is_empty() {
            return false;
        }
        let needle = query.to_lowercase();
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);
        let in_tags = || book.tags.iter().any(|tag| contains(tag.as_str()));

        match self {
            Self::Title => contains(&book.title),
            Self::Author => contains(&book.author_name),
            Self::Tag => in_tags(),
            Self::All => {
                contains(&book.title)
                    || contains(&book.author_name)
                    || in_tags()
                    || contains(&book.description)
            }
        }
    }
}

impl FromStr for SearchScope {
    type Err = CatalogueValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(Self::All),
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "tag" => Ok(Self::Tag),
            other => Err(CatalogueValidationError::UnknownScope {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation failures for catalogue inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogueValidationError {
    /// The book title length is out of range.
    #[error("book title must be between {min} and {max} characters")]
    InvalidTitle {
        /// Shortest accepted title.
        min: usize,
        /// Longest accepted title.
        max: usize,
    },
    /// The chapter title is blank.
    #[error("chapter title must not be empty")]
    EmptyChapterTitle,
    /// The chapter has no text.
    #[error("chapter content must not be empty")]
    EmptyChapterContent,
    /// The comment is blank.
    #[error("comment must not be empty")]
    EmptyComment,
    /// The search scope is not one of the known names.
    #[error("unknown search scope: {value}")]
    UnknownScope {
        /// Scope that was given.
        value: String,
    },
}

/// Payload for publishing a new book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    /// Title, 2 to 30 characters.
    pub title: String,
    /// Blurb.
    #[serde(default)]
    pub description: String,
    /// Category tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewBook {
    /// Check the title against the publishing rules.
    pub fn validate(&self) -> Result<(), CatalogueValidationError> {
        validate_title(&self.title)
    }
}

/// Partial update applied to an existing book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdate {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New blurb.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replacement tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// New publication status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookStatus>,
}

impl BookUpdate {
    /// Validate then merge the present fields into `book`.
    pub fn apply(self, book: &mut Book) -> Result<(), CatalogueValidationError> {
        if let Some(title) = self.title.as_deref() {
            validate_title(title)?;
        }
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(description) = self.description {
            book.description = description;
        }
        if let Some(tags) = self.tags {
            book.tags = tags;
        }
        if let Some(status) = self.status {
            book.status = status;
        }
        Ok(())
    }
}

/// Payload for publishing a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChapter {
    /// Chapter title.
    pub title: String,
    /// Body paragraphs.
    pub content: Vec<String>,
}

impl NewChapter {
    /// Reject blank titles and empty bodies.
    pub fn validate(&self) -> Result<(), CatalogueValidationError> {
        if self.title.trim().is_empty() {
            return Err(CatalogueValidationError::EmptyChapterTitle);
        }
        if self.content.iter().all(|p| p.trim().is_empty()) {
            return Err(CatalogueValidationError::EmptyChapterContent);
        }
        Ok(())
    }
}

/// Partial update applied to an existing chapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterUpdate {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Replacement body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<String>>,
}

impl ChapterUpdate {
    /// Validate then merge the present fields into `chapter`.
    pub fn apply(self, chapter: &mut Chapter) -> Result<(), CatalogueValidationError> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(CatalogueValidationError::EmptyChapterTitle);
        }
        if self
            .content
            .as_ref()
            .is_some_and(|c| c.iter().all(|p| p.trim().is_empty()))
        {
            return Err(CatalogueValidationError::EmptyChapterContent);
        }
        if let Some(title) = self.title {
            chapter.title = title;
        }
        if let Some(content) = self.content {
            chapter.word_count = count_characters(&content);
            chapter.content = content;
        }
        Ok(())
    }
}

/// Payload for posting a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    /// Comment text.
    pub content: String,
}

impl NewComment {
    /// Reject blank comments.
    pub fn validate(&self) -> Result<(), CatalogueValidationError> {
        if self.content.trim().is_empty() {
            return Err(CatalogueValidationError::EmptyComment);
        }
        Ok(())
    }
}

/// Character count of a chapter body.
pub fn count_characters(paragraphs: &[String]) -> u32 {
    let total: usize = paragraphs.iter().map(|p| p.chars().count()).sum();
    u32::try_from(total).unwrap_or(u32::MAX)
}

fn validate_title(title: &str) -> Result<(), CatalogueValidationError> {
    if is_valid_title(title) {
        Ok(())
    } else {
        Err(CatalogueValidationError::InvalidTitle {
            min: TITLE_MIN,
            max: TITLE_MAX,
        })
    }
}
