//! In-memory catalogue owned by the mock backend.

use std::collections::BTreeMap;

use crate::domain::{
    Book, BookId, Chapter, ChapterId, Comment, CommentId, HistoryEntry, UserId,
};

/// Books, chapters, comments, and reading history served by the mock backend.
///
/// ## Invariants
/// - Chapters of a book are kept in ascending id order.
/// - New ids are one past the largest id in use.
/// - Each login identifier maps to one user id for the backend's lifetime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogueState {
    pub(super) books: Vec<Book>,
    pub(super) chapters: BTreeMap<BookId, Vec<Chapter>>,
    pub(super) comments: Vec<Comment>,
    pub(super) history: Vec<HistoryEntry>,
    pub(super) accounts: BTreeMap<String, UserId>,
}

impl CatalogueState {
    /// Catalogue holding `books` and their `chapters`.
    pub fn new(books: Vec<Book>, chapters: impl IntoIterator<Item = Chapter>) -> Self {
        let mut by_book: BTreeMap<BookId, Vec<Chapter>> =
            books.iter().map(|book| (book.id, Vec::new())).collect();
        for chapter in chapters {
            by_book.entry(chapter.book_id).or_default().push(chapter);
        }
        for list in by_book.values_mut() {
            list.sort_by_key(|chapter| chapter.id);
        }
        Self {
            books,
            chapters: by_book,
            comments: Vec::new(),
            history: Vec::new(),
            accounts: BTreeMap::new(),
        }
    }

    /// Every book in the catalogue.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// The book with `id`, if any.
    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Chapters of `book`, empty for unknown books.
    pub fn chapters(&self, book: BookId) -> &[Chapter] {
        self.chapters.get(&book).map_or(&[], Vec::as_slice)
    }

    /// Every comment, oldest first.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Reading history in insertion order.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Number of chapters across every book.
    pub fn chapter_total(&self) -> usize {
        self.chapters.values().map(Vec::len).sum()
    }

    /// Id of the account signing in as `identifier`, registering it on first use.
    pub(super) fn account_id(&mut self, identifier: &str) -> UserId {
        let next = UserId::new(u64::try_from(self.accounts.len()).unwrap_or(u64::MAX).saturating_add(1));
        *self.accounts.entry(identifier.to_owned()).or_insert(next)
    }

    pub(super) fn next_book_id(&self) -> BookId {
        let max = self.books.iter().map(|book| book.id.get()).max().unwrap_or(0);
        BookId::new(max.saturating_add(1))
    }

    pub(super) fn next_chapter_id(&self, book: BookId) -> ChapterId {
        let max = self
            .chapters(book)
            .iter()
            .map(|chapter| chapter.id.get())
            .max()
            .unwrap_or(0);
        ChapterId::new(max.saturating_add(1))
    }

    pub(super) fn next_comment_id(&self) -> CommentId {
        let max = self
            .comments
            .iter()
            .map(|comment| comment.id.get())
            .max()
            .unwrap_or(0);
        CommentId::new(max.saturating_add(1))
    }
}
