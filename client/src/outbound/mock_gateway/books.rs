//! `/books` and `/author/books` handlers.

use std::cmp::Reverse;

use tracing::info;

use crate::api::{BookPage, Pagination, SearchResults};
use crate::domain::{AuthorId, Book, BookId, BookStatus, BookUpdate, Error, NewBook, SearchScope};

use super::backend::{HandlerResult, MockBackend, Reply, invalid};

/// Category values that mean "no filter".
const ALL_CATEGORIES: [&str; 3] = ["", "all", "全部"];
const DEFAULT_COVER: &str = "📚";

impl MockBackend {
    pub(super) fn list_books(&self, page: u32, category: Option<&str>) -> HandlerResult {
        let state = self.state();
        let filter = category
            .map(str::trim)
            .filter(|name| !ALL_CATEGORIES.contains(name));
        let matching: Vec<&Book> = state
            .books()
            .iter()
            .filter(|book| filter.is_none_or(|tag| book.tags.iter().any(|t| t == tag)))
            .collect();

        let page = page.max(1);
        let skip = usize::try_from(page - 1)
            .unwrap_or(usize::MAX)
            .saturating_mul(self.page_size);
        let books: Vec<Book> = matching
            .iter()
            .skip(skip)
            .take(self.page_size)
            .map(|book| (*book).clone())
            .collect();
        let pagination = Pagination {
            page,
            total: matching.len(),
            has_more: skip.saturating_add(books.len()) < matching.len(),
        };
        Reply::data(&BookPage { books, pagination })
    }

    pub(super) fn hot_books(&self, limit: usize) -> HandlerResult {
        let mut books = self.state().books().to_vec();
        books.sort_by_key(|book| Reverse(book.views));
        books.truncate(limit);
        Reply::data(&books)
    }

    pub(super) fn new_books(&self, limit: usize) -> HandlerResult {
        let mut books = self.state().books().to_vec();
        books.sort_by_key(|book| Reverse(book.updated_on));
        books.truncate(limit);
        Reply::data(&books)
    }

    pub(super) fn author_books(&self) -> HandlerResult {
        let (_, author_id) = self.require_author("no permission to access")?;
        let books: Vec<Book> = self
            .state()
            .books()
            .iter()
            .filter(|book| book.author_id == author_id)
            .cloned()
            .collect();
        Reply::data(&books)
    }

    pub(super) fn book_detail(&self, id: BookId) -> HandlerResult {
        let book = self
            .state()
            .book(id)
            .cloned()
            .ok_or_else(|| Error::not_found("book not found"))?;
        Reply::data(&book)
    }

    pub(super) fn search_books(&self, query: &str, scope: SearchScope) -> HandlerResult {
        let books: Vec<Book> = self
            .state()
            .books()
            .iter()
            .filter(|book| scope.matches(book, query))
            .cloned()
            .collect();
        let total = books.len();
        Reply::data(&SearchResults { books, total })
    }

    pub(super) fn add_book(&self, new_book: NewBook) -> HandlerResult {
        let (user, author_id) = self.require_author("no permission to add books")?;
        new_book.validate().map_err(invalid)?;

        let today = self.today();
        let mut guard = self.state();
        let state = &mut *guard;
        let book = Book {
            id: state.next_book_id(),
            title: new_book.title.trim().to_owned(),
            author_name: user
                .author
                .as_ref()
                .map_or_else(|| user.username.clone(), |profile| profile.pen_name.clone()),
            author_id,
            views: 0,
            rating: 0.0,
            word_count: 0,
            chapter_count: 0,
            description: new_book.description,
            tags: new_book.tags,
            cover: DEFAULT_COVER.to_owned(),
            status: BookStatus::Serializing,
            updated_on: today,
        };
        state.chapters.insert(book.id, Vec::new());
        state.books.push(book.clone());
        info!(book_id = %book.id, %author_id, "book added");
        Reply::data(&book).map(|reply| reply.with_message("book added"))
    }

    pub(super) fn update_book(&self, id: BookId, update: BookUpdate) -> HandlerResult {
        let (_, author_id) = self.require_author("no permission to modify books")?;
        let today = self.today();
        let mut state = self.state();
        let book = owned_book(&mut state.books, id, author_id)?;
        update.apply(book).map_err(invalid)?;
        book.updated_on = today;
        info!(book_id = %id, "book updated");
        Reply::data(&*book).map(|reply| reply.with_message("book updated"))
    }
}

/// The book `id` if `author` owns it.
pub(super) fn owned_book(
    books: &mut [Book],
    id: BookId,
    author: AuthorId,
) -> Result<&mut Book, Error> {
    books
        .iter_mut()
        .find(|book| book.id == id && book.author_id == author)
        .ok_or_else(|| Error::forbidden("book not found or no permission to modify"))
}
