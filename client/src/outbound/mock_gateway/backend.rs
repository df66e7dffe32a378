//! Mock backend dispatch.
//!
//! [`MockBackend::handle`] answers one typed request synchronously. Handler
//! bodies live in sibling modules grouped by endpoint family; this module
//! owns the shared state, the access guards, and the envelope mapping.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use mockable::Clock;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::api::{ApiRequest, ApiResponse};
use crate::domain::{AuthorId, Error, Role, SessionError, SessionManager, User};

use super::CatalogueState;

/// Books per page when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 20;

pub(super) type HandlerResult = Result<Reply, Error>;

/// Successful handler output before it is wrapped in an envelope.
#[derive(Debug, Default)]
pub(super) struct Reply {
    data: Option<Value>,
    message: Option<String>,
}

impl Reply {
    pub(super) fn data<T: Serialize>(value: &T) -> Result<Self, Error> {
        let data = serde_json::to_value(value)
            .map_err(|err| Error::internal(format!("failed to encode response data: {err}")))?;
        Ok(Self {
            data: Some(data),
            message: None,
        })
    }

    pub(super) fn message(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: Some(message.into()),
        }
    }

    pub(super) fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// In-process stand-in for the platform backend.
pub struct MockBackend {
    pub(super) session: Arc<SessionManager>,
    pub(super) clock: Arc<dyn Clock>,
    state: Mutex<CatalogueState>,
    pub(super) page_size: usize,
}

impl MockBackend {
    /// Backend serving `catalogue` and writing logins into `session`.
    pub fn new(session: Arc<SessionManager>, clock: Arc<dyn Clock>, catalogue: CatalogueState) -> Self {
        Self {
            session,
            clock,
            state: Mutex::new(catalogue),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the listing page size. Zero is treated as one.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Session manager shared with page code.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Copy of the current catalogue.
    pub fn snapshot(&self) -> CatalogueState {
        self.state().clone()
    }

    /// Answer `request`.
    pub fn handle(&self, request: ApiRequest) -> ApiResponse {
        let method = request.method();
        let endpoint = request.endpoint();
        match self.dispatch(request) {
            Ok(reply) => {
                debug!(%method, %endpoint, "mock request handled");
                ApiResponse::success(reply.data, reply.message)
            }
            Err(error) => {
                info!(
                    %method,
                    %endpoint,
                    code = ?error.code(),
                    message = error.message(),
                    "mock request rejected"
                );
                ApiResponse::failure(&error)
            }
        }
    }

    fn dispatch(&self, request: ApiRequest) -> HandlerResult {
        match request {
            ApiRequest::Login(login) => self.login(&login),
            ApiRequest::Register(form) => self.register(&form),
            ApiRequest::RegisterAuthor(form) => self.register_author(form),
            ApiRequest::Logout => Ok(self.logout()),
            ApiRequest::Profile => self.profile(),
            ApiRequest::ListBooks { page, category } => self.list_books(page, category.as_deref()),
            ApiRequest::HotBooks { limit } => self.hot_books(limit),
            ApiRequest::NewBooks { limit } => self.new_books(limit),
            ApiRequest::AuthorBooks => self.author_books(),
            ApiRequest::BookDetail { id } => self.book_detail(id),
            ApiRequest::SearchBooks { query, scope } => self.search_books(&query, scope),
            ApiRequest::AddBook(book) => self.add_book(book),
            ApiRequest::UpdateBook { id, update } => self.update_book(id, update),
            ApiRequest::ListChapters { book_id } => self.list_chapters(book_id),
            ApiRequest::ChapterContent {
                book_id,
                chapter_id,
            } => self.chapter_content(book_id, chapter_id),
            ApiRequest::AddChapter { book_id, chapter } => self.add_chapter(book_id, chapter),
            ApiRequest::UpdateChapter {
                book_id,
                chapter_id,
                update,
            } => self.update_chapter(book_id, chapter_id, update),
            ApiRequest::ListComments { book_id } => self.list_comments(book_id),
            ApiRequest::CreateComment { book_id, comment } => {
                self.create_comment(book_id, &comment)
            }
            ApiRequest::LikeComment { comment_id } => self.like_comment(comment_id),
            ApiRequest::ReadingProgress => self.reading_progress(),
            ApiRequest::SaveReadingProgress(update) => self.save_reading_progress(update),
            ApiRequest::ReadingHistory => self.reading_history(),
            ApiRequest::AdminUsers => self.admin_users(),
            ApiRequest::AdminBooks => self.admin_books(),
            ApiRequest::AdminStats => self.admin_stats(),
        }
    }

    pub(super) fn state(&self) -> MutexGuard<'_, CatalogueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }

    /// The signed-in user, or `unauthorized`.
    pub(super) fn require_user(&self) -> Result<User, Error> {
        self.session
            .current_user()
            .ok_or_else(|| Error::unauthorized(SessionError::NotLoggedIn.to_string()))
    }

    /// The signed-in author and their id, or `forbidden` with `message`.
    pub(super) fn require_author(&self, message: &str) -> Result<(User, AuthorId), Error> {
        let user = self.session.current_user().filter(|user| user.role == Role::Author);
        user.and_then(|user| user.author_id().map(|id| (user, id)))
            .ok_or_else(|| Error::forbidden(message))
    }

    /// Fails unless the persisted role is admin.
    pub(super) fn require_admin(&self) -> Result<(), Error> {
        if self.session.has_role(Role::Admin) {
            Ok(())
        } else {
            Err(Error::forbidden("no permission to access"))
        }
    }
}

/// Map a validation failure onto an `invalid_request` error.
pub(super) fn invalid(err: impl fmt::Display) -> Error {
    Error::invalid_request(err.to_string())
}

pub(super) fn session_error(err: SessionError) -> Error {
    match err {
        SessionError::NotLoggedIn => Error::unauthorized(err.to_string()),
        SessionError::Preferences(inner) => invalid(inner),
    }
}
