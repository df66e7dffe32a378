//! Gateway facade used by page code.
//!
//! [`ApiClient`] is the single entry point for data access. Requests are
//! built through the namespaced sub-APIs ([`ApiClient::user`],
//! [`ApiClient::book`], ...) or parsed from an endpoint string with
//! [`ApiClient::request`].

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::domain::{
    AuthorRegistrationForm, BookId, BookUpdate, ChapterId, ChapterUpdate, CommentId,
    LoginCredentials, NewBook, NewChapter, NewComment, RegistrationForm, SearchScope, TraceId,
};

use super::{ApiRequest, ApiResponse, ApiTransport, GatewayError, LoginRequest, Method, ProgressUpdate};

type ApiResult = Result<ApiResponse, GatewayError>;

/// Cloneable handle over an [`ApiTransport`].
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn ApiTransport>,
}

impl ApiClient {
    /// Wrap a transport.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Parse `endpoint` and `data` into a typed request and send it.
    ///
    /// # Examples
    /// ```no_run
    /// # use flutterpage::api::{ApiClient, Method};
    /// # async fn demo(client: ApiClient) -> Result<(), flutterpage::api::GatewayError> {
    /// let response = client.request("/books/hot?limit=5", Method::Get, None).await?;
    /// assert!(response.success);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn request(&self, endpoint: &str, method: Method, data: Option<Value>) -> ApiResult {
        let request = ApiRequest::parse(method, endpoint, data)?;
        self.send(request).await
    }

    /// Send `request` inside a fresh trace scope.
    pub async fn send(&self, request: ApiRequest) -> ApiResult {
        let trace_id = TraceId::generate();
        let method = request.method();
        let endpoint = request.endpoint();
        TraceId::scope(trace_id, async move {
            debug!(%trace_id, %method, %endpoint, "gateway request");
            let response = self.transport.send(request).await?;
            debug!(%trace_id, success = response.success, "gateway response");
            Ok(response)
        })
        .await
    }

    /// Authentication and profile endpoints.
    pub fn user(&self) -> UserApi<'_> {
        UserApi { client: self }
    }

    /// Catalogue endpoints.
    pub fn book(&self) -> BookApi<'_> {
        BookApi { client: self }
    }

    /// Chapter endpoints.
    pub fn chapter(&self) -> ChapterApi<'_> {
        ChapterApi { client: self }
    }

    /// Comment endpoints.
    pub fn comment(&self) -> CommentApi<'_> {
        CommentApi { client: self }
    }

    /// Reading progress and history endpoints.
    pub fn reading(&self) -> ReadingApi<'_> {
        ReadingApi { client: self }
    }

    /// Administrator endpoints.
    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi { client: self }
    }
}

/// `/auth` and `/user` endpoints.
pub struct UserApi<'a> {
    client: &'a ApiClient,
}

impl UserApi<'_> {
    /// Log in with credentials already validated by the session manager.
    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult {
        let mut request = LoginRequest::new(
            credentials.identifier(),
            credentials.password(),
            credentials.role(),
        );
        request.uid = credentials.admin_uid().map(str::to_owned);
        self.client.send(ApiRequest::Login(request)).await
    }

    /// Submit a reader registration.
    pub async fn register(&self, form: RegistrationForm) -> ApiResult {
        self.client.send(ApiRequest::Register(form)).await
    }

    /// Submit an author registration.
    pub async fn register_author(&self, form: AuthorRegistrationForm) -> ApiResult {
        self.client.send(ApiRequest::RegisterAuthor(form)).await
    }

    /// End the session.
    pub async fn logout(&self) -> ApiResult {
        self.client.send(ApiRequest::Logout).await
    }

    /// The signed-in user's profile.
    pub async fn profile(&self) -> ApiResult {
        self.client.send(ApiRequest::Profile).await
    }
}

/// `/books` endpoints.
pub struct BookApi<'a> {
    client: &'a ApiClient,
}

impl BookApi<'_> {
    /// One page of books, optionally filtered by category tag.
    pub async fn list(&self, page: u32, category: Option<&str>) -> ApiResult {
        let request = ApiRequest::ListBooks {
            page,
            category: category.map(str::to_owned),
        };
        self.client.send(request).await
    }

    /// One book by id.
    pub async fn detail(&self, id: BookId) -> ApiResult {
        self.client.send(ApiRequest::BookDetail { id }).await
    }

    /// Search the catalogue within `scope`.
    pub async fn search(&self, query: &str, scope: SearchScope) -> ApiResult {
        let request = ApiRequest::SearchBooks {
            query: query.to_owned(),
            scope,
        };
        self.client.send(request).await
    }

    /// Most viewed books.
    pub async fn hot(&self, limit: usize) -> ApiResult {
        self.client.send(ApiRequest::HotBooks { limit }).await
    }

    /// Most recently updated books.
    pub async fn newest(&self, limit: usize) -> ApiResult {
        self.client.send(ApiRequest::NewBooks { limit }).await
    }

    /// Publish a new book as the signed-in author.
    pub async fn add(&self, book: NewBook) -> ApiResult {
        self.client.send(ApiRequest::AddBook(book)).await
    }

    /// Edit a book the signed-in author owns.
    pub async fn update(&self, id: BookId, update: BookUpdate) -> ApiResult {
        self.client.send(ApiRequest::UpdateBook { id, update }).await
    }

    /// Books owned by the signed-in author.
    pub async fn by_author(&self) -> ApiResult {
        self.client.send(ApiRequest::AuthorBooks).await
    }
}

/// `/books/{id}/chapters` endpoints.
pub struct ChapterApi<'a> {
    client: &'a ApiClient,
}

impl ChapterApi<'_> {
    /// Chapter summaries of a book.
    pub async fn list(&self, book_id: BookId) -> ApiResult {
        self.client.send(ApiRequest::ListChapters { book_id }).await
    }

    /// Chapter body plus previous and next chapter ids.
    pub async fn content(&self, book_id: BookId, chapter_id: ChapterId) -> ApiResult {
        let request = ApiRequest::ChapterContent {
            book_id,
            chapter_id,
        };
        self.client.send(request).await
    }

    /// Append a chapter to an owned book.
    pub async fn add(&self, book_id: BookId, chapter: NewChapter) -> ApiResult {
        self.client
            .send(ApiRequest::AddChapter { book_id, chapter })
            .await
    }

    /// Edit a chapter of an owned book.
    pub async fn update(
        &self,
        book_id: BookId,
        chapter_id: ChapterId,
        update: ChapterUpdate,
    ) -> ApiResult {
        let request = ApiRequest::UpdateChapter {
            book_id,
            chapter_id,
            update,
        };
        self.client.send(request).await
    }
}

/// Comment endpoints.
pub struct CommentApi<'a> {
    client: &'a ApiClient,
}

impl CommentApi<'_> {
    /// Comments on a book, newest first.
    pub async fn list(&self, book_id: BookId) -> ApiResult {
        self.client.send(ApiRequest::ListComments { book_id }).await
    }

    /// Post a comment as the signed-in user.
    pub async fn create(&self, book_id: BookId, comment: NewComment) -> ApiResult {
        self.client
            .send(ApiRequest::CreateComment { book_id, comment })
            .await
    }

    /// Like a comment.
    pub async fn like(&self, comment_id: CommentId) -> ApiResult {
        self.client.send(ApiRequest::LikeComment { comment_id }).await
    }
}

/// `/reading` endpoints.
pub struct ReadingApi<'a> {
    client: &'a ApiClient,
}

impl ReadingApi<'_> {
    /// Reading progress of the signed-in user.
    pub async fn progress(&self) -> ApiResult {
        self.client.send(ApiRequest::ReadingProgress).await
    }

    /// Record progress through a chapter.
    pub async fn save_progress(
        &self,
        book_id: BookId,
        chapter_id: ChapterId,
        progress: u32,
    ) -> ApiResult {
        let update = ProgressUpdate {
            book_id,
            chapter_id,
            progress,
        };
        self.client
            .send(ApiRequest::SaveReadingProgress(update))
            .await
    }

    /// Reading history of the signed-in user, newest first.
    pub async fn history(&self) -> ApiResult {
        self.client.send(ApiRequest::ReadingHistory).await
    }
}

/// `/admin` endpoints.
pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl AdminApi<'_> {
    /// User statistics.
    pub async fn users(&self) -> ApiResult {
        self.client.send(ApiRequest::AdminUsers).await
    }

    /// Book counts by status.
    pub async fn books(&self) -> ApiResult {
        self.client.send(ApiRequest::AdminBooks).await
    }

    /// Aggregate catalogue statistics.
    pub async fn stats(&self) -> ApiResult {
        self.client.send(ApiRequest::AdminStats).await
    }
}
