//! Typed gateway requests.
//!
//! Every endpoint the page code may call is one [`ApiRequest`] variant. A
//! request renders its REST-shaped endpoint string with path parameters
//! substituted, and [`ApiRequest::parse`] turns such a string (plus an
//! optional JSON body) back into the typed value. Anything that matches no
//! variant is a [`GatewayError::UnhandledRoute`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;
use url::form_urlencoded;

use crate::domain::{
    AuthorRegistrationForm, BookId, BookUpdate, ChapterId, ChapterUpdate, CommentId, NewBook,
    NewChapter, NewComment, RegistrationForm, Role, SearchScope,
};

use super::GatewayError;

const GATEWAY_BASE: &str = "mock://gateway/";

/// HTTP-style verb of a gateway request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Read.
    Get,
    /// Create or act.
    Post,
    /// Update.
    Put,
}

impl Method {
    /// Upper-case verb.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for verbs the gateway does not speak.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported method: {0}")]
pub struct ParseMethodError(String);

impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            _ => Err(ParseMethodError(s.to_owned())),
        }
    }
}

/// Login form as sent to `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username or email.
    #[serde(default)]
    pub identifier: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
    /// Role to sign in as.
    #[serde(default = "reader")]
    pub role: Role,
    /// Administrator UID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

const fn reader() -> Role {
    Role::Reader
}

impl LoginRequest {
    /// Login as `role` without an admin UID.
    pub fn new(identifier: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
            role,
            uid: None,
        }
    }

    /// Attach an administrator UID.
    #[must_use]
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }
}

/// Body of `POST /reading/progress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    /// Book being read.
    pub book_id: BookId,
    /// Chapter being read.
    pub chapter_id: ChapterId,
    /// Percent read, 0 to 100.
    pub progress: u32,
}

/// Every request the mock gateway understands.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    /// `POST /auth/login`.
    Login(LoginRequest),
    /// `POST /auth/register`.
    Register(RegistrationForm),
    /// `POST /auth/register/author`.
    RegisterAuthor(AuthorRegistrationForm),
    /// `POST /auth/logout`.
    Logout,
    /// `GET /user/profile`.
    Profile,
    /// `GET /books`.
    ListBooks {
        /// One-based page number.
        page: u32,
        /// Category tag filter; `all` or absent lists everything.
        category: Option<String>,
    },
    /// `GET /books/hot`.
    HotBooks {
        /// Maximum number of books.
        limit: usize,
    },
    /// `GET /books/new`.
    NewBooks {
        /// Maximum number of books.
        limit: usize,
    },
    /// `GET /author/books`.
    AuthorBooks,
    /// `GET /books/{id}`.
    BookDetail {
        /// Book to fetch.
        id: BookId,
    },
    /// `GET /books/search`.
    SearchBooks {
        /// Search text.
        query: String,
        /// Fields searched.
        scope: SearchScope,
    },
    /// `POST /books`.
    AddBook(NewBook),
    /// `PUT /books/{id}`.
    UpdateBook {
        /// Book to edit.
        id: BookId,
        /// Fields to change.
        update: BookUpdate,
    },
    /// `GET /books/{bookId}/chapters`.
    ListChapters {
        /// Book whose chapters are listed.
        book_id: BookId,
    },
    /// `GET /books/{bookId}/chapters/{chapterId}`.
    ChapterContent {
        /// Book holding the chapter.
        book_id: BookId,
        /// Chapter to read.
        chapter_id: ChapterId,
    },
    /// `POST /books/{bookId}/chapters`.
    AddChapter {
        /// Book receiving the chapter.
        book_id: BookId,
        /// Chapter to append.
        chapter: NewChapter,
    },
    /// `PUT /books/{bookId}/chapters/{chapterId}`.
    UpdateChapter {
        /// Book holding the chapter.
        book_id: BookId,
        /// Chapter to edit.
        chapter_id: ChapterId,
        /// Fields to change.
        update: ChapterUpdate,
    },
    /// `GET /books/{bookId}/comments`.
    ListComments {
        /// Book whose comments are listed.
        book_id: BookId,
    },
    /// `POST /books/{bookId}/comments`.
    CreateComment {
        /// Book being commented on.
        book_id: BookId,
        /// Comment to post.
        comment: NewComment,
    },
    /// `POST /comments/{commentId}/like`.
    LikeComment {
        /// Comment being liked.
        comment_id: CommentId,
    },
    /// `GET /reading/progress`.
    ReadingProgress,
    /// `POST /reading/progress`.
    SaveReadingProgress(ProgressUpdate),
    /// `GET /reading/history`.
    ReadingHistory,
    /// `GET /admin/users`.
    AdminUsers,
    /// `GET /admin/books`.
    AdminBooks,
    /// `GET /admin/stats`.
    AdminStats,
}

impl ApiRequest {
    /// Verb of the request.
    pub const fn method(&self) -> Method {
        match self {
            Self::Login(_)
            | Self::Register(_)
            | Self::RegisterAuthor(_)
            | Self::Logout
            | Self::AddBook(_)
            | Self::AddChapter { .. }
            | Self::CreateComment { .. }
            | Self::LikeComment { .. }
            | Self::SaveReadingProgress(_) => Method::Post,
            Self::UpdateBook { .. } | Self::UpdateChapter { .. } => Method::Put,
            Self::Profile
            | Self::ListBooks { .. }
            | Self::HotBooks { .. }
            | Self::NewBooks { .. }
            | Self::AuthorBooks
            | Self::BookDetail { .. }
            | Self::SearchBooks { .. }
            | Self::ListChapters { .. }
            | Self::ChapterContent { .. }
            | Self::ListComments { .. }
            | Self::ReadingProgress
            | Self::ReadingHistory
            | Self::AdminUsers
            | Self::AdminBooks
            | Self::AdminStats => Method::Get,
        }
    }

    /// Endpoint path with parameters substituted and query string appended.
    ///
    /// # Examples
    /// ```
    /// use flutterpage::api::ApiRequest;
    /// use flutterpage::domain::{BookId, ChapterId};
    ///
    /// let request = ApiRequest::ChapterContent {
    ///     book_id: BookId::new(42),
    ///     chapter_id: ChapterId::new(7),
    /// };
    /// assert_eq!(request.endpoint(), "/books/42/chapters/7");
    /// ```
    pub fn endpoint(&self) -> String {
        match self {
            Self::Login(_) => "/auth/login".to_owned(),
            Self::Register(_) => "/auth/register".to_owned(),
            Self::RegisterAuthor(_) => "/auth/register/author".to_owned(),
            Self::Logout => "/auth/logout".to_owned(),
            Self::Profile => "/user/profile".to_owned(),
            Self::ListBooks { page, category } => {
                let mut query = form_urlencoded::Serializer::new(String::new());
                query.append_pair("page", &page.to_string());
                if let Some(category) = category {
                    query.append_pair("category", category);
                }
                format!("/books?{}", query.finish())
            }
            Self::HotBooks { limit } => format!("/books/hot?limit={limit}"),
            Self::NewBooks { limit } => format!("/books/new?limit={limit}"),
            Self::AuthorBooks => "/author/books".to_owned(),
            Self::BookDetail { id } | Self::UpdateBook { id, .. } => format!("/books/{id}"),
            Self::SearchBooks { query, scope } => {
                let encoded = form_urlencoded::Serializer::new(String::new())
                    .append_pair("q", query)
                    .append_pair("scope", scope.as_str())
                    .finish();
                format!("/books/search?{encoded}")
            }
            Self::AddBook(_) => "/books".to_owned(),
            Self::ListChapters { book_id } | Self::AddChapter { book_id, .. } => {
                format!("/books/{book_id}/chapters")
            }
            Self::ChapterContent {
                book_id,
                chapter_id,
            }
            | Self::UpdateChapter {
                book_id,
                chapter_id,
                ..
            } => format!("/books/{book_id}/chapters/{chapter_id}"),
            Self::ListComments { book_id } | Self::CreateComment { book_id, .. } => {
                format!("/books/{book_id}/comments")
            }
            Self::LikeComment { comment_id } => format!("/comments/{comment_id}/like"),
            Self::ReadingProgress | Self::SaveReadingProgress(_) => "/reading/progress".to_owned(),
            Self::ReadingHistory => "/reading/history".to_owned(),
            Self::AdminUsers => "/admin/users".to_owned(),
            Self::AdminBooks => "/admin/books".to_owned(),
            Self::AdminStats => "/admin/stats".to_owned(),
        }
    }

    /// JSON body, for requests that carry one.
    pub fn body(&self) -> Option<Value> {
        let value = match self {
            Self::Login(login) => serde_json::to_value(login),
            Self::Register(form) => serde_json::to_value(form),
            Self::RegisterAuthor(form) => serde_json::to_value(form),
            Self::AddBook(book) => serde_json::to_value(book),
            Self::UpdateBook { update, .. } => serde_json::to_value(update),
            Self::AddChapter { chapter, .. } => serde_json::to_value(chapter),
            Self::UpdateChapter { update, .. } => serde_json::to_value(update),
            Self::CreateComment { comment, .. } => serde_json::to_value(comment),
            Self::SaveReadingProgress(update) => serde_json::to_value(update),
            _ => return None,
        };
        value.ok()
    }

    /// Parse an endpoint string and optional body into a typed request.
    ///
    /// For `GET` requests, string and number fields of a JSON object `data`
    /// fill query parameters the endpoint does not already carry.
    ///
    /// # Examples
    /// ```
    /// use flutterpage::api::{ApiRequest, GatewayError, Method};
    ///
    /// let request = ApiRequest::parse(Method::Get, "/books/search?q=dragon", None)
    ///     .expect("known route");
    /// assert!(matches!(request, ApiRequest::SearchBooks { .. }));
    ///
    /// let err = ApiRequest::parse(Method::Get, "/books/999/nonexistent", None)
    ///     .expect_err("unknown route");
    /// assert!(matches!(err, GatewayError::UnhandledRoute { .. }));
    /// ```
    pub fn parse(method: Method, endpoint: &str, data: Option<Value>) -> Result<Self, GatewayError> {
        let raw_path = endpoint.split(['?', '#']).next().unwrap_or_default();
        if raw_path.split('/').any(is_dot_segment) {
            return Err(GatewayError::UnhandledRoute {
                method,
                endpoint: endpoint.to_owned(),
            });
        }
        let url = Url::parse(GATEWAY_BASE)
            .and_then(|base| base.join(endpoint.trim_start_matches('/')))
            .map_err(|err| GatewayError::InvalidPath {
                endpoint: endpoint.to_owned(),
                message: err.to_string(),
            })?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|parts| parts.filter(|part| !part.is_empty()).collect())
            .unwrap_or_default();
        let mut query: HashMap<String, String> = url.query_pairs().into_owned().collect();
        if method == Method::Get {
            merge_query_data(&mut query, data.as_ref());
        }
        let route = Route {
            endpoint,
            query: &query,
            data,
        };

        let request = match (method, segments.as_slice()) {
            (Method::Post, ["auth", "login"]) => Self::Login(route.body()?),
            (Method::Post, ["auth", "register"]) => Self::Register(route.body()?),
            (Method::Post, ["auth", "register", "author"]) => Self::RegisterAuthor(route.body()?),
            (Method::Post, ["auth", "logout"]) => Self::Logout,
            (Method::Get, ["user", "profile"]) => Self::Profile,
            (Method::Get, ["books"]) => Self::ListBooks {
                page: route.query_number("page")?.unwrap_or(1),
                category: route.query_text("category"),
            },
            (Method::Get, ["books", "search"]) => Self::SearchBooks {
                query: route.query_text("q").unwrap_or_default(),
                scope: route
                    .query_text("scope")
                    .unwrap_or_default()
                    .parse()
                    .map_err(|err: crate::domain::CatalogueValidationError| {
                        route.invalid_path(err.to_string())
                    })?,
            },
            (Method::Get, ["books", "hot"]) => Self::HotBooks {
                limit: route.query_number("limit")?.unwrap_or(DEFAULT_LIMIT),
            },
            (Method::Get, ["books", "new"]) => Self::NewBooks {
                limit: route.query_number("limit")?.unwrap_or(DEFAULT_LIMIT),
            },
            (Method::Get, ["author", "books"]) => Self::AuthorBooks,
            (Method::Get, ["books", id]) => Self::BookDetail { id: route.id(id)? },
            (Method::Post, ["books"]) => Self::AddBook(route.body()?),
            (Method::Put, ["books", id]) => Self::UpdateBook {
                id: route.id(id)?,
                update: route.body()?,
            },
            (Method::Get, ["books", book, "chapters"]) => Self::ListChapters {
                book_id: route.id(book)?,
            },
            (Method::Get, ["books", book, "chapters", chapter]) => Self::ChapterContent {
                book_id: route.id(book)?,
                chapter_id: route.id(chapter)?,
            },
            (Method::Post, ["books", book, "chapters"]) => Self::AddChapter {
                book_id: route.id(book)?,
                chapter: route.body()?,
            },
            (Method::Put, ["books", book, "chapters", chapter]) => Self::UpdateChapter {
                book_id: route.id(book)?,
                chapter_id: route.id(chapter)?,
                update: route.body()?,
            },
            (Method::Get, ["books", book, "comments"]) => Self::ListComments {
                book_id: route.id(book)?,
            },
            (Method::Post, ["books", book, "comments"]) => Self::CreateComment {
                book_id: route.id(book)?,
                comment: route.body()?,
            },
            (Method::Post, ["comments", comment, "like"]) => Self::LikeComment {
                comment_id: route.id(comment)?,
            },
            (Method::Get, ["reading", "progress"]) => Self::ReadingProgress,
            (Method::Post, ["reading", "progress"]) => Self::SaveReadingProgress(route.body()?),
            (Method::Get, ["reading", "history"]) => Self::ReadingHistory,
            (Method::Get, ["admin", "users"]) => Self::AdminUsers,
            (Method::Get, ["admin", "books"]) => Self::AdminBooks,
            (Method::Get, ["admin", "stats"]) => Self::AdminStats,
            _ => {
                return Err(GatewayError::UnhandledRoute {
                    method,
                    endpoint: endpoint.to_owned(),
                });
            }
        };
        Ok(request)
    }
}

/// Result count used by listing routes that omit `limit`.
pub const DEFAULT_LIMIT: usize = 8;

/// `.` and `..`, including their percent-encoded spellings.
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

fn merge_query_data(query: &mut HashMap<String, String>, data: Option<&Value>) {
    let Some(Value::Object(fields)) = data else {
        return;
    };
    for (name, value) in fields {
        let text = match value {
            Value::String(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            _ => continue,
        };
        query.entry(name.clone()).or_insert(text);
    }
}

struct Route<'a> {
    endpoint: &'a str,
    query: &'a HashMap<String, String>,
    data: Option<Value>,
}

impl Route<'_> {
    fn invalid_path(&self, message: String) -> GatewayError {
        GatewayError::InvalidPath {
            endpoint: self.endpoint.to_owned(),
            message,
        }
    }

    fn id<T>(&self, raw: &str) -> Result<T, GatewayError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        raw.parse()
            .map_err(|err| self.invalid_path(format!("{raw:?} is not an id: {err}")))
    }

    fn query_text(&self, name: &str) -> Option<String> {
        self.query.get(name).cloned()
    }

    fn query_number<T>(&self, name: &str) -> Result<Option<T>, GatewayError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.query
            .get(name)
            .map(|raw| {
                raw.parse()
                    .map_err(|err| self.invalid_path(format!("{name}={raw:?}: {err}")))
            })
            .transpose()
    }

    fn body<T: DeserializeOwned>(&self) -> Result<T, GatewayError> {
        let data = self.data.clone().unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|err| GatewayError::InvalidPayload {
            endpoint: self.endpoint.to_owned(),
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(ApiRequest::Logout)]
    #[case(ApiRequest::ListBooks { page: 2, category: Some("玄幻".to_owned()) })]
    #[case(ApiRequest::SearchBooks { query: "dragon king".to_owned(), scope: SearchScope::Title })]
    #[case(ApiRequest::HotBooks { limit: 5 })]
    #[case(ApiRequest::LikeComment { comment_id: CommentId::new(9) })]
    #[case(ApiRequest::UpdateChapter {
        book_id: BookId::new(1),
        chapter_id: ChapterId::new(2),
        update: ChapterUpdate { title: Some("新章".to_owned()), content: None },
    })]
    #[case(ApiRequest::SaveReadingProgress(ProgressUpdate {
        book_id: BookId::new(42),
        chapter_id: ChapterId::new(7),
        progress: 55,
    }))]
    fn rendered_endpoints_parse_back(#[case] request: ApiRequest) {
        let parsed = ApiRequest::parse(request.method(), &request.endpoint(), request.body())
            .expect("rendered endpoint parses");
        assert_eq!(parsed, request);
    }

    #[rstest]
    #[case(Method::Get, "/books/999/nonexistent")]
    #[case(Method::Post, "/user/profile")]
    #[case(Method::Put, "/comments/1/like")]
    #[case(Method::Get, "/")]
    #[case(Method::Get, "/books/999/nonexistent/../../../admin/users")]
    #[case(Method::Get, "/books/./1")]
    #[case(Method::Get, "/reading/%2E%2E/admin/stats")]
    fn unknown_routes_are_errors(#[case] method: Method, #[case] endpoint: &str) {
        let err = ApiRequest::parse(method, endpoint, None).expect_err("no route");
        assert_eq!(
            err,
            GatewayError::UnhandledRoute {
                method,
                endpoint: endpoint.to_owned(),
            }
        );
    }

    #[rstest]
    #[case("/books/hot", ApiRequest::HotBooks { limit: 8 })]
    #[case("/books/new", ApiRequest::NewBooks { limit: 8 })]
    #[case("/books/hot?limit=3", ApiRequest::HotBooks { limit: 3 })]
    fn ranked_listings_default_to_eight(#[case] endpoint: &str, #[case] expected: ApiRequest) {
        let parsed = ApiRequest::parse(Method::Get, endpoint, None).expect("known route");
        assert_eq!(parsed, expected);
    }

    #[test]
    fn non_numeric_ids_are_invalid_paths() {
        let err = ApiRequest::parse(Method::Get, "/books/abc/chapters", None).expect_err("bad id");
        assert!(matches!(err, GatewayError::InvalidPath { .. }));
    }

    #[test]
    fn malformed_bodies_are_invalid_payloads() {
        let err = ApiRequest::parse(Method::Post, "/reading/progress", Some(json!({ "bookId": "x" })))
            .expect_err("bad body");
        assert!(matches!(err, GatewayError::InvalidPayload { .. }));
    }

    #[test]
    fn get_data_fills_missing_query_parameters() {
        let request = ApiRequest::parse(
            Method::Get,
            "/books/search?scope=author",
            Some(json!({ "q": "Lovelace", "scope": "title" })),
        )
        .expect("known route");
        assert_eq!(
            request,
            ApiRequest::SearchBooks {
                query: "Lovelace".to_owned(),
                scope: SearchScope::Author,
            }
        );
    }

    #[test]
    fn login_role_defaults_to_reader() {
        let request = ApiRequest::parse(
            Method::Post,
            "/auth/login",
            Some(json!({ "identifier": "alice", "password": "secret1" })),
        )
        .expect("known route");
        assert_eq!(
            request,
            ApiRequest::Login(LoginRequest::new("alice", "secret1", Role::Reader))
        );
    }

    #[rstest]
    #[case("get", Method::Get)]
    #[case("PUT", Method::Put)]
    fn methods_parse_case_insensitively(#[case] raw: &str, #[case] expected: Method) {
        assert_eq!(raw.parse::<Method>(), Ok(expected));
    }
}
