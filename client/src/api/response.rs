//! Response envelope and typed payloads.
//!
//! Every gateway answer is an [`ApiResponse`]: `{ success, message?, code?,
//! data?, traceId? }`. Callers decode `data` into one of the payload structs
//! below with [`ApiResponse::data_as`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{AuthToken, AuthorId, Book, Error, ErrorCode, Role, TraceId, User};

use super::GatewayError;

/// Uniform gateway response.
///
/// # Examples
/// ```
/// use flutterpage::api::ApiResponse;
/// use flutterpage::domain::Error;
///
/// let response = ApiResponse::failure(&Error::not_found("book not found"));
/// assert!(!response.success);
/// assert_eq!(response.message.as_deref(), Some("book not found"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// Human-readable outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Stable error code, on failures only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    /// Response payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Trace id of the request that produced this response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl ApiResponse {
    /// Successful envelope stamped with the trace id in scope.
    pub fn success(data: Option<Value>, message: Option<String>) -> Self {
        Self {
            success: true,
            message,
            code: None,
            data,
            trace_id: current_trace_id(),
        }
    }

    /// Failed envelope carrying the error's code, message, and details.
    pub fn failure(error: &Error) -> Self {
        Self {
            success: false,
            message: Some(error.message().to_owned()),
            code: Some(error.code()),
            data: error.details().cloned(),
            trace_id: current_trace_id(),
        }
    }

    /// The failure as a domain error, if this envelope is one.
    pub fn error(&self) -> Option<Error> {
        if self.success {
            return None;
        }
        let code = self.code.unwrap_or(ErrorCode::InternalError);
        let error = Error::new(code, self.message.clone().unwrap_or_default());
        Some(match self.data.clone() {
            Some(details) => error.with_details(details),
            None => error,
        })
    }

    /// Decode `data` into `T`.
    ///
    /// A missing `data` field decodes as JSON `null`, so `Option<T>` targets
    /// accept it.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, GatewayError> {
        let data = self.data.clone().unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|err| GatewayError::Decode {
            message: err.to_string(),
        })
    }
}

fn current_trace_id() -> Option<String> {
    TraceId::current().map(|id| id.to_string())
}

/// Payload of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    /// The signed-in user.
    pub user: User,
    /// Session token.
    pub token: AuthToken,
    /// Role the user signed in as.
    pub role: Role,
}

/// Paging metadata for book listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// One-based page number.
    pub page: u32,
    /// Books across every page.
    pub total: usize,
    /// Whether a later page exists.
    pub has_more: bool,
}

/// One page of books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookPage {
    /// Books on this page.
    pub books: Vec<Book>,
    /// Paging metadata.
    pub pagination: Pagination,
}

/// Books matching a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Matching books.
    pub books: Vec<Book>,
    /// Number of matches.
    pub total: usize,
}

/// Payload of a successful author registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorIdData {
    /// Newly allocated author id.
    pub author_id: AuthorId,
}

/// User counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserStats {
    /// Registered users.
    pub total: u64,
    /// Users active recently.
    pub active: u64,
    /// Users registered today.
    pub new_today: u64,
}

/// Book counts by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBookStats {
    /// Books in the catalogue.
    pub total: usize,
    /// Books still being published.
    pub serializing: usize,
    /// Finished books.
    pub completed: usize,
}

/// Aggregate catalogue counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    /// Books in the catalogue.
    pub books: usize,
    /// Chapters across every book.
    pub chapters: usize,
    /// Comments across every book.
    pub comments: usize,
    /// Sum of book views.
    pub total_views: u64,
}
