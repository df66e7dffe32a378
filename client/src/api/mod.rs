//! Client-side gateway contract.
//!
//! Page code talks to the backend only through [`ApiClient`]. Requests are
//! typed ([`ApiRequest`]), answers are uniform envelopes ([`ApiResponse`]),
//! and the [`ApiTransport`] port decides where they go. The only transport
//! shipped is the in-process mock gateway in
//! [`crate::outbound::mock_gateway`].

mod client;
mod error;
mod request;
mod response;
mod transport;

pub use client::{AdminApi, ApiClient, BookApi, ChapterApi, CommentApi, ReadingApi, UserApi};
pub use error::GatewayError;
pub use request::{
    ApiRequest, DEFAULT_LIMIT, LoginRequest, Method, ParseMethodError, ProgressUpdate,
};
pub use response::{
    AdminBookStats, AdminStats, AdminUserStats, ApiResponse, AuthorIdData, BookPage, LoginData,
    Pagination, SearchResults,
};
#[cfg(test)]
pub use transport::MockApiTransport;
pub use transport::ApiTransport;
