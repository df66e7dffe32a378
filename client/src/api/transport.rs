//! Transport port behind [`ApiClient`](super::ApiClient).

use async_trait::async_trait;

use super::{ApiRequest, ApiResponse, GatewayError};

/// Delivers a typed request and returns the response envelope.
///
/// Handler failures travel inside an unsuccessful [`ApiResponse`]; the
/// `Err` arm is reserved for exchanges that could not be routed or decoded.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Send `request` and await its response.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError>;
}
