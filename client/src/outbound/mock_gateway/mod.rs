//! In-process mock of the platform backend.
//!
//! [`MockTransport`] implements [`ApiTransport`]: it waits a simulated
//! round trip and then lets [`MockBackend`] answer the request from its
//! generated catalogue. The backend lock is only taken after the delay, so
//! no guard is ever held across an await point.

mod admin;
mod auth;
mod backend;
mod books;
mod chapters;
mod comments;
mod fixtures;
mod latency;
mod reading;
mod state;

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{ApiRequest, ApiResponse, ApiTransport, GatewayError};
use crate::domain::ports::{LatencyJitter, Sleeper};

pub use backend::{DEFAULT_PAGE_SIZE, MockBackend};
pub use fixtures::{FixtureError, catalogue_from_seeds, load_catalogue};
pub use latency::{DEFAULT_LATENCY_MAX, DEFAULT_LATENCY_MIN, TokioSleeper, UniformLatency};
pub use state::CatalogueState;

/// Transport answering every request from a [`MockBackend`].
pub struct MockTransport {
    backend: Arc<MockBackend>,
    sleeper: Arc<dyn Sleeper>,
    jitter: Arc<dyn LatencyJitter>,
}

impl MockTransport {
    /// Transport over `backend` using tokio sleeps and the default latency range.
    pub fn new(backend: Arc<MockBackend>) -> Self {
        Self::with_latency(
            backend,
            Arc::new(TokioSleeper),
            Arc::new(UniformLatency::default()),
        )
    }

    /// Transport with explicit latency collaborators.
    pub fn with_latency(
        backend: Arc<MockBackend>,
        sleeper: Arc<dyn Sleeper>,
        jitter: Arc<dyn LatencyJitter>,
    ) -> Self {
        Self {
            backend,
            sleeper,
            jitter,
        }
    }

    /// Backend answering the requests.
    pub fn backend(&self) -> &Arc<MockBackend> {
        &self.backend
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError> {
        self.sleeper.sleep(self.jitter.next_delay()).await;
        Ok(self.backend.handle(request))
    }
}
