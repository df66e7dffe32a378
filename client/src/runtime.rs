//! Wiring of the client from [`AppSettings`].
//!
//! The runtime owns one storage backend, one session, one mock gateway, and
//! one browser location. Pages are opened against these shared parts the way
//! every page of the site shares the same storage.

use std::sync::Arc;

use camino::{FromPathBufError, Utf8PathBuf};
use mockable::{Clock, DefaultClock};
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::api::ApiClient;
use crate::config::AppSettings;
use crate::domain::SessionManager;
use crate::domain::ports::{KeyValueStore, Notifier, Sleeper};
use crate::inbound::{PageContext, Router};
use crate::outbound::mock_gateway::{
    FixtureError, MockBackend, MockTransport, TokioSleeper, UniformLatency, load_catalogue,
};
use crate::outbound::storage::{FileKeyValueStore, MemoryKeyValueStore, UserStore};
use crate::outbound::{HistoryNavigator, TracingNotifier};

/// Failures while assembling the client.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The storage directory path is not UTF-8.
    #[error("storage directory is not valid UTF-8: {0}")]
    StoragePath(#[from] FromPathBufError),
    /// The storage directory could not be created or opened.
    #[error("failed to open storage directory {path}: {source}")]
    Storage {
        /// Directory that failed to open.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The fixture catalogue could not be generated.
    #[error("failed to build the catalogue: {0}")]
    Catalogue(#[from] FixtureError),
    /// The configured start URL does not parse.
    #[error("invalid start url: {0}")]
    StartUrl(#[from] url::ParseError),
}

/// Fully wired client.
pub struct ClientRuntime {
    store: Arc<UserStore>,
    session: Arc<SessionManager>,
    backend: Arc<MockBackend>,
    client: ApiClient,
    navigator: Arc<HistoryNavigator>,
    notifier: Arc<dyn Notifier>,
    sleeper: Arc<dyn Sleeper>,
    settings: AppSettings,
}

impl ClientRuntime {
    /// Runtime using the system clock and real tokio sleeps.
    pub fn from_settings(settings: AppSettings) -> Result<Self, RuntimeError> {
        Self::build(
            settings,
            Arc::new(DefaultClock),
            Arc::new(TokioSleeper),
            Arc::new(TracingNotifier),
        )
    }

    /// Runtime over explicit time and notification collaborators.
    pub fn build(
        settings: AppSettings,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, RuntimeError> {
        let kv = open_storage(&settings)?;
        let store = Arc::new(UserStore::with_ttl(kv, clock.clone(), settings.session_ttl()));
        let session = Arc::new(SessionManager::new(store.clone(), clock.clone()));

        let catalogue = load_catalogue(settings.catalogue_seed(), clock.utc().date_naive())?;
        let backend = Arc::new(
            MockBackend::new(session.clone(), clock, catalogue)
                .with_page_size(settings.page_size()),
        );
        let (min, max) = settings.latency_range();
        let transport = MockTransport::with_latency(
            backend.clone(),
            sleeper.clone(),
            Arc::new(UniformLatency::new(min, max)),
        );
        let navigator = Arc::new(HistoryNavigator::new(Url::parse(settings.start_url())?));

        info!(
            seed = settings.catalogue_seed(),
            books = backend.snapshot().books().len(),
            persistent = settings.storage_dir().is_some(),
            "client runtime ready"
        );
        Ok(Self {
            store,
            session,
            backend,
            client: ApiClient::new(Arc::new(transport)),
            navigator,
            notifier,
            sleeper,
            settings,
        })
    }

    /// Settings the runtime was built from.
    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Persistent user store.
    pub fn store(&self) -> &Arc<UserStore> {
        &self.store
    }

    /// Session manager shared by every page.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Mock backend behind the gateway.
    pub fn backend(&self) -> &Arc<MockBackend> {
        &self.backend
    }

    /// Gateway client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Shared browser location.
    pub fn navigator(&self) -> &Arc<HistoryNavigator> {
        &self.navigator
    }

    /// Router bound to the shared location.
    pub fn router(&self) -> Router {
        Router::new(
            self.navigator.clone(),
            self.notifier.clone(),
            self.sleeper.clone(),
            self.store.clone(),
        )
        .with_redirect_delay(self.settings.redirect_delay())
    }

    /// Bootstrap the page at the current location.
    pub async fn open_page(&self) -> PageContext {
        PageContext::open(self.session.clone(), self.client.clone(), self.router()).await
    }
}

fn open_storage(settings: &AppSettings) -> Result<Arc<dyn KeyValueStore>, RuntimeError> {
    match settings.storage_dir() {
        Some(dir) => {
            let path = Utf8PathBuf::try_from(dir.to_path_buf())?;
            let store = FileKeyValueStore::open(&path)
                .map_err(|source| RuntimeError::Storage { path, source })?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(MemoryKeyValueStore::new())),
    }
}
