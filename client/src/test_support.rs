//! Shared test doubles and wiring helpers.
//!
//! Compiled for unit tests and, through the `test-support` feature, for the
//! integration tests under `tests/`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use url::Url;

use crate::api::ApiClient;
use crate::domain::SessionManager;
use crate::domain::ports::{
    FixedLatency, KeyValueStore, KeyValueStoreError, Navigator, NotificationKind, Notifier,
    Sleeper,
};
use crate::outbound::mock_gateway::{MockBackend, MockTransport, load_catalogue};
use crate::outbound::storage::{FileKeyValueStore, MemoryKeyValueStore, UserStore};

/// Seed with a handful of short books, fast to generate.
pub const SMALL_SEED: &str = "paper-crane";

/// Instant used as "now" by [`Harness`].
pub fn fixed_now() -> DateTime<Utc> {
    match DateTime::parse_from_rfc3339("2024-05-01T08:00:00Z") {
        Ok(now) => now.with_timezone(&Utc),
        Err(error) => panic!("fixed timestamp must parse: {error}"),
    }
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("{what} mutex"),
    }
}

/// Clock that only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward by `delta`.
    ///
    /// # Panics
    /// Panics when `delta` does not fit a [`TimeDelta`].
    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *lock(&self.0, "clock") += delta;
    }

    /// Move the clock by `seconds`, which may be negative.
    pub fn advance_seconds(&self, seconds: i64) {
        *lock(&self.0, "clock") += TimeDelta::seconds(seconds);
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.0, "clock")
    }
}

/// Sleeper that returns at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateSleeper;

#[async_trait]
impl Sleeper for ImmediateSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

/// Sleeper that returns at once and records each requested pause.
#[derive(Default)]
pub struct RecordingSleeper(pub Mutex<Vec<Duration>>);

impl RecordingSleeper {
    /// Pauses requested so far, in order.
    pub fn recorded(&self) -> Vec<Duration> {
        lock(&self.0, "sleeper").clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        lock(&self.0, "sleeper").push(duration);
    }
}

fn parse_location(location: &str) -> Url {
    match Url::parse(location) {
        Ok(url) => url,
        Err(error) => panic!("invalid test location {location}: {error}"),
    }
}

/// Navigator that records hrefs instead of following them.
pub struct RecordingNavigator {
    location: Mutex<Url>,
    assigned: Mutex<Vec<String>>,
    backs: AtomicUsize,
}

impl RecordingNavigator {
    /// Navigator parked at `location`.
    pub fn new(location: &str) -> Self {
        Self {
            location: Mutex::new(parse_location(location)),
            assigned: Mutex::new(Vec::new()),
            backs: AtomicUsize::new(0),
        }
    }

    /// Move the current location without recording an assignment.
    pub fn set_location(&self, location: &str) {
        *lock(&self.location, "location") = parse_location(location);
    }

    /// Hrefs assigned so far, in order.
    pub fn assigned(&self) -> Vec<String> {
        lock(&self.assigned, "navigator").clone()
    }

    /// Number of `back` calls.
    pub fn back_count(&self) -> usize {
        self.backs.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn current_location(&self) -> Url {
        lock(&self.location, "location").clone()
    }

    fn assign(&self, href: &str) {
        lock(&self.assigned, "navigator").push(href.to_owned());
    }

    fn back(&self) {
        self.backs.fetch_add(1, Ordering::SeqCst);
    }
}

/// Notifier that keeps every message.
#[derive(Default)]
pub struct RecordingNotifier(Mutex<Vec<(String, NotificationKind)>>);

impl RecordingNotifier {
    /// Messages raised so far, with their kinds.
    pub fn messages(&self) -> Vec<(String, NotificationKind)> {
        lock(&self.0, "notifier").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        lock(&self.0, "notifier").push((message.to_owned(), kind));
    }
}

/// Store whose every operation fails, like storage disabled by the browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingKeyValueStore;

impl KeyValueStore for FailingKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        Err(KeyValueStoreError::read(key, "storage disabled"))
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), KeyValueStoreError> {
        Err(KeyValueStoreError::write(key, "storage disabled"))
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        Err(KeyValueStoreError::write(key, "storage disabled"))
    }
}

/// File-backed store in a fresh temporary directory.
///
/// The directory is deleted when the returned guard drops.
pub fn temp_file_store() -> (tempfile::TempDir, FileKeyValueStore) {
    let dir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(error) => panic!("failed to create temp dir: {error}"),
    };
    let root = match camino::Utf8PathBuf::try_from(dir.path().join("storage")) {
        Ok(root) => root,
        Err(error) => panic!("temp dir is not UTF-8: {error}"),
    };
    match FileKeyValueStore::open(&root) {
        Ok(store) => (dir, store),
        Err(error) => panic!("failed to open {root}: {error}"),
    }
}

/// Memory-backed session, mock backend, and client sharing one clock.
pub struct Harness {
    /// Raw storage under the user store.
    pub kv: Arc<MemoryKeyValueStore>,
    /// Clock shared by the store, session, and backend.
    pub clock: Arc<MutableClock>,
    /// Persistent user store.
    pub store: Arc<UserStore>,
    /// Session manager written by the login handler.
    pub session: Arc<SessionManager>,
    /// Mock backend seeded with the small catalogue.
    pub backend: Arc<MockBackend>,
    /// Records the simulated latency of each request.
    pub sleeper: Arc<RecordingSleeper>,
    /// Client routed through the mock transport.
    pub client: ApiClient,
}

impl Harness {
    /// Latency of every request sent through [`Harness::client`].
    pub const LATENCY: Duration = Duration::from_millis(750);

    /// Harness over empty memory storage.
    pub fn new() -> Self {
        Self::with_kv(Arc::new(MemoryKeyValueStore::new()))
    }

    /// Harness over an existing store, as when a page reloads.
    pub fn with_kv(kv: Arc<MemoryKeyValueStore>) -> Self {
        let clock = Arc::new(MutableClock::new(fixed_now()));
        let store = Arc::new(UserStore::new(kv.clone(), clock.clone()));
        let session = Arc::new(SessionManager::new(store.clone(), clock.clone()));
        let catalogue = match load_catalogue(SMALL_SEED, fixed_now().date_naive()) {
            Ok(catalogue) => catalogue,
            Err(error) => panic!("test catalogue must generate: {error}"),
        };
        let backend = Arc::new(
            MockBackend::new(session.clone(), clock.clone(), catalogue).with_page_size(2),
        );
        let sleeper = Arc::new(RecordingSleeper::default());
        let transport = MockTransport::with_latency(
            backend.clone(),
            sleeper.clone(),
            Arc::new(FixedLatency(Self::LATENCY)),
        );
        Self {
            kv,
            clock,
            store,
            session,
            backend,
            sleeper,
            client: ApiClient::new(Arc::new(transport)),
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
