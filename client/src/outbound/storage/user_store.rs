//! Session persistence over a [`KeyValueStore`].
//!
//! The current user is stored as `{ "user": ..., "_timestamp": ms, "_expires": ms }`
//! under [`CURRENT_USER_KEY`]. The bookkeeping fields never reach callers.
//! All storage and serialization failures are logged and degrade to "no
//! user"; nothing here returns an error except the author-id counter.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::ports::{KeyValueStore, KeyValueStoreError, SessionStore};
use crate::domain::{AuthToken, AuthorId, Role, User};

/// Key of the expiring user record.
pub const CURRENT_USER_KEY: &str = "flutterpage_current_user";
/// Key of the persisted role.
pub const USER_ROLE_KEY: &str = "flutterpage_user_role";
/// Key of the bearer token minted at login.
pub const AUTH_TOKEN_KEY: &str = "flutterpage_auth_token";
/// Key of the RFC 3339 login time.
pub const LOGIN_TIME_KEY: &str = "flutterpage_login_time";
/// Legacy key for reading progress kept outside the user record.
pub const READING_PROGRESS_KEY: &str = "flutterpage_reading_progress";
/// Legacy key for preferences kept outside the user record.
pub const USER_PREFERENCES_KEY: &str = "flutterpage_user_preferences";
/// Key of the author-id counter.
pub const LAST_AUTHOR_ID_KEY: &str = "flutterpage_last_author_id";

/// Every key owned by [`UserStore`].
pub const ALL_KEYS: [&str; 7] = [
    CURRENT_USER_KEY,
    USER_ROLE_KEY,
    AUTH_TOKEN_KEY,
    LOGIN_TIME_KEY,
    READING_PROGRESS_KEY,
    USER_PREFERENCES_KEY,
    LAST_AUTHOR_ID_KEY,
];

/// Keys removed together on logout or expiry.
const SESSION_KEYS: [&str; 4] = [CURRENT_USER_KEY, USER_ROLE_KEY, AUTH_TOKEN_KEY, LOGIN_TIME_KEY];

/// Default lifetime of a persisted user record.
pub const DEFAULT_SESSION_TTL: TimeDelta = TimeDelta::hours(24);

#[derive(Debug, Serialize, Deserialize)]
struct StoredUser {
    user: User,
    #[serde(rename = "_timestamp")]
    timestamp: i64,
    #[serde(rename = "_expires")]
    expires: i64,
}

/// Expiring user record plus the scalar session keys.
pub struct UserStore {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
}

impl UserStore {
    /// Store with the default 24-hour expiry.
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(kv, clock, DEFAULT_SESSION_TTL)
    }

    /// Store whose user records expire `ttl` after each save.
    pub fn with_ttl(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, ttl: TimeDelta) -> Self {
        Self { kv, clock, ttl }
    }

    fn write(&self, key: &str, value: &str) -> bool {
        match self.kv.set(key, value) {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, key, "storage write failed");
                false
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        self.kv
            .get(key)
            .inspect_err(|error| warn!(%error, key, "storage read failed"))
            .ok()
            .flatten()
    }

    fn remove(&self, key: &str) {
        if let Err(error) = self.kv.remove(key) {
            warn!(%error, key, "storage remove failed");
        }
    }
}

impl SessionStore for UserStore {
    fn save_user(&self, user: &User) -> bool {
        let now = self.clock.utc();
        let record = StoredUser {
            user: user.clone(),
            timestamp: now.timestamp_millis(),
            expires: (now + self.ttl).timestamp_millis(),
        };
        match serde_json::to_string(&record) {
            Ok(json) => self.write(CURRENT_USER_KEY, &json),
            Err(error) => {
                warn!(%error, "failed to serialize user record");
                false
            }
        }
    }

    fn get_user(&self) -> Option<User> {
        let raw = self.read(CURRENT_USER_KEY)?;
        let record: StoredUser = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(error) => {
                warn!(%error, "stored user record is corrupt");
                return None;
            }
        };
        if self.clock.utc().timestamp_millis() > record.expires {
            debug!(username = %record.user.username, "stored session expired");
            self.clear_user();
            return None;
        }
        Some(record.user)
    }

    fn clear_user(&self) {
        for key in SESSION_KEYS {
            self.remove(key);
        }
    }

    fn save_user_role(&self, role: Role) -> bool {
        self.write(USER_ROLE_KEY, role.as_str())
    }

    fn get_user_role(&self) -> Option<Role> {
        let raw = self.read(USER_ROLE_KEY)?;
        raw.parse()
            .inspect_err(|error| warn!(%error, "stored role is not recognised"))
            .ok()
    }

    fn save_auth_token(&self, token: &AuthToken) -> bool {
        self.write(AUTH_TOKEN_KEY, token.as_str())
    }

    fn get_auth_token(&self) -> Option<AuthToken> {
        self.read(AUTH_TOKEN_KEY).map(AuthToken::new)
    }

    fn save_login_time(&self) -> bool {
        self.write(LOGIN_TIME_KEY, &self.clock.utc().to_rfc3339())
    }

    fn get_login_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.read(LOGIN_TIME_KEY)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .inspect_err(|error| warn!(%error, "stored login time is malformed"))
            .ok()
    }

    fn clear_all(&self) {
        for key in ALL_KEYS {
            self.remove(key);
        }
    }

    fn next_author_id(&self) -> Result<AuthorId, KeyValueStoreError> {
        let current = match self.kv.get(LAST_AUTHOR_ID_KEY)? {
            Some(raw) => raw
                .parse::<AuthorId>()
                .map_err(|error| KeyValueStoreError::read(LAST_AUTHOR_ID_KEY, error.to_string()))?,
            None => AuthorId::FIRST,
        };
        let next = current.next();
        self.kv.set(LAST_AUTHOR_ID_KEY, &next.to_string())?;
        debug!(author_id = %next, "allocated author id");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockKeyValueStore;
    use crate::domain::{PreferencesPatch, UserId};
    use crate::outbound::storage::MemoryKeyValueStore;
    use crate::test_support::MutableClock;
    use rstest::{fixture, rstest};

    struct Harness {
        kv: Arc<MemoryKeyValueStore>,
        clock: Arc<MutableClock>,
        store: UserStore,
    }

    #[fixture]
    fn harness() -> Harness {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let clock = Arc::new(MutableClock::new(
            DateTime::parse_from_rfc3339("2024-05-01T08:00:00Z")
                .expect("valid timestamp")
                .with_timezone(&Utc),
        ));
        let store = UserStore::new(kv.clone(), clock.clone());
        Harness { kv, clock, store }
    }

    fn author() -> User {
        let mut user = User::for_role(UserId::new(7), "inkwell", Role::Author, Some(AuthorId::new(3)));
        PreferencesPatch::new()
            .theme("night")
            .apply(&mut user.preferences)
            .expect("valid patch");
        user
    }

    #[rstest]
    fn saved_user_round_trips_before_expiry(harness: Harness) {
        let user = author();
        assert!(harness.store.save_user(&user));
        harness.clock.advance_seconds(23 * 3600);
        assert_eq!(harness.store.get_user(), Some(user));
    }

    #[rstest]
    fn record_carries_bookkeeping_fields(harness: Harness) {
        harness.store.save_user(&author());
        let raw = harness
            .kv
            .get(CURRENT_USER_KEY)
            .expect("read")
            .expect("present");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        let timestamp = value["_timestamp"].as_i64().expect("timestamp");
        let expires = value["_expires"].as_i64().expect("expires");
        assert_eq!(expires - timestamp, 24 * 3600 * 1000);
        assert_eq!(value["user"]["username"], "inkwell");
    }

    #[rstest]
    fn expired_record_is_deleted_with_related_keys(harness: Harness) {
        let store = &harness.store;
        store.save_user(&author());
        store.save_user_role(Role::Author);
        store.save_auth_token(&AuthToken::new("mock_jwt_1_x"));
        store.save_login_time();

        harness.clock.advance_seconds(24 * 3600 + 1);

        assert_eq!(store.get_user(), None);
        assert_eq!(store.get_user(), None);
        for key in SESSION_KEYS {
            assert!(!harness.kv.contains(key), "{key} should be removed");
        }
    }

    #[rstest]
    fn corrupt_record_reads_as_absent(harness: Harness) {
        harness.kv.set(CURRENT_USER_KEY, "{not json").expect("write");
        assert_eq!(harness.store.get_user(), None);
        assert!(!harness.store.is_logged_in());
    }

    #[rstest]
    fn scalar_accessors_round_trip(harness: Harness) {
        let store = &harness.store;
        assert!(store.save_user_role(Role::Admin));
        assert!(store.save_auth_token(&AuthToken::new("mock_jwt_1_abc")));
        assert!(store.save_login_time());

        assert_eq!(store.get_user_role(), Some(Role::Admin));
        assert_eq!(store.get_auth_token().map(|t| t.to_string()), Some("mock_jwt_1_abc".to_owned()));
        assert_eq!(store.get_login_time(), Some(harness.clock.utc()));
    }

    #[rstest]
    fn clear_user_keeps_author_counter(harness: Harness) {
        let store = &harness.store;
        store.save_user(&author());
        store.next_author_id().expect("allocate");

        store.clear_user();
        assert!(!store.is_logged_in());
        assert!(harness.kv.contains(LAST_AUTHOR_ID_KEY));

        store.clear_all();
        assert!(harness.kv.is_empty());
    }

    #[rstest]
    fn author_ids_advance_from_the_first(harness: Harness) {
        let first = harness.store.next_author_id().expect("allocate");
        let second = harness.store.next_author_id().expect("allocate");
        assert_eq!(first.to_string(), "000000002");
        assert_eq!(second.to_string(), "000000003");
    }

    #[test]
    fn write_failures_report_false() {
        let mut kv = MockKeyValueStore::new();
        kv.expect_set()
            .returning(|key, _| Err(KeyValueStoreError::quota_exceeded(key, 16_usize)));
        let clock = Arc::new(MutableClock::new(Utc::now()));
        let store = UserStore::new(Arc::new(kv), clock);

        assert!(!store.save_user(&author()));
        assert!(!store.save_user_role(Role::Reader));
    }

    #[test]
    fn read_failures_degrade_to_no_user() {
        let mut kv = MockKeyValueStore::new();
        kv.expect_get()
            .returning(|key| Err(KeyValueStoreError::read(key, "device busy")));
        let clock = Arc::new(MutableClock::new(Utc::now()));
        let store = UserStore::new(Arc::new(kv), clock);

        assert_eq!(store.get_user(), None);
        assert_eq!(store.get_user_role(), None);
    }
}
