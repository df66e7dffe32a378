//! Session and identity management.
//!
//! [`SessionManager`] holds the in-memory current user for one page lifetime
//! and mediates every read and write of the persisted session. Login
//! validation lives here; establishing the session after a successful login
//! is reserved for the mock gateway's login handler.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mockable::Clock;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::ports::{KeyValueStoreError, SessionStore};
use super::{
    AuthToken, AuthorId, AuthorRegistration, AuthorRegistrationForm, BookId, ChapterId, LoginCredentials,
    LoginValidationError, PreferencesError, PreferencesPatch, ProgressPercent, ReadingProgress,
    Registration, RegistrationError, RegistrationForm, Role, User, UserPreferences,
};

/// Failures of session-scoped operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The operation needs a signed-in user.
    #[error("please log in first")]
    NotLoggedIn,
    /// A preference or progress value was rejected.
    #[error(transparent)]
    Preferences(#[from] PreferencesError),
}

/// In-memory identity plus role-gated access decisions.
///
/// ## Invariants
/// - At most one user is resident at a time.
/// - Every mutation of the resident user rewrites the whole persisted record.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    current: Mutex<Option<User>>,
}

impl SessionManager {
    /// Create an anonymous session over `store`.
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            current: Mutex::new(None),
        }
    }

    /// Load the persisted, unexpired user into memory.
    pub fn init(&self) -> Option<User> {
        let loaded = self.store.get_user();
        if let Some(user) = loaded.as_ref() {
            debug!(username = %user.username, role = %user.role, "restored persisted session");
        }
        *self.current() = loaded.clone();
        loaded
    }

    /// Validate a reader registration. Nothing is persisted.
    pub fn register(&self, form: &RegistrationForm) -> Result<Registration, RegistrationError> {
        let registration = form.validate()?;
        info!(username = %registration.username, role = %registration.role, "registration validated");
        Ok(registration)
    }

    /// Validate an author registration and allocate its author id.
    pub fn register_author(
        &self,
        form: AuthorRegistrationForm,
    ) -> Result<AuthorRegistration, RegistrationError> {
        form.validate()?;
        let author_id = self.store.next_author_id().map_err(|err| {
            RegistrationError::AuthorIdUnavailable {
                message: err.to_string(),
            }
        })?;
        info!(username = %form.username, %author_id, "author registration validated");
        Ok(form.into_registration(author_id))
    }

    /// Validate login inputs.
    ///
    /// Success means the credentials may be sent to the gateway; the session
    /// itself is only established by the gateway's login handler.
    pub fn login(
        &self,
        identifier: &str,
        password: &str,
        role: Role,
        admin_uid: Option<&str>,
    ) -> Result<LoginCredentials, LoginValidationError> {
        let credentials = LoginCredentials::try_from_parts(identifier, password, role, admin_uid)?;
        debug!(identifier = credentials.identifier(), %role, "login request validated");
        Ok(credentials)
    }

    /// Allocate the next author id for a login that has none yet.
    pub(crate) fn allocate_author_id(&self) -> Result<AuthorId, KeyValueStoreError> {
        self.store.next_author_id()
    }

    /// Make `user` the signed-in user and persist the session keys.
    pub(crate) fn establish(&self, user: User, token: &AuthToken) {
        let role = user.role;
        let persisted = [
            self.store.save_user(&user),
            self.store.save_user_role(role),
            self.store.save_login_time(),
            self.store.save_auth_token(token),
        ];
        if persisted.contains(&false) {
            warn!(username = %user.username, "session established in memory only");
        }
        info!(username = %user.username, %role, "session established");
        *self.current() = Some(user);
    }

    /// Forget the current user in memory and in storage.
    pub fn logout(&self) {
        if let Some(user) = self.current().take() {
            info!(username = %user.username, "logged out");
        }
        self.store.clear_user();
    }

    /// Drop the in-memory user without touching storage.
    pub fn close(&self) {
        self.current().take();
    }

    /// Copy of the signed-in user.
    pub fn current_user(&self) -> Option<User> {
        self.current().clone()
    }

    /// Whether an unexpired session is persisted.
    pub fn is_logged_in(&self) -> bool {
        self.store.is_logged_in()
    }

    /// The persisted role, if any.
    pub fn role(&self) -> Option<Role> {
        self.store.get_user_role()
    }

    /// Exact match against the persisted role.
    pub fn has_role(&self, role: Role) -> bool {
        self.role() == Some(role)
    }

    /// Whether the persisted role may enter an area requiring `required`.
    ///
    /// Without a persisted role nothing is accessible.
    pub fn check_access(&self, required: Role) -> bool {
        self.role().is_some_and(|held| held.satisfies(required))
    }

    /// Merge `patch` into the user's preferences and persist the user.
    pub fn update_preferences(
        &self,
        patch: PreferencesPatch,
    ) -> Result<UserPreferences, SessionError> {
        self.mutate_user(|user| {
            patch.apply(&mut user.preferences)?;
            Ok(user.preferences.clone())
        })
    }

    /// Record where the user stopped reading `book` and persist the user.
    pub fn save_reading_progress(
        &self,
        book: BookId,
        chapter: ChapterId,
        percent: u32,
    ) -> Result<ReadingProgress, SessionError> {
        let progress = ProgressPercent::new(percent)?;
        let entry = ReadingProgress {
            chapter_id: chapter,
            progress,
            timestamp: self.clock.utc(),
        };
        self.mutate_user(|user| {
            user.preferences
                .reading_progress
                .insert(book, entry.clone());
            Ok(entry)
        })
    }

    /// Reading progress recorded for `book`.
    pub fn reading_progress(&self, book: BookId) -> Option<ReadingProgress> {
        self.current()
            .as_ref()
            .and_then(|user| user.preferences.reading_progress.get(&book).cloned())
    }

    fn mutate_user<T>(
        &self,
        change: impl FnOnce(&mut User) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let mut guard = self.current();
        let user = guard.as_mut().ok_or(SessionError::NotLoggedIn)?;
        let outcome = change(user)?;
        if !self.store.save_user(user) {
            warn!(username = %user.username, "user change kept in memory only");
        }
        Ok(outcome)
    }

    fn current(&self) -> MutexGuard<'_, Option<User>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{KeyValueStoreError, MockSessionStore};
    use crate::domain::{AuthorId, UserId};
    use crate::test_support::MutableClock;
    use chrono::{DateTime, Utc};
    use rstest::{fixture, rstest};

    fn fixed_clock() -> Arc<dyn Clock> {
        let now: DateTime<Utc> = DateTime::parse_from_rfc3339("2024-05-01T08:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        Arc::new(MutableClock::new(now))
    }

    #[fixture]
    fn reader() -> User {
        User::for_role(UserId::new(1), "alice", Role::Reader, None)
    }

    fn manager(store: MockSessionStore) -> SessionManager {
        SessionManager::new(Arc::new(store), fixed_clock())
    }

    #[rstest]
    #[case(None, Role::Reader, false)]
    #[case(Some(Role::Reader), Role::Reader, true)]
    #[case(Some(Role::Reader), Role::Admin, false)]
    #[case(Some(Role::Author), Role::Reader, true)]
    #[case(Some(Role::Admin), Role::Author, true)]
    fn access_follows_persisted_role(
        #[case] persisted: Option<Role>,
        #[case] required: Role,
        #[case] expected: bool,
    ) {
        let mut store = MockSessionStore::new();
        store.expect_get_user_role().return_const(persisted);
        assert_eq!(manager(store).check_access(required), expected);
    }

    #[test]
    fn has_role_requires_exact_match() {
        let mut store = MockSessionStore::new();
        store.expect_get_user_role().return_const(Some(Role::Admin));
        let session = manager(store);
        assert!(session.has_role(Role::Admin));
        assert!(!session.has_role(Role::Reader));
    }

    #[rstest]
    fn init_loads_persisted_user(reader: User) {
        let mut store = MockSessionStore::new();
        store.expect_get_user().return_const(Some(reader.clone()));
        let session = manager(store);

        assert_eq!(session.init(), Some(reader.clone()));
        assert_eq!(session.current_user(), Some(reader));
    }

    #[rstest]
    fn establish_writes_every_session_key(reader: User) {
        let mut store = MockSessionStore::new();
        store.expect_save_user().times(1).return_const(true);
        store
            .expect_save_user_role()
            .withf(|role| *role == Role::Reader)
            .times(1)
            .return_const(true);
        store.expect_save_login_time().times(1).return_const(true);
        store
            .expect_save_auth_token()
            .withf(|token| token.as_str() == "mock_jwt_1_abc")
            .times(1)
            .return_const(true);
        let session = manager(store);

        session.establish(reader.clone(), &AuthToken::new("mock_jwt_1_abc"));
        assert_eq!(session.current_user(), Some(reader));
    }

    #[rstest]
    fn logout_clears_memory_and_storage(reader: User) {
        let mut store = MockSessionStore::new();
        store.expect_get_user().return_const(Some(reader));
        store.expect_clear_user().times(1).return_const(());
        let session = manager(store);
        session.init();

        session.logout();
        assert!(session.current_user().is_none());
    }

    #[rstest]
    fn close_leaves_storage_alone(reader: User) {
        let mut store = MockSessionStore::new();
        store.expect_get_user().return_const(Some(reader));
        store.expect_clear_user().never();
        let session = manager(store);
        session.init();

        session.close();
        assert!(session.current_user().is_none());
    }

    #[test]
    fn anonymous_sessions_cannot_save_progress() {
        let session = manager(MockSessionStore::new());
        let result = session.save_reading_progress(BookId::new(42), ChapterId::new(7), 55);
        assert_eq!(result, Err(SessionError::NotLoggedIn));
    }

    #[rstest]
    fn progress_is_stamped_and_persisted(reader: User) {
        let mut store = MockSessionStore::new();
        store.expect_get_user().return_const(Some(reader));
        store
            .expect_save_user()
            .withf(|user| user.preferences.reading_progress.contains_key(&BookId::new(42)))
            .times(1)
            .return_const(true);
        let session = manager(store);
        session.init();

        let saved = session
            .save_reading_progress(BookId::new(42), ChapterId::new(7), 55)
            .expect("progress saved");
        assert_eq!(saved.timestamp.to_rfc3339(), "2024-05-01T08:00:00+00:00");
        assert_eq!(session.reading_progress(BookId::new(42)), Some(saved));
    }

    #[rstest]
    fn out_of_range_progress_is_rejected_before_persisting(reader: User) {
        let mut store = MockSessionStore::new();
        store.expect_get_user().return_const(Some(reader));
        store.expect_save_user().never();
        let session = manager(store);
        session.init();

        let err = session
            .save_reading_progress(BookId::new(1), ChapterId::new(1), 120)
            .expect_err("out of range");
        assert_eq!(
            err,
            SessionError::Preferences(PreferencesError::ProgressOutOfRange { actual: 120 })
        );
    }

    #[rstest]
    fn preference_updates_persist_whole_user(reader: User) {
        let mut store = MockSessionStore::new();
        store.expect_get_user().return_const(Some(reader));
        store
            .expect_save_user()
            .withf(|user| user.preferences.font_size == 20)
            .times(1)
            .return_const(true);
        let session = manager(store);
        session.init();

        let prefs = session
            .update_preferences(PreferencesPatch::new().font_size(20))
            .expect("valid patch");
        assert_eq!(prefs.theme, "default");
    }

    #[test]
    fn author_registration_reports_counter_failures() {
        let mut store = MockSessionStore::new();
        store
            .expect_next_author_id()
            .returning(|| Err(KeyValueStoreError::write("flutterpage_last_author_id", "disk full")));
        let session = manager(store);
        let form = AuthorRegistrationForm {
            username: "inkwell".to_owned(),
            email: "ink@example.com".to_owned(),
            password: "secret1".to_owned(),
            pen_name: "墨水".to_owned(),
            real_name: "Li Wei".to_owned(),
            phone: "13812345678".to_owned(),
            id_number: "110105194912310".to_owned(),
        };

        let err = session.register_author(form).expect_err("allocation fails");
        assert!(matches!(err, RegistrationError::AuthorIdUnavailable { .. }));
    }

    #[test]
    fn author_registration_carries_allocated_id() {
        let mut store = MockSessionStore::new();
        store
            .expect_next_author_id()
            .returning(|| Ok(AuthorId::new(2)));
        let session = manager(store);
        let form = AuthorRegistrationForm {
            username: "inkwell".to_owned(),
            email: "ink@example.com".to_owned(),
            password: "secret1".to_owned(),
            pen_name: "墨水".to_owned(),
            real_name: "Li Wei".to_owned(),
            phone: "13812345678".to_owned(),
            id_number: "110105194912310".to_owned(),
        };

        let registration = session.register_author(form).expect("valid form");
        assert_eq!(registration.author_id.to_string(), "000000002");
    }
}
