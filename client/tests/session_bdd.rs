//! Behaviour tests for the session lifecycle.
//!
//! These scenarios sign in through the mock gateway, reload pages over the
//! same storage, and let the stored session lapse.

// `expect` is idiomatic in test code for failing fast on precondition violations.
#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]
#![expect(
    non_snake_case,
    reason = "rstest-bdd generates guard variables with double underscores"
)]

use std::cell::RefCell;

use chrono::DateTime;
use flutterpage::api::LoginData;
use flutterpage::domain::ports::SessionStore;
use flutterpage::domain::{BookId, ChapterId, ReadingProgress, Role};
use flutterpage::outbound::storage::{
    AUTH_TOKEN_KEY, CURRENT_USER_KEY, LOGIN_TIME_KEY, USER_ROLE_KEY,
};
use flutterpage::test_support::Harness;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::{Builder, Runtime};

struct SessionWorld {
    harness: Harness,
    runtime: Runtime,
    login: RefCell<Option<Result<LoginData, String>>>,
    progress: RefCell<Option<ReadingProgress>>,
}

impl SessionWorld {
    fn new() -> Self {
        Self {
            harness: Harness::new(),
            runtime: Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("create runtime"),
            login: RefCell::new(None),
            progress: RefCell::new(None),
        }
    }

    fn sign_in(&self, name: &str, password: &str, role: Role, uid: Option<&str>) {
        let outcome = match self.harness.session.login(name, password, role, uid) {
            Ok(credentials) => {
                let response = self
                    .runtime
                    .block_on(self.harness.client.user().login(&credentials))
                    .expect("login is routed");
                match response.error() {
                    Some(error) => Err(error.message().to_owned()),
                    None => Ok(response.data_as().expect("login data")),
                }
            }
            Err(error) => Err(error.to_string()),
        };
        *self.login.borrow_mut() = Some(outcome);
    }

    fn login_outcome(&self) -> Result<LoginData, String> {
        self.login.borrow().clone().expect("a login was attempted")
    }
}

#[fixture]
fn world() -> SessionWorld {
    SessionWorld::new()
}

#[given("an anonymous visitor")]
fn an_anonymous_visitor(world: &SessionWorld) {
    assert!(!world.harness.session.is_logged_in());
}

#[given("\"{name}\" is signed in as a reader")]
fn is_signed_in_as_a_reader(world: &SessionWorld, name: String) {
    world.sign_in(&name, "secret1", Role::Reader, None);
    assert!(world.login_outcome().is_ok());
}

#[when("\"{name}\" signs in as a reader with password \"{password}\"")]
fn signs_in_as_a_reader(world: &SessionWorld, name: String, password: String) {
    world.sign_in(&name, &password, Role::Reader, None);
}

#[when("\"{name}\" tries to sign in as an admin without a UID")]
fn tries_to_sign_in_as_admin(world: &SessionWorld, name: String) {
    world.sign_in(&name, "secret1", Role::Admin, None);
}

#[when("progress {percent} is saved for book {book} chapter {chapter}")]
fn progress_is_saved(world: &SessionWorld, percent: u32, book: u64, chapter: u64) {
    let saved = world
        .harness
        .session
        .save_reading_progress(BookId::new(book), ChapterId::new(chapter), percent)
        .expect("progress saved");
    *world.progress.borrow_mut() = Some(saved);
}

#[when("the page is reloaded")]
fn the_page_is_reloaded(world: &SessionWorld) {
    world.harness.session.close();
    world.harness.session.init();
}

#[when("{hours} hours pass")]
fn hours_pass(world: &SessionWorld, hours: i64) {
    world.harness.clock.advance_seconds(hours * 3_600);
}

#[when("the user logs out")]
fn the_user_logs_out(world: &SessionWorld) {
    let response = world
        .runtime
        .block_on(world.harness.client.user().logout())
        .expect("logout is routed");
    assert!(response.success);
}

#[then("the login succeeds with a token")]
fn the_login_succeeds(world: &SessionWorld) {
    let login = world.login_outcome().expect("login succeeded");
    assert!(!login.token.as_str().is_empty());
}

#[then("the login is rejected with \"{message}\"")]
fn the_login_is_rejected(world: &SessionWorld, message: String) {
    assert_eq!(world.login_outcome().expect_err("login rejected"), message);
}

#[then("no gateway request was made")]
fn no_gateway_request(world: &SessionWorld) {
    assert!(world.harness.sleeper.recorded().is_empty());
}

#[then("nobody is signed in")]
fn nobody_is_signed_in(world: &SessionWorld) {
    assert!(world.harness.session.current_user().is_none());
    assert!(!world.harness.session.is_logged_in());
}

#[then("the signed-in user is \"{name}\" with role \"{role}\"")]
fn the_signed_in_user_is(world: &SessionWorld, name: String, role: String) {
    let user = world.harness.session.current_user().expect("signed in");
    assert_eq!(user.username, name);
    assert_eq!(user.role, role.parse::<Role>().expect("known role"));
}

#[then("the stored role is \"{role}\"")]
fn the_stored_role_is(world: &SessionWorld, role: String) {
    assert_eq!(
        world.harness.store.get_user_role(),
        Some(role.parse::<Role>().expect("known role"))
    );
}

#[then("the progress for book {book} is chapter {chapter} at {percent} percent")]
fn the_progress_is(world: &SessionWorld, book: u64, chapter: u64, percent: u8) {
    let progress = world
        .harness
        .session
        .reading_progress(BookId::new(book))
        .expect("progress recorded");
    assert_eq!(progress.chapter_id, ChapterId::new(chapter));
    assert_eq!(progress.progress.get(), percent);
}

#[then("the progress timestamp is RFC 3339")]
fn the_progress_timestamp_is_rfc3339(world: &SessionWorld) {
    let progress = world.progress.borrow().clone().expect("progress saved");
    let value = serde_json::to_value(&progress).expect("serialize progress");
    let raw = value["timestamp"].as_str().expect("timestamp string");
    assert!(DateTime::parse_from_rfc3339(raw).is_ok(), "{raw}");
}

#[then("the stored session keys are gone")]
fn the_stored_session_keys_are_gone(world: &SessionWorld) {
    for key in [CURRENT_USER_KEY, USER_ROLE_KEY, AUTH_TOKEN_KEY, LOGIN_TIME_KEY] {
        assert!(!world.harness.kv.contains(key), "{key} still stored");
    }
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Reader signs in with valid credentials"
)]
fn reader_signs_in(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Administrator without a UID is rejected before the gateway"
)]
fn admin_without_uid_is_rejected(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Reading progress is saved for the signed-in reader"
)]
fn reading_progress_is_saved(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Sessions are restored when a page reloads"
)]
fn sessions_are_restored(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Expired sessions are discarded"
)]
fn expired_sessions_are_discarded(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Logging out clears the session"
)]
fn logging_out_clears_the_session(world: SessionWorld) {
    drop(world);
}
