//! Session persistence through the directory-backed store.

// `expect` is idiomatic in test code for failing fast on precondition violations.
#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::sync::Arc;

use chrono::TimeDelta;
use flutterpage::domain::ports::{KeyValueStore, SessionStore};
use flutterpage::domain::{AuthToken, Role, User, UserId};
use flutterpage::outbound::storage::{
    CURRENT_USER_KEY, FileKeyValueStore, LAST_AUTHOR_ID_KEY, UserStore,
};
use flutterpage::test_support::{MutableClock, fixed_now, temp_file_store};
use rstest::rstest;

fn reader() -> User {
    User::for_role(UserId::new(7), "alice", Role::Reader, None)
}

#[rstest]
fn sessions_survive_reopening_the_directory() {
    let (dir, kv) = temp_file_store();
    let root = kv.root().to_owned();
    let clock = Arc::new(MutableClock::new(fixed_now()));

    let store = UserStore::new(Arc::new(kv), clock.clone());
    assert!(store.save_user(&reader()));
    assert!(store.save_user_role(Role::Reader));
    assert!(store.save_auth_token(&AuthToken::new("mock_jwt_1_abc")));
    drop(store);

    let reopened = FileKeyValueStore::open(&root).expect("reopen storage");
    let store = UserStore::new(Arc::new(reopened), clock);
    assert_eq!(store.get_user(), Some(reader()));
    assert_eq!(store.get_user_role(), Some(Role::Reader));
    assert_eq!(
        store.get_auth_token().map(|token| token.as_str().to_owned()),
        Some("mock_jwt_1_abc".to_owned())
    );
    drop(dir);
}

#[rstest]
fn expiry_deletes_the_record_from_disk() {
    let (_dir, kv) = temp_file_store();
    let kv = Arc::new(kv);
    let clock = Arc::new(MutableClock::new(fixed_now()));
    let store = UserStore::with_ttl(kv.clone(), clock.clone(), TimeDelta::hours(1));
    assert!(store.save_user(&reader()));

    clock.advance_seconds(3_601);

    assert_eq!(store.get_user(), None);
    assert_eq!(store.get_user(), None);
    assert_eq!(kv.get(CURRENT_USER_KEY).expect("readable"), None);
}

#[rstest]
fn corrupt_records_read_as_signed_out() {
    let (_dir, kv) = temp_file_store();
    kv.set(CURRENT_USER_KEY, "{not json").expect("write garbage");
    let store = UserStore::new(Arc::new(kv), Arc::new(MutableClock::new(fixed_now())));

    assert_eq!(store.get_user(), None);
    assert!(!store.is_logged_in());
}

#[rstest]
fn clear_all_resets_the_author_counter() {
    let (_dir, kv) = temp_file_store();
    let kv = Arc::new(kv);
    let store = UserStore::new(kv.clone(), Arc::new(MutableClock::new(fixed_now())));
    let first = store.next_author_id().expect("allocate");
    assert_eq!(first.to_string(), "000000002");
    assert!(kv.get(LAST_AUTHOR_ID_KEY).expect("readable").is_some());

    store.clear_all();

    assert_eq!(kv.get(LAST_AUTHOR_ID_KEY).expect("readable"), None);
    assert_eq!(store.next_author_id().expect("allocate"), first);
}
