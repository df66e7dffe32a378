//! Storage adapters: key-value stores and the session record built on them.

mod file_store;
mod memory_store;
mod user_store;

pub use file_store::FileKeyValueStore;
pub use memory_store::MemoryKeyValueStore;
pub use user_store::{
    ALL_KEYS, AUTH_TOKEN_KEY, CURRENT_USER_KEY, DEFAULT_SESSION_TTL, LAST_AUTHOR_ID_KEY,
    LOGIN_TIME_KEY, READING_PROGRESS_KEY, USER_PREFERENCES_KEY, USER_ROLE_KEY, UserStore,
};
