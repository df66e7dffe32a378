//! Port for persisting the signed-in session.
//!
//! The session store owns the expiring user record and the scalar keys that
//! travel with it (role, token, login time). Implementations swallow and log
//! storage failures: reads degrade to "nothing stored" and writes report
//! `false`.

use chrono::{DateTime, Utc};

use crate::domain::{AuthToken, AuthorId, Role, User};

use super::KeyValueStoreError;

/// Persistence for the current session.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Persist `user` with a fresh expiry. Returns whether the write landed.
    fn save_user(&self, user: &User) -> bool;

    /// The stored user, or `None` when absent, corrupt, or expired. An
    /// expired record is deleted together with its related keys.
    fn get_user(&self) -> Option<User>;

    /// Remove the user record, role, auth token, and login time together.
    fn clear_user(&self);

    /// Persist the signed-in role.
    fn save_user_role(&self, role: Role) -> bool;

    /// The persisted role, if any.
    fn get_user_role(&self) -> Option<Role>;

    /// Persist the bearer token minted at login.
    fn save_auth_token(&self, token: &AuthToken) -> bool;

    /// The persisted bearer token, if any.
    fn get_auth_token(&self) -> Option<AuthToken>;

    /// Record the current time as the login time.
    fn save_login_time(&self) -> bool;

    /// When the current session logged in.
    fn get_login_time(&self) -> Option<DateTime<Utc>>;

    /// Remove every key owned by the store.
    fn clear_all(&self);

    /// Advance the persisted author-id counter and return the new value.
    fn next_author_id(&self) -> Result<AuthorId, KeyValueStoreError>;

    /// Whether an unexpired user record is present.
    fn is_logged_in(&self) -> bool {
        self.get_user().is_some()
    }
}
