//! User data model.
//!
//! A [`User`] never carries a password, so every copy handed out by the
//! session layer is already sanitized.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Role, UserPreferences};

/// Numeric user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of digits in a rendered author identifier.
pub const AUTHOR_ID_DIGITS: usize = 9;

/// Validation errors returned by [`AuthorId::from_str`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorIdError {
    /// Not exactly nine ASCII digits.
    #[error("author id must be exactly nine digits")]
    InvalidFormat,
}

/// Nine-digit author identifier such as `000000002`.
///
/// # Examples
/// ```
/// use flutterpage::domain::AuthorId;
///
/// let id: AuthorId = "000000041".parse().expect("valid id");
/// assert_eq!(id.next().to_string(), "000000042");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthorId(u64);

impl AuthorId {
    /// Seed value of the author-id sequence.
    pub const FIRST: Self = Self(1);

    /// Wrap a raw sequence number.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw sequence number.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The identifier after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = AUTHOR_ID_DIGITS)
    }
}

impl FromStr for AuthorId {
    type Err = AuthorIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != AUTHOR_ID_DIGITS || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AuthorIdError::InvalidFormat);
        }
        s.parse().map(Self).map_err(|_| AuthorIdError::InvalidFormat)
    }
}

impl From<AuthorId> for String {
    fn from(value: AuthorId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for AuthorId {
    type Error = AuthorIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Administrative capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Manage user accounts.
    Users,
    /// Moderate books.
    Books,
    /// Change system settings.
    System,
}

impl Permission {
    /// Every permission, granted to administrators at login.
    pub const ALL: [Self; 3] = [Self::Users, Self::Books, Self::System];
}

/// Author-only user fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorProfile {
    /// Nine-digit author id.
    pub author_id: AuthorId,
    /// Name shown on published books.
    pub pen_name: String,
}

/// Admin-only user fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    /// Granted capabilities.
    pub permissions: Vec<Permission>,
}

/// Signed-in platform user.
///
/// ## Invariants
/// - `author` is present only for authors; `admin` only for admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Account id.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Account role.
    pub role: Role,
    /// Display and reading preferences.
    #[serde(default)]
    pub preferences: UserPreferences,
    /// Present for authors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorProfile>,
    /// Present for admins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminProfile>,
}

impl User {
    /// Build a reader, author, or admin with default preferences.
    ///
    /// Authors receive `author_id` and use the username as pen name; admins
    /// receive every [`Permission`].
    ///
    /// # Examples
    /// ```
    /// use flutterpage::domain::{Role, User, UserId};
    ///
    /// let user = User::for_role(UserId::new(7), "alice", Role::Reader, None);
    /// assert_eq!(user.email, "alice@example.com");
    /// assert!(user.author.is_none());
    /// ```
    pub fn for_role(
        id: UserId,
        identifier: &str,
        role: Role,
        author_id: Option<AuthorId>,
    ) -> Self {
        let email = if identifier.contains('@') {
            identifier.to_owned()
        } else {
            format!("{identifier}@example.com")
        };
        let author = match role {
            Role::Author => Some(AuthorProfile {
                author_id: author_id.unwrap_or(AuthorId::FIRST),
                pen_name: identifier.to_owned(),
            }),
            Role::Reader | Role::Admin => None,
        };
        let admin = match role {
            Role::Admin => Some(AdminProfile {
                permissions: Permission::ALL.to_vec(),
            }),
            Role::Reader | Role::Author => None,
        };

        Self {
            id,
            username: identifier.to_owned(),
            email,
            role,
            preferences: UserPreferences::default(),
            author,
            admin,
        }
    }

    /// The author identifier when this user is an author.
    pub fn author_id(&self) -> Option<AuthorId> {
        self.author.as_ref().map(|profile| profile.author_id)
    }
}

/// Opaque bearer token minted at login.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the raw token.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
