//! User roles and the access hierarchy between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Platform role held by a signed-in user.
///
/// Roles form a strict hierarchy: admin ⊇ author ⊇ reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Reads books and leaves comments.
    Reader,
    /// Publishes books and chapters.
    Author,
    /// Manages users, books, and system settings.
    Admin,
}

impl Role {
    /// All roles, lowest privilege first.
    pub const ALL: [Self; 3] = [Self::Reader, Self::Author, Self::Admin];

    /// Stable storage representation.
    ///
    /// # Examples
    /// ```
    /// use flutterpage::domain::Role;
    ///
    /// assert_eq!(Role::Author.as_str(), "author");
    /// ```
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reader => "reader",
            Self::Author => "author",
            Self::Admin => "admin",
        }
    }

    /// Human-facing label used in greetings.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reader => "Reader",
            Self::Author => "Author",
            Self::Admin => "Admin",
        }
    }

    /// Whether a holder of `self` may enter an area requiring `required`.
    ///
    /// # Examples
    /// ```
    /// use flutterpage::domain::Role;
    ///
    /// assert!(Role::Admin.satisfies(Role::Author));
    /// assert!(Role::Author.satisfies(Role::Reader));
    /// assert!(!Role::Reader.satisfies(Role::Author));
    /// ```
    pub const fn satisfies(self, required: Self) -> bool {
        matches!(
            (self, required),
            (Self::Admin, _) | (Self::Author, Self::Author | Self::Reader) | (Self::Reader, Self::Reader)
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {value}")]
pub struct ParseRoleError {
    value: String,
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reader" => Ok(Self::Reader),
            "author" => Ok(Self::Author),
            "admin" => Ok(Self::Admin),
            other => Err(ParseRoleError {
                value: other.to_owned(),
            }),
        }
    }
}
