//! Port for transient on-screen notifications.

use std::fmt;

/// Visual flavour of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// An action completed.
    Success,
    /// An action failed or was refused.
    Error,
    /// Neutral information.
    Info,
}

impl NotificationKind {
    /// Stable name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shows short-lived messages to the user.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Display `message` with the given styling.
    fn notify(&self, message: &str, kind: NotificationKind);
}
