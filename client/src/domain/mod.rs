//! Domain model for the reading platform client.
//!
//! Purpose: define strongly typed users, roles, preferences, catalogue values,
//! and the session manager that ties them to persisted state. Keep types
//! immutable where possible and free of adapter concerns.
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failures.
//! - [`User`], [`Role`], [`UserPreferences`]: identity and preference bag.
//! - [`LoginCredentials`], [`RegistrationForm`], [`AuthorRegistrationForm`]:
//!   validated inputs.
//! - [`SessionManager`]: in-memory identity plus role-gated access.
//! - Catalogue values served by the mock gateway ([`Book`], [`Chapter`],
//!   [`Comment`], ...).
//! - [`TraceId`]: request-scoped correlation identifier.

pub mod auth;
pub mod catalogue;
pub mod error;
pub mod format;
pub mod ports;
pub mod preferences;
pub mod role;
pub mod session;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    AuthorRegistration, AuthorRegistrationForm, LoginCredentials, LoginValidationError,
    PASSWORD_MIN, PEN_NAME_MIN, Registration, RegistrationError, RegistrationForm, USERNAME_MIN,
    is_valid_email, is_valid_id_number, is_valid_phone,
};
pub use self::catalogue::{
    Book, BookId, BookStatus, BookUpdate, CatalogueValidationError, Chapter, ChapterId,
    ChapterSummary, ChapterUpdate, ChapterView, Comment, CommentId, HistoryEntry, NewBook,
    NewChapter, NewComment, SearchScope, count_characters,
};
pub use self::error::{Error, ErrorCode};
pub use self::format::{compact_count, relative_time};
pub use self::preferences::{
    DEFAULT_FONT_SIZE, DEFAULT_THEME, FONT_SIZE_MAX, FONT_SIZE_MIN, PreferencesError,
    PreferencesPatch, ProgressPercent, ReadingProgress, UserPreferences,
};
pub use self::role::{ParseRoleError, Role};
pub use self::session::{SessionError, SessionManager};
pub use self::trace_id::TraceId;
pub use self::user::{
    AUTHOR_ID_DIGITS, AdminProfile, AuthToken, AuthorId, AuthorIdError, AuthorProfile, Permission,
    User, UserId,
};
