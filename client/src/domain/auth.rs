//! Authentication primitives: login credentials and registration forms.
//!
//! Everything here is pure validation. Establishing a session is the mock
//! gateway's job; these constructors only decide whether the inputs are
//! well-formed enough to send.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

use super::{AuthorId, Role};

/// Minimum username length accepted at registration.
pub const USERNAME_MIN: usize = 3;
/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 6;
/// Minimum pen name length accepted at author registration.
pub const PEN_NAME_MIN: usize = 2;

/// Domain error returned when login inputs are incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginValidationError {
    /// Username or email was missing or blank once trimmed.
    #[error("please enter your username or email and password")]
    EmptyIdentifier,
    /// Password was empty.
    #[error("please enter your username or email and password")]
    EmptyPassword,
    /// Admin logins must name an administrator UID.
    #[error("administrators must provide a UID")]
    MissingAdminUid,
}

/// Validated login credentials, ready to hand to the gateway.
///
/// ## Invariants
/// - `identifier` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
/// - `admin_uid` is present whenever `role` is [`Role::Admin`].
///
/// # Examples
/// ```
/// use flutterpage::domain::{LoginCredentials, Role};
///
/// let creds = LoginCredentials::try_from_parts(" alice ", "secret1", Role::Reader, None)
///     .expect("valid credentials");
/// assert_eq!(creds.identifier(), "alice");
/// assert_eq!(creds.role(), Role::Reader);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    identifier: String,
    password: Zeroizing<String>,
    role: Role,
    admin_uid: Option<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(
        identifier: &str,
        password: &str,
        role: Role,
        admin_uid: Option<&str>,
    ) -> Result<Self, LoginValidationError> {
        let normalized = identifier.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyIdentifier);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        let admin_uid = admin_uid
            .map(str::trim)
            .filter(|uid| !uid.is_empty())
            .map(str::to_owned);
        if role == Role::Admin && admin_uid.is_none() {
            return Err(LoginValidationError::MissingAdminUid);
        }

        Ok(Self {
            identifier: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
            role,
            admin_uid,
        })
    }

    /// Username or email used to sign in.
    pub fn identifier(&self) -> &str {
        self.identifier.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Role the user is signing in as.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Administrator UID, present for admin logins.
    pub fn admin_uid(&self) -> Option<&str> {
        self.admin_uid.as_deref()
    }
}

/// Client-side registration failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A required field is blank.
    #[error("please fill in all required fields")]
    MissingFields,
    /// The username is too short.
    #[error("username must be at least {min} characters")]
    UsernameTooShort {
        /// Minimum length in characters.
        min: usize,
    },
    /// The password is too short.
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum length in characters.
        min: usize,
    },
    /// The email address is malformed.
    #[error("email address is not valid")]
    InvalidEmail,
    /// The pen name is too short.
    #[error("pen name must be at least {min} characters")]
    PenNameTooShort {
        /// Minimum length in characters.
        min: usize,
    },
    /// The phone is not a mainland mobile number.
    #[error("please enter a valid mobile number")]
    InvalidPhone,
    /// The identity number has the wrong shape.
    #[error("please enter a valid identity card number")]
    InvalidIdNumber,
    /// The author id counter could not be advanced.
    #[error("could not allocate an author id: {message}")]
    AuthorIdUnavailable {
        /// Storage failure.
        message: String,
    },
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();
static ID_NUMBER_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        // Mainland China mobile numbers.
        Regex::new(r"^1[3-9]\d{9}$")
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

fn id_number_regex() -> &'static Regex {
    ID_NUMBER_RE.get_or_init(|| {
        Regex::new(r"^\d{15}$|^\d{18}$|^\d{17}[\dXx]$")
            .unwrap_or_else(|error| panic!("id number regex failed to compile: {error}"))
    })
}

/// Whether `email` looks like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Whether `phone` is an eleven-digit mainland mobile number.
pub fn is_valid_phone(phone: &str) -> bool {
    phone_regex().is_match(phone)
}

/// Whether `id_number` is a 15 or 18 character identity card number.
pub fn is_valid_id_number(id_number: &str) -> bool {
    id_number_regex().is_match(id_number)
}

fn check_account_fields(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), RegistrationError> {
    if username.chars().count() < USERNAME_MIN {
        return Err(RegistrationError::UsernameTooShort { min: USERNAME_MIN });
    }
    if password.chars().count() < PASSWORD_MIN {
        return Err(RegistrationError::PasswordTooShort { min: PASSWORD_MIN });
    }
    if !is_valid_email(email) {
        return Err(RegistrationError::InvalidEmail);
    }
    Ok(())
}

/// Raw reader registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    /// Desired username.
    #[serde(default)]
    pub username: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
    /// Requested role, reader by default.
    #[serde(default = "default_role")]
    pub role: Role,
}

const fn default_role() -> Role {
    Role::Reader
}

/// A registration that passed client-side validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Accepted username.
    pub username: String,
    /// Accepted email.
    pub email: String,
    /// Granted role.
    pub role: Role,
}

impl RegistrationForm {
    /// Validate the form. The password is checked but not retained.
    ///
    /// # Examples
    /// ```
    /// use flutterpage::domain::{RegistrationError, RegistrationForm, Role};
    ///
    /// let form = RegistrationForm {
    ///     username: "al".into(),
    ///     email: "al@example.com".into(),
    ///     password: "secret1".into(),
    ///     role: Role::Reader,
    /// };
    /// assert_eq!(form.validate(), Err(RegistrationError::UsernameTooShort { min: 3 }));
    /// ```
    pub fn validate(&self) -> Result<Registration, RegistrationError> {
        if [&self.username, &self.email, &self.password]
            .iter()
            .any(|field| field.is_empty())
        {
            return Err(RegistrationError::MissingFields);
        }
        check_account_fields(&self.username, &self.email, &self.password)?;
        Ok(Registration {
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
        })
    }
}

/// Raw author registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRegistrationForm {
    /// Desired username.
    #[serde(default)]
    pub username: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
    /// Name shown on published books.
    #[serde(default)]
    pub pen_name: String,
    /// Legal name.
    #[serde(default)]
    pub real_name: String,
    /// Mainland mobile number.
    #[serde(default)]
    pub phone: String,
    /// Identity card number.
    #[serde(default, alias = "idCard")]
    pub id_number: String,
}

/// An author registration that passed validation and holds its author id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRegistration {
    /// Accepted username.
    pub username: String,
    /// Accepted email.
    pub email: String,
    /// Accepted pen name.
    pub pen_name: String,
    /// Allocated author id.
    pub author_id: AuthorId,
}

impl AuthorRegistrationForm {
    /// Validate every field. The author id is allocated by the caller once
    /// this succeeds.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        let required = [
            &self.username,
            &self.email,
            &self.password,
            &self.pen_name,
            &self.real_name,
            &self.phone,
            &self.id_number,
        ];
        if required.iter().any(|field| field.is_empty()) {
            return Err(RegistrationError::MissingFields);
        }
        check_account_fields(&self.username, &self.email, &self.password)?;
        if self.pen_name.chars().count() < PEN_NAME_MIN {
            return Err(RegistrationError::PenNameTooShort { min: PEN_NAME_MIN });
        }
        if !is_valid_phone(&self.phone) {
            return Err(RegistrationError::InvalidPhone);
        }
        if !is_valid_id_number(&self.id_number) {
            return Err(RegistrationError::InvalidIdNumber);
        }
        Ok(())
    }

    /// Pair the validated form with its allocated author id.
    pub fn into_registration(self, author_id: AuthorId) -> AuthorRegistration {
        AuthorRegistration {
            username: self.username,
            email: self.email,
            pen_name: self.pen_name,
            author_id,
        }
    }
}
