//! `/auth` and `/user` handlers.
//!
//! Login is the only place the authenticated session is written.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::warn;

use crate::api::{AuthorIdData, LoginData, LoginRequest};
use crate::domain::{
    AuthToken, AuthorRegistrationForm, Error, RegistrationError, RegistrationForm, Role, User,
};

use super::backend::{HandlerResult, MockBackend, Reply, invalid};

const TOKEN_PREFIX: &str = "mock_jwt";
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

impl MockBackend {
    pub(super) fn login(&self, login: &LoginRequest) -> HandlerResult {
        let credentials = self
            .session
            .login(
                &login.identifier,
                &login.password,
                login.role,
                login.uid.as_deref(),
            )
            .map_err(invalid)?;

        let now = self.clock.utc();
        let role = credentials.role();
        let author_id = match role {
            Role::Author => Some(self.session.allocate_author_id().map_err(|err| {
                warn!(error = %err, "author id counter unavailable");
                Error::internal(format!("could not allocate an author id: {err}"))
            })?),
            Role::Reader | Role::Admin => None,
        };
        let user_id = self.state().account_id(credentials.identifier());
        let user = User::for_role(user_id, credentials.identifier(), role, author_id);
        let token = mint_token(now);

        self.session.establish(user.clone(), &token);
        Reply::data(&LoginData { user, token, role }).map(|reply| reply.with_message("login succeeded"))
    }

    pub(super) fn register(&self, form: &RegistrationForm) -> HandlerResult {
        let registration = self.session.register(form).map_err(invalid)?;
        Reply::data(&registration)
            .map(|reply| reply.with_message("registration succeeded, please log in"))
    }

    pub(super) fn register_author(&self, form: AuthorRegistrationForm) -> HandlerResult {
        let registration = self
            .session
            .register_author(form)
            .map_err(|err| match err {
                RegistrationError::AuthorIdUnavailable { .. } => Error::internal(err.to_string()),
                other => invalid(other),
            })?;
        let data = AuthorIdData {
            author_id: registration.author_id,
        };
        Reply::data(&data).map(|reply| reply.with_message("author registration succeeded, please log in"))
    }

    pub(super) fn logout(&self) -> Reply {
        self.session.logout();
        Reply::message("logged out")
    }

    pub(super) fn profile(&self) -> HandlerResult {
        let user = self.require_user()?;
        Reply::data(&user)
    }
}

/// `mock_jwt_<millis>_<base36 suffix>`.
fn mint_token(now: DateTime<Utc>) -> AuthToken {
    let suffix = to_base36(rand::thread_rng().r#gen::<u64>());
    AuthToken::new(format!("{TOKEN_PREFIX}_{}_{suffix}", now.timestamp_millis()))
}

fn to_base36(mut value: u64) -> String {
    let mut digits = Vec::new();
    loop {
        let index = usize::try_from(value % 36).unwrap_or_default();
        digits.push(char::from(BASE36[index]));
        value /= 36;
        if value == 0 {
            break;
        }
    }
    digits.iter().rev().collect()
}
