//! Per-page bootstrap tying the session, gateway client, and router together.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::api::ApiClient;
use crate::domain::ports::NotificationKind;
use crate::domain::{Role, SessionManager, User};

use super::router::{LOGIN_REDIRECT_DELAY, Router};

/// Delay before a signed-in visitor on the login page is sent home.
pub const SIGNED_IN_REDIRECT_DELAY: Duration = Duration::from_millis(1_000);

/// Everything a page script needs once the page has loaded.
pub struct PageContext {
    session: Arc<SessionManager>,
    client: ApiClient,
    router: Router,
}

impl PageContext {
    /// Restore the session and, when a signed-in visitor lands on the login
    /// page, send them home.
    pub async fn open(session: Arc<SessionManager>, client: ApiClient, router: Router) -> Self {
        let user = session.init();
        let path = router.current_path();
        match &user {
            Some(user) if path.contains("index.html") => {
                info!(username = %user.username, "already signed in; leaving the login page");
                router.redirect_to_home_after(SIGNED_IN_REDIRECT_DELAY).await;
            }
            Some(user) => info!(username = %user.username, %path, "page opened"),
            None => info!(%path, "page opened anonymously"),
        }
        Self {
            session,
            client,
            router,
        }
    }

    /// Session manager behind the page.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Gateway client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Router for this page.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    /// Gate the page on `required`, redirecting when access is denied.
    pub async fn require(&self, required: Role) -> bool {
        self.router.check_page_access(required).await
    }

    /// Greeting for the header, e.g. `Welcome, alice (Reader)`.
    pub fn welcome_message(&self) -> Option<String> {
        self.session
            .current_user()
            .map(|user| format!("Welcome, {} ({})", user.username, user.role.label()))
    }

    /// Sign out through the gateway, confirm, and return to the login page.
    pub async fn logout(&self) {
        match self.client.user().logout().await {
            Ok(response) if response.success => {}
            Ok(response) => {
                warn!(message = ?response.message, "gateway refused logout; clearing locally");
                self.session.logout();
            }
            Err(error) => {
                warn!(%error, "logout request failed; clearing locally");
                self.session.logout();
            }
        }
        self.router.notify("logged out", NotificationKind::Success);
        self.router.redirect_to_login_after(LOGIN_REDIRECT_DELAY).await;
    }

    /// Drop the in-memory session when the page unloads.
    pub fn close(&self) {
        self.session.close();
    }
}
