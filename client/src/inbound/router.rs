//! Page-to-page navigation and role gates.
//!
//! The router builds hrefs relative to the page currently shown, hands them
//! to the [`Navigator`] port, and turns failed access checks into a
//! notification followed by a delayed redirect.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::ports::{NotificationKind, Navigator, Notifier, SessionStore, Sleeper};
use crate::domain::{BookId, ChapterId, Role};

/// Delay before the redirect that follows a denied access check.
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(2_000);
/// Delay before sending a signed-out visitor to the login page.
pub const LOGIN_REDIRECT_DELAY: Duration = Duration::from_millis(1_500);

/// Pages reachable without a session.
pub const PUBLIC_PAGES: [&str; 2] = ["index.html", "main-index.html"];

const LOGIN_PAGE: &str = "index.html";
const HOME_PAGE: &str = "home.html";
const AUTHOR_DASHBOARD: &str = "author/author-dashboard.html";
const ADMIN_DASHBOARD: &str = "admin/admin-dashboard.html";
const TEMPLATES_DIR: &str = "/templates/";

/// Navigation helper bound to one page.
pub struct Router {
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    sleeper: Arc<dyn Sleeper>,
    store: Arc<dyn SessionStore>,
    redirect_delay: Duration,
}

impl Router {
    /// Router over the given browser ports and stored session.
    pub fn new(
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        sleeper: Arc<dyn Sleeper>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            navigator,
            notifier,
            sleeper,
            store,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
        }
    }

    /// Override the delay used before redirecting a denied visitor home.
    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    /// Delay before a denied visitor is sent home.
    pub fn redirect_delay(&self) -> Duration {
        self.redirect_delay
    }

    /// Href that [`Router::navigate_to`] would follow from the current page.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use flutterpage::inbound::Router;
    /// use flutterpage::outbound::{HistoryNavigator, TracingNotifier};
    /// use flutterpage::outbound::mock_gateway::TokioSleeper;
    /// use flutterpage::outbound::storage::{MemoryKeyValueStore, UserStore};
    ///
    /// let navigator = HistoryNavigator::parse("https://flutterpage.test/static/index.html")
    ///     .expect("valid url");
    /// let store = UserStore::new(
    ///     Arc::new(MemoryKeyValueStore::new()),
    ///     Arc::new(mockable::DefaultClock),
    /// );
    /// let router = Router::new(
    ///     Arc::new(navigator),
    ///     Arc::new(TracingNotifier),
    ///     Arc::new(TokioSleeper),
    ///     Arc::new(store),
    /// );
    /// assert_eq!(
    ///     router.resolve("author/works.html", &[("tab", "drafts")]),
    ///     "../templates/author/works.html?tab=drafts"
    /// );
    /// ```
    pub fn resolve(&self, page: &str, params: &[(&str, &str)]) -> String {
        let mut href = if page.starts_with('/') || !page.contains('/') {
            page.to_owned()
        } else if self.navigator.current_location().path().contains(TEMPLATES_DIR) {
            page.to_owned()
        } else {
            format!("..{TEMPLATES_DIR}{page}")
        };
        if !params.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params)
                .finish();
            href.push('?');
            href.push_str(&query);
        }
        href
    }

    /// Navigate to `page` with `params` as its query string.
    pub fn navigate_to(&self, page: &str, params: &[(&str, &str)]) {
        let href = self.resolve(page, params);
        debug!(%href, from = %self.navigator.current_location(), "page navigation");
        self.navigator.assign(&href);
    }

    /// First value of the query parameter `name` on the current page.
    pub fn url_param(&self, name: &str) -> Option<String> {
        self.navigator
            .current_location()
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Every query parameter on the current page; later duplicates win.
    pub fn all_url_params(&self) -> BTreeMap<String, String> {
        self.navigator
            .current_location()
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    /// Whether every parameter in `names` is present and non-empty.
    pub fn check_required_params(&self, names: &[&str]) -> bool {
        let params = self.all_url_params();
        match names
            .iter()
            .find(|name| params.get(**name).is_none_or(String::is_empty))
        {
            Some(missing) => {
                warn!(param = *missing, "required page parameter missing");
                false
            }
            None => true,
        }
    }

    /// Open the detail page of `book`.
    pub fn go_to_book_detail(&self, book: BookId) {
        self.navigate_to("book-detail.html", &[("id", &book.to_string())]);
    }

    /// Open the reader at `chapter`, or at the first chapter.
    pub fn go_to_reading_page(&self, book: BookId, chapter: Option<ChapterId>) {
        let chapter = chapter.unwrap_or(ChapterId::new(1));
        self.navigate_to(
            "chapter-reading.html",
            &[
                ("bookId", &book.to_string()),
                ("chapterId", &chapter.to_string()),
            ],
        );
    }

    /// Open the comment section of `book`.
    pub fn go_to_comments(&self, book: BookId) {
        self.navigate_to("comments-section.html", &[("bookId", &book.to_string())]);
    }

    /// Open the author dashboard.
    pub fn go_to_author_dashboard(&self) {
        self.navigate_to(AUTHOR_DASHBOARD, &[]);
    }

    /// Open the admin dashboard.
    pub fn go_to_admin_dashboard(&self) {
        self.navigate_to(ADMIN_DASHBOARD, &[]);
    }

    /// Send the visitor to the landing page of their stored role.
    pub fn redirect_to_home(&self) {
        match self.store.get_user_role() {
            Some(Role::Author) => self.go_to_author_dashboard(),
            Some(Role::Admin) => self.go_to_admin_dashboard(),
            Some(Role::Reader) | None => self.navigate_to(HOME_PAGE, &[]),
        }
    }

    /// Send the visitor to the login page.
    pub fn redirect_to_login(&self) {
        self.navigate_to(LOGIN_PAGE, &[]);
    }

    /// Return to the previous page.
    pub fn go_back(&self) {
        self.navigator.back();
    }

    /// Show `message` through the notification port.
    pub fn notify(&self, message: &str, kind: NotificationKind) {
        self.notifier.notify(message, kind);
    }

    /// Wait `delay`, then send the visitor home.
    pub async fn redirect_to_home_after(&self, delay: Duration) {
        self.sleeper.sleep(delay).await;
        self.redirect_to_home();
    }

    /// Wait `delay`, then send the visitor to the login page.
    pub async fn redirect_to_login_after(&self, delay: Duration) {
        self.sleeper.sleep(delay).await;
        self.redirect_to_login();
    }

    /// Allow the page when the stored role satisfies `required`; otherwise
    /// notify, wait, and redirect home.
    pub async fn check_and_redirect(&self, required: Role) -> bool {
        let allowed = self
            .store
            .get_user_role()
            .is_some_and(|role| role.satisfies(required));
        if allowed {
            return true;
        }
        info!(%required, "access denied");
        self.notify(
            "you do not have permission to access this page",
            NotificationKind::Error,
        );
        self.redirect_to_home_after(self.redirect_delay).await;
        false
    }

    /// Gate the current page on a session holding at least `required`.
    ///
    /// Public pages always pass. Visitors without a session, or whose stored
    /// role went missing, are sent to the login page.
    pub async fn check_page_access(&self, required: Role) -> bool {
        if self.is_public_page() {
            return true;
        }
        if !self.store.is_logged_in() {
            return self.deny_to_login("please log in first").await;
        }
        let Some(role) = self.store.get_user_role() else {
            return self
                .deny_to_login("role information lost, please log in again")
                .await;
        };
        if role.satisfies(required) {
            return true;
        }

        let message = match required {
            Role::Admin => "you do not have administrator permission",
            Role::Author | Role::Reader => "you do not have author permission",
        };
        info!(%role, %required, "page access denied");
        self.notify(message, NotificationKind::Error);
        self.redirect_to_home_after(self.redirect_delay).await;
        false
    }

    /// Path of the page currently shown.
    pub fn current_path(&self) -> String {
        self.navigator.current_location().path().to_owned()
    }

    /// Whether the current page is served to visitors without a session.
    pub fn is_public_page(&self) -> bool {
        let location = self.navigator.current_location();
        let page = location.path().rsplit('/').next().unwrap_or_default();
        PUBLIC_PAGES.contains(&page)
    }

    async fn deny_to_login(&self, message: &str) -> bool {
        info!(reason = message, "redirecting to login");
        self.notify(message, NotificationKind::Error);
        self.redirect_to_login_after(LOGIN_REDIRECT_DELAY).await;
        false
    }
}
