//! In-process location and notification adapters.
//!
//! [`HistoryNavigator`] resolves hrefs against the current URL the way a
//! browser does and keeps a back stack. [`TracingNotifier`] turns
//! notifications into log events.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};
use url::Url;

use crate::domain::ports::{NotificationKind, Navigator, Notifier};

#[derive(Debug)]
struct History {
    current: Url,
    previous: Vec<Url>,
}

/// Browser-like location with a back stack.
///
/// # Examples
/// ```
/// use flutterpage::domain::ports::Navigator;
/// use flutterpage::outbound::HistoryNavigator;
///
/// let nav = HistoryNavigator::parse("https://flutterpage.test/templates/home.html")
///     .expect("valid url");
/// nav.assign("book-detail.html?id=3");
/// assert_eq!(
///     nav.current_location().as_str(),
///     "https://flutterpage.test/templates/book-detail.html?id=3"
/// );
/// nav.back();
/// assert_eq!(nav.current_location().path(), "/templates/home.html");
/// ```
#[derive(Debug)]
pub struct HistoryNavigator {
    history: Mutex<History>,
}

impl HistoryNavigator {
    /// Navigator positioned at `start`.
    pub fn new(start: Url) -> Self {
        Self {
            history: Mutex::new(History {
                current: start,
                previous: Vec::new(),
            }),
        }
    }

    /// Navigator positioned at the parsed `start` URL.
    pub fn parse(start: &str) -> Result<Self, url::ParseError> {
        Url::parse(start).map(Self::new)
    }

    /// Every location visited so far, oldest first, ending with the current one.
    pub fn visited(&self) -> Vec<Url> {
        let history = self.history();
        history
            .previous
            .iter()
            .chain(std::iter::once(&history.current))
            .cloned()
            .collect()
    }

    fn history(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for HistoryNavigator {
    fn current_location(&self) -> Url {
        self.history().current.clone()
    }

    fn assign(&self, href: &str) {
        let mut history = self.history();
        match history.current.join(href) {
            Ok(next) => {
                debug!(from = %history.current, to = %next, "navigating");
                let previous = std::mem::replace(&mut history.current, next);
                history.previous.push(previous);
            }
            Err(error) => warn!(%error, href, "ignoring unresolvable navigation target"),
        }
    }

    fn back(&self) {
        let mut history = self.history();
        match history.previous.pop() {
            Some(previous) => history.current = previous,
            None => debug!("history is empty; staying put"),
        }
    }
}

/// Notifier that writes each message to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Error => warn!(%kind, message, "notification"),
            NotificationKind::Success | NotificationKind::Info => info!(%kind, message, "notification"),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn nav() -> HistoryNavigator {
        HistoryNavigator::parse("https://flutterpage.test/templates/author/author-dashboard.html")
            .expect("valid url")
    }

    #[rstest]
    #[case("works.html", "/templates/author/works.html")]
    #[case("../home.html", "/templates/home.html")]
    #[case("../templates/home.html", "/templates/templates/home.html")]
    #[case("/index.html", "/index.html")]
    fn hrefs_resolve_like_a_browser(nav: HistoryNavigator, #[case] href: &str, #[case] path: &str) {
        nav.assign(href);
        assert_eq!(nav.current_location().path(), path);
    }

    #[rstest]
    fn back_on_empty_history_is_a_no_op(nav: HistoryNavigator) {
        let before = nav.current_location();
        nav.back();
        assert_eq!(nav.current_location(), before);
    }

    #[rstest]
    fn visited_lists_the_trail(nav: HistoryNavigator) {
        nav.assign("../home.html");
        nav.assign("book-detail.html?id=1");
        let paths: Vec<String> = nav.visited().iter().map(|url| url.path().to_owned()).collect();
        assert_eq!(
            paths,
            [
                "/templates/author/author-dashboard.html",
                "/templates/home.html",
                "/templates/book-detail.html",
            ]
        );
    }
}
