//! Port for the browser location and history.

use url::Url;

/// Location and history of the current page.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// URL of the page currently shown.
    fn current_location(&self) -> Url;

    /// Perform a full navigation to `href`, resolved against the current
    /// location.
    fn assign(&self, href: &str);

    /// Step back one entry in the history.
    fn back(&self);
}
