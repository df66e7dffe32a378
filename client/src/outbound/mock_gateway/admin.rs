//! `/admin` handlers. Every route requires the admin role.

use crate::api::{AdminBookStats, AdminStats, AdminUserStats};
use crate::domain::BookStatus;

use super::backend::{HandlerResult, MockBackend, Reply};

/// The mock backend keeps no user directory, so user counts are fixed.
const USER_STATS: AdminUserStats = AdminUserStats {
    total: 150,
    active: 120,
    new_today: 5,
};

impl MockBackend {
    pub(super) fn admin_users(&self) -> HandlerResult {
        self.require_admin()?;
        Reply::data(&USER_STATS)
    }

    pub(super) fn admin_books(&self) -> HandlerResult {
        self.require_admin()?;
        let state = self.state();
        let completed = state
            .books()
            .iter()
            .filter(|book| book.status == BookStatus::Completed)
            .count();
        let total = state.books().len();
        Reply::data(&AdminBookStats {
            total,
            serializing: total - completed,
            completed,
        })
    }

    pub(super) fn admin_stats(&self) -> HandlerResult {
        self.require_admin()?;
        let state = self.state();
        Reply::data(&AdminStats {
            books: state.books().len(),
            chapters: state.chapter_total(),
            comments: state.comments().len(),
            total_views: state.books().iter().map(|book| book.views).sum(),
        })
    }
}
