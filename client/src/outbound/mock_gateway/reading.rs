//! `/reading` handlers.
//!
//! Progress is stored on the session user; the backend keeps the history log
//! and answers each user with their own entries.

use crate::api::ProgressUpdate;
use crate::domain::HistoryEntry;

use super::backend::{HandlerResult, MockBackend, Reply, session_error};

impl MockBackend {
    pub(super) fn reading_progress(&self) -> HandlerResult {
        let user = self.require_user()?;
        Reply::data(&user.preferences.reading_progress)
    }

    pub(super) fn save_reading_progress(&self, update: ProgressUpdate) -> HandlerResult {
        let user = self.require_user()?;
        let entry = self
            .session
            .save_reading_progress(update.book_id, update.chapter_id, update.progress)
            .map_err(session_error)?;
        self.state().history.push(HistoryEntry {
            user_id: user.id,
            book_id: update.book_id,
            chapter_id: entry.chapter_id,
            progress: entry.progress,
            timestamp: entry.timestamp,
        });
        Reply::data(&entry).map(|reply| reply.with_message("progress saved"))
    }

    /// The signed-in user's reading history, newest first.
    pub(super) fn reading_history(&self) -> HandlerResult {
        let user = self.require_user()?;
        let history: Vec<HistoryEntry> = self
            .state()
            .history()
            .iter()
            .rev()
            .filter(|entry| entry.user_id == user.id)
            .cloned()
            .collect();
        Reply::data(&history)
    }
}
