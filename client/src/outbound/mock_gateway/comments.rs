//! Comment handlers.

use std::cmp::Reverse;

use tracing::info;

use crate::domain::{BookId, Comment, CommentId, Error, NewComment};

use super::backend::{HandlerResult, MockBackend, Reply, invalid};

impl MockBackend {
    /// Comments on a book, newest first.
    pub(super) fn list_comments(&self, book_id: BookId) -> HandlerResult {
        let state = self.state();
        if state.book(book_id).is_none() {
            return Err(Error::not_found("book not found"));
        }
        let mut comments: Vec<Comment> = state
            .comments()
            .iter()
            .filter(|comment| comment.book_id == book_id)
            .cloned()
            .collect();
        comments.sort_by_key(|comment| Reverse((comment.created_at, comment.id)));
        Reply::data(&comments)
    }

    pub(super) fn create_comment(&self, book_id: BookId, new_comment: &NewComment) -> HandlerResult {
        let user = self.require_user()?;
        new_comment.validate().map_err(invalid)?;

        let now = self.clock.utc();
        let mut state = self.state();
        if state.book(book_id).is_none() {
            return Err(Error::not_found("book not found"));
        }
        let comment = Comment {
            id: state.next_comment_id(),
            book_id,
            user_id: user.id,
            username: user.username,
            content: new_comment.content.trim().to_owned(),
            likes: 0,
            created_at: now,
        };
        state.comments.push(comment.clone());
        info!(book_id = %book_id, comment_id = %comment.id, "comment posted");
        Reply::data(&comment).map(|reply| reply.with_message("comment posted"))
    }

    pub(super) fn like_comment(&self, comment_id: CommentId) -> HandlerResult {
        let mut state = self.state();
        let comment = state
            .comments
            .iter_mut()
            .find(|comment| comment.id == comment_id)
            .ok_or_else(|| Error::not_found("comment not found"))?;
        comment.likes = comment.likes.saturating_add(1);
        Reply::data(&*comment)
    }
}
