//! `/books/{id}/chapters` handlers.

use tracing::info;

use crate::domain::{
    BookId, Chapter, ChapterId, ChapterSummary, ChapterUpdate, ChapterView, Error, NewChapter,
    count_characters,
};

use super::backend::{HandlerResult, MockBackend, Reply, invalid};
use super::books::owned_book;

const NO_PERMISSION: &str = "no permission to modify chapters";

impl MockBackend {
    pub(super) fn list_chapters(&self, book_id: BookId) -> HandlerResult {
        let state = self.state();
        if state.book(book_id).is_none() {
            return Err(Error::not_found("book not found"));
        }
        let summaries: Vec<ChapterSummary> =
            state.chapters(book_id).iter().map(Chapter::summary).collect();
        Reply::data(&summaries)
    }

    pub(super) fn chapter_content(&self, book_id: BookId, chapter_id: ChapterId) -> HandlerResult {
        let state = self.state();
        let chapters = state.chapters(book_id);
        let index = chapters
            .iter()
            .position(|chapter| chapter.id == chapter_id)
            .ok_or_else(|| Error::not_found("chapter not found"))?;
        let previous = index
            .checked_sub(1)
            .and_then(|i| chapters.get(i))
            .map(|chapter| chapter.id);
        let next = chapters.get(index + 1).map(|chapter| chapter.id);
        let view = ChapterView {
            chapter: chapters[index].clone(),
            previous,
            next,
        };
        Reply::data(&view)
    }

    pub(super) fn add_chapter(&self, book_id: BookId, new_chapter: NewChapter) -> HandlerResult {
        let (_, author_id) = self.require_author(NO_PERMISSION)?;
        new_chapter.validate().map_err(invalid)?;

        let today = self.today();
        let mut guard = self.state();
        let state = &mut *guard;
        let chapter_id = state.next_chapter_id(book_id);
        let book = owned_book(&mut state.books, book_id, author_id)?;
        let chapter = Chapter {
            id: chapter_id,
            book_id,
            title: new_chapter.title.trim().to_owned(),
            published_on: today,
            word_count: count_characters(&new_chapter.content),
            content: new_chapter.content,
        };
        book.chapter_count = book.chapter_count.saturating_add(1);
        book.updated_on = today;
        state
            .chapters
            .entry(book_id)
            .or_default()
            .push(chapter.clone());
        info!(book_id = %book_id, chapter_id = %chapter_id, "chapter published");
        Reply::data(&chapter).map(|reply| reply.with_message("chapter published"))
    }

    pub(super) fn update_chapter(
        &self,
        book_id: BookId,
        chapter_id: ChapterId,
        update: ChapterUpdate,
    ) -> HandlerResult {
        let (_, author_id) = self.require_author(NO_PERMISSION)?;
        let today = self.today();
        let mut guard = self.state();
        let state = &mut *guard;
        let book = owned_book(&mut state.books, book_id, author_id)?;
        let chapter = state
            .chapters
            .get_mut(&book_id)
            .and_then(|chapters| chapters.iter_mut().find(|c| c.id == chapter_id))
            .ok_or_else(|| Error::not_found("chapter not found"))?;
        update.apply(chapter).map_err(invalid)?;
        book.updated_on = today;
        info!(book_id = %book_id, chapter_id = %chapter_id, "chapter updated");
        Reply::data(&*chapter).map(|reply| reply.with_message("chapter updated"))
    }
}
