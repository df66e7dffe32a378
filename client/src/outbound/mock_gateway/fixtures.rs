//! Seeds the mock catalogue from `catalogue-fixtures`.
//!
//! Generated seeds carry ages in days; they are pinned to calendar dates
//! relative to `today` so the catalogue looks fresh on every run.

use catalogue_fixtures::{
    BookSeed, BookStatusSeed, CatalogueRegistry, ChapterSeed, GenerationError, RegistryError,
    generate_catalogue,
};
use chrono::{Days, NaiveDate};
use thiserror::Error;
use tracing::debug;

use crate::domain::{AuthorId, Book, BookId, BookStatus, Chapter, ChapterId};

use super::CatalogueState;

/// Failures while building the mock catalogue.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The fixture registry could not be loaded.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The seed could not be expanded into books.
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// A generated book carries an author id that is not nine digits.
    #[error("book {book} has a malformed author id {value:?}")]
    AuthorId {
        /// Generated book id.
        book: u64,
        /// Offending author id.
        value: String,
    },
}

/// Generate the catalogue for the registry seed named `seed_name`.
pub fn load_catalogue(seed_name: &str, today: NaiveDate) -> Result<CatalogueState, FixtureError> {
    let registry = CatalogueRegistry::builtin()?;
    let seed = registry.find_seed(seed_name)?;
    let seeds = generate_catalogue(&registry, seed)?;
    let state = catalogue_from_seeds(seeds, today)?;
    debug!(
        seed = seed_name,
        books = state.books().len(),
        chapters = state.chapter_total(),
        "mock catalogue generated"
    );
    Ok(state)
}

/// Convert generated seeds into catalogue values.
pub fn catalogue_from_seeds(
    seeds: Vec<BookSeed>,
    today: NaiveDate,
) -> Result<CatalogueState, FixtureError> {
    let mut books = Vec::with_capacity(seeds.len());
    let mut chapters = Vec::new();
    for seed in seeds {
        let book_id = BookId::new(seed.id);
        let author_id = seed
            .author_id
            .parse::<AuthorId>()
            .map_err(|_| FixtureError::AuthorId {
                book: seed.id,
                value: seed.author_id.clone(),
            })?;
        chapters.extend(
            seed.chapters
                .into_iter()
                .map(|chapter| chapter_from_seed(book_id, chapter, today)),
        );
        books.push(Book {
            id: book_id,
            title: seed.title,
            author_name: seed.author_name,
            author_id,
            views: seed.views,
            rating: f32::from(seed.rating_tenths) / 10.0,
            word_count: seed.word_count,
            chapter_count: seed.chapter_count,
            description: seed.description,
            tags: seed.tags,
            cover: seed.cover,
            status: match seed.status {
                BookStatusSeed::Serializing => BookStatus::Serializing,
                BookStatusSeed::Completed => BookStatus::Completed,
            },
            updated_on: days_before(today, seed.updated_days_ago),
        });
    }
    Ok(CatalogueState::new(books, chapters))
}

fn chapter_from_seed(book_id: BookId, seed: ChapterSeed, today: NaiveDate) -> Chapter {
    Chapter {
        id: ChapterId::new(u64::from(seed.id)),
        book_id,
        title: seed.title,
        published_on: days_before(today, seed.days_ago),
        word_count: seed.word_count,
        content: seed.paragraphs,
    }
}

fn days_before(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}
