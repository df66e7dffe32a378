//! Deterministic catalogue fixtures for the FlutterPage mock backend.
//!
//! This crate replaces the scattered random title and count generators of the
//! page scripts with a single reproducible source of books, chapters, and
//! author pen names. It is independent of the client's domain types; the
//! mock backend converts [`BookSeed`] values at the point of use.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Loading catalogue registries from JSON (or the bundled default)
//! - Deterministic catalogue generation from named seeds
//! - Chinese chapter numbering (`第十二章`)
//! - Title and pen-name validation
//!
//! # Example
//!
//! ```
//! use catalogue_fixtures::{CatalogueRegistry, generate_catalogue};
//!
//! let json = r#"{
//!     "version": 1,
//!     "categories": ["玄幻", "科幻"],
//!     "seeds": [{"name": "test-seed", "seed": 42, "bookCount": 3, "maxChapters": 5}]
//! }"#;
//!
//! let registry = CatalogueRegistry::from_json(json).expect("valid registry");
//! let seed_def = registry.find_seed("test-seed").expect("seed exists");
//! let books = generate_catalogue(&registry, seed_def).expect("generation succeeds");
//!
//! assert_eq!(books.len(), 3);
//! ```

mod error;
mod generator;
mod numerals;
mod registry;
mod seed;
mod validation;

pub use error::{GenerationError, RegistryError};
pub use generator::{FIXTURE_AUTHOR_ID_BASE, generate_catalogue};
pub use numerals::chinese_numeral;
pub use registry::{CatalogueRegistry, DEFAULT_SEED_NAME, SeedDefinition};
pub use seed::{BookSeed, BookStatusSeed, ChapterSeed};
pub use validation::{
    PEN_NAME_MAX, PEN_NAME_MIN, TITLE_MAX, TITLE_MIN, is_valid_pen_name, is_valid_title,
};
