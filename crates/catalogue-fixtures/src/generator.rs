//! Deterministic catalogue generation from seed definitions.
//!
//! The same seed definition always yields the same books, chapters, and pen
//! names, so mock sessions and tests can refer to concrete titles.

use std::collections::HashSet;

use fake::Fake;
use fake::faker::lorem::raw::{Paragraph, Sentence};
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::GenerationError;
use crate::numerals::chinese_numeral;
use crate::registry::{CatalogueRegistry, SeedDefinition};
use crate::seed::{BookSeed, BookStatusSeed, ChapterSeed};
use crate::validation::{PEN_NAME_MAX, is_valid_pen_name, is_valid_title, sanitize_pen_name};

/// First author identifier handed to generated books.
///
/// Identifiers issued to newly registered authors count up from one, so the
/// fixture range starts well above anything a session will reach.
pub const FIXTURE_AUTHOR_ID_BASE: u64 = 100_000_000;

const MAX_TITLE_ATTEMPTS: usize = 64;
const MAX_NAME_ATTEMPTS: usize = 100;

const MAX_TAGS: usize = 2;

/// One book in four is finished.
const COMPLETED_NUMERATOR: u32 = 1;
const COMPLETED_DENOMINATOR: u32 = 4;

const TITLE_PREFIXES: &[&str] = &[
    "星穹", "万古", "九天", "剑", "龙城", "青云", "幽冥", "长夜", "归墟", "山海", "烟雨", "霜华",
    "赤霄", "太初", "凌霄", "沧澜", "北境", "南柯", "玄门", "天命",
];

const TITLE_SUFFIXES: &[&str] = &[
    "传说", "神帝", "来", "之主", "风云", "仙途", "录", "纪元", "行者", "问道", "长歌", "战歌",
    "奇谈", "秘闻", "都市", "归来", "无双", "旧事", "剑主", "星河",
];

const CHAPTER_TITLES: &[&str] = &[
    "初入江湖",
    "风起云涌",
    "夜探古城",
    "少年意气",
    "故人来信",
    "雨夜追踪",
    "暗潮涌动",
    "破茧而出",
    "山门试炼",
    "星落之夜",
    "旧梦重温",
    "锋芒初露",
];

const COVERS: &[&str] = &["📚", "📖", "📕", "📗", "📘", "📙"];

/// Generates a catalogue from a seed definition.
///
/// Books receive consecutive ids starting at one, unique titles, and at most
/// [`SeedDefinition::max_chapters`] generated chapters each.
///
/// # Errors
///
/// Returns [`GenerationError`] if unique titles or valid pen names cannot be
/// produced within the retry budget.
///
/// # Example
///
/// ```
/// use catalogue_fixtures::{CatalogueRegistry, generate_catalogue};
///
/// let registry = CatalogueRegistry::builtin().expect("bundled registry");
/// let seed_def = registry.find_seed("paper-crane").expect("seed exists");
///
/// let first = generate_catalogue(&registry, seed_def).expect("generated");
/// let second = generate_catalogue(&registry, seed_def).expect("generated");
/// assert_eq!(first, second);
/// ```
pub fn generate_catalogue(
    registry: &CatalogueRegistry,
    seed_def: &SeedDefinition,
) -> Result<Vec<BookSeed>, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed_def.seed());
    let mut used_titles = HashSet::with_capacity(seed_def.book_count());
    let mut books = Vec::with_capacity(seed_def.book_count());

    for ordinal in (1..).take(seed_def.book_count()) {
        let book = generate_book(&mut rng, registry, seed_def, ordinal, &mut used_titles)?;
        books.push(book);
    }

    Ok(books)
}

fn generate_book(
    rng: &mut ChaCha8Rng,
    registry: &CatalogueRegistry,
    seed_def: &SeedDefinition,
    ordinal: u64,
    used_titles: &mut HashSet<String>,
) -> Result<BookSeed, GenerationError> {
    let title = generate_title(rng, used_titles)?;
    let author_name = generate_pen_name(rng)?;

    let chapter_count = rng.random_range(20..=1500_u32);
    let updated_days_ago = rng.random_range(0..=30_u32);
    let generated = chapter_count.min(seed_def.max_chapters());
    let chapters = (1..=generated)
        .map(|id| generate_chapter(rng, id, updated_days_ago + (generated - id)))
        .collect();

    let status = if rng.random_ratio(COMPLETED_NUMERATOR, COMPLETED_DENOMINATOR) {
        BookStatusSeed::Completed
    } else {
        BookStatusSeed::Serializing
    };

    Ok(BookSeed {
        id: ordinal,
        title,
        author_name,
        author_id: format!("{:09}", FIXTURE_AUTHOR_ID_BASE + ordinal),
        views: rng.random_range(1_000..=5_000_000_u64),
        rating_tenths: rng.random_range(70..=99_u8),
        word_count: rng.random_range(20..=500_u32),
        chapter_count,
        description: Paragraph(EN, 2..4).fake_with_rng(rng),
        tags: select_tags(rng, registry.categories()),
        cover: pick(rng, COVERS).to_owned(),
        status,
        updated_days_ago,
        chapters,
    })
}

fn generate_title(
    rng: &mut ChaCha8Rng,
    used_titles: &mut HashSet<String>,
) -> Result<String, GenerationError> {
    for _ in 0..MAX_TITLE_ATTEMPTS {
        let candidate = format!("{}{}", pick(rng, TITLE_PREFIXES), pick(rng, TITLE_SUFFIXES));
        if is_valid_title(&candidate) && used_titles.insert(candidate.clone()) {
            return Ok(candidate);
        }
    }

    Err(GenerationError::TitleGenerationFailed {
        max_attempts: MAX_TITLE_ATTEMPTS,
    })
}

fn generate_pen_name(rng: &mut ChaCha8Rng) -> Result<String, GenerationError> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let first: String = FirstName(EN).fake_with_rng(rng);
        let last: String = LastName(EN).fake_with_rng(rng);
        let sanitized = sanitize_pen_name(&format!("{first} {last}"));
        let truncated: String = sanitized.chars().take(PEN_NAME_MAX).collect();
        let trimmed = truncated.trim();

        if is_valid_pen_name(trimmed) {
            return Ok(trimmed.to_owned());
        }
    }

    Err(GenerationError::PenNameGenerationFailed {
        max_attempts: MAX_NAME_ATTEMPTS,
    })
}

fn generate_chapter(rng: &mut ChaCha8Rng, id: u32, days_ago: u32) -> ChapterSeed {
    let heading = pick(rng, CHAPTER_TITLES);
    let paragraph_count = rng.random_range(3..=6_usize);
    let paragraphs = (0..paragraph_count)
        .map(|_| Sentence(EN, 8..16).fake_with_rng(rng))
        .collect();

    ChapterSeed {
        id,
        title: format!("第{}章 {heading}", chinese_numeral(id)),
        days_ago,
        word_count: rng.random_range(1500..=4500),
        paragraphs,
    }
}

fn select_tags(rng: &mut ChaCha8Rng, categories: &[String]) -> Vec<String> {
    let count = rng.random_range(1..=MAX_TAGS.min(categories.len()).max(1));
    let mut shuffled = categories.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled
}

fn pick<'a>(rng: &mut ChaCha8Rng, values: &[&'a str]) -> &'a str {
    values
        .get(rng.random_range(0..values.len()))
        .copied()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    const TEST_REGISTRY_JSON: &str = r#"{
        "version": 1,
        "categories": ["玄幻", "都市", "科幻"],
        "seeds": [
            {"name": "test-seed", "seed": 42, "bookCount": 10, "maxChapters": 12},
            {"name": "small-seed", "seed": 123, "bookCount": 2, "maxChapters": 3},
            {"name": "greedy", "seed": 9, "bookCount": 500, "maxChapters": 1}
        ]
    }"#;

    #[fixture]
    fn test_registry() -> CatalogueRegistry {
        CatalogueRegistry::from_json(TEST_REGISTRY_JSON).expect("valid test registry")
    }

    fn generate(registry: &CatalogueRegistry, seed_name: &str) -> Vec<BookSeed> {
        let seed_def = registry.find_seed(seed_name).expect("seed should be found");
        generate_catalogue(registry, seed_def).expect("generation should succeed")
    }

    #[rstest]
    fn generates_requested_book_count(test_registry: CatalogueRegistry) {
        assert_eq!(generate(&test_registry, "test-seed").len(), 10);
    }

    #[rstest]
    fn generation_is_deterministic(test_registry: CatalogueRegistry) {
        assert_eq!(
            generate(&test_registry, "test-seed"),
            generate(&test_registry, "test-seed")
        );
    }

    #[rstest]
    fn different_seeds_produce_different_catalogues(test_registry: CatalogueRegistry) {
        let first = generate(&test_registry, "test-seed");
        let second = generate(&test_registry, "small-seed");

        assert_ne!(first.first(), second.first());
    }

    #[rstest]
    fn book_ids_are_consecutive_from_one(test_registry: CatalogueRegistry) {
        let ids: Vec<u64> = generate(&test_registry, "test-seed")
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[rstest]
    fn titles_are_unique(test_registry: CatalogueRegistry) {
        let books = generate(&test_registry, "test-seed");
        let titles: HashSet<_> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles.len(), books.len());
    }

    #[rstest]
    fn chapters_respect_cap_and_numbering(test_registry: CatalogueRegistry) {
        for book in generate(&test_registry, "test-seed") {
            assert!(book.chapters.len() <= 12);
            assert!(book.chapters.len() <= book.chapter_count as usize);
            for (expected_id, chapter) in (1..).zip(&book.chapters) {
                assert_eq!(chapter.id, expected_id);
                assert!(chapter.title.starts_with('第'));
            }
        }
    }

    #[rstest]
    fn pen_names_and_author_ids_are_valid(test_registry: CatalogueRegistry) {
        for book in generate(&test_registry, "test-seed") {
            assert!(is_valid_pen_name(&book.author_name), "{}", book.author_name);
            assert_eq!(book.author_id.len(), 9);
            assert!(book.author_id.parse::<u64>().expect("numeric") > FIXTURE_AUTHOR_ID_BASE);
        }
    }

    #[rstest]
    fn tags_come_from_registry(test_registry: CatalogueRegistry) {
        for book in generate(&test_registry, "test-seed") {
            assert!(!book.tags.is_empty());
            assert!(book.tags.len() <= MAX_TAGS);
            assert!(
                book.tags
                    .iter()
                    .all(|tag| test_registry.categories().contains(tag))
            );
        }
    }

    #[rstest]
    fn exhausting_title_space_fails(test_registry: CatalogueRegistry) {
        let seed_def = test_registry.find_seed("greedy").expect("seed found");
        let result = generate_catalogue(&test_registry, seed_def);

        assert_eq!(
            result,
            Err(GenerationError::TitleGenerationFailed {
                max_attempts: MAX_TITLE_ATTEMPTS
            })
        );
    }
}
