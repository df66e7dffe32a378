//! Behavioural tests for the catalogue-fixtures crate.
//!
//! These tests validate the crate's behaviour against Gherkin scenarios
//! covering registry parsing, deterministic generation, and validation.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use catalogue_fixtures::{
    BookSeed, CatalogueRegistry, RegistryError, SeedDefinition, chinese_numeral,
    generate_catalogue, is_valid_pen_name,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

const VALID_REGISTRY_JSON: &str = r#"{
    "version": 1,
    "categories": ["玄幻", "都市", "科幻"],
    "seeds": [
        {"name": "test-seed", "seed": 42, "bookCount": 5, "maxChapters": 6}
    ]
}"#;

#[derive(Default, ScenarioState)]
struct World {
    json_input: Slot<String>,
    registry_result: Slot<Result<CatalogueRegistry, RegistryError>>,
    seed_def: Slot<SeedDefinition>,
    generated: Slot<Vec<BookSeed>>,
    second_generation: Slot<Vec<BookSeed>>,
}

impl World {
    fn registry(&self) -> CatalogueRegistry {
        self.registry_result
            .get()
            .expect("registry should be set")
            .expect("registry should be valid")
    }

    fn seed_def(&self) -> SeedDefinition {
        self.seed_def.get().expect("seed definition should be set")
    }

    fn registry_result(&self) -> Result<CatalogueRegistry, RegistryError> {
        self.registry_result
            .get()
            .expect("registry result should be set")
    }

    fn books(&self) -> Vec<BookSeed> {
        self.generated.get().expect("catalogue should be generated")
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

// ============================================================================
// Given steps
// ============================================================================

#[given("a valid catalogue registry JSON")]
fn a_valid_catalogue_registry_json(world: &World) {
    world.json_input.set(VALID_REGISTRY_JSON.to_owned());
}

#[given("a valid catalogue registry")]
fn a_valid_catalogue_registry(world: &World) {
    let registry = CatalogueRegistry::from_json(VALID_REGISTRY_JSON).expect("valid registry");
    world.registry_result.set(Ok(registry));
}

#[given("a seed definition with seed {seed:u64}")]
fn a_seed_definition_with_seed(world: &World, seed: u64) {
    let registry = world.registry();
    let seed_def = registry.find_seed("test-seed").expect("seed exists");
    assert_eq!(seed_def.seed(), seed, "seed value mismatch");
    world.seed_def.set(seed_def.clone());
}

#[given("a seed definition")]
fn a_seed_definition(world: &World) {
    let registry = world.registry();
    let seed_def = registry.find_seed("test-seed").expect("seed exists");
    world.seed_def.set(seed_def.clone());
}

#[given("malformed JSON")]
fn malformed_json(world: &World) {
    world.json_input.set("not valid json".to_owned());
}

#[given("registry JSON with no categories")]
fn registry_json_with_no_categories(world: &World) {
    let json = r#"{
        "version": 1,
        "categories": [],
        "seeds": [{"name": "test", "seed": 1, "bookCount": 1}]
    }"#;
    world.json_input.set(json.to_owned());
}

// ============================================================================
// When steps
// ============================================================================

#[when("the registry is parsed")]
fn the_registry_is_parsed(world: &World) {
    let json = world.json_input.get().expect("JSON input should be set");
    world.registry_result.set(CatalogueRegistry::from_json(&json));
}

#[when("the catalogue is generated")]
fn the_catalogue_is_generated(world: &World) {
    let books = generate_catalogue(&world.registry(), &world.seed_def()).expect("generation");
    world.generated.set(books);
}

#[when("the catalogue is generated twice")]
fn the_catalogue_is_generated_twice(world: &World) {
    let registry = world.registry();
    let seed_def = world.seed_def();

    let first = generate_catalogue(&registry, &seed_def).expect("first generation");
    let second = generate_catalogue(&registry, &seed_def).expect("second generation");

    world.generated.set(first);
    world.second_generation.set(second);
}

// ============================================================================
// Then steps
// ============================================================================

#[then("parsing succeeds")]
fn parsing_succeeds(world: &World) {
    let result = world.registry_result();
    assert!(result.is_ok(), "Expected parsing to succeed: {result:?}");
}

#[then("the registry contains the expected seed definitions")]
fn the_registry_contains_the_expected_seed_definitions(world: &World) {
    let registry = world.registry();
    let seed = registry.find_seed("test-seed").expect("seed should exist");
    assert_eq!(seed.seed(), 42);
    assert_eq!(seed.book_count(), 5);
    assert_eq!(seed.max_chapters(), 6);
}

#[then("both generations produce identical books")]
fn both_generations_produce_identical_books(world: &World) {
    let first = world.generated.get().expect("first generation should be set");
    let second = world
        .second_generation
        .get()
        .expect("second generation should be set");

    assert_eq!(first, second, "Generations should be deterministic");
}

#[then("every book has at most {cap:usize} generated chapters")]
fn every_book_has_at_most_generated_chapters(world: &World, cap: usize) {
    for book in world.books() {
        assert!(book.chapters.len() <= cap, "{} has too many chapters", book.title);
    }
}

#[then("every chapter title carries a Chinese numeral")]
fn every_chapter_title_carries_a_chinese_numeral(world: &World) {
    for book in world.books() {
        for chapter in &book.chapters {
            let prefix = format!("第{}章", chinese_numeral(chapter.id));
            assert!(chapter.title.starts_with(&prefix), "{}", chapter.title);
        }
    }
}

#[then("all pen names satisfy publishing constraints")]
fn all_pen_names_satisfy_publishing_constraints(world: &World) {
    for book in world.books() {
        assert!(
            is_valid_pen_name(&book.author_name),
            "Invalid pen name: {}",
            book.author_name
        );
    }
}

#[then("parsing fails with a parse error")]
fn parsing_fails_with_a_parse_error(world: &World) {
    let result = world.registry_result();
    assert!(
        matches!(result, Err(RegistryError::ParseError { .. })),
        "Expected ParseError, got: {result:?}"
    );
}

#[then("parsing fails with empty categories error")]
fn parsing_fails_with_empty_categories_error(world: &World) {
    assert_eq!(world.registry_result(), Err(RegistryError::EmptyCategories));
}

// ============================================================================
// Scenario bindings
// ============================================================================

#[scenario(
    path = "tests/features/catalogue.feature",
    name = "Valid registry parses successfully"
)]
fn valid_registry_parses_successfully(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/catalogue.feature",
    name = "Deterministic generation produces identical catalogues"
)]
fn deterministic_generation_produces_identical_catalogues(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/catalogue.feature",
    name = "Generated chapters are capped and numbered"
)]
fn generated_chapters_are_capped_and_numbered(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/catalogue.feature",
    name = "Generated pen names are valid"
)]
fn generated_pen_names_are_valid(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/catalogue.feature",
    name = "Invalid JSON fails parsing"
)]
fn invalid_json_fails_parsing(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/catalogue.feature",
    name = "Registry without categories fails parsing"
)]
fn registry_without_categories_fails_parsing(world: World) {
    let _ = world;
}
