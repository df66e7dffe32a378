//! Catalogue registry types and JSON parsing.
//!
//! A registry names the categories books may be tagged with and a set of
//! named seeds. Each seed fixes the RNG state, the number of books, and the
//! cap on generated chapters per book.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::RegistryError;

/// Current supported registry version.
const SUPPORTED_VERSION: u32 = 1;

/// Chapter cap applied when a seed does not specify one.
const DEFAULT_MAX_CHAPTERS: u32 = 50;

/// Seed used by [`CatalogueRegistry::builtin`] consumers when none is named.
pub const DEFAULT_SEED_NAME: &str = "jade-lantern";

const BUILTIN_REGISTRY_JSON: &str = include_str!("../data/catalogue.json");

/// A catalogue registry containing categories and named seeds.
///
/// # Example
///
/// ```
/// use catalogue_fixtures::CatalogueRegistry;
///
/// let json = r#"{
///     "version": 1,
///     "categories": ["悬疑"],
///     "seeds": [{"name": "test", "seed": 42, "bookCount": 5}]
/// }"#;
///
/// let registry = CatalogueRegistry::from_json(json).expect("valid registry");
/// assert_eq!(registry.seeds().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueRegistry {
    version: u32,
    categories: Vec<String>,
    seeds: Vec<SeedDefinition>,
}

impl CatalogueRegistry {
    /// Parses a catalogue registry from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if:
    /// - The JSON is malformed or a required field is missing
    /// - The version is unsupported
    /// - The category list is empty or contains a blank entry
    /// - The seeds array is empty or a seed requests zero books
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawCatalogueRegistry =
            serde_json::from_str(json).map_err(|e| RegistryError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads a catalogue registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let contents = fs::read_to_string(path).map_err(|e| RegistryError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    /// Returns the registry bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] only if the bundled JSON is invalid, which the
    /// crate's tests guard against.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_json(BUILTIN_REGISTRY_JSON)
    }

    fn from_raw(raw: RawCatalogueRegistry) -> Result<Self, RegistryError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        if raw.categories.is_empty() {
            return Err(RegistryError::EmptyCategories);
        }
        if let Some(index) = raw.categories.iter().position(|c| c.trim().is_empty()) {
            return Err(RegistryError::BlankCategory { index });
        }

        if raw.seeds.is_empty() {
            return Err(RegistryError::EmptySeeds);
        }

        let seeds = raw
            .seeds
            .into_iter()
            .map(|s| {
                if s.book_count == 0 {
                    return Err(RegistryError::ZeroBookCount { name: s.name });
                }
                Ok(SeedDefinition {
                    name: s.name,
                    seed: s.seed,
                    book_count: s.book_count,
                    max_chapters: s.max_chapters.unwrap_or(DEFAULT_MAX_CHAPTERS),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            version: raw.version,
            categories: raw.categories,
            seeds,
        })
    }

    /// Returns the registry version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the categories books may be tagged with.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Returns all seed definitions.
    #[must_use]
    pub fn seeds(&self) -> &[SeedDefinition] {
        &self.seeds
    }

    /// Finds a seed definition by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SeedNotFound`] if no seed with the given name
    /// exists.
    pub fn find_seed(&self, name: &str) -> Result<&SeedDefinition, RegistryError> {
        self.seeds
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| RegistryError::SeedNotFound {
                name: name.to_owned(),
            })
    }
}

/// A named seed definition for deterministic catalogue generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedDefinition {
    name: String,
    seed: u64,
    book_count: usize,
    max_chapters: u32,
}

impl SeedDefinition {
    /// Returns the seed name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the RNG seed value.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of books to generate.
    #[must_use]
    pub const fn book_count(&self) -> usize {
        self.book_count
    }

    /// Returns the cap on generated chapters per book.
    #[must_use]
    pub const fn max_chapters(&self) -> u32 {
        self.max_chapters
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCatalogueRegistry {
    version: u32,
    categories: Vec<String>,
    seeds: Vec<RawSeedDefinition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedDefinition {
    name: String,
    seed: u64,
    book_count: usize,
    max_chapters: Option<u32>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const VALID_JSON: &str = r#"{
        "version": 1,
        "categories": ["玄幻", "都市"],
        "seeds": [
            {"name": "jade-lantern", "seed": 2023, "bookCount": 12, "maxChapters": 50},
            {"name": "paper-crane", "seed": 77, "bookCount": 4}
        ]
    }"#;

    #[test]
    fn parses_valid_registry() {
        let registry = CatalogueRegistry::from_json(VALID_JSON).expect("valid registry");

        assert_eq!(registry.version(), 1);
        assert_eq!(registry.categories().len(), 2);
        assert_eq!(registry.seeds().len(), 2);
    }

    #[test]
    fn missing_max_chapters_falls_back_to_default() {
        let registry = CatalogueRegistry::from_json(VALID_JSON).expect("valid registry");
        let seed = registry.find_seed("paper-crane").expect("seed found");

        assert_eq!(seed.book_count(), 4);
        assert_eq!(seed.max_chapters(), DEFAULT_MAX_CHAPTERS);
    }

    #[test]
    fn builtin_registry_contains_default_seed() {
        let registry = CatalogueRegistry::builtin().expect("bundled registry parses");
        assert!(registry.find_seed(DEFAULT_SEED_NAME).is_ok());
    }

    #[rstest]
    #[case::malformed_json("not valid json")]
    #[case::missing_version(r#"{"categories": ["a"], "seeds": [{"name": "a", "seed": 1, "bookCount": 1}]}"#)]
    fn rejects_json_with_parse_error(#[case] json: &str) {
        let result = CatalogueRegistry::from_json(json);
        assert!(matches!(result, Err(RegistryError::ParseError { .. })));
    }

    #[rstest]
    #[case::unsupported_version(
        r#"{"version": 3, "categories": ["a"], "seeds": [{"name": "a", "seed": 1, "bookCount": 1}]}"#,
        RegistryError::UnsupportedVersion { expected: 1, actual: 3 }
    )]
    #[case::empty_categories(
        r#"{"version": 1, "categories": [], "seeds": [{"name": "a", "seed": 1, "bookCount": 1}]}"#,
        RegistryError::EmptyCategories
    )]
    #[case::blank_category(
        r#"{"version": 1, "categories": ["a", "  "], "seeds": [{"name": "a", "seed": 1, "bookCount": 1}]}"#,
        RegistryError::BlankCategory { index: 1 }
    )]
    #[case::empty_seeds(
        r#"{"version": 1, "categories": ["a"], "seeds": []}"#,
        RegistryError::EmptySeeds
    )]
    #[case::zero_books(
        r#"{"version": 1, "categories": ["a"], "seeds": [{"name": "none", "seed": 1, "bookCount": 0}]}"#,
        RegistryError::ZeroBookCount { name: "none".to_owned() }
    )]
    fn rejects_invalid_registry(#[case] json: &str, #[case] expected: RegistryError) {
        assert_eq!(CatalogueRegistry::from_json(json), Err(expected));
    }
}
