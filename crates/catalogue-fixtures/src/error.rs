//! Error types for the catalogue-fixtures crate.
//!
//! Registry parsing and catalogue generation fail with separate semantic
//! enums so callers can tell a bad registry file from an exhausted generator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing or querying a catalogue registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read registry file at '{path}': {message}")]
    IoError {
        /// Path to the registry file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The registry JSON is malformed or missing required fields.
    #[error("invalid registry JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The registry version is not supported.
    #[error("unsupported registry version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the registry.
        actual: u32,
    },

    /// The registry lists no categories to tag books with.
    #[error("registry contains no categories")]
    EmptyCategories,

    /// A category name is blank once trimmed.
    #[error("blank category at index {index}")]
    BlankCategory {
        /// Index of the blank category in the array.
        index: usize,
    },

    /// The registry contains no seed definitions.
    #[error("registry contains no seed definitions")]
    EmptySeeds,

    /// A seed asks for zero books.
    #[error("seed '{name}' must request at least one book")]
    ZeroBookCount {
        /// The offending seed name.
        name: String,
    },

    /// The requested seed name was not found in the registry.
    #[error("seed '{name}' not found in registry")]
    SeedNotFound {
        /// The seed name that was not found.
        name: String,
    },
}

/// Errors that can occur during catalogue generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No unused title could be produced within the attempt budget.
    #[error("failed to generate a unique book title after {max_attempts} attempts")]
    TitleGenerationFailed {
        /// Number of attempts made before giving up.
        max_attempts: usize,
    },

    /// No valid pen name could be produced within the attempt budget.
    #[error("failed to generate a valid pen name after {max_attempts} attempts")]
    PenNameGenerationFailed {
        /// Number of attempts made before giving up.
        max_attempts: usize,
    },
}
