//! Reader preferences and per-book reading progress.
//!
//! Preferences live inside the persisted [`User`](super::User) record. The
//! session layer mutates them in memory and then rewrites the whole record;
//! nothing here talks to storage.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{BookId, ChapterId};

/// Theme applied when none has been chosen.
pub const DEFAULT_THEME: &str = "default";
/// Reader font size applied when none has been chosen.
pub const DEFAULT_FONT_SIZE: u8 = 16;
/// Smallest accepted reader font size.
pub const FONT_SIZE_MIN: u8 = 12;
/// Largest accepted reader font size.
pub const FONT_SIZE_MAX: u8 = 32;

/// Validation failures for preference and progress updates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferencesError {
    /// The theme name is blank.
    #[error("theme must not be empty")]
    BlankTheme,
    /// The font size is outside the accepted range.
    #[error("font size must be between {min} and {max}, got {actual}")]
    FontSizeOutOfRange {
        /// Smallest accepted size.
        min: u8,
        /// Largest accepted size.
        max: u8,
        /// Size that was requested.
        actual: u8,
    },
    /// Progress above 100 percent.
    #[error("reading progress must be between 0 and 100, got {actual}")]
    ProgressOutOfRange {
        /// Percent that was requested.
        actual: u32,
    },
}

/// Percentage of a chapter read, always within `0..=100`.
///
/// # Examples
/// ```
/// use flutterpage::domain::ProgressPercent;
///
/// assert_eq!(ProgressPercent::new(55).map(ProgressPercent::get), Ok(55));
/// assert!(ProgressPercent::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u8")]
pub struct ProgressPercent(u8);

impl ProgressPercent {
    /// Validate a raw percentage.
    pub fn new(value: u32) -> Result<Self, PreferencesError> {
        u8::try_from(value)
            .ok()
            .filter(|pct| *pct <= 100)
            .map(Self)
            .ok_or(PreferencesError::ProgressOutOfRange { actual: value })
    }

    /// Percentage value.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u32> for ProgressPercent {
    type Error = PreferencesError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProgressPercent> for u8 {
    fn from(value: ProgressPercent) -> Self {
        value.0
    }
}

/// Where the reader stopped in a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingProgress {
    /// Last chapter opened.
    pub chapter_id: ChapterId,
    /// Percent of that chapter read.
    pub progress: ProgressPercent,
    /// Serialized as RFC 3339.
    pub timestamp: DateTime<Utc>,
}

/// Display and reading preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// Colour theme name.
    pub theme: String,
    /// Reader font size in pixels.
    pub font_size: u8,
    /// Progress per book.
    #[serde(default)]
    pub reading_progress: BTreeMap<BookId, ReadingProgress>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_owned(),
            font_size: DEFAULT_FONT_SIZE,
            reading_progress: BTreeMap::new(),
        }
    }
}

/// Shallow update of [`UserPreferences`]; absent fields are left untouched.
///
/// # Examples
/// ```
/// use flutterpage::domain::{PreferencesPatch, UserPreferences};
///
/// let mut prefs = UserPreferences::default();
/// PreferencesPatch::new()
///     .theme("night")
///     .apply(&mut prefs)
///     .expect("valid patch");
///
/// assert_eq!(prefs.theme, "night");
/// assert_eq!(prefs.font_size, 16);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    font_size: Option<u8>,
}

impl PreferencesPatch {
    /// Start an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the theme.
    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    /// Set the reader font size.
    pub fn font_size(mut self, size: u8) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Validate the patch then merge it into `prefs`.
    ///
    /// Nothing is written when validation fails.
    pub fn apply(self, prefs: &mut UserPreferences) -> Result<(), PreferencesError> {
        if self.theme.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(PreferencesError::BlankTheme);
        }
        if let Some(size) = self.font_size
            && !(FONT_SIZE_MIN..=FONT_SIZE_MAX).contains(&size)
        {
            return Err(PreferencesError::FontSizeOutOfRange {
                min: FONT_SIZE_MIN,
                max: FONT_SIZE_MAX,
                actual: size,
            });
        }

        if let Some(theme) = self.theme {
            prefs.theme = theme;
        }
        if let Some(size) = self.font_size {
            prefs.font_size = size;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(0)]
    #[case(55)]
    #[case(100)]
    fn accepts_percentages_in_range(#[case] value: u32) {
        assert!(ProgressPercent::new(value).is_ok());
    }

    #[rstest]
    #[case(101)]
    #[case(300)]
    #[case(u32::MAX)]
    fn rejects_percentages_out_of_range(#[case] value: u32) {
        assert_eq!(
            ProgressPercent::new(value),
            Err(PreferencesError::ProgressOutOfRange { actual: value })
        );
    }

    #[test]
    fn progress_deserialization_enforces_range() {
        let result = serde_json::from_value::<ProgressPercent>(json!(150));
        assert!(result.is_err());
    }

    #[rstest]
    #[case(PreferencesPatch::new().theme("  "), PreferencesError::BlankTheme)]
    #[case(
        PreferencesPatch::new().font_size(8),
        PreferencesError::FontSizeOutOfRange { min: FONT_SIZE_MIN, max: FONT_SIZE_MAX, actual: 8 }
    )]
    fn invalid_patches_leave_preferences_untouched(
        #[case] patch: PreferencesPatch,
        #[case] expected: PreferencesError,
    ) {
        let mut prefs = UserPreferences::default();
        assert_eq!(patch.apply(&mut prefs), Err(expected));
        assert_eq!(prefs, UserPreferences::default());
    }

    #[test]
    fn reading_progress_map_uses_book_ids_as_keys() {
        let mut prefs = UserPreferences::default();
        prefs.reading_progress.insert(
            BookId::new(42),
            ReadingProgress {
                chapter_id: ChapterId::new(7),
                progress: ProgressPercent::new(55).expect("valid percent"),
                timestamp: DateTime::parse_from_rfc3339("2024-05-01T08:00:00Z")
                    .expect("valid timestamp")
                    .with_timezone(&Utc),
            },
        );

        let value = serde_json::to_value(&prefs).expect("serialize prefs");
        assert_eq!(
            value["readingProgress"]["42"],
            json!({ "chapterId": 7, "progress": 55, "timestamp": "2024-05-01T08:00:00Z" })
        );

        let back: UserPreferences = serde_json::from_value(value).expect("deserialize prefs");
        assert_eq!(back, prefs);
    }
}
