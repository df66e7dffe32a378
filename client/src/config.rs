//! Client configuration loaded via OrthoConfig.
//!
//! The session lifetime carries an OrthoConfig default; the remaining fields
//! are optional and their accessors supply the defaults. An empty environment
//! yields an in-memory store, a 24 hour session, and the stock latency range.

use std::path::{Path, PathBuf};
use std::time::Duration;

use catalogue_fixtures::DEFAULT_SEED_NAME;
use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::DEFAULT_REDIRECT_DELAY;
use crate::outbound::mock_gateway::{DEFAULT_LATENCY_MAX, DEFAULT_LATENCY_MIN, DEFAULT_PAGE_SIZE};
use crate::outbound::storage::DEFAULT_SESSION_TTL;

/// Page loaded when no start URL is configured.
pub const DEFAULT_START_URL: &str = "https://flutterpage.local/templates/index.html";

/// Settings for the client runtime and the mock gateway behind it.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FLUTTERPAGE")]
pub struct AppSettings {
    /// Directory backing persistent storage. Memory-only when unset.
    pub storage_dir: Option<PathBuf>,
    /// Hours a stored session stays valid.
    #[ortho_config(default = 24)]
    pub session_ttl_hours: u32,
    /// Lower bound of the simulated request latency.
    pub latency_min_ms: Option<u64>,
    /// Upper bound of the simulated request latency.
    pub latency_max_ms: Option<u64>,
    /// Pause before redirecting a visitor who was denied access.
    pub redirect_delay_ms: Option<u64>,
    /// Books per catalogue listing page.
    pub page_size: Option<usize>,
    /// Fixture seed used to generate the catalogue.
    pub catalogue_seed: Option<String>,
    /// URL of the page the client starts on.
    pub start_url: Option<String>,
}

impl AppSettings {
    /// Storage directory, if persistence is configured.
    pub fn storage_dir(&self) -> Option<&Path> {
        self.storage_dir.as_deref()
    }

    /// Session lifetime; zero hours falls back to the 24 hour default.
    pub fn session_ttl(&self) -> TimeDelta {
        match self.session_ttl_hours {
            0 => DEFAULT_SESSION_TTL,
            hours => TimeDelta::hours(i64::from(hours)),
        }
    }

    /// Latency bounds as `(min, max)`.
    pub fn latency_range(&self) -> (Duration, Duration) {
        (
            self.latency_min_ms
                .map_or(DEFAULT_LATENCY_MIN, Duration::from_millis),
            self.latency_max_ms
                .map_or(DEFAULT_LATENCY_MAX, Duration::from_millis),
        )
    }

    /// Delay before denied visitors are redirected.
    pub fn redirect_delay(&self) -> Duration {
        self.redirect_delay_ms
            .map_or(DEFAULT_REDIRECT_DELAY, Duration::from_millis)
    }

    /// Listing page size, falling back to the gateway default.
    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Fixture seed name, falling back to the built-in seed.
    pub fn catalogue_seed(&self) -> &str {
        self.catalogue_seed.as_deref().unwrap_or(DEFAULT_SEED_NAME)
    }

    /// Start page URL.
    pub fn start_url(&self) -> &str {
        self.start_url.as_deref().unwrap_or(DEFAULT_START_URL)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "FLUTTERPAGE_STORAGE_DIR",
        "FLUTTERPAGE_SESSION_TTL_HOURS",
        "FLUTTERPAGE_LATENCY_MIN_MS",
        "FLUTTERPAGE_LATENCY_MAX_MS",
        "FLUTTERPAGE_REDIRECT_DELAY_MS",
        "FLUTTERPAGE_PAGE_SIZE",
        "FLUTTERPAGE_CATALOGUE_SEED",
        "FLUTTERPAGE_START_URL",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("flutterpage")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.storage_dir(), None);
        assert_eq!(settings.session_ttl(), TimeDelta::hours(24));
        assert_eq!(
            settings.latency_range(),
            (Duration::from_millis(500), Duration::from_millis(1_500))
        );
        assert_eq!(settings.redirect_delay(), Duration::from_secs(2));
        assert_eq!(settings.page_size(), 20);
        assert_eq!(settings.catalogue_seed(), "jade-lantern");
        assert_eq!(settings.start_url(), DEFAULT_START_URL);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let values = [
            Some("/tmp/flutterpage".to_owned()),
            Some("2".to_owned()),
            Some("0".to_owned()),
            Some("10".to_owned()),
            Some("250".to_owned()),
            Some("5".to_owned()),
            Some("paper-crane".to_owned()),
            Some("https://example.test/templates/home.html".to_owned()),
        ];
        let _guard = lock_env(VARS.into_iter().zip(values));

        let settings = load_from_empty_args();
        assert_eq!(settings.storage_dir(), Some(Path::new("/tmp/flutterpage")));
        assert_eq!(settings.session_ttl(), TimeDelta::hours(2));
        assert_eq!(
            settings.latency_range(),
            (Duration::ZERO, Duration::from_millis(10))
        );
        assert_eq!(settings.redirect_delay(), Duration::from_millis(250));
        assert_eq!(settings.page_size(), 5);
        assert_eq!(settings.catalogue_seed(), "paper-crane");
        assert_eq!(settings.start_url(), "https://example.test/templates/home.html");
    }
}
