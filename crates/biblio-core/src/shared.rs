//! Configuration shared by the core, the HTTP client and the browser front end.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Category value meaning "no class filter" in local searches.
pub const DEFAULT_ANY_CATEGORY: &str = "Todo";

/// Locale used when the caller does not pick one.
pub const DEFAULT_LOCALE: &str = "es";

/// Locales the ontology backend has labels for.
pub const SUPPORTED_LOCALES: [&str; 5] = ["es", "en", "qu", "fr", "de"];

/// Browser configuration. Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Base URL of the ontology HTTP API (e.g. `http://127.0.0.1:8000`).
    pub api_base: String,
    /// Prefix that marks an identifier as a federated (DBpedia) resource URI.
    pub remote_uri_prefix: String,
    /// Locale attached to searches when none is given.
    pub default_locale: String,
    /// Category sentinel that disables the class filter.
    pub any_category: String,
    /// Pause between clearing the selection and resolving the next target during navigation.
    /// Zero means a plain scheduler yield.
    #[serde(default)]
    pub navigation_settle_ms: u64,
    /// Per-request timeout for the HTTP client. Unset means requests may wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000".to_string(),
            remote_uri_prefix: "http://dbpedia.org".to_string(),
            default_locale: DEFAULT_LOCALE.to_string(),
            any_category: DEFAULT_ANY_CATEGORY.to_string(),
            navigation_settle_ms: 0,
            request_timeout_secs: None,
        }
    }
}

impl BrowserConfig {
    /// Load config from file and environment. Precedence: env `BIBLIO_CONFIG` path > `config/browser.toml` > defaults.
    /// Individual keys can be overridden with `BIBLIO__<KEY>` variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("BIBLIO_CONFIG").unwrap_or_else(|_| "config/browser.toml".to_string());
        let defaults = Self::default();
        let builder = config::Config::builder()
            .set_default("api_base", defaults.api_base)?
            .set_default("remote_uri_prefix", defaults.remote_uri_prefix)?
            .set_default("default_locale", defaults.default_locale)?
            .set_default("any_category", defaults.any_category)?
            .set_default("navigation_settle_ms", 0_i64)?;

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("BIBLIO").separator("__"))
            .build()?;

        built.try_deserialize()
    }

    /// Settle pause as a `Duration`, or `None` when navigation should only yield.
    pub fn navigation_settle(&self) -> Option<Duration> {
        (self.navigation_settle_ms > 0).then(|| Duration::from_millis(self.navigation_settle_ms))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.filter(|&s| s > 0).map(Duration::from_secs)
    }

    /// True when `locale` is one the backend can localize labels for.
    pub fn is_supported_locale(locale: &str) -> bool {
        SUPPORTED_LOCALES.contains(&locale)
    }
}
