//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use moviefind_api::tmdb::DEFAULT_LANGUAGE;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default quiet period for search input, in milliseconds.
const DEFAULT_DEBOUNCE_MS: u64 = 800;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB endpoint settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Search input settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// TMDB endpoint configuration.
///
/// The bearer token is read from `TMDB_API_TOKEN`, never from this file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TmdbConfig {
    /// Base URL override (defaults to the public TMDB v3 API).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Locale for the trending and discover lists.
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            language: default_language(),
        }
    }
}

impl TmdbConfig {
    /// Parses the base URL override, if any.
    ///
    /// A trailing `/` is added so endpoint paths join below it.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL.
    pub fn parsed_base_url(&self) -> Result<Option<Url>> {
        self.base_url
            .as_deref()
            .map(|raw| {
                let normalized = if raw.ends_with('/') {
                    String::from(raw)
                } else {
                    format!("{raw}/")
                };
                Url::parse(&normalized).with_context(|| format!("invalid tmdb.base_url: {raw}"))
            })
            .transpose()
    }
}

/// Search input configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl SearchConfig {
    /// Quiet period as a `Duration`.
    #[must_use]
    pub const fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn default_language() -> String {
    String::from(DEFAULT_LANGUAGE)
}

const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}
