//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::StatusExpectations;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client behavior settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Base URLs of the scraped sites
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Local directories used by the scraper
    #[serde(default)]
    pub paths: PathsConfig,

    /// Preview-status code to acceptable full statuses
    #[serde(default)]
    pub expected_statuses: StatusExpectations,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        Self::validate_base_url("sources.docs_url", &self.sources.docs_url)?;
        Self::validate_base_url("sources.peps_url", &self.sources.peps_url)?;
        if self.expected_statuses.is_empty() {
            return Err(AppError::validation("No expected statuses defined"));
        }
        for expectation in self.expected_statuses.iter() {
            if expectation.code.chars().count() > 1 {
                return Err(AppError::validation(format!(
                    "expected_statuses code '{}' must be a single character or empty",
                    expectation.code
                )));
            }
            if expectation.statuses.is_empty() {
                return Err(AppError::validation(format!(
                    "expected_statuses code '{}' has no statuses",
                    expectation.code
                )));
            }
        }
        Ok(())
    }

    /// Base URLs must parse and end with a slash so relative joins keep
    /// their last path segment.
    fn validate_base_url(key: &str, value: &str) -> Result<()> {
        if Url::parse(value).is_err() {
            return Err(AppError::validation(format!("{key} is not a valid URL")));
        }
        if !value.ends_with('/') {
            return Err(AppError::validation(format!("{key} must end with '/'")));
        }
        Ok(())
    }
}

/// HTTP client behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Base URLs of the scraped sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Python documentation root
    #[serde(default = "defaults::docs_url")]
    pub docs_url: String,

    /// PEP index root
    #[serde(default = "defaults::peps_url")]
    pub peps_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            docs_url: defaults::docs_url(),
            peps_url: defaults::peps_url(),
        }
    }
}

/// Local directories used by the scraper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// HTTP response cache directory
    #[serde(default = "defaults::cache_dir")]
    pub cache_dir: PathBuf,

    /// Directory for downloaded archives
    #[serde(default = "defaults::downloads_dir")]
    pub downloads_dir: PathBuf,

    /// Directory for file-mode report output
    #[serde(default = "defaults::results_dir")]
    pub results_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            cache_dir: defaults::cache_dir(),
            downloads_dir: defaults::downloads_dir(),
            results_dir: defaults::results_dir(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; pydoc-scraper/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Source defaults
    pub fn docs_url() -> String {
        "https://docs.python.org/3/".into()
    }
    pub fn peps_url() -> String {
        "https://peps.python.org/".into()
    }

    // Path defaults
    pub fn cache_dir() -> PathBuf {
        "cache".into()
    }
    pub fn downloads_dir() -> PathBuf {
        "downloads".into()
    }
    pub fn results_dir() -> PathBuf {
        "results".into()
    }
}
