//! Configuration management for discussion resolution.
//!
//! Configuration is stored as TOML. Every field has a default, so a partial
//! file only needs the values it changes.
//!
//! ## File Location
//!
//! Looked up in this order:
//!
//! 1. An explicit path (CLI `--config` / `DISCLINK_CONFIG`)
//! 2. `$DISCLINK_CONFIG_DIR/config.toml`
//! 3. `$XDG_CONFIG_HOME/disclink/config.toml`
//! 4. The platform config directory (`directories::ProjectDirs`)
//!
//! A missing file yields [`Config::default`].
//!
//! ## Example Configuration File
//!
//! ```toml
//! [site]
//! base_path = "/openscope-community-predictive-processing/"
//! title_suffix = " - OpenScope Community Predictive Processing"
//!
//! [repository]
//! owner = "allenneuraldynamics"
//! name = "openscope-community-predictive-processing"
//!
//! [lookup]
//! strategies = ["listing", "search"]
//! timeout_secs = 10
//!
//! [cache]
//! ttl_hours = 24
//! ```

use crate::types::Strategy;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DISCLINK_CONFIG";
/// Environment variable naming a directory containing `config.toml`.
pub const CONFIG_DIR_ENV: &str = "DISCLINK_CONFIG_DIR";
/// Environment variable overriding the cache data directory.
pub const DATA_DIR_ENV: &str = "DISCLINK_DATA_DIR";
/// Environment variable overriding the host API base URL.
pub const API_BASE_ENV: &str = "DISCLINK_API_BASE";

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_SLUG: &str = "disclink";

/// Largest page the bulk-listing endpoint will return.
pub const MAX_LISTING_PAGE_SIZE: u32 = 100;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How page paths and titles are interpreted
    pub site: SiteConfig,
    /// Which repository hosts the discussions
    pub repository: RepositoryConfig,
    /// Lookup strategy selection and request tuning
    pub lookup: LookupConfig,
    /// Persistent cache behaviour
    pub cache: CacheConfig,
}

/// Documentation site settings used by the page identifier resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Prefix stripped from page paths before deriving identifiers.
    pub base_path: String,
    /// Site-name suffix stripped from rendered page titles.
    pub title_suffix: String,
    /// Identifier used when the stripped path is empty.
    pub root_identifier: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_path: "/openscope-community-predictive-processing/".to_string(),
            title_suffix: " - OpenScope Community Predictive Processing".to_string(),
            root_identifier: "index".to_string(),
        }
    }
}

/// Collaboration host and repository coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Base URL for human-facing links (`https://github.com`).
    pub web_base: String,
    /// Base URL for API calls (`https://api.github.com`).
    pub api_base: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Category slug pre-selected on the create-new-discussion form.
    pub new_discussion_category: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            web_base: "https://github.com".to_string(),
            api_base: "https://api.github.com".to_string(),
            owner: "allenneuraldynamics".to_string(),
            name: "openscope-community-predictive-processing".to_string(),
            new_discussion_category: "q-a".to_string(),
        }
    }
}

impl RepositoryConfig {
    /// `owner/name` slug used in search qualifiers.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Web URL listing every discussion in the repository.
    #[must_use]
    pub fn discussions_url(&self) -> String {
        format!(
            "{}/{}/{}/discussions",
            self.web_base.trim_end_matches('/'),
            self.owner,
            self.name
        )
    }
}

/// Strategy order and per-request tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Strategies in the order they are attempted.
    pub strategies: Vec<Strategy>,
    /// Number of discussions requested by the bulk listing.
    pub listing_page_size: u32,
    /// Thread numbers checked by the numbered probe, in order.
    ///
    /// This list is repository-specific and goes stale as new threads are
    /// opened; it is only consulted when the bulk listing is unavailable.
    pub probe_numbers: Vec<u64>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            strategies: vec![Strategy::Listing, Strategy::Probe],
            listing_page_size: MAX_LISTING_PAGE_SIZE,
            probe_numbers: vec![87, 88, 89, 86, 85, 84, 83, 82, 81, 80, 79, 78, 77, 76, 75],
            timeout_secs: 30,
            user_agent: concat!("disclink/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl LookupConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Listing page size clamped to what the endpoint accepts.
    #[must_use]
    pub fn effective_page_size(&self) -> u32 {
        self.listing_page_size.clamp(1, MAX_LISTING_PAGE_SIZE)
    }
}

/// Persistent cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Hours before the whole cache generation expires.
    pub ttl_hours: u64,
    /// Prefix shared by every entry key.
    pub key_prefix: String,
    /// Key holding the shared generation timestamp.
    pub timestamp_key: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: 24,
            key_prefix: "github_discussion_".to_string(),
            timestamp_key: "github_discussion_timestamp".to_string(),
        }
    }
}

impl CacheConfig {
    /// Cache lifetime as a [`chrono::Duration`].
    #[must_use]
    pub fn ttl(&self) -> chrono::Duration {
        i64::try_from(self.ttl_hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .unwrap_or(chrono::Duration::MAX)
    }
}

impl Config {
    /// Load configuration from the first location that exists.
    ///
    /// `explicit` takes precedence over every discovered location; when it is
    /// given the file must exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the chosen file cannot be read, is not
    /// valid TOML, or fails [`Config::validate`].
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = if let Some(path) = explicit {
            Self::load_from(path)?
        } else {
            match Self::discover_path() {
                Some(path) if path.exists() => Self::load_from(&path)?,
                _ => Self::default(),
            }
        };

        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse config {}: {e}", path.display()))
        })
    }

    /// Check the configuration for values that would make resolution impossible.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.repository.owner.trim().is_empty() || self.repository.name.trim().is_empty() {
            return Err(Error::Config(
                "repository.owner and repository.name must be set".into(),
            ));
        }
        if self.lookup.strategies.is_empty() {
            return Err(Error::Config(
                "lookup.strategies must name at least one strategy".into(),
            ));
        }
        if self.lookup.timeout_secs == 0 {
            return Err(Error::Config("lookup.timeout_secs must be positive".into()));
        }
        if self.cache.ttl_hours == 0 {
            return Err(Error::Config("cache.ttl_hours must be positive".into()));
        }
        if self.cache.key_prefix.is_empty() {
            return Err(Error::Config("cache.key_prefix must not be empty".into()));
        }
        if self.cache.timestamp_key == self.cache.key_prefix {
            return Err(Error::Config(
                "cache.timestamp_key must differ from cache.key_prefix".into(),
            ));
        }
        url::Url::parse(&self.repository.api_base)?;
        url::Url::parse(&self.repository.web_base)?;
        Ok(())
    }

    /// Apply environment overrides that deployments and tests rely on.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_api_base_override(std::env::var(API_BASE_ENV).ok().as_deref());
        self
    }

    fn apply_api_base_override(&mut self, value: Option<&str>) {
        if let Some(base) = value.map(str::trim).filter(|v| !v.is_empty()) {
            tracing::debug!("Using API base override {}", base);
            self.repository.api_base = base.trim_end_matches('/').to_string();
        }
    }

    /// Location of the config file when no explicit path is given.
    #[must_use]
    pub fn discover_path() -> Option<PathBuf> {
        if let Some(dir) = non_empty_env(CONFIG_DIR_ENV) {
            return Some(PathBuf::from(dir).join(CONFIG_FILE_NAME));
        }
        if let Some(xdg) = non_empty_env("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join(APP_SLUG).join(CONFIG_FILE_NAME));
        }
        directories::ProjectDirs::from("org", "openscope", APP_SLUG)
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Directory holding the persistent discussion cache.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if no data directory can be determined.
    pub fn data_dir() -> Result<PathBuf> {
        if let Some(dir) = non_empty_env(DATA_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(xdg) = non_empty_env("XDG_DATA_HOME") {
            return Ok(PathBuf::from(xdg).join(APP_SLUG));
        }
        directories::ProjectDirs::from("org", "openscope", APP_SLUG)
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| Error::Storage("Failed to determine data directory".into()))
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().expect("defaults should validate");
        assert_eq!(config.cache.ttl_hours, 24);
        assert_eq!(
            config.lookup.strategies,
            vec![Strategy::Listing, Strategy::Probe]
        );
        assert_eq!(config.lookup.probe_numbers.first(), Some(&87));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [lookup]
            strategies = ["listing", "search"]
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(
            config.lookup.strategies,
            vec![Strategy::Listing, Strategy::Search]
        );
        assert_eq!(config.lookup.timeout(), Duration::from_secs(5));
        assert_eq!(config.repository.owner, "allenneuraldynamics");
        assert_eq!(config.site.root_identifier, "index");
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str(
            r#"
            [lookup]
            strategies = ["telepathy"]
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_empty_strategies() {
        let mut config = Config::default();
        config.lookup.strategies.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("strategies"));
    }

    #[test]
    fn test_validate_rejects_zero_ttl_and_timeout() {
        let mut config = Config::default();
        config.cache.ttl_hours = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.lookup.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_api_base() {
        let mut config = Config::default();
        config.repository.api_base = "not a url".into();
        assert!(matches!(config.validate(), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_page_size_is_clamped() {
        let mut lookup = LookupConfig::default();
        lookup.listing_page_size = 500;
        assert_eq!(lookup.effective_page_size(), 100);
        lookup.listing_page_size = 0;
        assert_eq!(lookup.effective_page_size(), 1);
    }

    #[test]
    fn test_api_base_override_trims_trailing_slash() {
        let mut config = Config::default();
        config.apply_api_base_override(Some("http://127.0.0.1:9999/"));
        assert_eq!(config.repository.api_base, "http://127.0.0.1:9999");

        config.apply_api_base_override(Some("   "));
        assert_eq!(config.repository.api_base, "http://127.0.0.1:9999");
    }

    #[test]
    fn test_load_from_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[repository]\nowner = \"example\"\n\n[lookup]\nstrategies = [\"search\"]\n",
        )
        .unwrap();

        let mut expected = Config::default();
        expected.repository.owner = "example".into();
        expected.lookup.strategies = vec![Strategy::Search];

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, expected);
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_repository_urls() {
        let repo = RepositoryConfig::default();
        assert_eq!(
            repo.slug(),
            "allenneuraldynamics/openscope-community-predictive-processing"
        );
        assert_eq!(
            repo.discussions_url(),
            "https://github.com/allenneuraldynamics/openscope-community-predictive-processing/discussions"
        );
    }
}
