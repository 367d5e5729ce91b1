//! Configuration management for the `powderwatch` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings. Also loads
//! the watch-list file naming the resorts to report on.

use crate::PowderwatchError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Root configuration structure for the `powderwatch` application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowderwatchConfig {
    /// Forecast site scraping configuration
    #[serde(default)]
    pub scrape: ScrapeConfig,
    /// Watch-list file configuration
    #[serde(default)]
    pub watchlist: WatchlistConfig,
    /// Directory and resolution cache settings
    #[serde(default)]
    pub cache: CacheConfig,
    /// Log level and format settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Search index upload configuration
    #[serde(default)]
    pub index: IndexConfig,
}

/// Forecast site scraping settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Base URL of the forecast site
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// User agent sent with forecast page requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Watch-list file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistConfig {
    /// Path to the watch-list TOML file
    #[serde(default = "default_watchlist_file")]
    pub file: String,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether directory and resolution caches are used at all
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Directory the cache files live in
    #[serde(default = "default_cache_location")]
    pub location: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, or trace
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Search index upload settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Whether assembled forecasts are uploaded after a run
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the search cluster
    #[serde(default = "default_index_url")]
    pub url: String,
    /// Name of the index documents are written to
    #[serde(default = "default_index_name")]
    pub name: String,
}

// Default value functions
fn default_base_url() -> String {
    "https://www.snow-forecast.com".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_watchlist_file() -> String {
    "watchlist.toml".to_string()
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_location() -> String {
    dirs::cache_dir()
        .map(|dir| dir.join("powderwatch").display().to_string())
        .unwrap_or_else(|| ".powderwatch-cache".to_string())
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_index_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_index_name() -> String {
    "snow-forecasts".to_string()
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            file: default_watchlist_file(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            location: default_cache_location(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: default_index_url(),
            name: default_index_name(),
        }
    }
}

impl Default for PowderwatchConfig {
    fn default() -> Self {
        Self {
            scrape: ScrapeConfig::default(),
            watchlist: WatchlistConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
            index: IndexConfig::default(),
        }
    }
}

impl PowderwatchConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration, preferring an explicitly given file path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Explicit path wins over the per-user default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with POWDERWATCH_ prefix
        builder = builder.add_source(
            Environment::with_prefix("POWDERWATCH")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: PowderwatchConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Default configuration file path under the user config directory
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("powderwatch").join("config.toml"))
    }

    /// Backfill fields an override source set to empty
    pub fn apply_defaults(&mut self) {
        if self.scrape.base_url.is_empty() {
            self.scrape.base_url = default_base_url();
        }
        if self.scrape.user_agent.is_empty() {
            self.scrape.user_agent = default_user_agent();
        }
        if self.scrape.timeout_seconds == 0 {
            self.scrape.timeout_seconds = default_timeout();
        }
        if self.watchlist.file.is_empty() {
            self.watchlist.file = default_watchlist_file();
        }
        if self.cache.location.is_empty() {
            self.cache.location = default_cache_location();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.index.url.is_empty() {
            self.index.url = default_index_url();
        }
        if self.index.name.is_empty() {
            self.index.name = default_index_name();
        }
    }

    /// Validate all settings after loading
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.scrape.timeout_seconds > 300 {
            return Err(
                PowderwatchError::config("Request timeout cannot exceed 300 seconds").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PowderwatchError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "compact"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PowderwatchError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.scrape.base_url.starts_with("http://")
            && !self.scrape.base_url.starts_with("https://")
        {
            return Err(PowderwatchError::config(
                "Forecast site base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if self.index.enabled
            && !self.index.url.starts_with("http://")
            && !self.index.url.starts_with("https://")
        {
            return Err(PowderwatchError::config(
                "Search index URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}

/// Watched resorts grouped by country, as read from the watch-list file
///
/// The map is ordered, so countries are always visited in lexicographic
/// order regardless of file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct WatchList(BTreeMap<String, Vec<String>>);

impl WatchList {
    /// Load the watch-list from a TOML file
    ///
    /// A missing file is a configuration error, not an empty watch-list.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PowderwatchError::config(format!(
                "Watch-list file not found: {}",
                path.display()
            ))
            .into());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read watch-list file: {}", path.display()))?;
        Self::from_toml(&raw)
    }

    /// Parse watch-list TOML: one key per country, each an array of
    /// resort names to look up in that country's directory
    pub fn from_toml(raw: &str) -> Result<Self> {
        let list: WatchList = toml::from_str(raw)
            .map_err(|e| PowderwatchError::config(format!("Invalid watch-list TOML: {e}")))?;
        Ok(list)
    }

    /// Countries and their requested resorts, in lexicographic country order
    pub fn countries(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// Whether the watch-list names no resorts at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Number of countries on the watch-list
    #[must_use]
    pub fn country_count(&self) -> usize {
        self.0.len()
    }

    /// Number of watched resorts across all countries
    #[must_use]
    pub fn resort_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}
