//! Application configuration.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by an optional `config.toml` in the config directory (the
//! current directory unless `--config-dir` is given).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [api]
//! base_url = "https://api.artic.edu/api/v1"
//! # timeout_secs = 30       # Per-request timeout (omit for none)
//!
//! [cache]
//! ttl_secs = 300            # Lifetime of cached responses
//!
//! [feed]
//! page_limit = 20           # Items per page
//! fields = ["id", "title", "image_id", "thumbnail", "artist_title",
//!           "date_display", "medium_display", "category_titles"]
//!
//! [images]
//! card_width = 843          # IIIF width for grid cards
//! detail_width = 1686       # IIIF width for the details view
//!
//! [layout]
//! gap = 20                  # Pixels between columns and rows
//! breakpoints = [[1024, 4], [768, 3], [640, 2], [0, 1]]
//!
//! [favorites]
//! file = "favorites.json"   # Relative to the config directory
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [cache]
//! ttl_secs = 60
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::artic;
use crate::gallery::GallerySettings;
use crate::layout::{Breakpoints, MasonryConfig};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Museum API location and transport settings.
    pub api: ApiConfig,
    /// Response cache settings.
    pub cache: CacheConfig,
    /// Paginated listing settings.
    pub feed: FeedConfig,
    /// Requested IIIF image widths.
    pub images: ImagesConfig,
    /// Masonry grid settings.
    pub layout: LayoutConfig,
    /// Favorites storage.
    pub favorites: FavoritesConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "api.base_url must not be empty".into(),
            ));
        }
        if self.api.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::Validation(
                "cache.ttl_secs must be greater than 0".into(),
            ));
        }
        if self.feed.page_limit == 0 {
            return Err(ConfigError::Validation(
                "feed.page_limit must be greater than 0".into(),
            ));
        }
        if self.images.card_width == 0 || self.images.detail_width == 0 {
            return Err(ConfigError::Validation(
                "images widths must be non-zero".into(),
            ));
        }
        let breakpoints = &self.layout.breakpoints;
        if breakpoints.is_empty() {
            return Err(ConfigError::Validation(
                "layout.breakpoints must not be empty".into(),
            ));
        }
        if breakpoints.iter().any(|[_, columns]| *columns == 0) {
            return Err(ConfigError::Validation(
                "layout.breakpoints column counts must be non-zero".into(),
            ));
        }
        if !breakpoints.iter().any(|[min, _]| *min == 0) {
            return Err(ConfigError::Validation(
                "layout.breakpoints must include a 0 minimum width".into(),
            ));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.api.timeout_secs.map(Duration::from_secs)
    }

    pub fn gallery_settings(&self) -> GallerySettings {
        GallerySettings {
            page_limit: self.feed.page_limit,
            fields: self.feed.fields.clone(),
            card_width: self.images.card_width,
            detail_width: self.images.detail_width,
        }
    }

    pub fn masonry_config(&self) -> MasonryConfig {
        MasonryConfig {
            gap: f64::from(self.layout.gap),
            breakpoints: Breakpoints::new(
                self.layout
                    .breakpoints
                    .iter()
                    .map(|[min, columns]| (f64::from(*min), *columns as usize)),
            ),
        }
    }

    /// Favorites file, resolved against `config_dir` when relative.
    pub fn favorites_path(&self, config_dir: &Path) -> PathBuf {
        let file = Path::new(&self.favorites.file);
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            config_dir.join(file)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// API root; endpoint paths are appended to it.
    pub base_url: String,
    /// Per-request timeout in seconds. No timeout when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: artic::DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Lifetime of a cached response in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: crate::rest::DEFAULT_TTL.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    pub page_limit: u32,
    /// Field projection sent with list and search requests.
    pub fields: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_limit: 20,
            fields: artic::field_list(artic::LIST_FIELDS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    pub card_width: u32,
    pub detail_width: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            card_width: 843,
            detail_width: 1686,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub gap: u32,
    /// `[min_width, columns]` pairs, any order.
    pub breakpoints: Vec<[u32; 2]>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gap: 20,
            breakpoints: vec![[1024, 4], [768, 3], [640, 2], [0, 1]],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FavoritesConfig {
    pub file: String,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            file: "favorites.json".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a TOML value.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(AppConfig::default())?)
}

/// Recursively merge two TOML values. Overlay keys win; tables merge deeply.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `config.toml` from `dir` as a raw TOML value, if present.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto `base`, deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective configuration for `dir`.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# artic-gal configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as config.toml in the config directory
# (the current directory, or the one given with --config-dir).
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Museum API
# ---------------------------------------------------------------------------
[api]
# API root. Endpoint paths (/artworks, /artworks/search, ...) are appended.
base_url = "https://api.artic.edu/api/v1"

# Per-request timeout in seconds. Omit for no timeout.
# timeout_secs = 30

# ---------------------------------------------------------------------------
# Response cache
# ---------------------------------------------------------------------------
[cache]
# How long a cached listing or details response stays fresh, in seconds.
# Search results are never cached.
ttl_secs = 300

# ---------------------------------------------------------------------------
# Paginated listing
# ---------------------------------------------------------------------------
[feed]
# Artworks per page.
page_limit = 20

# Fields requested for each artwork in listings and search results.
fields = ["id", "title", "image_id", "thumbnail", "artist_title", "date_display", "medium_display", "category_titles"]

# ---------------------------------------------------------------------------
# Images
# ---------------------------------------------------------------------------
[images]
# IIIF image width for grid cards.
card_width = 843

# IIIF image width for the details view.
detail_width = 1686

# ---------------------------------------------------------------------------
# Masonry layout
# ---------------------------------------------------------------------------
[layout]
# Gap between columns and between stacked cards, in pixels.
gap = 20

# [min_width, columns] pairs. The widest matching entry wins.
# Must include a 0 entry.
breakpoints = [[1024, 4], [768, 3], [640, 2], [0, 1]]

# ---------------------------------------------------------------------------
# Favorites
# ---------------------------------------------------------------------------
[favorites]
# Favorites file, relative to the config directory.
file = "favorites.json"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // =========================================================================
    // Defaults and parsing
    // =========================================================================

    #[test]
    fn default_config_has_expected_values() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "https://api.artic.edu/api/v1");
        assert_eq!(config.api.timeout_secs, None);
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.feed.page_limit, 20);
        assert_eq!(config.feed.fields.len(), 8);
        assert_eq!(config.images.card_width, 843);
        assert_eq!(config.images.detail_width, 1686);
        assert_eq!(config.layout.gap, 20);
        assert_eq!(config.favorites.file, "favorites.json");
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[cache]
ttl_secs = 60
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.cache.ttl_secs, 60);
        // Unspecified defaults preserved
        assert_eq!(config.feed.page_limit, 20);
        assert_eq!(config.api.base_url, "https://api.artic.edu/api/v1");
    }

    #[test]
    fn unknown_keys_rejected() {
        let toml = r#"
[cache]
ttl = 60
"#;
        let result: Result<AppConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[theme]\ngap = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: AppConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    // =========================================================================
    // Validation
    // =========================================================================

    fn validation_message(config: &AppConfig) -> String {
        match config.validate() {
            Err(ConfigError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_empty_base_url() {
        let mut config = AppConfig::default();
        config.api.base_url = "  ".into();
        assert!(validation_message(&config).contains("base_url"));
    }

    #[test]
    fn validate_zero_timeout() {
        let mut config = AppConfig::default();
        config.api.timeout_secs = Some(0);
        assert!(validation_message(&config).contains("timeout_secs"));
    }

    #[test]
    fn validate_zero_ttl() {
        let mut config = AppConfig::default();
        config.cache.ttl_secs = 0;
        assert!(validation_message(&config).contains("ttl_secs"));
    }

    #[test]
    fn validate_zero_page_limit() {
        let mut config = AppConfig::default();
        config.feed.page_limit = 0;
        assert!(validation_message(&config).contains("page_limit"));
    }

    #[test]
    fn validate_zero_image_width() {
        let mut config = AppConfig::default();
        config.images.detail_width = 0;
        assert!(validation_message(&config).contains("images"));
    }

    #[test]
    fn validate_breakpoints_empty() {
        let mut config = AppConfig::default();
        config.layout.breakpoints.clear();
        assert!(validation_message(&config).contains("must not be empty"));
    }

    #[test]
    fn validate_breakpoints_zero_columns() {
        let mut config = AppConfig::default();
        config.layout.breakpoints = vec![[0, 0]];
        assert!(validation_message(&config).contains("non-zero"));
    }

    #[test]
    fn validate_breakpoints_need_zero_entry() {
        let mut config = AppConfig::default();
        config.layout.breakpoints = vec![[640, 2], [1024, 4]];
        assert!(validation_message(&config).contains("0 minimum"));
    }

    // =========================================================================
    // Derived settings
    // =========================================================================

    #[test]
    fn masonry_config_from_layout() {
        let mut config = AppConfig::default();
        config.layout.gap = 10;
        config.layout.breakpoints = vec![[0, 1], [500, 2]];
        let masonry = config.masonry_config();
        assert_eq!(masonry.gap, 10.0);
        assert_eq!(masonry.breakpoints.columns_for(499.0), 1);
        assert_eq!(masonry.breakpoints.columns_for(500.0), 2);
    }

    #[test]
    fn default_masonry_config_matches_layout_defaults() {
        assert_eq!(AppConfig::default().masonry_config(), MasonryConfig::default());
    }

    #[test]
    fn gallery_settings_from_config() {
        let mut config = AppConfig::default();
        config.feed.page_limit = 5;
        config.images.card_width = 400;
        let settings = config.gallery_settings();
        assert_eq!(settings.page_limit, 5);
        assert_eq!(settings.card_width, 400);
        assert_eq!(settings.detail_width, 1686);
    }

    #[test]
    fn default_gallery_settings_match_config_defaults() {
        assert_eq!(
            AppConfig::default().gallery_settings(),
            GallerySettings::default()
        );
    }

    #[test]
    fn durations_from_config() {
        let mut config = AppConfig::default();
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.request_timeout(), None);
        config.api.timeout_secs = Some(5);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn favorites_path_relative_to_config_dir() {
        let config = AppConfig::default();
        assert_eq!(
            config.favorites_path(Path::new("/etc/gal")),
            PathBuf::from("/etc/gal/favorites.json")
        );
    }

    #[test]
    fn favorites_path_absolute_kept() {
        let mut config = AppConfig::default();
        config.favorites.file = "/tmp/favs.json".into();
        assert_eq!(
            config.favorites_path(Path::new("/etc/gal")),
            PathBuf::from("/tmp/favs.json")
        );
    }

    // =========================================================================
    // merge_toml / load_config
    // =========================================================================

    #[test]
    fn merge_toml_overlay_wins_and_tables_merge() {
        let base: toml::Value = toml::from_str("[cache]\nttl_secs = 300\n[feed]\npage_limit = 20\n").unwrap();
        let overlay: toml::Value = toml::from_str("[cache]\nttl_secs = 10\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["cache"]["ttl_secs"].as_integer(), Some(10));
        assert_eq!(merged["feed"]["page_limit"].as_integer(), Some(20));
    }

    #[test]
    fn merge_toml_replaces_arrays() {
        let base: toml::Value =
            toml::from_str("[layout]\nbreakpoints = [[1024, 4], [0, 1]]\n").unwrap();
        let overlay: toml::Value = toml::from_str("[layout]\nbreakpoints = [[0, 2]]\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["layout"]["breakpoints"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[api]
base_url = "http://localhost:8080/api"
timeout_secs = 5

[layout]
breakpoints = [[0, 2]]
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.api.timeout_secs, Some(5));
        assert_eq!(config.layout.breakpoints, vec![[0, 2]]);
        // Unspecified values should be defaults
        assert_eq!(config.cache.ttl_secs, 300);
    }

    #[test]
    fn load_config_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not [valid").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_config_runs_validation() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[feed]\npage_limit = 0\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn load_config_rejects_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[images]\nquality = 90\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }
}
