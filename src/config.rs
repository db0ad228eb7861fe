//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the data directory next to the JSON exports and is optional: stock defaults
//! cover everything, and a user file only needs the keys it overrides.
//!
//! ## Config File Location
//!
//! ```text
//! data/
//! ├── config.toml      # Site config (overrides stock defaults)
//! ├── names.json
//! └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! name = "Name Atlas"
//! host = "example.com"      # Bare host, used for absolute URLs and link audits
//! tagline = "Baby names, meanings and how they sound together"
//!
//! [thresholds.filter]       # gender / letter / country / style pages
//! min_words = 400
//! min_links = 12
//!
//! [thresholds.sibling]
//! min_words = 600
//! min_links = 15
//!
//! [thresholds.name_profile]
//! min_words = 700
//! min_links = 18
//!
//! [thresholds.names_like]
//! min_words = 700
//! min_links = 18
//!
//! [thresholds.surname]
//! min_words = 800
//! min_links = 20
//!
//! [limits]
//! surname_candidates = 60   # Names scored into each surname shortlist
//! surname_featured = 12     # Names explained in detail on surname pages
//! sibling_matches = 12
//! clashing_names = 6
//! names_like = 12
//!
//! [processing]
//! max_processes = 4         # Max parallel render workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::guards::PageThresholds;
use crate::types::PageKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Stock config serialization error: {0}")]
    Defaults(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity and host.
    pub site: SiteInfo,
    /// Content floors per page kind.
    pub thresholds: ThresholdsConfig,
    /// List sizes per call site.
    pub limits: LimitsConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let host = self.site.host.trim();
        if host.is_empty() {
            return Err(ConfigError::Validation("site.host must not be empty".into()));
        }
        if host.contains("://") || host.contains('/') {
            return Err(ConfigError::Validation(
                "site.host must be a bare host name, without scheme or path".into(),
            ));
        }
        if self.site.name.trim().is_empty() {
            return Err(ConfigError::Validation("site.name must not be empty".into()));
        }
        let limits = [
            ("limits.surname_candidates", self.limits.surname_candidates),
            ("limits.surname_featured", self.limits.surname_featured),
            ("limits.sibling_matches", self.limits.sibling_matches),
            ("limits.clashing_names", self.limits.clashing_names),
            ("limits.names_like", self.limits.names_like),
        ];
        for (key, value) in limits {
            if value == 0 {
                return Err(ConfigError::Validation(format!("{key} must be at least 1")));
            }
        }
        if self.limits.surname_featured > self.limits.surname_candidates {
            return Err(ConfigError::Validation(
                "limits.surname_featured must not exceed limits.surname_candidates".into(),
            ));
        }
        Ok(())
    }
}

/// Site identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub name: String,
    /// Bare host name (`example.com`), no scheme.
    pub host: String,
    pub tagline: String,
}

impl SiteInfo {
    /// `https://<host>`, no trailing slash.
    pub fn base_url(&self) -> String {
        format!("https://{}", self.host.trim())
    }
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "Name Atlas".to_string(),
            host: "example.com".to_string(),
            tagline: "Baby names, meanings and how they sound together".to_string(),
        }
    }
}

/// Content floors per guarded page kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdsConfig {
    pub filter: PageThresholds,
    pub sibling: PageThresholds,
    pub name_profile: PageThresholds,
    pub names_like: PageThresholds,
    pub surname: PageThresholds,
}

impl ThresholdsConfig {
    /// Floor for a page kind. Index and legal pages are not guarded.
    pub fn for_kind(&self, kind: PageKind) -> Option<&PageThresholds> {
        match kind {
            PageKind::Filter => Some(&self.filter),
            PageKind::Sibling => Some(&self.sibling),
            PageKind::NameProfile => Some(&self.name_profile),
            PageKind::NamesLike => Some(&self.names_like),
            PageKind::Surname => Some(&self.surname),
            PageKind::Index | PageKind::Legal => None,
        }
    }
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            filter: PageThresholds {
                min_words: 400,
                min_links: 12,
            },
            sibling: PageThresholds {
                min_words: 600,
                min_links: 15,
            },
            name_profile: PageThresholds {
                min_words: 700,
                min_links: 18,
            },
            names_like: PageThresholds {
                min_words: 700,
                min_links: 18,
            },
            surname: PageThresholds {
                min_words: 800,
                min_links: 20,
            },
        }
    }
}

/// How many entries each ranked list shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    pub surname_candidates: usize,
    pub surname_featured: usize,
    pub sibling_matches: usize,
    pub clashing_names: usize,
    pub names_like: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            surname_candidates: 60,
            surname_featured: 12,
            sibling_matches: 12,
            clashing_names: 6,
            names_like: 12,
        }
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Render worker count: `max_processes` bounded to `1..=cores`, or every
/// core when unset.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism().map_or(1, |n| n.get());
    match config.max_processes {
        Some(limit) => limit.clamp(1, cores),
        None => cores,
    }
}

// =============================================================================
// Layering
// =============================================================================

/// [`SiteConfig::default`] as a TOML table. User files are layered onto it.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Layer `overlay` onto `base`. Tables on both sides merge key by key; any
/// other overlay value wins outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut table), toml::Value::Table(overrides)) => {
            merge_tables(&mut table, overrides);
            toml::Value::Table(table)
        }
        (_, overlay) => overlay,
    }
}

fn merge_tables(table: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match (table.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(nested)) => {
                merge_tables(existing, nested);
            }
            (_, value) => {
                table.insert(key, value);
            }
        }
    }
}

/// Stock defaults with `dir/config.toml` layered on top, then validated.
/// A missing file yields the defaults.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let mut layered = stock_defaults_value()?;
    let path = dir.join("config.toml");
    if path.is_file() {
        let user: toml::Value = toml::from_str(&fs::read_to_string(&path)?)?;
        layered = merge_toml(layered, user);
    }
    let config: SiteConfig = layered.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Name Atlas Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the data directory, next to names.json.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
name = "Name Atlas"

# Bare host name, no scheme. Used for absolute URLs in the sitemap and to
# recognise absolute internal links when auditing pages.
host = "example.com"

tagline = "Baby names, meanings and how they sound together"

# ---------------------------------------------------------------------------
# Content floors
# ---------------------------------------------------------------------------
# Every generated page of a guarded kind must reach both floors or the build
# fails. Words are counted on visible text; links are root-relative or
# same-host anchors.

# Gender, letter, country and style listing pages.
[thresholds.filter]
min_words = 400
min_links = 12

[thresholds.sibling]
min_words = 600
min_links = 15

[thresholds.name_profile]
min_words = 700
min_links = 18

[thresholds.names_like]
min_words = 700
min_links = 18

[thresholds.surname]
min_words = 800
min_links = 20

# ---------------------------------------------------------------------------
# List sizes
# ---------------------------------------------------------------------------
[limits]
# Names scored into each surname shortlist.
surname_candidates = 60

# Names explained in detail on surname pages (<= surname_candidates).
surname_featured = 12

sibling_matches = 12
clashing_names = 6
names_like = 12

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_site_identity() {
        let config = SiteConfig::default();
        assert_eq!(config.site.name, "Name Atlas");
        assert_eq!(config.site.base_url(), "https://example.com");
    }

    #[test]
    fn default_thresholds_per_kind() {
        let thresholds = ThresholdsConfig::default();
        let floor = |kind| thresholds.for_kind(kind).map(|t| (t.min_words, t.min_links));
        assert_eq!(floor(PageKind::Filter), Some((400, 12)));
        assert_eq!(floor(PageKind::Sibling), Some((600, 15)));
        assert_eq!(floor(PageKind::NameProfile), Some((700, 18)));
        assert_eq!(floor(PageKind::Surname), Some((800, 20)));
        assert_eq!(floor(PageKind::Legal), None);
        assert_eq!(floor(PageKind::Index), None);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[site]
host = "names.example.org"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.site.host, "names.example.org");
        // Default values preserved
        assert_eq!(config.site.name, "Name Atlas");
        assert_eq!(config.limits.sibling_matches, 12);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.host, "example.com");
        assert_eq!(config.thresholds.surname.min_words, 800);
    }

    #[test]
    fn load_config_merges_single_threshold_key() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[thresholds.surname]
min_words = 900
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.thresholds.surname.min_words, 900);
        // Sibling key of the overridden one comes from the stock defaults.
        assert_eq!(config.thresholds.surname.min_links, 20);
        assert_eq!(config.thresholds.filter.min_words, 400);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[limits]
sibling_matchez = 3
"#,
        )
        .unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[sitee]\nname = \"x\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_host_with_scheme() {
        let mut config = SiteConfig::default();
        config.site.host = "https://example.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("site.host"));
    }

    #[test]
    fn validate_rejects_empty_host() {
        let mut config = SiteConfig::default();
        config.site.host = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_limit() {
        let mut config = SiteConfig::default();
        config.limits.clashing_names = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("limits.clashing_names"));
    }

    #[test]
    fn validate_rejects_featured_above_candidates() {
        let mut config = SiteConfig::default();
        config.limits.surname_candidates = 5;
        config.limits.surname_featured = 6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[limits]
names_like = 0
"#,
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"min_words = 400"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"min_words = 300"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("min_words").unwrap().as_integer(), Some(300));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str(
            r#"
[thresholds.filter]
min_words = 400
min_links = 12
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[thresholds.filter]
min_links = 5
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let filter = merged.get("thresholds").unwrap().get("filter").unwrap();
        assert_eq!(filter.get("min_words").unwrap().as_integer(), Some(400));
        assert_eq!(filter.get("min_links").unwrap().as_integer(), Some(5));
    }

    #[test]
    fn merge_toml_scalar_replaces_table() {
        let base: toml::Value = toml::from_str(
            r#"
[limits]
names_like = 12
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(r#"limits = 3"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("limits").unwrap().as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_adds_keys_missing_from_base() {
        let base: toml::Value = toml::from_str(r#"[site]"#).unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[site]
host = "names.example.org"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let site = merged.get("site").unwrap();
        assert_eq!(site.get("host").unwrap().as_str(), Some("names.example.org"));
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_never_zero() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.site.host, defaults.site.host);
        assert_eq!(config.site.tagline, defaults.site.tagline);
        for kind in PageKind::ALL {
            assert_eq!(
                config.thresholds.for_kind(kind),
                defaults.thresholds.for_kind(kind)
            );
        }
        assert_eq!(config.limits.surname_candidates, 60);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        assert!(val.get("site").is_some());
        assert!(val.get("thresholds").is_some());
        assert!(val.get("limits").is_some());
        assert!(val.get("processing").is_some());
    }
}
