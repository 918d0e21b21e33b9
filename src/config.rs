//! Configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. User values are
//! layered over stock defaults, so a config file only needs the keys it
//! wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! id = 1                      # Site whose pages the CLI works on
//! store = "pages.json"        # Page store document, relative to the config
//!
//! [i18n]
//! enabled = true              # Per-language content on/off
//! languages = ["en"]          # Available languages, in iteration order
//! default_language = "en"     # Active at startup; sole language when disabled
//! enable_fallbacks = true     # Resolve empty values through fallbacks
//! default_fallbacks = []      # Chain for languages without their own entry
//!
//! [i18n.fallbacks]
//! # fr = ["en"]               # Per-language fallback order
//! ```
//!
//! Unknown keys are rejected to catch typos early. Fallback chains may only
//! name available languages; a chain pointing at an unknown language is a
//! validation error here rather than a silent miss at resolution time.

use crate::page::SiteId;
use crate::translation::{FallbackTable, LanguageContext};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CmsConfig {
    /// Which site and which store document to work on.
    pub site: SiteSection,
    /// Content translation settings.
    pub i18n: I18nConfig,
}

impl CmsConfig {
    /// Validate cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.id == 0 {
            return Err(ConfigError::Validation("site.id must be non-zero".into()));
        }
        if self.site.store.trim().is_empty() {
            return Err(ConfigError::Validation("site.store must not be empty".into()));
        }
        self.i18n.validate()
    }

    /// Store path, resolved against the directory holding the config file.
    pub fn store_path(&self, config_path: &Path) -> PathBuf {
        let store = Path::new(&self.site.store);
        match config_path.parent() {
            Some(dir) if store.is_relative() => dir.join(store),
            _ => store.to_path_buf(),
        }
    }
}

/// Site selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Site id; pages and slug uniqueness are scoped to it.
    pub id: u64,
    /// JSON page store document.
    pub store: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            id: 1,
            store: "pages.json".to_string(),
        }
    }
}

impl SiteSection {
    pub fn site_id(&self) -> SiteId {
        SiteId(self.id)
    }
}

/// Content translation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct I18nConfig {
    /// When false, fields hold a single value and language helpers run once.
    pub enabled: bool,
    /// Available languages, in the order `for_all_languages` visits them.
    pub languages: Vec<String>,
    /// Active language at startup.
    pub default_language: String,
    /// Whether reads fall back to other languages by default.
    pub enable_fallbacks: bool,
    /// Fallback chain for languages without an entry in `fallbacks`.
    pub default_fallbacks: Vec<String>,
    /// Per-language fallback order.
    pub fallbacks: BTreeMap<String, Vec<String>>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            languages: vec!["en".to_string()],
            default_language: "en".to_string(),
            enable_fallbacks: true,
            default_fallbacks: Vec::new(),
            fallbacks: BTreeMap::new(),
        }
    }
}

impl I18nConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.languages.is_empty() {
            return Err(ConfigError::Validation(
                "i18n.languages must not be empty".into(),
            ));
        }
        let mut available = HashSet::new();
        for language in &self.languages {
            if language.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "i18n.languages must not contain empty codes".into(),
                ));
            }
            if !available.insert(language.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "i18n.languages lists '{language}' more than once"
                )));
            }
        }
        if !available.contains(self.default_language.as_str()) {
            return Err(ConfigError::Validation(format!(
                "i18n.default_language '{}' is not in i18n.languages",
                self.default_language
            )));
        }
        for target in &self.default_fallbacks {
            if !available.contains(target.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "i18n.default_fallbacks names unknown language '{target}'"
                )));
            }
        }
        for (language, chain) in &self.fallbacks {
            if !available.contains(language.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "i18n.fallbacks has an entry for unknown language '{language}'"
                )));
            }
            for target in chain {
                if target == language {
                    return Err(ConfigError::Validation(format!(
                        "i18n.fallbacks.{language} falls back to itself"
                    )));
                }
                if !available.contains(target.as_str()) {
                    return Err(ConfigError::Validation(format!(
                        "i18n.fallbacks.{language} names unknown language '{target}'"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Build the language context these settings describe.
    pub fn context(&self) -> LanguageContext {
        if !self.enabled {
            return LanguageContext::untranslated(&self.default_language);
        }
        let table = FallbackTable::new(self.fallbacks.clone(), self.default_fallbacks.clone());
        LanguageContext::new(self.languages.clone(), &self.default_language, table)
            .with_fallbacks_enabled(self.enable_fallbacks)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CmsConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist and `Err` if it exists but
/// contains invalid TOML.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CmsConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CmsConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config_path`, falling back to stock defaults when the
/// file is absent.
pub fn load_config(config_path: &Path) -> Result<CmsConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(config_path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple CMS Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Pages belong to a site; slugs are unique within one site.
id = 1

# Page store document. Relative paths are resolved against this file.
store = "pages.json"

# ---------------------------------------------------------------------------
# Content translation
# ---------------------------------------------------------------------------
[i18n]
# Store titles per language. When false every field has a single value.
enabled = true

# Available languages, in the order per-language updates visit them.
languages = ["en"]

# Language active at startup.
default_language = "en"

# Fill empty values from other languages when reading.
enable_fallbacks = true

# Fallback order for languages without their own entry below.
default_fallbacks = []

# Per-language fallback order, e.g. French pages show English text until
# translated:
[i18n.fallbacks]
# fr = ["en"]
"##
}
