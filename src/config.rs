//! Site configuration module.
//!
//! Configuration is layered. Each layer only needs the keys it wants to
//! override:
//!
//! ```text
//! stock defaults          (SiteConfig::default)
//!   ← seedpress.toml       (optional file, or --config PATH)
//!     ← environment        (SITE_NAME, OPENROUTER_API_KEY, ...; .env is loaded first)
//! ```
//!
//! All layers are merged as `toml::Value` tables with [`merge_toml`], then
//! deserialized into [`SiteConfig`] and validated. The result is immutable and
//! passed by reference to every stage of the run.
//!
//! ## Configuration Options
//!
//! ```toml
//! [site]
//! name = "Cafeiro"
//! tagline = "Guia prático de café em casa"
//! url = "https://example.com"       # may include a sub-path, e.g. https://user.github.io/site
//! contact_email = "contato@example.com"
//! language = "pt-BR"
//! timezone = "America/Sao_Paulo"
//!
//! [paths]
//! output_dir = "public"
//! cache_dir = "cache"
//! seeds_file = "data/keywords.txt"
//! stylesheet = "templates/styles.css"
//!
//! [llm]
//! # api_key = "sk-or-..."           # usually set via OPENROUTER_API_KEY
//! model = "deepseek/deepseek-chat-v3.1:free"
//! enabled = true
//! max_calls_per_run = 3
//!
//! [images]
//! enabled = true
//! model = "openai/gpt-image-1"
//! max_calls_per_run = 3
//!
//! [limits]
//! max_posts_total = 200
//! max_new_pages_per_run = 0
//!
//! [affiliate]
//! amazon_tag = "SEU_TAG-20"
//!
//! [analytics]
//! # ga_measurement_id = "G-XXXXXXX"
//!
//! [deploy]
//! branch = "gh-pages"
//! ```
//!
//! Unknown keys in the file are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "seedpress.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid value {value:?} for environment variable {var}")]
    Env { var: &'static str, value: String },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration.
///
/// All fields have defaults; a run with no file and no environment produces a
/// complete site with fallback content and placeholder images.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Branding and canonical location.
    pub site: SiteInfo,
    /// Input and output locations.
    pub paths: PathsConfig,
    /// Text-generation service.
    pub llm: LlmConfig,
    /// Image-generation service.
    pub images: ImagesConfig,
    /// Run-level caps.
    pub limits: LimitsConfig,
    /// Affiliate marketplace links.
    pub affiliate: AffiliateConfig,
    pub analytics: AnalyticsConfig,
    pub deploy: DeployConfig,
}

impl SiteConfig {
    /// Validate values that serde cannot check by type alone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.site.url).map_err(|e| {
            ConfigError::Validation(format!("site.url {:?} is not a valid URL: {e}", self.site.url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(
                "site.url must use http or https".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Validation(
                "llm.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Validation("llm.model must not be empty".into()));
        }
        if self.images.model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "images.model must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Site URL without a trailing slash, the prefix of every absolute link.
    pub fn site_url(&self) -> &str {
        self.site.url.trim_end_matches('/')
    }

    /// Directory cover images are written to (`<output>/assets`).
    pub fn assets_dir(&self) -> PathBuf {
        self.paths.output_dir.join("assets")
    }
}

/// Branding and canonical location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub name: String,
    pub tagline: String,
    /// Canonical URL. Its path component becomes the base path of every
    /// internal link, so the site can live under a sub-path.
    pub url: String,
    pub contact_email: String,
    /// BCP 47 tag used for `<html lang>` and `og:locale`.
    pub language: String,
    pub timezone: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "Cafeiro".to_string(),
            tagline: "Guia prático de café em casa".to_string(),
            url: "https://example.com".to_string(),
            contact_email: "contato@example.com".to_string(),
            language: "pt-BR".to_string(),
            timezone: "America/Sao_Paulo".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub output_dir: PathBuf,
    /// Root of the body cache; entries live in `<cache_dir>/llm/`.
    pub cache_dir: PathBuf,
    /// One keyword per line. Missing file → built-in seed list.
    pub seeds_file: PathBuf,
    /// Copied verbatim to `<output>/styles.css` when present.
    pub stylesheet: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("public"),
            cache_dir: PathBuf::from("cache"),
            seeds_file: PathBuf::from("data/keywords.txt"),
            stylesheet: PathBuf::from("templates/styles.css"),
        }
    }
}

/// Text-generation service settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmConfig {
    /// Bearer credential. No key means no request is ever issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub enabled: bool,
    /// Body-generation requests allowed per run.
    pub max_calls_per_run: u32,
    pub endpoint: String,
    pub timeout_secs: u64,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "deepseek/deepseek-chat-v3.1:free".to_string(),
            enabled: true,
            max_calls_per_run: 3,
            endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            timeout_secs: 60,
            temperature: 0.6,
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("enabled", &self.enabled)
            .field("max_calls_per_run", &self.max_calls_per_run)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl LlmConfig {
    /// The configured key, if non-blank. Also used by the image service.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// The credential, if text generation is enabled.
    pub fn active_key(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.credential()
    }
}

/// Image-generation service settings. Shares the text service's credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    pub enabled: bool,
    pub model: String,
    /// External image requests allowed per run.
    pub max_calls_per_run: u32,
    pub endpoint: String,
    /// `WIDTHxHEIGHT` requested from the service.
    pub size: String,
    pub timeout_secs: u64,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "openai/gpt-image-1".to_string(),
            max_calls_per_run: 3,
            endpoint: "https://openrouter.ai/api/v1/images".to_string(),
            size: "1200x630".to_string(),
            timeout_secs: 90,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Seeds beyond this count are ignored.
    pub max_posts_total: usize,
    /// Articles without an existing page that may be created in one run.
    /// 0 means no limit.
    pub max_new_pages_per_run: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_posts_total: 200,
            max_new_pages_per_run: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AffiliateConfig {
    /// Referral tag appended to every marketplace link.
    pub amazon_tag: String,
    /// Search endpoint of the marketplace.
    pub marketplace_url: String,
    /// Fixed category filter (`i=` parameter).
    pub category: String,
}

impl Default for AffiliateConfig {
    fn default() -> Self {
        Self {
            amazon_tag: "SEU_TAG-20".to_string(),
            marketplace_url: "https://www.amazon.com.br/s".to_string(),
            category: "kitchen".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyticsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ga_measurement_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeployConfig {
    /// Branch the published output is pushed to by the deploy workflow.
    pub branch: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            branch: "gh-pages".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// How an environment variable's text is turned into a TOML value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnvKind {
    Str,
    Bool,
    Int,
}

/// Environment variable → `(section, key)` mapping, in documentation order.
const ENV_VARS: &[(&str, &str, &str, EnvKind)] = &[
    ("SITE_NAME", "site", "name", EnvKind::Str),
    ("SITE_TAGLINE", "site", "tagline", EnvKind::Str),
    ("SITE_URL", "site", "url", EnvKind::Str),
    ("CONTACT_EMAIL", "site", "contact_email", EnvKind::Str),
    ("LANGUAGE", "site", "language", EnvKind::Str),
    ("TIMEZONE", "site", "timezone", EnvKind::Str),
    ("OUTPUT_DIR", "paths", "output_dir", EnvKind::Str),
    ("CACHE_DIR", "paths", "cache_dir", EnvKind::Str),
    ("SEEDS_FILE", "paths", "seeds_file", EnvKind::Str),
    ("STYLESHEET", "paths", "stylesheet", EnvKind::Str),
    ("OPENROUTER_API_KEY", "llm", "api_key", EnvKind::Str),
    ("OPENROUTER_MODEL", "llm", "model", EnvKind::Str),
    ("GENERATE_WITH_LLM", "llm", "enabled", EnvKind::Bool),
    ("LLM_MAX_CALLS_PER_RUN", "llm", "max_calls_per_run", EnvKind::Int),
    ("MAX_POSTS_TOTAL", "limits", "max_posts_total", EnvKind::Int),
    ("MAX_NEW_PAGES_PER_RUN", "limits", "max_new_pages_per_run", EnvKind::Int),
    ("AMAZON_TAG_BR", "affiliate", "amazon_tag", EnvKind::Str),
    ("GA_MEASUREMENT_ID", "analytics", "ga_measurement_id", EnvKind::Str),
    ("GENERATE_IMAGES", "images", "enabled", EnvKind::Bool),
    ("IMAGE_MODEL", "images", "model", EnvKind::Str),
    ("IMG_MAX_CALLS_PER_RUN", "images", "max_calls_per_run", EnvKind::Int),
    ("GITHUB_PAGES_BRANCH", "deploy", "branch", EnvKind::Str),
];

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
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

/// Load a TOML config file as a raw value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Build the environment layer from a variable lookup.
///
/// The lookup is injected so tests never touch the process environment.
/// Empty values are treated as unset.
pub fn env_overlay<F>(lookup: F) -> Result<toml::Value, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut root = toml::map::Map::new();
    for &(var, section, key, kind) in ENV_VARS {
        let Some(raw) = lookup(var) else { continue };
        let raw = raw.trim().to_string();
        if raw.is_empty() {
            continue;
        }
        let value = match kind {
            EnvKind::Str => toml::Value::String(raw),
            EnvKind::Bool => toml::Value::Boolean(parse_flag(&raw)),
            EnvKind::Int => match raw.parse::<i64>() {
                Ok(n) if n >= 0 => toml::Value::Integer(n),
                _ => return Err(ConfigError::Env { var, value: raw }),
            },
        };
        let table = root
            .entry(section.to_string())
            .or_insert(toml::Value::Table(toml::map::Map::new()));
        if let toml::Value::Table(t) = table {
            t.insert(key.to_string(), value);
        }
    }
    Ok(toml::Value::Table(root))
}

/// `1`, `true`, `yes` (any case) are true; everything else is false.
fn parse_flag(raw: &str) -> bool {
    matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

/// Merge optional overlays onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the full configuration: stock defaults ← file ← environment.
///
/// `file` defaults to [`DEFAULT_CONFIG_FILE`] in the working directory; a
/// missing file is not an error.
pub fn load_config<F>(file: Option<&Path>, lookup: F) -> Result<SiteConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let path = file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    let mut overlays = Vec::new();
    if let Some(file_layer) = load_raw_config(path)? {
        overlays.push(file_layer);
    }
    overlays.push(env_overlay(lookup)?);
    resolve_config(stock_defaults_value(), overlays)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# seedpress configuration
# =======================
# All settings are optional. Values shown below are the defaults.
# Every key marked (env: NAME) can also be set through that environment
# variable, which wins over this file. A .env file is read first.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
name = "Cafeiro"                          # (env: SITE_NAME)
tagline = "Guia prático de café em casa"  # (env: SITE_TAGLINE)
# Canonical URL. A path component (https://user.github.io/blog) makes every
# internal link relative to that sub-path.
url = "https://example.com"               # (env: SITE_URL)
contact_email = "contato@example.com"     # (env: CONTACT_EMAIL)
language = "pt-BR"                        # (env: LANGUAGE)
timezone = "America/Sao_Paulo"            # (env: TIMEZONE)

# ---------------------------------------------------------------------------
# Paths
# ---------------------------------------------------------------------------
[paths]
output_dir = "public"                     # (env: OUTPUT_DIR)
cache_dir = "cache"                       # (env: CACHE_DIR)
seeds_file = "data/keywords.txt"          # (env: SEEDS_FILE)
stylesheet = "templates/styles.css"       # (env: STYLESHEET)

# ---------------------------------------------------------------------------
# Text generation (OpenRouter-compatible chat completions)
# ---------------------------------------------------------------------------
[llm]
# api_key = "sk-or-..."                   # (env: OPENROUTER_API_KEY)
model = "deepseek/deepseek-chat-v3.1:free" # (env: OPENROUTER_MODEL)
enabled = true                            # (env: GENERATE_WITH_LLM)
# Article bodies requested per run; cached bodies do not count.
max_calls_per_run = 3                     # (env: LLM_MAX_CALLS_PER_RUN)
endpoint = "https://openrouter.ai/api/v1/chat/completions"
timeout_secs = 60
temperature = 0.6

# ---------------------------------------------------------------------------
# Cover images
# ---------------------------------------------------------------------------
[images]
enabled = true                            # (env: GENERATE_IMAGES)
model = "openai/gpt-image-1"              # (env: IMAGE_MODEL)
max_calls_per_run = 3                     # (env: IMG_MAX_CALLS_PER_RUN)
endpoint = "https://openrouter.ai/api/v1/images"
size = "1200x630"
timeout_secs = 90

# ---------------------------------------------------------------------------
# Limits
# ---------------------------------------------------------------------------
[limits]
max_posts_total = 200                     # (env: MAX_POSTS_TOTAL)
max_new_pages_per_run = 0                 # 0 = no limit (env: MAX_NEW_PAGES_PER_RUN)

# ---------------------------------------------------------------------------
# Affiliate links
# ---------------------------------------------------------------------------
[affiliate]
amazon_tag = "SEU_TAG-20"                 # (env: AMAZON_TAG_BR)
marketplace_url = "https://www.amazon.com.br/s"
category = "kitchen"

# ---------------------------------------------------------------------------
# Analytics
# ---------------------------------------------------------------------------
[analytics]
# ga_measurement_id = "G-XXXXXXX"         # (env: GA_MEASUREMENT_ID)

# ---------------------------------------------------------------------------
# Deploy
# ---------------------------------------------------------------------------
[deploy]
branch = "gh-pages"                       # (env: GITHUB_PAGES_BRANCH)
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_matches_documented_values() {
        let config = SiteConfig::default();
        assert_eq!(config.site.name, "Cafeiro");
        assert_eq!(config.site.url, "https://example.com");
        assert_eq!(config.paths.output_dir, PathBuf::from("public"));
        assert_eq!(config.llm.max_calls_per_run, 3);
        assert!(config.llm.enabled);
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.limits.max_posts_total, 200);
        assert_eq!(config.limits.max_new_pages_per_run, 0);
        assert_eq!(config.affiliate.amazon_tag, "SEU_TAG-20");
        assert_eq!(config.deploy.branch, "gh-pages");
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_url() {
        let mut config = SiteConfig::default();
        config.site.url = "not a url".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.site.url = "ftp://example.com".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_temperature_out_of_range() {
        let mut config = SiteConfig::default();
        config.llm.temperature = 2.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn parse_partial_config() {
        let config: SiteConfig = toml::from_str(
            r#"
[site]
name = "Moka"
"#,
        )
        .unwrap();
        assert_eq!(config.site.name, "Moka");
        assert_eq!(config.site.tagline, "Guia prático de café em casa");
        assert_eq!(config.images.size, "1200x630");
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str(
            r#"
[llm]
modle = "x"
"#,
        );
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[lmm]\nmodel = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[llm]\nmodel = \"a\"\nenabled = true\n").unwrap();
        let overlay: toml::Value = toml::from_str("[llm]\nmodel = \"b\"\n").unwrap();
        let merged = merge_toml(base, overlay);
        let llm = merged.get("llm").unwrap();
        assert_eq!(llm.get("model").unwrap().as_str(), Some("b"));
        assert_eq!(llm.get("enabled").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn env_overlay_maps_variables_to_sections() {
        let overlay = env_overlay(env_from(&[
            ("SITE_NAME", "Barista"),
            ("GENERATE_WITH_LLM", "no"),
            ("LLM_MAX_CALLS_PER_RUN", "7"),
        ]))
        .unwrap();
        assert_eq!(
            overlay.get("site").unwrap().get("name").unwrap().as_str(),
            Some("Barista")
        );
        assert_eq!(
            overlay.get("llm").unwrap().get("enabled").unwrap().as_bool(),
            Some(false)
        );
        assert_eq!(
            overlay
                .get("llm")
                .unwrap()
                .get("max_calls_per_run")
                .unwrap()
                .as_integer(),
            Some(7)
        );
    }

    #[test]
    fn env_flags_accept_common_truthy_spellings() {
        for raw in ["1", "true", "TRUE", "yes", "Yes"] {
            assert!(parse_flag(raw), "{raw}");
        }
        for raw in ["0", "false", "off", "nope"] {
            assert!(!parse_flag(raw), "{raw}");
        }
    }

    #[test]
    fn env_overlay_rejects_non_numeric_caps() {
        let err = env_overlay(env_from(&[("MAX_POSTS_TOTAL", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: "MAX_POSTS_TOTAL", .. }));
    }

    #[test]
    fn env_overlay_ignores_blank_values() {
        let overlay = env_overlay(env_from(&[("OPENROUTER_API_KEY", "  ")])).unwrap();
        assert!(overlay.get("llm").is_none());
    }

    #[test]
    fn load_config_without_file_or_env_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(Some(&tmp.path().join("absent.toml")), no_env).unwrap();
        assert_eq!(config.site.name, "Cafeiro");
        assert!(config.llm.active_key().is_none());
    }

    #[test]
    fn environment_wins_over_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seedpress.toml");
        fs::write(
            &path,
            r#"
[site]
name = "Do arquivo"
tagline = "Só no arquivo"
"#,
        )
        .unwrap();

        let config = load_config(Some(&path), env_from(&[("SITE_NAME", "Do ambiente")])).unwrap();
        assert_eq!(config.site.name, "Do ambiente");
        assert_eq!(config.site.tagline, "Só no arquivo");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seedpress.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(Some(&path), no_env), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_env_values() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(
            Some(&tmp.path().join("absent.toml")),
            env_from(&[("SITE_URL", "example dot com")]),
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn active_key_requires_enabled_and_non_blank() {
        let mut llm = LlmConfig {
            api_key: Some("sk-test".into()),
            ..LlmConfig::default()
        };
        assert_eq!(llm.active_key(), Some("sk-test"));

        llm.enabled = false;
        assert_eq!(llm.active_key(), None);

        llm.enabled = true;
        llm.api_key = Some("   ".into());
        assert_eq!(llm.active_key(), None);
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let llm = LlmConfig {
            api_key: Some("sk-secret".into()),
            ..LlmConfig::default()
        };
        let debug = format!("{llm:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn site_url_and_assets_dir() {
        let mut config = SiteConfig::default();
        config.site.url = "https://user.github.io/cafe/".into();
        assert_eq!(config.site_url(), "https://user.github.io/cafe");
        assert_eq!(config.assets_dir(), PathBuf::from("public/assets"));
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.site.name, defaults.site.name);
        assert_eq!(config.llm.model, defaults.llm.model);
        assert_eq!(config.llm.endpoint, defaults.llm.endpoint);
        assert_eq!(config.images.endpoint, defaults.images.endpoint);
        assert_eq!(config.limits.max_new_pages_per_run, 0);
        assert_eq!(config.paths.stylesheet, defaults.paths.stylesheet);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        for section in ["site", "paths", "llm", "images", "limits", "affiliate", "analytics", "deploy"] {
            assert!(val.get(section).is_some(), "{section}");
        }
    }
}
