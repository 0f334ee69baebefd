//! Configuration management for the intents tools
//!
//! Loads configuration with priority:
//! 1. config.toml (or specified config file)
//! 2. Environment variables (fallback)
//! 3. Defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted when no search API key is configured
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntentsConfig {
    #[serde(default)]
    pub google_search: GoogleSearchConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Settings for the grounded Google Search tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleSearchConfig {
    /// API key (can reference env var with ${VAR_NAME})
    pub api_key: Option<String>,

    /// Gemini model used for grounded generation
    #[serde(default = "default_model")]
    pub model: String,

    /// Language the model is told to answer in
    #[serde(default = "default_response_language")]
    pub response_language: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Base URL of the models endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Result cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Storage engine: "sqlite" or "in-memory"
    #[serde(default = "default_cache_provider")]
    pub provider: String,

    /// SQLite database file (ignored by the in-memory store)
    #[serde(default = "default_cache_path")]
    pub path: String,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Attach the OpenTelemetry layer to the subscriber
    #[serde(default)]
    pub otel_enabled: bool,

    pub service_name: Option<String>,
}

impl Default for GoogleSearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            response_language: default_response_language(),
            timeout_secs: default_timeout_secs(),
            base_url: default_base_url(),
        }
    }
}

impl GoogleSearchConfig {
    /// Returns the API key if one is set and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: default_cache_provider(),
            path: default_cache_path(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            otel_enabled: false,
            service_name: None,
        }
    }
}

impl IntentsConfig {
    /// Load configuration with the following priority:
    /// 1. config.toml in current directory or a parent
    /// 2. Environment variables (fallback)
    /// 3. Defaults
    ///
    /// Fails if no config.toml can be found.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::find_config_file().context(
                "config.toml not found. Create one with: cp config.toml.example config.toml",
            )?,
        };

        tracing::debug!("Loading configuration from: {:?}", config_path);

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    /// Load config.toml if one exists, otherwise fall back to defaults plus
    /// environment variables
    pub fn load_or_default() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(Some(&path)),
            None => {
                tracing::debug!("No config.toml found, using defaults and environment");
                let mut config = Self::default();
                config.resolve_env_vars();
                Ok(config)
            }
        }
    }

    /// Parse configuration from TOML text and resolve environment references
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut config: IntentsConfig = toml::from_str(contents)?;
        config.resolve_env_vars();
        Ok(config)
    }

    /// Find config.toml by searching current directory and parents
    fn find_config_file() -> Option<PathBuf> {
        let mut current = env::current_dir().ok()?;

        loop {
            let config_path = current.join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolve ${VAR_NAME} references to environment variables
    fn resolve_env_vars(&mut self) {
        let search = &mut self.google_search;
        search.api_key = match search.api_key.as_deref() {
            Some(key) => Self::resolve_env_var(key)
                .filter(|resolved| !resolved.is_empty())
                .or_else(|| env::var(API_KEY_ENV).ok()),
            None => env::var(API_KEY_ENV).ok(),
        };

        if let Some(model) = Self::resolve_env_var(&search.model) {
            search.model = model;
        }

        if let Some(path) = Self::resolve_env_var(&self.cache.path) {
            self.cache.path = path;
        }
    }

    /// Resolve a single ${VAR_NAME} reference
    fn resolve_env_var(value: &str) -> Option<String> {
        if value.starts_with("${") && value.ends_with('}') {
            let var_name = &value[2..value.len() - 1];
            env::var(var_name).ok()
        } else {
            Some(value.to_string())
        }
    }

    /// Create test-friendly defaults with an in-memory cache
    pub fn test_defaults() -> Self {
        Self {
            google_search: GoogleSearchConfig {
                api_key: Some("test-api-key".to_string()),
                model: "test-model".to_string(),
                ..GoogleSearchConfig::default()
            },
            cache: CacheConfig {
                provider: "in-memory".to_string(),
                path: String::new(),
            },
            observability: ObservabilityConfig::default(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash-exp".to_string()
}

fn default_response_language() -> String {
    "English".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

fn default_cache_provider() -> String {
    "sqlite".to_string()
}

fn default_cache_path() -> String {
    "intents_cache.db".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GoogleSearchConfig::default();
        assert_eq!(config.model, "gemini-2.0-flash-exp");
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(config.response_language, "English");
        assert_eq!(CacheConfig::default().provider, "sqlite");
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let mut config = GoogleSearchConfig::default();
        assert!(config.api_key().is_none());

        config.api_key = Some("   ".to_string());
        assert!(config.api_key().is_none());

        config.api_key = Some("abc".to_string());
        assert_eq!(config.api_key(), Some("abc"));
    }

    #[test]
    fn test_resolve_env_var() {
        unsafe {
            env::set_var("INTENTS_TEST_RESOLVE_VAR", "test_value");
        }

        let resolved = IntentsConfig::resolve_env_var("${INTENTS_TEST_RESOLVE_VAR}");
        assert_eq!(resolved, Some("test_value".to_string()));

        let not_var = IntentsConfig::resolve_env_var("plain_value");
        assert_eq!(not_var, Some("plain_value".to_string()));

        unsafe {
            env::remove_var("INTENTS_TEST_RESOLVE_VAR");
        }
    }

    #[test]
    fn test_parse_sections() {
        unsafe {
            env::set_var("INTENTS_TEST_SEARCH_KEY", "secret-from-env");
        }

        let config = IntentsConfig::from_toml_str(
            r#"
            [google_search]
            api_key = "${INTENTS_TEST_SEARCH_KEY}"
            model = "gemini-2.5-flash"
            response_language = "German"

            [cache]
            provider = "in-memory"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.google_search.api_key(), Some("secret-from-env"));
        assert_eq!(config.google_search.model, "gemini-2.5-flash");
        assert_eq!(config.google_search.response_language, "German");
        assert_eq!(config.google_search.timeout_secs, 15);
        assert_eq!(config.cache.provider, "in-memory");
        assert_eq!(config.cache.path, "intents_cache.db");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert!(!config.observability.otel_enabled);

        unsafe {
            env::remove_var("INTENTS_TEST_SEARCH_KEY");
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[google_search]\napi_key = \"file-key\"\ntimeout_secs = 5"
        )
        .unwrap();

        let config = IntentsConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.google_search.api_key(), Some("file-key"));
        assert_eq!(config.google_search.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = IntentsConfig::load_from(Some(Path::new("/nonexistent/config.toml")));
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Failed to read config file"));
    }

    #[test]
    fn test_test_defaults() {
        let config = IntentsConfig::test_defaults();
        assert_eq!(config.google_search.api_key(), Some("test-api-key"));
        assert_eq!(config.cache.provider, "in-memory");
    }
}
