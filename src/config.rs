//! Configuration management for ibex using the prefer crate.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Language;
use crate::services::{
    EntityFilter, ExcludeWordSet, ExtractionService, LexiconLoader, ParserCache, ParserLoader,
};

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default port.
pub const DEFAULT_PORT: u16 = 50051;
/// Default number of concurrent extractions.
pub const DEFAULT_WORKERS: usize = 10;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {format} config {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
    #[error("Unknown language '{value}' in {key}")]
    UnknownLanguage { key: &'static str, value: String },
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("At least one language must be enabled")]
    NoLanguages,
    #[error("Default language {0} is not in the enabled languages")]
    DefaultLanguageDisabled(Language),
    #[error("Preload language {0} is not in the enabled languages")]
    PreloadLanguageDisabled(Language),
    #[error("workers must be greater than zero")]
    ZeroWorkers,
    #[error(transparent)]
    ExcludeWords(#[from] io::Error),
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Host to bind the server to.
    pub host: String,
    /// Port to bind the server to.
    pub port: u16,
    /// Maximum number of extractions running at once.
    pub workers: usize,
    /// Language used when a request names none or an unknown one.
    pub default_language: Language,
    /// Languages the parser cache serves.
    pub languages: Vec<Language>,
    /// Exclude-word list. `None` uses the bundled list.
    pub exclude_words: Option<PathBuf>,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    /// Languages whose parsers are constructed at startup.
    pub preload: Vec<Language>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: DEFAULT_WORKERS,
            default_language: Language::English,
            languages: Language::ALL.to_vec(),
            exclude_words: None,
            request_timeout: None,
            preload: Vec::new(),
        }
    }
}

impl Settings {
    /// Check cross-field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.languages.is_empty() {
            return Err(ConfigError::NoLanguages);
        }
        if !self.languages.contains(&self.default_language) {
            return Err(ConfigError::DefaultLanguageDisabled(self.default_language));
        }
        if let Some(lang) = self.preload.iter().find(|l| !self.languages.contains(l)) {
            return Err(ConfigError::PreloadLanguageDisabled(*lang));
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }

    /// Address string for binding, e.g. "127.0.0.1:50051".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the extraction service with the built-in parser.
    pub fn build_service(&self) -> Result<ExtractionService, ConfigError> {
        self.build_service_with(Arc::new(LexiconLoader))
    }

    /// Build the extraction service around a custom parser loader.
    pub fn build_service_with(
        &self,
        loader: Arc<dyn ParserLoader>,
    ) -> Result<ExtractionService, ConfigError> {
        let exclude = ExcludeWordSet::load_optional(self.exclude_words.as_deref())?;
        let cache = Arc::new(ParserCache::new(loader, &self.languages));
        Ok(ExtractionService::new(
            cache,
            EntityFilter::new(Arc::new(exclude)),
            self.default_language,
        ))
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, prefer::FromValue)]
pub struct Config {
    /// Host to bind the server to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Port to bind the server to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u64>,
    /// Maximum number of concurrent extractions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<u64>,
    /// Fallback language code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
    /// Enabled language codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[prefer(default)]
    pub languages: Vec<String>,
    /// Path to the exclude-word list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_words: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// Languages to load at startup.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[prefer(default)]
    pub preload: Vec<String>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    #[prefer(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers ibex config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("ibex").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("{}, using defaults", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            // No config file found
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_error = |format: &'static str, message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message,
        };

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents).map_err(|e| parse_error("TOML", e.to_string()))?,
            "yaml" | "yml" => {
                serde_yaml::from_str(&contents).map_err(|e| parse_error("YAML", e.to_string()))?
            }
            _ => serde_json::from_str(&contents).map_err(|e| parse_error("JSON", e.to_string()))?,
        };

        config.source_path = Some(path.to_path_buf());
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Get the base directory for resolving relative paths.
    /// Returns the config file's parent directory if available, otherwise None.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    /// `base_dir` is used to resolve relative paths (typically config file dir or CWD).
    pub fn apply_to_settings(
        &self,
        settings: &mut Settings,
        base_dir: &Path,
    ) -> Result<(), ConfigError> {
        if let Some(ref host) = self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = u16::try_from(port).map_err(|_| ConfigError::InvalidValue {
                key: "port",
                value: port.to_string(),
            })?;
        }
        if let Some(workers) = self.workers {
            settings.workers = usize::try_from(workers).map_err(|_| ConfigError::InvalidValue {
                key: "workers",
                value: workers.to_string(),
            })?;
        }
        if let Some(ref code) = self.default_language {
            settings.default_language = parse_language("default_language", code)?;
        }
        if !self.languages.is_empty() {
            settings.languages = parse_languages("languages", &self.languages)?;
        }
        if let Some(ref path) = self.exclude_words {
            settings.exclude_words = Some(self.resolve_path(path, base_dir));
        }
        if let Some(secs) = self.request_timeout_secs {
            settings.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if !self.preload.is_empty() {
            settings.preload = parse_languages("preload", &self.preload)?;
        }
        Ok(())
    }
}

fn parse_language(key: &'static str, value: &str) -> Result<Language, ConfigError> {
    Language::parse(value).ok_or_else(|| ConfigError::UnknownLanguage {
        key,
        value: value.to_string(),
    })
}

/// Parse language codes, dropping duplicates while keeping order.
fn parse_languages<S: AsRef<str>>(
    key: &'static str,
    values: &[S],
) -> Result<Vec<Language>, ConfigError> {
    let mut languages = Vec::new();
    for value in values {
        let lang = parse_language(key, value.as_ref())?;
        if !languages.contains(&lang) {
            languages.push(lang);
        }
    }
    Ok(languages)
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        })
}

/// Apply `IBEX_*` environment overrides, read through `lookup`.
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(host) = var("IBEX_HOST") {
        settings.host = host;
    }
    if let Some(port) = var("IBEX_PORT") {
        settings.port = parse_number("IBEX_PORT", &port)?;
    }
    if let Some(workers) = var("IBEX_WORKERS") {
        settings.workers = parse_number("IBEX_WORKERS", &workers)?;
    }
    if let Some(code) = var("IBEX_DEFAULT_LANGUAGE") {
        settings.default_language = parse_language("IBEX_DEFAULT_LANGUAGE", &code)?;
    }
    if let Some(codes) = var("IBEX_LANGUAGES") {
        let codes: Vec<&str> = codes.split(',').map(str::trim).collect();
        settings.languages = parse_languages("IBEX_LANGUAGES", &codes)?;
    }
    if let Some(path) = var("IBEX_EXCLUDE_WORDS") {
        settings.exclude_words = Some(PathBuf::from(shellexpand::tilde(&path).as_ref()));
    }
    if let Some(secs) = var("IBEX_REQUEST_TIMEOUT_SECS") {
        let secs: u64 = parse_number("IBEX_REQUEST_TIMEOUT_SECS", &secs)?;
        settings.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    Ok(())
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Use CWD for relative paths instead of config file directory.
    pub use_cwd: bool,
}

/// Load settings with explicit options.
/// Returns (Settings, Config) tuple.
pub async fn load_settings_with_options(
    options: LoadOptions,
) -> Result<(Settings, Config), ConfigError> {
    // An explicit --config must load; discovery falls back to defaults.
    let config = match options.config_path {
        Some(ref path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };

    let current_dir = || std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let base_dir = if options.use_cwd {
        current_dir()
    } else {
        config.base_dir().unwrap_or_else(current_dir)
    };

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings, &base_dir)?;
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok())?;
    settings.validate()?;

    Ok((settings, config))
}
