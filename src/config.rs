//! Configuration management for ocrmail using the prefer crate.
//!
//! Precedence, highest first: command-line flags, `OCRMAIL_*` environment
//! variables, the config file, built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ocr::{PageSegMode, TesseractConfig};

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// OCR section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrFileConfig {
    /// Tesseract language(s), e.g. "eng" or "eng+fra".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Page segmentation mode, 0-13.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psm: Option<u8>,
    /// OCR engine mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oem: Option<u8>,
    /// Tesseract binary name or absolute path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tesseract_cmd: Option<String>,
}

/// Configuration as written in a config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// User agent string for remote fetches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// File to also save extracted emails to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default)]
    pub ocr: OcrFileConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer for file discovery.
    ///
    /// Falls back to defaults when no config file exists. A file that exists
    /// but cannot be parsed is an error.
    pub async fn load() -> Result<Self, ConfigError> {
        match prefer::load("ocrmail").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => Self::load_from_path(path).await,
                None => Ok(Self::default()),
            },
            Err(e) => {
                tracing::debug!("No config file found: {}", e);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config = Self::parse(&contents, path)?;
        config.source_path = Some(path.to_path_buf());
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_err = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        match ext {
            "toml" => toml::from_str(contents).map_err(|e| parse_err(e.to_string())),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| parse_err(e.to_string())),
            _ => serde_json::from_str(contents).map_err(|e| parse_err(e.to_string())),
        }
    }

    /// Apply `OCRMAIL_*` environment variable overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup. Empty values are
    /// ignored; unparsable numbers are logged and ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        if let Some(ua) = var("OCRMAIL_USER_AGENT") {
            self.user_agent = Some(ua);
        }
        if let Some(timeout) = var("OCRMAIL_REQUEST_TIMEOUT") {
            match timeout.trim().parse() {
                Ok(secs) => self.request_timeout = Some(secs),
                Err(_) => tracing::warn!("Ignoring invalid OCRMAIL_REQUEST_TIMEOUT: {}", timeout),
            }
        }
        if let Some(cmd) = var("OCRMAIL_TESSERACT") {
            self.ocr.tesseract_cmd = Some(cmd);
        }
        if let Some(lang) = var("OCRMAIL_LANG") {
            self.ocr.language = Some(lang);
        }
        if let Some(psm) = var("OCRMAIL_PSM") {
            match psm.trim().parse() {
                Ok(mode) => self.ocr.psm = Some(mode),
                Err(_) => tracing::warn!("Ignoring invalid OCRMAIL_PSM: {}", psm),
            }
        }
        self
    }

    /// Get the base directory for resolving relative paths.
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
    pub fn apply_to_settings(
        &self,
        settings: &mut Settings,
        base_dir: &Path,
    ) -> Result<(), ConfigError> {
        if let Some(ref ua) = self.user_agent {
            settings.user_agent = Some(ua.clone());
        }
        if let Some(secs) = self.request_timeout {
            if secs == 0 {
                return Err(ConfigError::Invalid(
                    "request_timeout must be at least 1 second".to_string(),
                ));
            }
            settings.request_timeout = Duration::from_secs(secs);
        }
        if let Some(ref output) = self.output {
            settings.output = Some(self.resolve_path(output, base_dir));
        }
        if let Some(ref lang) = self.ocr.language {
            settings.tesseract.language = lang.clone();
        }
        if let Some(psm) = self.ocr.psm {
            settings.tesseract.psm = Some(
                PageSegMode::new(psm).map_err(|e| ConfigError::Invalid(e.to_string()))?,
            );
        }
        if let Some(oem) = self.ocr.oem {
            settings.tesseract.oem = Some(oem);
        }
        if let Some(ref cmd) = self.ocr.tesseract_cmd {
            settings.tesseract.command = cmd.clone();
        }
        Ok(())
    }
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub user_agent: Option<String>,
    pub request_timeout: Duration,
    /// File to also save extracted emails to.
    pub output: Option<PathBuf>,
    pub tesseract: TesseractConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_agent: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            output: None,
            tesseract: TesseractConfig::default(),
        }
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
}

/// Load config (file + environment) and resolve it into settings.
pub async fn load_settings(options: LoadOptions) -> Result<(Settings, Config), ConfigError> {
    let config = match options.config_path {
        Some(ref path) => Config::load_from_path(path).await?,
        None => Config::load().await?,
    }
    .with_env_overrides();

    let base_dir = config
        .base_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings, &base_dir)?;
    Ok((settings, config))
}
