//! CLI configuration
//!
//! Resolved from, in increasing precedence: built-in defaults, the TOML config
//! file, environment variables (a `.env` file is honoured), and command-line
//! flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::{Credentials, DEFAULT_BASE_URL};

pub const ENV_API_KEY: &str = "CUSTOMGPT_API_KEY";
pub const ENV_BASE_URL: &str = "CUSTOMGPT_API_BASE_URL";
pub const ENV_LOG_LEVEL: &str = "CUSTOMGPT_CLI_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "CUSTOMGPT_CLI_LOG_FILE";

const CONFIG_DIR: &str = "customgpt-cli";
const CONFIG_FILE: &str = "config.toml";

/// Fully resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub default_retry_after_secs: u64,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
            max_retries: 3,
            default_retry_after_secs: 30,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

/// On-disk layout of `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub retry: RetrySection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetrySection {
    pub max_retries: Option<u32>,
    pub default_retry_after_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub max_retries: Option<u32>,
}

impl Config {
    /// Load the configuration from the file system and the process environment.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let file = match path {
            Some(path) => Self::read_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::read_file(&path)?,
                None => FileConfig::default(),
            },
        };

        Ok(Self::resolve(file, |key| std::env::var(key).ok(), overrides))
    }

    /// Merge the layers; `env` looks up an environment variable by name
    pub fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
        overrides: &Overrides,
    ) -> Self {
        let defaults = Self::default();
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        Self {
            api_key: overrides
                .api_key
                .clone()
                .or_else(|| env(ENV_API_KEY))
                .or(file.api_key),
            base_url: overrides
                .base_url
                .clone()
                .or_else(|| env(ENV_BASE_URL))
                .or(file.base_url)
                .unwrap_or(defaults.base_url),
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs),
            max_retries: overrides
                .max_retries
                .or(file.retry.max_retries)
                .unwrap_or(defaults.max_retries),
            default_retry_after_secs: file
                .retry
                .default_retry_after_secs
                .unwrap_or(defaults.default_retry_after_secs),
            log_level: env(ENV_LOG_LEVEL)
                .or(file.logging.level)
                .unwrap_or(defaults.log_level),
            log_file: env(ENV_LOG_FILE)
                .map(PathBuf::from)
                .or(file.logging.file),
        }
    }

    /// Parse a TOML config file
    pub fn read_file(path: &Path) -> Result<FileConfig> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// `<config dir>/customgpt-cli/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Credentials for the API client; a missing key is a configuration error
    pub fn credentials(&self) -> Result<Credentials> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(Credentials::new(key)),
            _ => anyhow::bail!(
                "API key must be provided via --api-key argument or {} environment variable",
                ENV_API_KEY
            ),
        }
    }
}
