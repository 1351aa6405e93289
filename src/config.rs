/// Client configuration.
///
/// Read from a TOML file (all sections optional), then overridden by
/// environment variables, which may come from a `.env` file:
///
/// - `GDDP_SERVICE_URL` replaces `service.base_url`
/// - `GDDP_LOG_LEVEL` replaces `logging.level`
///
/// Command-line flags are applied last by the binary.

use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::logging::LogLevel;

/// Service address used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "gddp_fetch.toml";

pub const ENV_SERVICE_URL: &str = "GDDP_SERVICE_URL";
pub const ENV_LOG_LEVEL: &str = "GDDP_LOG_LEVEL";

// ---------------------------------------------------------------------------
// Config structure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    /// Request timeout; `None` waits as long as the service takes.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for result files saved under their default name.
    pub directory: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { directory: ".".to_string() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

impl Config {
    pub fn log_level(&self) -> Result<LogLevel, ConfigError> {
        self.logging.level.parse().map_err(ConfigError::Invalid)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.service.timeout_secs.map(Duration::from_secs)
    }

    /// Blocking HTTP client honouring the configured timeout.
    pub fn http_client(&self) -> Result<reqwest::blocking::Client, ConfigError> {
        reqwest::blocking::Client::builder()
            .timeout(self.timeout())
            .build()
            .map_err(|e| ConfigError::Invalid(format!("cannot build HTTP client: {}", e)))
    }

    /// Applies `GDDP_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SERVICE_URL).filter(|s| !s.trim().is_empty()) {
            self.service.base_url = url;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|s| !s.trim().is_empty()) {
            self.logging.level = level;
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parse config from TOML text.
pub fn parse_config(text: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(text)?;
    config.log_level()?;
    Ok(config)
}

/// Load config from a TOML file. A missing file at the default location
/// yields defaults; a missing file that was asked for explicitly is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let text = match path {
        Some(p) => fs::read_to_string(p)?,
        None => match fs::read_to_string(DEFAULT_CONFIG_FILE) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        },
    };
    parse_config(&text)
}

/// Load config, then apply `.env` and process environment overrides.
pub fn load_config_with_env(path: Option<&Path>) -> Result<Config, ConfigError> {
    dotenv::dotenv().ok();

    let mut config = load_config(path)?;
    config.apply_overrides(|key| env::var(key).ok());
    config.log_level()?;
    Ok(config)
}
