//! Configuration loading and validation.
//!
//! Values come from, lowest precedence first: built-in defaults, an
//! optional TOML file, then `IPL__`-prefixed environment variables
//! (`IPL__REPORTS__LEADERBOARD_LIMIT=5`). Command-line flags are applied
//! on top by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::storage::{StorageConfig, StoreBackend};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ipl-insights.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to write config file: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to load config: {0}")]
    LoadError(#[from] ::config::ConfigError),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Record store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend type: "jsonl" or "parquet"
    #[serde(default)]
    pub backend: StoreBackend,
}

/// Tunables shared by every report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Rows kept by leaderboard reports
    #[serde(default = "default_leaderboard_limit")]
    pub leaderboard_limit: usize,

    /// Minimum balls faced to qualify for strike rate
    #[serde(default = "default_min_balls_strike_rate")]
    pub min_balls_strike_rate: u32,

    /// Minimum balls bowled to qualify for economy
    #[serde(default = "default_min_balls_economy")]
    pub min_balls_economy: u32,

    /// Leave wides (and no-balls, for economy) out of ball counts
    #[serde(default)]
    pub legal_balls_only: bool,
}

fn default_leaderboard_limit() -> usize {
    10
}

fn default_min_balls_strike_rate() -> u32 {
    500
}

fn default_min_balls_economy() -> u32 {
    300
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            leaderboard_limit: default_leaderboard_limit(),
            min_balls_strike_rate: default_min_balls_strike_rate(),
            min_balls_economy: default_min_balls_economy(),
            legal_balls_only: false,
        }
    }
}

/// Which renderers run for each report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Text,
    VegaLite,
    Both,
}

impl OutputFormat {
    pub fn text(&self) -> bool {
        matches!(self, OutputFormat::Text | OutputFormat::Both)
    }

    pub fn vega_lite(&self) -> bool {
        matches!(self, OutputFormat::VegaLite | OutputFormat::Both)
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory chart files are written to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    #[serde(default)]
    pub format: OutputFormat,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./reports")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: OutputFormat::default(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub reports: ReportSettings,

    #[serde(default)]
    pub output: OutputConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            store: StoreConfig::default(),
            reports: ReportSettings::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the file (required when given, otherwise
    /// [`DEFAULT_CONFIG_FILE`] if present) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    fn load_with_env(
        path: Option<&Path>,
        env: Option<::config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => ::config::File::from(path).required(true),
            None => ::config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        let config: AppConfig = ::config::Config::builder()
            .add_source(file)
            .add_source(
                ::config::Environment::with_prefix("IPL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reports.leaderboard_limit == 0 {
            return Err(ConfigError::ValidationError(
                "Leaderboard limit must be greater than 0".to_string(),
            ));
        }

        if self.log_level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Log level must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn storage(&self) -> StorageConfig {
        StorageConfig::new(self.data_dir.clone())
    }

    /// Render as a TOML document.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
