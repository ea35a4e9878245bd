//! Run configuration.
//!
//! Loaded from a TOML file. Every section and field is optional; missing
//! values fall back to the defaults below.
//!
//! ```toml
//! [input]
//! path = "data/Batch 3 Data.csv"
//!
//! [input.columns]
//! delimiter = ";"
//! id_column = "RIC"
//! free_float_column = "Free-float %"
//! report_column = "Financial report / Allotment"
//!
//! [output]
//! path = "output_index.csv"
//! format = "csv"
//!
//! [index]
//! free_float_weight = 0.5
//! revenue_weight = 0.5
//!
//! [normalizer]
//! floor = 0.1
//! total = 100.0
//!
//! [fetch]
//! enabled = true
//! concurrency = 10
//! timeout_secs = 30
//! revenue_label = "Revenue"
//! ```

use kowloon_data::LoaderConfig;
use kowloon_data::reports::REVENUE_LABEL;
use kowloon_data::reports::client::DEFAULT_USER_AGENT;
use kowloon_index::{IndexBuilderConfig, IndexError, NormalizerConfig};
use kowloon_output::ExportFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors from reading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be rendered as TOML
    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Index or normalizer settings are invalid
    #[error("Invalid index settings: {0}")]
    Index(#[from] IndexError),

    /// Input delimiter cannot be used to split the table
    #[error("Input delimiter {0:?} must be a single ASCII character")]
    InvalidDelimiter(char),

    /// Fetch concurrency of zero
    #[error("Fetch concurrency must be at least 1")]
    ZeroConcurrency,
}

/// Full run configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input table location and layout
    pub input: InputConfig,
    /// Output artifacts
    pub output: OutputConfig,
    /// Signal weights
    pub index: IndexBuilderConfig,
    /// Floor and target total
    pub normalizer: NormalizerConfig,
    /// Report fetching
    pub fetch: FetchConfig,
}

/// Where the equity table lives and how it is laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Path to the `;`-separated equity table
    pub path: PathBuf,
    /// Delimiter and column names
    pub columns: LoaderConfig,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/Batch 3 Data.csv"),
            columns: LoaderConfig::default(),
        }
    }
}

/// Where and how results are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// `ID,output` artifact path
    pub path: PathBuf,
    /// Artifact format
    pub format: ExportFormat,
    /// Optional per-constituent breakdown (same format as the artifact)
    pub details_path: Option<PathBuf>,
    /// Optional JSON run report
    pub report_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("output_index.csv"),
            format: ExportFormat::Csv,
            details_path: None,
            report_path: None,
        }
    }
}

/// How financial reports are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Resolve report references at all; when false every revenue is 0
    pub enabled: bool,
    /// Reports fetched at the same time
    pub concurrency: usize,
    /// Per-report timeout in seconds
    pub timeout_secs: u64,
    /// User agent sent with report requests
    pub user_agent: String,
    /// Label searched for in report text
    pub revenue_label: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            concurrency: 10,
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            revenue_label: REVENUE_LABEL.to_string(),
        }
    }
}

impl FetchConfig {
    /// Per-report timeout.
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load config from a TOML file. Falls back to defaults if the file
    /// doesn't exist or cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                tracing::info!("Config loaded from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the numeric settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.index.validate()?;
        self.normalizer.validate()?;
        if self.input.columns.delimiter_byte().is_err() {
            return Err(ConfigError::InvalidDelimiter(self.input.columns.delimiter));
        }
        if self.fetch.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }
}
