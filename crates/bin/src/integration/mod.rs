//! Integration modules wiring the library crates into the CLI.
//!
//! - `config_paths`: default config file discovery
//! - `revenue_fetch`: concurrent report resolution with progress

pub(crate) mod config_paths;
pub(crate) mod revenue_fetch;

use kowloon::ConfigError;
use kowloon_data::{FetchError, LoadError};
use kowloon_index::IndexError;
use kowloon_output::{ExportError, ReportError};

/// Fatal errors for a CLI run.
#[derive(Debug, thiserror::Error)]
pub(crate) enum PipelineError {
    /// Equity table could not be loaded.
    #[error("Failed to load equities: {0}")]
    Load(#[from] LoadError),
    /// Configuration is invalid.
    #[error("{0}")]
    Config(#[from] ConfigError),
    /// Index computation failed.
    #[error("Index error: {0}")]
    Index(#[from] IndexError),
    /// HTTP client could not be constructed.
    #[error("Report client error: {0}")]
    Client(#[from] FetchError),
    /// Revenue label could not be compiled.
    #[error("Invalid revenue label: {0}")]
    Label(#[from] regex::Error),
    /// Artifact could not be written.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
    /// Run report could not be written.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
    /// Weights table could not be built.
    #[error("Table error: {0}")]
    Table(String),
}
