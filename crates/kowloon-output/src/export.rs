//! Export functionality for index weights.
//!
//! The primary artifact is the two-column `ID,output` table. A wider
//! per-constituent breakdown is available for inspecting how each weight
//! was reached.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialized output was not valid UTF-8.
    #[error("Invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// One row of the output artifact: an equity and its final weight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexWeight {
    /// Stock identifier.
    #[serde(rename = "ID")]
    pub id: String,

    /// Normalized index weight in percent.
    pub output: f64,
}

impl IndexWeight {
    /// Create a new index weight.
    pub const fn new(id: String, output: f64) -> Self {
        Self { id, output }
    }
}

/// Every value computed for one constituent over a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstituentExport {
    /// Stock identifier.
    pub id: String,

    /// Free float as loaded; empty when it could not be parsed.
    pub free_float: Option<f64>,

    /// Revenue extracted from the report.
    pub revenue: f64,

    /// Batch-scaled free float.
    pub scaled_free_float: f64,

    /// Batch-scaled revenue.
    pub scaled_revenue: f64,

    /// Weighted blend before normalization.
    pub raw_index: f64,

    /// Final weight in percent.
    pub normalized_index: f64,

    /// Whether the floor lifted this constituent.
    pub floored: bool,

    /// Report the revenue came from.
    pub report_reference: String,
}

impl ConstituentExport {
    /// The artifact row for this constituent.
    pub fn weight(&self) -> IndexWeight {
        IndexWeight::new(self.id.clone(), self.normalized_index)
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn rows_to_csv<'a, T: Serialize + 'a>(
    rows: impl IntoIterator<Item = &'a T>,
) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn export_rows<T: Serialize>(rows: &[T], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => rows_to_csv(rows),
        ExportFormat::Json => Ok(serde_json::to_string(rows)?),
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(rows)?),
    }
}

impl Exporter for IndexWeight {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => rows_to_csv([self]),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Vec<IndexWeight> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        if self.is_empty() && format == ExportFormat::Csv {
            // csv only writes the header alongside the first row.
            return Ok("ID,output\n".to_string());
        }
        export_rows(self, format)
    }
}

impl Exporter for Vec<ConstituentExport> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        export_rows(self, format)
    }
}
