//! JSON run report.
//!
//! Records what a run read, what it wrote, the settings it used and the
//! resulting [`IndexSummary`], so that an artifact can be traced back to
//! the batch and parameters that produced it.

use crate::export::ExportFormat;
use crate::summary::IndexSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required field was never set on the builder.
    #[error("Report is missing its {0}")]
    MissingField(&'static str),
}

/// Index settings a run was computed with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    /// Weight of scaled free float in the raw index.
    pub free_float_weight: f64,

    /// Weight of scaled revenue in the raw index.
    pub revenue_weight: f64,

    /// Percentage floor before renormalization.
    pub floor: f64,

    /// Target sum of the weights.
    pub total: f64,
}

/// A record of one index run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Input table the run was computed from.
    pub source: String,

    /// Artifact the weights were written to.
    pub output: String,

    /// Format of the artifact.
    pub format: ExportFormat,

    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// Settings of the run.
    pub parameters: RunParameters,

    /// Statistics of the resulting weights.
    pub summary: IndexSummary,
}

impl Report {
    /// Number of constituents in the batch.
    pub const fn constituents(&self) -> usize {
        self.summary.constituents
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a report written by [`write_to`](Self::write_to).
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the report as pretty JSON.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    source: Option<String>,
    output: Option<String>,
    format: Option<ExportFormat>,
    parameters: Option<RunParameters>,
    summary: Option<IndexSummary>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input source.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the artifact path.
    pub fn output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Set the artifact format (default: CSV).
    pub const fn format(mut self, format: ExportFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the run settings.
    pub const fn parameters(mut self, parameters: RunParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Set the run summary.
    pub fn summary(mut self, summary: IndexSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Build the report, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::MissingField`] unless the source, output,
    /// parameters and summary have all been set.
    pub fn build(self) -> Result<Report, ReportError> {
        Ok(Report {
            source: self.source.ok_or(ReportError::MissingField("source"))?,
            output: self.output.ok_or(ReportError::MissingField("output"))?,
            format: self.format.unwrap_or(ExportFormat::Csv),
            generated_at: Utc::now(),
            parameters: self
                .parameters
                .ok_or(ReportError::MissingField("parameters"))?,
            summary: self.summary.ok_or(ReportError::MissingField("summary"))?,
        })
    }
}
