//! Error types for data operations.

use thiserror::Error;

/// Errors that abort loading the equity table.
///
/// Only structural problems end up here. A row whose free float cannot be
/// parsed is loaded with a missing value instead.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input file could not be opened or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The table could not be tokenised
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header
    #[error("Missing required column '{column}' (found: {available})")]
    MissingColumn {
        /// Column that was looked up
        column: String,
        /// Comma-joined header names that were present
        available: String,
    },

    /// The configured delimiter is not a single-byte ASCII character
    #[error("Delimiter {0:?} is not an ASCII character")]
    InvalidDelimiter(char),
}

/// Errors raised while turning a report reference into document text.
///
/// These never leave [`RevenueResolver`](crate::reports::RevenueResolver);
/// they exist so that each failure can be logged with its cause.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The row carries no report reference
    #[error("Empty report reference")]
    EmptyReference,

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP status {status} for {reference}")]
    Status {
        /// Status code returned by the server
        status: u16,
        /// Reference that was requested
        reference: String,
    },

    /// Local document could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF text extraction failed
    #[error("PDF extraction error: {0}")]
    Pdf(String),

    /// The fetch did not complete in time
    #[error("Timed out after {seconds}s")]
    Timeout {
        /// Timeout that elapsed
        seconds: u64,
    },
}
