//! Error types for index construction.

use thiserror::Error;

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors raised for invalid configuration or mismatched inputs.
///
/// Degenerate data (equal values, zero totals) is never an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    /// Signal columns have different lengths
    #[error("Signal length mismatch: free float has {free_float} rows, revenue has {revenue}")]
    LengthMismatch {
        /// Rows in the free-float column
        free_float: usize,
        /// Rows in the revenue column
        revenue: usize,
    },

    /// A blend weight is negative or not finite
    #[error("Invalid weight for {signal}: {value}")]
    InvalidWeight {
        /// Signal the weight belongs to
        signal: &'static str,
        /// Offending value
        value: f64,
    },

    /// The floor is negative or not finite
    #[error("Invalid floor: {0}")]
    InvalidFloor(f64),

    /// The target total is not a positive finite number
    #[error("Invalid total: {0}")]
    InvalidTotal(f64),
}
