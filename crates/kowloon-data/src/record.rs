//! One row of the index batch.

use serde::{Deserialize, Serialize};

/// An equity as it moves through the index stages.
///
/// The loader fills `id`, `free_float_fraction` and `report_reference`.
/// Later stages only ever fill the remaining fields, so a record always
/// keeps the values it was loaded with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityRecord {
    /// Stock identifier (RIC)
    pub id: String,

    /// Free float as parsed from the table; `None` when the cell was unparseable
    pub free_float_fraction: Option<f64>,

    /// URL or path of the financial report; may be empty
    pub report_reference: String,

    /// Revenue extracted from the report, 0 when nothing was found
    pub revenue: f64,

    /// Batch-relative min-max scaled free float
    pub scaled_free_float: Option<f64>,

    /// Batch-relative min-max scaled revenue
    pub scaled_revenue: Option<f64>,

    /// Weighted blend of the scaled signals
    pub raw_index: Option<f64>,

    /// Final percentage weight
    pub normalized_index: Option<f64>,
}

impl EquityRecord {
    /// Create a freshly loaded record with no derived fields.
    pub const fn new(
        id: String,
        free_float_fraction: Option<f64>,
        report_reference: String,
    ) -> Self {
        Self {
            id,
            free_float_fraction,
            report_reference,
            revenue: 0.0,
            scaled_free_float: None,
            scaled_revenue: None,
            raw_index: None,
            normalized_index: None,
        }
    }

    /// Free float with a missing value read as zero.
    pub fn free_float_or_zero(&self) -> f64 {
        self.free_float_fraction
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// Whether the row has a report to resolve.
    pub fn has_report(&self) -> bool {
        !self.report_reference.trim().is_empty()
    }
}
