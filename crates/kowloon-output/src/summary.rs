//! Index summary and concentration statistics.
//!
//! Summarizes a finished weight vector: how many constituents were lifted
//! by the floor, how many had no usable revenue, and how concentrated the
//! resulting index is.

use crate::export::ConstituentExport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of largest constituents listed by default.
const DEFAULT_TOP_N: usize = 10;

/// Summary statistics for one index run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexSummary {
    /// Index name.
    pub name: String,

    /// Number of constituents.
    pub constituents: usize,

    /// Sum of all weights (should be 100).
    pub total_weight: f64,

    /// Smallest weight.
    pub min_weight: f64,

    /// Largest weight.
    pub max_weight: f64,

    /// Constituents lifted by the floor before renormalization.
    pub floored: usize,

    /// Constituents whose revenue resolved to zero.
    pub zero_revenue: usize,

    /// Constituents with an unparseable free float.
    pub missing_free_float: usize,

    /// Herfindahl-Hirschman index of the weights taken as fractions.
    pub herfindahl: f64,

    /// Largest constituents as (id, weight), heaviest first.
    pub top_constituents: Vec<(String, f64)>,
}

impl IndexSummary {
    /// Effective number of constituents, `1 / HHI`.
    ///
    /// Equals the constituent count for an equally weighted index.
    pub fn effective_constituents(&self) -> f64 {
        if self.herfindahl.abs() < 1e-12 {
            return 0.0;
        }
        1.0 / self.herfindahl
    }

    /// Share of constituents whose revenue resolved to zero.
    pub fn zero_revenue_ratio(&self) -> f64 {
        if self.constituents == 0 {
            return 0.0;
        }
        self.zero_revenue as f64 / self.constituents as f64
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nIndex Summary: {}\n", self.name));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        output.push_str(&format!(
            "  Constituents:             {}\n",
            self.constituents
        ));
        output.push_str(&format!(
            "  Total Weight:             {:.6}\n",
            self.total_weight
        ));
        output.push_str(&format!(
            "  Weight Range:             {:.4}% .. {:.4}%\n",
            self.min_weight, self.max_weight
        ));
        output.push_str(&format!("  Floored:                  {}\n", self.floored));
        output.push_str(&format!(
            "  Zero Revenue:             {} ({:.1}%)\n",
            self.zero_revenue,
            self.zero_revenue_ratio() * 100.0
        ));
        output.push_str(&format!(
            "  Missing Free Float:       {}\n",
            self.missing_free_float
        ));
        output.push_str(&format!(
            "  HHI:                      {:.4} (effective N: {:.1})\n",
            self.herfindahl,
            self.effective_constituents()
        ));

        if !self.top_constituents.is_empty() {
            output.push_str("\nLargest Constituents:\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            output.push_str(&format!("{:<20} {:>12}\n", "ID", "Weight"));
            output.push_str(&"-".repeat(60));
            output.push('\n');

            for (id, weight) in &self.top_constituents {
                output.push_str(&format!("{:<20} {:>11.4}%\n", id, weight));
            }
        }

        output
    }
}

impl fmt::Display for IndexSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} constituents, max {:.2}%, {} floored, effective N {:.1}",
            self.name,
            self.constituents,
            self.max_weight,
            self.floored,
            self.effective_constituents()
        )
    }
}

/// Build a summary from the per-constituent breakdown of a run.
///
/// # Examples
///
/// ```
/// use kowloon_output::{ConstituentExport, generate_index_summary};
///
/// let rows = vec![
///     ConstituentExport {
///         id: "A".to_string(),
///         free_float: Some(10.0),
///         revenue: 0.0,
///         scaled_free_float: 0.0,
///         scaled_revenue: 0.0,
///         raw_index: 0.0,
///         normalized_index: 100.0,
///         floored: true,
///         report_reference: String::new(),
///     },
/// ];
///
/// let summary = generate_index_summary("Batch 3".to_string(), &rows);
/// assert_eq!(summary.constituents, 1);
/// assert_eq!(summary.floored, 1);
/// ```
pub fn generate_index_summary(name: String, rows: &[ConstituentExport]) -> IndexSummary {
    let weights: Vec<f64> = rows.iter().map(|r| r.normalized_index).collect();
    let total_weight: f64 = weights.iter().sum();

    let min_weight = weights.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max_weight = weights.iter().copied().reduce(f64::max).unwrap_or(0.0);

    let herfindahl = if total_weight > 0.0 {
        weights
            .iter()
            .map(|w| (w / total_weight).powi(2))
            .sum::<f64>()
    } else {
        0.0
    };

    let mut ranked: Vec<(String, f64)> = rows
        .iter()
        .map(|r| (r.id.clone(), r.normalized_index))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(DEFAULT_TOP_N);

    IndexSummary {
        name,
        constituents: rows.len(),
        total_weight,
        min_weight,
        max_weight,
        floored: rows.iter().filter(|r| r.floored).count(),
        zero_revenue: rows.iter().filter(|r| r.revenue == 0.0).count(),
        missing_free_float: rows.iter().filter(|r| r.free_float.is_none()).count(),
        herfindahl,
        top_constituents: ranked,
    }
}
