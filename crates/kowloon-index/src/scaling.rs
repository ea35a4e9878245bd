//! Min-max scaling.

use serde::{Deserialize, Serialize};

/// Observed range of a column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

impl MinMax {
    /// Range of `values`, with non-finite entries read as zero.
    ///
    /// Returns `None` for an empty slice.
    pub fn fit(values: &[f64]) -> Option<Self> {
        let mut iter = values.iter().copied().map(finite_or_zero);
        let first = iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |acc, v| Self {
            min: acc.min.min(v),
            max: acc.max.max(v),
        }))
    }

    /// Width of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Whether every value in the column was the same.
    pub fn is_degenerate(&self) -> bool {
        self.span() == 0.0
    }

    /// Scale one value into `[0, 1]`; a degenerate range maps everything to 0.
    pub fn transform(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        (finite_or_zero(value) - self.min) / self.span()
    }
}

/// Scale a column to `[0, 1]` relative to its own minimum and maximum.
///
/// When all values are equal (including a single-row column) every output
/// is 0.
///
/// # Examples
///
/// ```
/// use kowloon_index::min_max_scale;
///
/// assert_eq!(min_max_scale(&[10.0, 20.0, 30.0]), vec![0.0, 0.5, 1.0]);
/// assert_eq!(min_max_scale(&[4.0, 4.0]), vec![0.0, 0.0]);
/// ```
pub fn min_max_scale(values: &[f64]) -> Vec<f64> {
    MinMax::fit(values).map_or_else(Vec::new, |range| {
        values.iter().map(|&v| range.transform(v)).collect()
    })
}

const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
