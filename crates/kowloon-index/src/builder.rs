//! Composite index construction.
//!
//! Combines the min-max scaled free float and revenue of each equity into a
//! single raw score using fixed weights.

use crate::error::{IndexError, Result};
use crate::scaling::min_max_scale;
use serde::{Deserialize, Serialize};

/// Configuration for the IndexBuilder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexBuilderConfig {
    /// Weight for scaled free float (default: 0.5)
    pub free_float_weight: f64,
    /// Weight for scaled revenue (default: 0.5)
    pub revenue_weight: f64,
}

impl Default for IndexBuilderConfig {
    fn default() -> Self {
        Self {
            free_float_weight: 0.5,
            revenue_weight: 0.5,
        }
    }
}

impl IndexBuilderConfig {
    /// Check that both weights are finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        check_weight("free_float", self.free_float_weight)?;
        check_weight("revenue", self.revenue_weight)
    }
}

fn check_weight(signal: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(IndexError::InvalidWeight { signal, value })
    }
}

/// Scaled signals and the raw index for one batch, row-aligned with the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeIndex {
    /// Free float scaled to `[0, 1]`
    pub scaled_free_float: Vec<f64>,
    /// Revenue scaled to `[0, 1]`
    pub scaled_revenue: Vec<f64>,
    /// Weighted blend of the scaled signals
    pub raw: Vec<f64>,
}

impl CompositeIndex {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the batch was empty.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Builds the raw composite index from free float and revenue.
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    config: IndexBuilderConfig,
}

impl IndexBuilder {
    /// Create a builder, rejecting invalid weights.
    pub fn with_config(config: IndexBuilderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub const fn config(&self) -> &IndexBuilderConfig {
        &self.config
    }

    /// Scale both columns over the batch and blend them.
    ///
    /// Missing free-float values should be passed as `0.0`. The result is
    /// only meaningful within this batch.
    pub fn build(&self, free_float: &[f64], revenue: &[f64]) -> Result<CompositeIndex> {
        if free_float.len() != revenue.len() {
            return Err(IndexError::LengthMismatch {
                free_float: free_float.len(),
                revenue: revenue.len(),
            });
        }

        let scaled_free_float = min_max_scale(free_float);
        let scaled_revenue = min_max_scale(revenue);
        let raw = scaled_free_float
            .iter()
            .zip(&scaled_revenue)
            .map(|(ff, rev)| self.config.free_float_weight * ff + self.config.revenue_weight * rev)
            .collect();

        Ok(CompositeIndex {
            scaled_free_float,
            scaled_revenue,
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_config_defaults() {
        let config = IndexBuilderConfig::default();
        assert_eq!(config.free_float_weight, 0.5);
        assert_eq!(config.revenue_weight, 0.5);
    }

    #[test]
    fn test_equal_revenue_uses_free_float_only() {
        let index = IndexBuilder::default()
            .build(&[10.0, 20.0, 30.0], &[0.0, 0.0, 0.0])
            .unwrap();

        assert_eq!(index.scaled_free_float, vec![0.0, 0.5, 1.0]);
        assert_eq!(index.scaled_revenue, vec![0.0, 0.0, 0.0]);
        assert_relative_eq!(index.raw[0], 0.0);
        assert_relative_eq!(index.raw[1], 0.25);
        assert_relative_eq!(index.raw[2], 0.5);
    }

    #[test]
    fn test_both_signals() {
        let index = IndexBuilder::default()
            .build(&[10.0, 30.0], &[500.0, 100.0])
            .unwrap();
        // scaled ff = [0, 1], scaled revenue = [1, 0]
        assert_relative_eq!(index.raw[0], 0.5);
        assert_relative_eq!(index.raw[1], 0.5);
    }

    #[test]
    fn test_single_record_is_degenerate() {
        let index = IndexBuilder::default().build(&[42.0], &[1_000.0]).unwrap();
        assert_eq!(index.raw, vec![0.0]);
    }

    #[test]
    fn test_custom_weights() {
        let builder = IndexBuilder::with_config(IndexBuilderConfig {
            free_float_weight: 0.25,
            revenue_weight: 0.75,
        })
        .unwrap();
        let index = builder.build(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        assert_relative_eq!(index.raw[1], 1.0);
        assert_eq!(builder.config().revenue_weight, 0.75);
    }

    #[test]
    fn test_length_mismatch() {
        let err = IndexBuilder::default().build(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert_eq!(
            err,
            IndexError::LengthMismatch {
                free_float: 2,
                revenue: 1
            }
        );
    }

    #[test]
    fn test_invalid_weight_rejected() {
        let err = IndexBuilder::with_config(IndexBuilderConfig {
            free_float_weight: -0.1,
            revenue_weight: 0.5,
        })
        .unwrap_err();
        assert!(matches!(err, IndexError::InvalidWeight { signal: "free_float", .. }));

        assert!(
            IndexBuilder::with_config(IndexBuilderConfig {
                free_float_weight: 0.5,
                revenue_weight: f64::NAN,
            })
            .is_err()
        );
    }

    #[test]
    fn test_empty_batch() {
        let index = IndexBuilder::default().build(&[], &[]).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }
}
