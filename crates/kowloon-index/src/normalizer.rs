//! Percentage normalization with a minimum weight.
//!
//! The raw index is turned into percentages in three passes:
//!
//! 1. `pct = raw / sum(raw) * total`, or all zeros when the sum is not positive.
//! 2. Every `pct <= floor` is replaced with `floor`.
//! 3. The floored values are rescaled to sum to `total` again.
//!
//! The last pass restores the total exactly, but it can pull floored entries
//! back under the floor when many of them were lifted. The floor is a
//! nudge before renormalization, not a bound on the result.

use crate::error::{IndexError, Result};
use serde::{Deserialize, Serialize};

/// Default minimum percentage applied before renormalization.
pub const DEFAULT_FLOOR: f64 = 0.1;

/// Default sum of the normalized weights.
pub const DEFAULT_TOTAL: f64 = 100.0;

/// Configuration for the Normalizer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Minimum percentage before renormalization (default: 0.1)
    pub floor: f64,
    /// Target sum (default: 100.0)
    pub total: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            floor: DEFAULT_FLOOR,
            total: DEFAULT_TOTAL,
        }
    }
}

impl NormalizerConfig {
    /// Check that the floor is non-negative and the total positive.
    pub fn validate(&self) -> Result<()> {
        if !self.floor.is_finite() || self.floor < 0.0 {
            return Err(IndexError::InvalidFloor(self.floor));
        }
        if !self.total.is_finite() || self.total <= 0.0 {
            return Err(IndexError::InvalidTotal(self.total));
        }
        Ok(())
    }
}

/// Final weights, row-aligned with the raw index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedIndex {
    /// Percentage weights summing to the configured total
    pub values: Vec<f64>,
    /// Whether the floor replaced the row's percentage in pass 2
    pub floored: Vec<bool>,
}

impl NormalizedIndex {
    /// Sum of the weights.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Number of rows lifted to the floor.
    pub fn floored_count(&self) -> usize {
        self.floored.iter().filter(|f| **f).count()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Rescales a raw index into floored percentage weights.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Create a normalizer, rejecting an invalid floor or total.
    pub fn with_config(config: NormalizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub const fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Pass 1: share of the total, zeros when the raw index sums to zero.
    pub fn to_percentages(&self, raw: &[f64]) -> Vec<f64> {
        let sum: f64 = raw.iter().sum();
        if sum > 0.0 {
            raw.iter().map(|r| r / sum * self.config.total).collect()
        } else {
            vec![0.0; raw.len()]
        }
    }

    /// Normalize a raw index.
    ///
    /// An all-zero raw index ends up as an equal split, `total / N` each.
    /// An empty input gives an empty result.
    pub fn normalize(&self, raw: &[f64]) -> NormalizedIndex {
        let floor = self.config.floor;

        let (floored_pct, floored): (Vec<f64>, Vec<bool>) = self
            .to_percentages(raw)
            .into_iter()
            .map(|pct| if pct <= floor { (floor, true) } else { (pct, false) })
            .unzip();

        let floored_sum: f64 = floored_pct.iter().sum();
        let values = if floored_sum > 0.0 {
            floored_pct
                .iter()
                .map(|p| p / floored_sum * self.config.total)
                .collect()
        } else {
            // Only reachable with a zero floor and a zero raw index.
            equal_split(raw.len(), self.config.total)
        };

        NormalizedIndex { values, floored }
    }
}

fn equal_split(n: usize, total: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    vec![total / n as f64; n]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rstest::rstest;

    #[test]
    fn test_config_defaults() {
        let config = NormalizerConfig::default();
        assert_eq!(config.floor, 0.1);
        assert_eq!(config.total, 100.0);
    }

    #[test]
    fn test_three_record_scenario() {
        let normalizer = Normalizer::default();

        let pct = normalizer.to_percentages(&[0.0, 0.25, 0.5]);
        assert_relative_eq!(pct[0], 0.0);
        assert_relative_eq!(pct[1], 100.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(pct[2], 200.0 / 3.0, epsilon = 1e-12);

        let result = normalizer.normalize(&[0.0, 0.25, 0.5]);
        assert_eq!(result.floored, vec![true, false, false]);
        assert_abs_diff_eq!(result.total(), 100.0, epsilon = 1e-9);

        // Floored sum is 100.1, so each value shrinks by 100 / 100.1
        let factor = 100.0 / 100.1;
        assert_relative_eq!(result.values[0], 0.1 * factor, epsilon = 1e-12);
        assert_relative_eq!(result.values[1], 100.0 / 3.0 * factor, epsilon = 1e-12);
        assert_relative_eq!(result.values[2], 200.0 / 3.0 * factor, epsilon = 1e-12);
    }

    #[test]
    fn test_single_record_gets_everything() {
        let result = Normalizer::default().normalize(&[0.0]);
        assert_eq!(result.values.len(), 1);
        assert_relative_eq!(result.values[0], 100.0);
        assert_eq!(result.floored_count(), 1);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(4)]
    #[case(50)]
    fn test_all_zero_is_equal_split(#[case] n: usize) {
        let result = Normalizer::default().normalize(&vec![0.0; n]);
        for value in &result.values {
            assert_relative_eq!(*value, 100.0 / n as f64, epsilon = 1e-12);
        }
        assert_eq!(result.floored_count(), n);
    }

    #[test]
    fn test_value_equal_to_floor_is_floored() {
        let normalizer = Normalizer::with_config(NormalizerConfig {
            floor: 0.25,
            total: 1.0,
        })
        .unwrap();
        let result = normalizer.normalize(&[0.25, 0.75]);
        assert!(result.floored[0]);
        assert!(!result.floored[1]);
    }

    #[test]
    fn test_floor_is_not_a_hard_bound() {
        // One dominant entry and many zeros: every zero is lifted to 0.1,
        // then renormalization pulls them below it again.
        let mut raw = vec![0.0; 200];
        raw[0] = 1.0;
        let result = Normalizer::default().normalize(&raw);

        assert_abs_diff_eq!(result.total(), 100.0, epsilon = 1e-9);
        assert!(result.values[1] < 0.1);
        assert_relative_eq!(result.values[1], 0.1 * 100.0 / 119.9, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_floor_all_zero_raw() {
        let normalizer = Normalizer::with_config(NormalizerConfig {
            floor: 0.0,
            total: 100.0,
        })
        .unwrap();
        let result = normalizer.normalize(&[0.0, 0.0]);
        assert_eq!(result.values, vec![50.0, 50.0]);
    }

    #[test]
    fn test_custom_total() {
        let normalizer = Normalizer::with_config(NormalizerConfig {
            floor: 0.0,
            total: 1.0,
        })
        .unwrap();
        let result = normalizer.normalize(&[1.0, 3.0]);
        assert_relative_eq!(result.values[0], 0.25);
        assert_relative_eq!(result.values[1], 0.75);
    }

    #[test]
    fn test_empty_input() {
        let result = Normalizer::default().normalize(&[]);
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
        assert_eq!(result.total(), 0.0);
    }

    #[rstest]
    #[case(-0.1, 100.0)]
    #[case(f64::NAN, 100.0)]
    #[case(0.1, 0.0)]
    #[case(0.1, f64::INFINITY)]
    fn test_invalid_config(#[case] floor: f64, #[case] total: f64) {
        assert!(Normalizer::with_config(NormalizerConfig { floor, total }).is_err());
    }
}
