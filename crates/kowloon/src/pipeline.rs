//! Index stages over loaded records.
//!
//! Loading and report resolution produce [`EquityRecord`]s with free float
//! and revenue filled in. [`IndexPipeline::compute`] runs the index builder
//! and the normalizer over the whole batch and writes the results back into
//! the records.

use crate::config::{Config, ConfigError};
use kowloon_data::EquityRecord;
use kowloon_index::{IndexBuilder, IndexError, NormalizedIndex, Normalizer};
use kowloon_output::{ConstituentExport, IndexWeight};
use tracing::info;

/// Store resolved revenues on their records, row for row.
///
/// # Errors
///
/// Returns [`IndexError::LengthMismatch`] when the two slices differ in
/// length; no record is modified in that case.
pub fn attach_revenue(records: &mut [EquityRecord], revenues: &[f64]) -> Result<(), IndexError> {
    if records.len() != revenues.len() {
        return Err(IndexError::LengthMismatch {
            free_float: records.len(),
            revenue: revenues.len(),
        });
    }
    for (record, revenue) in records.iter_mut().zip(revenues) {
        record.revenue = *revenue;
    }
    Ok(())
}

/// Index builder and normalizer, applied together to one batch.
#[derive(Debug, Clone, Default)]
pub struct IndexPipeline {
    builder: IndexBuilder,
    normalizer: Normalizer,
}

impl IndexPipeline {
    /// Combine a builder and a normalizer.
    pub const fn new(builder: IndexBuilder, normalizer: Normalizer) -> Self {
        Self {
            builder,
            normalizer,
        }
    }

    /// Pipeline using the `[index]` and `[normalizer]` settings.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(
            IndexBuilder::with_config(config.index)?,
            Normalizer::with_config(config.normalizer)?,
        ))
    }

    /// Compute every record's scaled signals, raw index and weight.
    ///
    /// Missing free float counts as zero. The returned [`NormalizedIndex`]
    /// carries which rows were floored.
    pub fn compute(&self, records: &mut [EquityRecord]) -> Result<NormalizedIndex, IndexError> {
        let free_float: Vec<f64> = records.iter().map(EquityRecord::free_float_or_zero).collect();
        let revenue: Vec<f64> = records.iter().map(|r| r.revenue).collect();

        let composite = self.builder.build(&free_float, &revenue)?;
        let normalized = self.normalizer.normalize(&composite.raw);

        for (i, record) in records.iter_mut().enumerate() {
            record.scaled_free_float = Some(composite.scaled_free_float[i]);
            record.scaled_revenue = Some(composite.scaled_revenue[i]);
            record.raw_index = Some(composite.raw[i]);
            record.normalized_index = Some(normalized.values[i]);
        }

        info!(
            "Computed weights for {} constituents ({} floored)",
            normalized.len(),
            normalized.floored_count()
        );
        Ok(normalized)
    }

    /// The `ID,output` rows for computed records.
    ///
    /// Records that were never computed get a weight of 0.
    pub fn weights(records: &[EquityRecord]) -> Vec<IndexWeight> {
        records
            .iter()
            .map(|r| IndexWeight::new(r.id.clone(), r.normalized_index.unwrap_or(0.0)))
            .collect()
    }

    /// Full per-constituent breakdown for computed records.
    pub fn constituents(
        records: &[EquityRecord],
        normalized: &NormalizedIndex,
    ) -> Vec<ConstituentExport> {
        records
            .iter()
            .enumerate()
            .map(|(i, r)| ConstituentExport {
                id: r.id.clone(),
                free_float: r.free_float_fraction,
                revenue: r.revenue,
                scaled_free_float: r.scaled_free_float.unwrap_or(0.0),
                scaled_revenue: r.scaled_revenue.unwrap_or(0.0),
                raw_index: r.raw_index.unwrap_or(0.0),
                normalized_index: r.normalized_index.unwrap_or(0.0),
                floored: normalized.floored.get(i).copied().unwrap_or(false),
                report_reference: r.report_reference.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn record(id: &str, free_float: Option<f64>) -> EquityRecord {
        EquityRecord::new(id.to_string(), free_float, String::new())
    }

    #[test]
    fn test_compute_fills_every_stage() {
        let mut records = vec![
            record("A", Some(10.0)),
            record("B", Some(20.0)),
            record("C", Some(30.0)),
        ];
        let normalized = IndexPipeline::default().compute(&mut records).unwrap();

        assert_eq!(records[1].scaled_free_float, Some(0.5));
        assert_eq!(records[1].scaled_revenue, Some(0.0));
        assert_eq!(records[2].raw_index, Some(0.5));
        assert_eq!(normalized.floored, vec![true, false, false]);

        let total: f64 = records.iter().filter_map(|r| r.normalized_index).sum();
        assert_abs_diff_eq!(total, 100.0, epsilon = 1e-9);

        // Loaded values are kept next to the derived ones
        assert_eq!(records[2].free_float_fraction, Some(30.0));
    }

    #[test]
    fn test_missing_free_float_is_zero() {
        let mut records = vec![record("A", None), record("B", Some(50.0))];
        IndexPipeline::default().compute(&mut records).unwrap();
        assert_eq!(records[0].scaled_free_float, Some(0.0));
        assert_eq!(records[1].scaled_free_float, Some(1.0));
    }

    #[test]
    fn test_single_record_gets_100() {
        let mut records = vec![record("A", Some(12.5))];
        IndexPipeline::default().compute(&mut records).unwrap();
        assert_relative_eq!(records[0].normalized_index.unwrap(), 100.0);
    }

    #[test]
    fn test_attach_revenue() {
        let mut records = vec![record("A", Some(1.0)), record("B", Some(2.0))];
        attach_revenue(&mut records, &[1_000.0, 0.0]).unwrap();
        assert_eq!(records[0].revenue, 1_000.0);

        let err = attach_revenue(&mut records, &[5.0]).unwrap_err();
        assert!(matches!(err, IndexError::LengthMismatch { .. }));
        assert_eq!(records[0].revenue, 1_000.0);
    }

    #[test]
    fn test_weights_and_constituents() {
        let mut records = vec![record("A", Some(1.0)), record("B", Some(3.0))];
        attach_revenue(&mut records, &[300.0, 100.0]).unwrap();
        let normalized = IndexPipeline::default().compute(&mut records).unwrap();

        let weights = IndexPipeline::weights(&records);
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0].id, "A");
        assert_relative_eq!(weights[0].output, 50.0);

        let rows = IndexPipeline::constituents(&records, &normalized);
        assert_eq!(rows[1].revenue, 100.0);
        assert_eq!(rows[1].scaled_free_float, 1.0);
        assert!(!rows[0].floored);
    }

    #[test]
    fn test_from_config_rejects_invalid_weights() {
        let mut config = Config::default();
        config.index.revenue_weight = -1.0;
        assert!(IndexPipeline::from_config(&config).is_err());
    }
}
