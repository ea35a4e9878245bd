//! Terminal table of the final weights.

use crate::export::IndexWeight;
use polars::prelude::*;

/// Header used for the identifier column in the printed table.
pub const ID_HEADER: &str = "RIC";

/// Header used for the weight column in the printed table.
pub const WEIGHT_HEADER: &str = "Normalized Financial Index";

/// Weights as a two-column DataFrame, in input order.
pub fn weights_table(weights: &[IndexWeight]) -> PolarsResult<DataFrame> {
    let ids: Vec<&str> = weights.iter().map(|w| w.id.as_str()).collect();
    let values: Vec<f64> = weights.iter().map(|w| w.output).collect();

    DataFrame::new(vec![
        Column::new(ID_HEADER.into(), ids),
        Column::new(WEIGHT_HEADER.into(), values),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_table_shape() {
        let weights = vec![
            IndexWeight::new("A".to_string(), 30.0),
            IndexWeight::new("B".to_string(), 70.0),
        ];
        let df = weights_table(&weights).unwrap();
        assert_eq!(df.shape(), (2, 2));

        let total: f64 = df
            .column(WEIGHT_HEADER)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .sum();
        assert!((total - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_table() {
        let df = weights_table(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 2);
    }
}
