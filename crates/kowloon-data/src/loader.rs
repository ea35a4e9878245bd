//! Equity table loading.
//!
//! The input is a `;`-separated table with one row per equity. Column names
//! are matched after trimming, and the free-float column is written with a
//! decimal comma (`"12,5"`).

use crate::error::LoadError;
use crate::record::EquityRecord;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Column layout of the equity table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Field delimiter (default: `;`)
    pub delimiter: char,
    /// Stock identifier column (default: `RIC`)
    pub id_column: String,
    /// Free-float percentage column (default: `Free-float %`)
    pub free_float_column: String,
    /// Report reference column (default: `Financial report / Allotment`)
    pub report_column: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            id_column: "RIC".to_string(),
            free_float_column: "Free-float %".to_string(),
            report_column: "Financial report / Allotment".to_string(),
        }
    }
}

impl LoaderConfig {
    /// The delimiter as the single byte the CSV reader splits on.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidDelimiter`] for a non-ASCII delimiter.
    pub const fn delimiter_byte(&self) -> Result<u8, LoadError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(LoadError::InvalidDelimiter(self.delimiter))
        }
    }
}

/// Column positions resolved against a concrete header.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    id: usize,
    free_float: usize,
    report: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String], config: &LoaderConfig) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name.trim())
                .ok_or_else(|| LoadError::MissingColumn {
                    column: name.to_string(),
                    available: headers.join(", "),
                })
        };

        Ok(Self {
            id: find(&config.id_column)?,
            free_float: find(&config.free_float_column)?,
            report: find(&config.report_column)?,
        })
    }
}

/// Load the equity table at `path`.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be opened,
/// [`LoadError::InvalidDelimiter`] for a non-ASCII delimiter and
/// [`LoadError::MissingColumn`] if any configured column is absent.
pub fn load_equities(
    path: impl AsRef<Path>,
    config: &LoaderConfig,
) -> Result<Vec<EquityRecord>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let records = read_equities(file, config)?;
    info!("Loaded {} equities from {}", records.len(), path.display());
    Ok(records)
}

/// Read an equity table from any reader.
///
/// # Errors
///
/// Same as [`load_equities`], minus the file-open failure.
pub fn read_equities<R: Read>(
    reader: R,
    config: &LoaderConfig,
) -> Result<Vec<EquityRecord>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(config.delimiter_byte()?)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();
    let columns = ColumnIndex::resolve(&headers, config)?;

    let mut records = Vec::new();
    for row in rdr.records() {
        records.push(parse_row(&row?, columns));
    }
    Ok(records)
}

fn parse_row(row: &StringRecord, columns: ColumnIndex) -> EquityRecord {
    let id = row.get(columns.id).unwrap_or_default().trim().to_string();
    let raw_free_float = row.get(columns.free_float).unwrap_or_default();
    let report_reference = row
        .get(columns.report)
        .unwrap_or_default()
        .trim()
        .to_string();

    let free_float = parse_locale_decimal(raw_free_float);
    if free_float.is_none() {
        warn!(
            "Unparseable free float {:?} for {}, treating as missing",
            raw_free_float, id
        );
    }

    EquityRecord::new(id, free_float, report_reference)
}

fn normalize_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_string()
}

/// Parse a decimal-comma number such as `"12,5"`.
///
/// The value is taken literally: `"12,5"` is `12.5`, not `0.125`.
/// Returns `None` for empty or malformed input.
///
/// # Examples
///
/// ```
/// use kowloon_data::parse_locale_decimal;
///
/// assert_eq!(parse_locale_decimal("12,5"), Some(12.5));
/// assert_eq!(parse_locale_decimal(" 7,0 "), Some(7.0));
/// assert_eq!(parse_locale_decimal("n/a"), None);
/// ```
pub fn parse_locale_decimal(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', ".");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
