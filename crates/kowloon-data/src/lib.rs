#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kowloon/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod record;
pub mod reports;

pub use error::{FetchError, LoadError};
pub use loader::{LoaderConfig, load_equities, parse_locale_decimal, read_equities};
pub use record::EquityRecord;
pub use reports::{
    ExtractorChain, InlineXbrlExtractor, LabelledValueExtractor, MetricExtractor, ReportClient,
    RevenueResolver,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
