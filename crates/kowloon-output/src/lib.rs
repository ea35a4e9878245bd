#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kowloon/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod summary;
pub mod table;

pub use export::{ConstituentExport, ExportError, ExportFormat, Exporter, IndexWeight};
pub use report::{Report, ReportBuilder, ReportError, RunParameters};
pub use summary::{IndexSummary, generate_index_summary};
pub use table::weights_table;
