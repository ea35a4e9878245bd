#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kowloon/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod pipeline;

// Re-export main types from sub-crates
pub use kowloon_data as data;
pub use kowloon_index as index;
pub use kowloon_output as output;

pub use config::{Config, ConfigError, FetchConfig, InputConfig, OutputConfig};
pub use pipeline::{IndexPipeline, attach_revenue};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
