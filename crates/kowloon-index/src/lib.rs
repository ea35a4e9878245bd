#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kowloon/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod error;
pub mod normalizer;
pub mod scaling;

pub use builder::{CompositeIndex, IndexBuilder, IndexBuilderConfig};
pub use error::{IndexError, Result};
pub use normalizer::{DEFAULT_FLOOR, DEFAULT_TOTAL, NormalizedIndex, Normalizer, NormalizerConfig};
pub use scaling::{MinMax, min_max_scale};
