//! Financial report resolution.
//!
//! A report reference is turned into text by [`ReportClient`], and the text
//! into a number by a [`MetricExtractor`]. [`RevenueResolver`] ties the two
//! together and is the only place where failures become zeros.
//!
//! # Example
//!
//! ```no_run
//! use kowloon_data::reports::{ExtractorChain, ReportClient, RevenueResolver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = RevenueResolver::new(ReportClient::new()?, ExtractorChain::revenue());
//!     let revenue = resolver.resolve("https://example.com/annual-report.pdf").await;
//!     println!("Revenue: {revenue}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod extractor;
pub mod resolver;

pub use client::ReportClient;
pub use extractor::{
    ExtractorChain, InlineXbrlExtractor, LabelledValueExtractor, MetricExtractor, REVENUE_LABEL,
    parse_grouped_number,
};
pub use resolver::RevenueResolver;
