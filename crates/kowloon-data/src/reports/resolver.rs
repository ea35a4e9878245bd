//! Revenue resolution with zero fallback.

use super::client::{DEFAULT_TIMEOUT, ReportClient};
use super::extractor::MetricExtractor;
use crate::error::FetchError;
use std::time::Duration;
use tracing::{debug, warn};

/// Resolves a report reference to a revenue figure.
///
/// [`resolve`](Self::resolve) never fails: a missing reference, a failed
/// fetch, an undecodable document and a document without a match all come
/// back as `0.0`, each logged with the reason.
#[derive(Debug)]
pub struct RevenueResolver {
    client: ReportClient,
    extractor: Box<dyn MetricExtractor>,
    timeout: Duration,
}

impl RevenueResolver {
    /// Create a resolver using the default timeout.
    pub fn new(client: ReportClient, extractor: impl MetricExtractor + 'static) -> Self {
        Self {
            client,
            extractor: Box::new(extractor),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bound fetching plus decoding of a single report.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch and extract, surfacing what went wrong.
    ///
    /// `Ok(None)` means the document was read but had no match.
    pub async fn try_resolve(&self, reference: &str) -> Result<Option<f64>, FetchError> {
        let text = tokio::time::timeout(self.timeout, self.client.fetch_text(reference))
            .await
            .map_err(|_| FetchError::Timeout {
                seconds: self.timeout.as_secs(),
            })??;
        Ok(self.extractor.extract(&text))
    }

    /// Resolve a reference to a non-negative revenue, `0.0` on any failure.
    pub async fn resolve(&self, reference: &str) -> f64 {
        match self.try_resolve(reference).await {
            Ok(Some(value)) => sanitize(reference, value),
            Ok(None) => {
                debug!(
                    "No match from {} extractor in {}",
                    self.extractor.name(),
                    reference
                );
                0.0
            }
            Err(FetchError::EmptyReference) => 0.0,
            Err(e) => {
                warn!("Failed to resolve report {}: {}", reference, e);
                0.0
            }
        }
    }
}

fn sanitize(reference: &str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!(
            "Discarding revenue {} from {}, expected a non-negative number",
            value, reference
        );
        0.0
    }
}
