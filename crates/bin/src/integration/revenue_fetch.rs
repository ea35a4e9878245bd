//! Report resolution for a whole batch.
//!
//! Reports are independent, so they are fetched concurrently with a bound
//! on in-flight requests. Results come back in input order. Each report is
//! bounded by the resolver's own timeout, and a failed report is simply a
//! zero revenue. Rows without a report reference are not fetched at all.

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use kowloon_data::{EquityRecord, RevenueResolver};
use tracing::{debug, info};

/// Resolve every record's report, at most `concurrency` at a time.
///
/// Returns one revenue per record, in record order.
pub(crate) async fn resolve_revenues(
    resolver: &RevenueResolver,
    records: &[EquityRecord],
    concurrency: usize,
    progress: Option<&ProgressBar>,
) -> Vec<f64> {
    let revenues: Vec<f64> = stream::iter(records)
        .map(|record| async move {
            let revenue = if record.has_report() {
                resolver.resolve(&record.report_reference).await
            } else {
                debug!("No report for {}, revenue is 0", record.id);
                0.0
            };
            if let Some(pb) = progress {
                pb.inc(1);
            }
            revenue
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let found = revenues.iter().filter(|r| **r > 0.0).count();
    info!(
        "Resolved revenue for {} of {} constituents",
        found,
        records.len()
    );
    revenues
}
