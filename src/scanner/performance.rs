//! Latency sampling stage

use crate::http::{Probe, RequestOptions};
use crate::models::{round_secs, PerformanceStats, StageOutcome, ERROR_ALL_REQUESTS_FAILED};
use tracing::{info, warn};
use url::Url;

/// Issues `requests` sequential probes against the target root.
///
/// Failed probes are skipped; the loop always attempts every sample.
pub async fn sample(
    probe: &dyn Probe,
    target: &Url,
    requests: usize,
) -> StageOutcome<PerformanceStats> {
    info!("Testing performance ({requests} requests)...");

    let mut samples = Vec::with_capacity(requests);
    for i in 1..=requests {
        match probe.get(target, RequestOptions::default()).await {
            Ok(response) => {
                let secs = response.elapsed_secs();
                info!("Request {i:2} -> {secs:.3}s");
                samples.push(secs);
            }
            Err(_) => warn!("Request {i} failed"),
        }
    }

    match summarize(&samples) {
        Some(stats) => {
            info!(
                "Performance (s) -> min: {:.3} | max: {:.3} | avg: {:.3}",
                stats.min, stats.max, stats.avg
            );
            StageOutcome::Completed(stats)
        }
        None => StageOutcome::failed(ERROR_ALL_REQUESTS_FAILED),
    }
}

/// Reduces successful latencies to min/max/avg; `None` when empty
pub fn summarize(samples: &[f64]) -> Option<PerformanceStats> {
    if samples.is_empty() {
        return None;
    }

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = samples.iter().sum::<f64>() / samples.len() as f64;

    Some(PerformanceStats {
        min: round_secs(min),
        max: round_secs(max),
        avg: round_secs(avg),
        total_requests: samples.len(),
    })
}
