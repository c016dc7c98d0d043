//! Endpoint discovery stage

use crate::http::{Probe, RequestOptions};
use crate::models::EndpointResult;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Per-path timeout for discovery probes
pub const ENDPOINT_TIMEOUT: Duration = Duration::from_secs(5);

/// Keeps 1xx, 2xx, 3xx and the 4xx codes below 404 (401, 403, ...)
pub fn is_accepted(status_code: u16) -> bool {
    status_code < 404
}

/// Resolves a wordlist path against the base URL.
///
/// A leading `/` replaces the base path; any other path is resolved as a
/// subpath. Returns `None` when the result would leave the base origin.
pub fn resolve(base: &Url, path: &str) -> Option<Url> {
    // "//host/x" would otherwise be read as a network-path reference
    let relative = if path.starts_with(['/', '\\']) {
        format!("/{}", path.trim_start_matches(['/', '\\']))
    } else {
        path.to_string()
    };

    let url = base.join(&relative).ok()?;
    (url.origin() == base.origin()).then_some(url)
}

/// Probes every wordlist path and returns the accepted ones in wordlist order.
///
/// At most `concurrency` probes are in flight; redirects are not followed.
pub async fn discover(
    probe: &dyn Probe,
    base: &Url,
    wordlist: &[String],
    concurrency: usize,
) -> Vec<EndpointResult> {
    info!("Testing {} common and sensitive endpoints...", wordlist.len());

    let options = RequestOptions::default()
        .with_timeout(ENDPOINT_TIMEOUT)
        .without_redirects();

    let endpoints: Vec<EndpointResult> = stream::iter(wordlist.iter())
        .map(|path| async move {
            let Some(url) = resolve(base, path) else {
                warn!("Skipping '{path}': does not resolve under {base}");
                return None;
            };

            let response = probe.get(&url, options).await.ok()?;
            let status_code = response.status.as_u16();
            if !is_accepted(status_code) {
                debug!("Rejected {url} ({status_code})");
                return None;
            }

            let symbol = if status_code == 200 { "✓" } else { "!" };
            info!("[{symbol}] {path:<40} -> {status_code}");

            Some(EndpointResult {
                endpoint: path.clone(),
                status_code,
                content_type: response
                    .content_type()
                    .unwrap_or_else(|| "unknown".to_string()),
                size: response.body.len() as u64,
            })
        })
        .buffered(concurrency.max(1))
        .filter_map(|e| async { e })
        .collect()
        .await;

    info!("Total endpoints found: {}", endpoints.len());
    endpoints
}
