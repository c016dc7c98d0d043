//! HTTPS posture stage

use crate::http::{Probe, RequestOptions};
use crate::models::{SslInfo, StageOutcome, ERROR_REQUEST_FAILED};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Timeout for the plain-HTTP redirect check
pub const REDIRECT_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Checks HTTPS enablement and whether plain HTTP upgrades to HTTPS.
///
/// The redirect check only runs for `https` targets.
pub async fn inspect(probe: &dyn Probe, target: &Url) -> StageOutcome<SslInfo> {
    info!("Testing SSL/TLS...");

    if let Err(e) = probe.get(target, RequestOptions::default()).await {
        debug!("SSL stage failed: {e}");
        return StageOutcome::failed(ERROR_REQUEST_FAILED);
    }

    let https_enabled = target.scheme() == "https";
    let mut redirects_to_https = false;

    if https_enabled {
        if let Some(http_url) = plain_http_url(target) {
            let options = RequestOptions::default().with_timeout(REDIRECT_CHECK_TIMEOUT);
            if let Ok(response) = probe.get(&http_url, options).await {
                redirects_to_https = response.url.scheme() == "https";
            }
        }
    }

    info!("HTTPS enabled: {https_enabled}");
    info!("Redirect HTTP -> HTTPS: {redirects_to_https}");

    StageOutcome::Completed(SslInfo {
        https_enabled,
        redirects_to_https,
    })
}

/// Same host, port and path with the scheme forced to `http`
pub fn plain_http_url(target: &Url) -> Option<Url> {
    let mut url = target.clone();
    url.set_scheme("http").ok()?;
    Some(url)
}
