//! Availability stage: one probe that gates the rest of the pipeline

use crate::http::{joined_header, Probe, RequestOptions};
use crate::models::{round_secs, Availability, AvailabilityStatus};
use reqwest::header::HeaderMap;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{error, info};
use url::Url;

/// Probes the target root and classifies its reachability
pub async fn check(probe: &dyn Probe, target: &Url) -> Availability {
    info!("Testing availability...");

    let start = Instant::now();
    let availability = match probe.get(target, RequestOptions::default()).await {
        Ok(response) => Availability {
            status: if response.is_ok() {
                AvailabilityStatus::Online
            } else {
                AvailabilityStatus::Issues
            },
            status_code: response.status.as_u16(),
            response_time: round_secs(response.elapsed_secs()),
            headers: header_map(&response.headers),
        },
        Err(_) => Availability {
            status: AvailabilityStatus::Offline,
            status_code: 0,
            response_time: round_secs(start.elapsed().as_secs_f64()),
            headers: BTreeMap::new(),
        },
    };

    if availability.is_reachable() {
        info!(
            "Status: {} | HTTP code: {} | Time: {:.3}s",
            availability.status, availability.status_code, availability.response_time
        );
    } else {
        error!("Target offline or unreachable: {target}");
    }

    availability
}

/// Flattens response headers; repeated headers are joined with ", "
fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .keys()
        .filter_map(|name| {
            let joined = joined_header(headers, name.as_str())?;
            Some((name.as_str().to_string(), joined))
        })
        .collect()
}
