//! Security headers stage

use crate::http::{Probe, ProbeResponse, RequestOptions};
use crate::models::{SecurityHeaders, StageOutcome, ERROR_REQUEST_FAILED};
use crate::wordlist::SECURITY_HEADERS;
use tracing::{debug, info};
use url::Url;

/// Probes the target once and records each tracked security header
pub async fn inspect(probe: &dyn Probe, target: &Url) -> StageOutcome<SecurityHeaders> {
    info!("Analyzing security headers...");

    match probe.get(target, RequestOptions::default()).await {
        Ok(response) => StageOutcome::Completed(extract(&response)),
        Err(e) => {
            debug!("Headers stage failed: {e}");
            StageOutcome::failed(ERROR_REQUEST_FAILED)
        }
    }
}

/// Looks up every tracked header, recording absence explicitly
pub fn extract(response: &ProbeResponse) -> SecurityHeaders {
    let mut headers = SecurityHeaders::new();

    for name in SECURITY_HEADERS {
        let value = response.header(name);
        match value.as_deref() {
            Some(v) => info!("[✓] {:<26} -> {v}", format!("{name}:")),
            None => info!("[✗] {:<26} -> not present", format!("{name}:")),
        }
        headers.insert(name, value);
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_extract_records_all_tracked_headers() {
        let url = Url::parse("https://example.com/").unwrap();
        let response = ProbeResponse::new(StatusCode::OK, url)
            .with_header("strict-transport-security", "max-age=31536000")
            .with_header("X-Powered-By", "PHP/8.1");

        let headers = extract(&response);

        assert_eq!(headers.len(), SECURITY_HEADERS.len());
        assert_eq!(
            headers.get("Strict-Transport-Security"),
            Some("max-age=31536000")
        );
        assert_eq!(headers.get("X-Frame-Options"), None);
        assert_eq!(headers.present_count(), 1);
        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, SECURITY_HEADERS.to_vec());
    }

    #[test]
    fn test_extract_keeps_every_policy_value() {
        let url = Url::parse("https://example.com/").unwrap();
        let response = ProbeResponse::new(StatusCode::OK, url)
            .with_header("Content-Security-Policy", "default-src 'self'")
            .with_header("Content-Security-Policy", "frame-ancestors 'none'");

        let headers = extract(&response);

        assert_eq!(
            headers.get("Content-Security-Policy"),
            Some("default-src 'self', frame-ancestors 'none'")
        );
    }
}
