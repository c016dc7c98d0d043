//! Technology fingerprinting stage

use crate::http::{Probe, ProbeResponse, RequestOptions};
use crate::models::{StageOutcome, TechnologyInfo, ERROR_REQUEST_FAILED};
use tracing::{debug, info};
use url::Url;

/// Number of body characters inspected
const BODY_PREFIX_CHARS: usize = 5000;

/// Technology label and its lowercase body markers, in report order
pub const TECHNOLOGY_PATTERNS: &[(&str, &[&str])] = &[
    ("Next.js", &["/_next/", "__next_data__"]),
    ("React", &["react", "reactdom"]),
    ("Vercel", &["vercel"]),
    ("WordPress", &["wp-content", "wp-includes"]),
    ("Vue.js", &["vue.js", "vue"]),
    ("Angular", &["ng-", "angular"]),
];

pub async fn fingerprint(probe: &dyn Probe, target: &Url) -> StageOutcome<TechnologyInfo> {
    info!("Detecting technologies...");

    match probe.get(target, RequestOptions::default()).await {
        Ok(response) => StageOutcome::Completed(identify(&response)),
        Err(e) => {
            debug!("Technology stage failed: {e}");
            StageOutcome::failed(ERROR_REQUEST_FAILED)
        }
    }
}

/// Builds the technology record from one response
pub fn identify(response: &ProbeResponse) -> TechnologyInfo {
    let info = TechnologyInfo {
        server: response
            .header("Server")
            .unwrap_or_else(|| "Unknown".to_string()),
        powered_by: response
            .header("X-Powered-By")
            .unwrap_or_else(|| "Unknown".to_string()),
        detected: detect(&response.text()),
    };

    info!("Server: {}", info.server);
    info!("Powered-by: {}", info.powered_by);
    if info.detected.is_empty() {
        info!("Detected technologies: none");
    } else {
        info!("Detected technologies: {}", info.detected.join(", "));
    }

    info
}

/// Labels whose markers occur in the case-folded body prefix
pub fn detect(body: &str) -> Vec<String> {
    let content = body
        .chars()
        .take(BODY_PREFIX_CHARS)
        .collect::<String>()
        .to_lowercase();

    TECHNOLOGY_PATTERNS
        .iter()
        .filter(|(_, markers)| markers.iter().any(|m| content.contains(m)))
        .map(|(label, _)| label.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_detect_wordpress() {
        let body = r#"<link rel="stylesheet" href="/wp-content/themes/x/style.css">"#;
        assert_eq!(detect(body), vec!["WordPress"]);
    }

    #[test]
    fn test_detect_empty_body() {
        assert!(detect("").is_empty());
    }

    #[test]
    fn test_detect_is_case_insensitive_and_ordered() {
        let body = r#"<div id="__next"></div><script id="__NEXT_DATA__">{}</script>
                      <script src="/static/ReactDOM.js"></script>"#;
        assert_eq!(detect(body), vec!["Next.js", "React"]);
    }

    #[test]
    fn test_detect_ignores_markers_past_prefix() {
        let body = format!("{}wp-content", "a".repeat(BODY_PREFIX_CHARS));
        assert!(detect(&body).is_empty());
    }

    #[test]
    fn test_identify_joins_repeated_server_values() {
        let url = Url::parse("https://example.com/").unwrap();
        let response = ProbeResponse::new(StatusCode::OK, url)
            .with_header("Server", "nginx")
            .with_header("Server", "cloudflare");

        let info = identify(&response);
        assert_eq!(info.server, "nginx, cloudflare");
    }

    #[test]
    fn test_identify_defaults_unknown_labels() {
        let url = Url::parse("https://example.com/").unwrap();
        let response = ProbeResponse::new(StatusCode::OK, url)
            .with_header("server", "nginx/1.25")
            .with_body("<html>angular app</html>");

        let info = identify(&response);
        assert_eq!(info.server, "nginx/1.25");
        assert_eq!(info.powered_by, "Unknown");
        assert_eq!(info.detected, vec!["Angular"]);
    }
}
