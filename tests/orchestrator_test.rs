//! End-to-end tests for the scan pipeline

mod common;

use common::{closed_port_url, ok, refused, respond, test_config, wordlist, ScriptedProbe};
use crmscan::http::HttpClient;
use crmscan::models::{AvailabilityStatus, StageOutcome};
use crmscan::scanner::ScanEngine;
use serde_json::json;
use std::sync::Arc;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_scan_fills_every_slot() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Server", "nginx")
                .insert_header("X-Frame-Options", "SAMEORIGIN")
                .set_body_raw("<div id=\"__next\"><script src=\"/_next/app.js\"></script></div>", "text/html"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri());
    let client = HttpClient::from_config(&config).unwrap();
    let engine = ScanEngine::new(
        Arc::new(client.clone()),
        &config,
        wordlist(&["/admin", "/.env"]),
    )
    .unwrap();

    let result = engine.run().await;

    assert_eq!(result.target(), format!("{}/", mock_server.uri()));
    let availability = result.availability().unwrap();
    assert_eq!(availability.status, AvailabilityStatus::Online);

    let headers = result.security_headers().unwrap().completed().unwrap();
    assert_eq!(headers.get("X-Frame-Options"), Some("SAMEORIGIN"));

    let ssl = result.ssl().unwrap().completed().unwrap();
    assert!(!ssl.https_enabled);

    assert_eq!(result.endpoints().len(), 1);
    assert_eq!(result.endpoints()[0].endpoint, "/admin");
    assert_eq!(result.endpoints()[0].status_code, 403);

    let tech = result.technologies().unwrap().completed().unwrap();
    assert_eq!(tech.server, "nginx");
    assert_eq!(tech.detected, vec!["Next.js".to_string()]);

    let perf = result.performance().unwrap().completed().unwrap();
    assert_eq!(perf.total_requests, config.performance_requests);

    // availability + headers + ssl + 2 paths + technology + performance
    let expected = 1 + 1 + 1 + 2 + 1 + config.performance_requests as u64;
    assert_eq!(client.request_count(), expected);
}

#[tokio::test]
async fn test_unreachable_target_aborts() {
    let config = test_config(&closed_port_url());
    let client = HttpClient::from_config(&config).unwrap();
    let engine = ScanEngine::new(
        Arc::new(client.clone()),
        &config,
        wordlist(&["/admin", "/login"]),
    )
    .unwrap();

    let result = engine.run().await;

    let availability = result.availability().unwrap();
    assert_eq!(availability.status, AvailabilityStatus::Offline);
    assert_eq!(availability.status_code, 0);
    assert!(result.security_headers().is_none());
    assert!(result.ssl().is_none());
    assert!(result.technologies().is_none());
    assert!(result.performance().is_none());
    assert!(result.endpoints().is_empty());
    assert_eq!(client.request_count(), 1);

    let value = result.to_value().unwrap();
    let tests = &value["tests"];
    assert_eq!(tests["availability"]["status"], json!("offline"));
    assert_eq!(tests["endpoints"], json!([]));
    assert_eq!(tests["security_headers"], json!({}));
    assert_eq!(tests["ssl"], json!({}));
    assert_eq!(tests["performance"], json!({}));
    assert_eq!(tests["technologies"], json!({}));
}

#[tokio::test]
async fn test_error_status_still_runs_every_stage() {
    let target = Url::parse("https://crm.example.com/").unwrap();
    let probe = Arc::new(ScriptedProbe::new(|_, url, _| ok(url, 500)));
    let config = test_config(target.as_str());

    let engine = ScanEngine::new(probe.clone(), &config, wordlist(&["/status"])).unwrap();
    let result = engine.run().await;

    assert_eq!(
        result.availability().unwrap().status,
        AvailabilityStatus::Issues
    );
    assert!(result.security_headers().is_some());
    assert!(result.ssl().is_some());
    assert!(result.technologies().is_some());
    assert!(result.performance().is_some());
    assert!(result.endpoints().is_empty());
}

#[tokio::test]
async fn test_stage_failure_does_not_stop_pipeline() {
    let target = Url::parse("https://crm.example.com/").unwrap();
    // Call 2 is the SSL stage's base probe
    let probe = Arc::new(ScriptedProbe::new(|index, url, _| {
        if index == 2 {
            refused(url)
        } else {
            Ok(respond(url, 200).with_header("Strict-Transport-Security", "max-age=60"))
        }
    }));
    let config = test_config(target.as_str());

    let engine = ScanEngine::new(probe.clone(), &config, wordlist(&["/api", "/docs"])).unwrap();
    let result = engine.run().await;

    assert!(matches!(result.ssl(), Some(StageOutcome::Failed { .. })));

    let headers = result.security_headers().unwrap().completed().unwrap();
    assert_eq!(headers.get("Strict-Transport-Security"), Some("max-age=60"));
    assert!(result.technologies().unwrap().completed().is_some());
    assert_eq!(
        result.performance().unwrap().completed().unwrap().total_requests,
        config.performance_requests
    );
    assert_eq!(result.endpoints().len(), 2);

    let value = result.to_value().unwrap();
    assert_eq!(value["tests"]["ssl"], json!({"error": "request failed"}));

    // Each stage runs once: the failed SSL stage issues no redirect check
    let root = target.as_str();
    assert_eq!(probe.count_for(root), 1 + 1 + 1 + 1 + config.performance_requests);
    assert_eq!(probe.count_for("https://crm.example.com/api"), 1);
    assert_eq!(probe.count_for("https://crm.example.com/docs"), 1);
    assert_eq!(probe.count_for("http://crm.example.com/"), 0);
}

#[tokio::test]
async fn test_bare_host_is_normalized() {
    let probe = Arc::new(ScriptedProbe::new(|_, url, _| refused(url)));
    let config = test_config("crm.example.com");

    let engine = ScanEngine::new(probe.clone(), &config, Vec::new()).unwrap();
    assert_eq!(engine.target().as_str(), "https://crm.example.com/");

    let result = engine.run().await;
    assert_eq!(result.target(), "https://crm.example.com/");
    assert_eq!(probe.urls(), vec!["https://crm.example.com/".to_string()]);
}
