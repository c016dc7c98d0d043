//! Integration tests for the availability, technology and performance stages

mod common;

use common::{closed_port_url, refused, respond, test_config, ScriptedProbe};
use crmscan::http::HttpClient;
use crmscan::models::{AvailabilityStatus, StageOutcome};
use crmscan::scanner::{availability, performance, technology};
use serde_json::json;
use std::time::Duration;
use url::Url;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn server_with(response: ResponseTemplate) -> (MockServer, Url, HttpClient) {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(response)
        .mount(&mock_server)
        .await;

    let target = Url::parse(&format!("{}/", mock_server.uri())).unwrap();
    let client = HttpClient::from_config(&test_config(target.as_str())).unwrap();
    (mock_server, target, client)
}

#[tokio::test]
async fn test_availability_online() {
    let (_server, target, client) =
        server_with(ResponseTemplate::new(200).insert_header("Server", "nginx")).await;

    let result = availability::check(&client, &target).await;

    assert_eq!(result.status, AvailabilityStatus::Online);
    assert_eq!(result.status_code, 200);
    assert!(result.response_time >= 0.0);
    assert_eq!(result.headers.get("server").map(String::as_str), Some("nginx"));
    assert!(result.is_reachable());
}

#[tokio::test]
async fn test_availability_issues_on_error_status() {
    let (_server, target, client) = server_with(ResponseTemplate::new(503)).await;

    let result = availability::check(&client, &target).await;

    assert_eq!(result.status, AvailabilityStatus::Issues);
    assert_eq!(result.status_code, 503);
    assert!(result.is_reachable());
}

#[tokio::test]
async fn test_availability_offline() {
    let target = Url::parse(&closed_port_url()).unwrap();
    let client = HttpClient::from_config(&test_config(target.as_str())).unwrap();

    let result = availability::check(&client, &target).await;

    assert_eq!(result.status, AvailabilityStatus::Offline);
    assert_eq!(result.status_code, 0);
    assert!(result.headers.is_empty());
    assert!(!result.is_reachable());

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["status"], json!("offline"));
    assert_eq!(value["headers"], json!({}));
}

#[tokio::test]
async fn test_technology_fingerprint() {
    let (_server, target, client) = server_with(
        ResponseTemplate::new(200)
            .insert_header("Server", "Apache")
            .insert_header("X-Powered-By", "PHP/8.2")
            .set_body_raw("<link href='/wp-content/themes/x.css'>", "text/html"),
    )
    .await;

    let outcome = technology::fingerprint(&client, &target).await;
    let info = outcome.completed().expect("stage should complete");

    assert_eq!(info.server, "Apache");
    assert_eq!(info.powered_by, "PHP/8.2");
    assert_eq!(info.detected, vec!["WordPress".to_string()]);
}

#[tokio::test]
async fn test_technology_defaults_to_unknown() {
    let (_server, target, client) = server_with(ResponseTemplate::new(200)).await;

    let outcome = technology::fingerprint(&client, &target).await;
    let info = outcome.completed().unwrap();

    assert_eq!(info.server, "Unknown");
    assert_eq!(info.powered_by, "Unknown");
    assert!(info.detected.is_empty());
}

#[tokio::test]
async fn test_technology_failure_marker() {
    let target = Url::parse("https://crm.example.com/").unwrap();
    let probe = ScriptedProbe::new(|_, url, _| refused(url));

    let outcome = technology::fingerprint(&probe, &target).await;

    assert_eq!(outcome.error(), Some("request failed"));
}

#[tokio::test]
async fn test_performance_sampling() {
    let (server, target, client) = server_with(ResponseTemplate::new(200)).await;

    let outcome = performance::sample(&client, &target, 4).await;
    let stats = outcome.completed().expect("stage should complete");

    assert_eq!(stats.total_requests, 4);
    assert!(stats.min <= stats.avg && stats.avg <= stats.max);
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_performance_counts_only_successes() {
    let target = Url::parse("https://crm.example.com/").unwrap();
    let probe = ScriptedProbe::new(|index, url, _| match index {
        0 => Ok(respond(url, 200).with_elapsed(Duration::from_millis(100))),
        2 => Ok(respond(url, 500).with_elapsed(Duration::from_millis(300))),
        _ => refused(url),
    });

    let outcome = performance::sample(&probe, &target, 4).await;
    let stats = outcome.completed().unwrap();

    assert_eq!(probe.calls().len(), 4);
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.min, 0.1);
    assert_eq!(stats.max, 0.3);
    assert_eq!(stats.avg, 0.2);
}

#[tokio::test]
async fn test_performance_all_failed() {
    let target = Url::parse("https://crm.example.com/").unwrap();
    let probe = ScriptedProbe::new(|_, url, _| refused(url));

    let outcome = performance::sample(&probe, &target, 3).await;

    assert!(matches!(outcome, StageOutcome::Failed { .. }));
    assert_eq!(probe.calls().len(), 3);

    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value, json!({"error": "all requests failed"}));
    assert!(value.get("total_requests").is_none());
}
