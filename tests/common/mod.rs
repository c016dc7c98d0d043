//! Common test utilities
#![allow(dead_code)]

use async_trait::async_trait;
use crmscan::http::{Probe, ProbeFailure, ProbeOutcome, ProbeResponse, RequestOptions};
use crmscan::models::ScanConfig;
use reqwest::StatusCode;
use std::sync::Mutex;
use url::Url;

/// Creates a test ScanConfig pointing at `target`
pub fn test_config(target: &str) -> ScanConfig {
    ScanConfig {
        target: target.to_string(),
        timeout_secs: 2,
        performance_requests: 3,
        threads: 2,
        user_agent: "crmscan-test/0.1.0".to_string(),
        wordlist_path: None,
    }
}

/// URL of a local port with nothing listening on it
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}

pub fn wordlist(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

type Handler = dyn Fn(usize, &Url, RequestOptions) -> ProbeOutcome + Send + Sync;

/// Probe answering from a closure, called with the zero-based call index.
/// Every call is recorded.
pub struct ScriptedProbe {
    handler: Box<Handler>,
    calls: Mutex<Vec<(Url, RequestOptions)>>,
}

impl ScriptedProbe {
    pub fn new(
        handler: impl Fn(usize, &Url, RequestOptions) -> ProbeOutcome + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Url, RequestOptions)> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|(u, _)| u.to_string()).collect()
    }

    pub fn count_for(&self, url: &str) -> usize {
        self.urls().iter().filter(|u| u.as_str() == url).count()
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    async fn get(&self, url: &Url, options: RequestOptions) -> ProbeOutcome {
        let index = {
            let mut calls = self.calls.lock().expect("calls lock");
            calls.push((url.clone(), options));
            calls.len() - 1
        };
        (self.handler)(index, url, options)
    }
}

pub fn respond(url: &Url, status: u16) -> ProbeResponse {
    ProbeResponse::new(StatusCode::from_u16(status).expect("status"), url.clone())
}

pub fn ok(url: &Url, status: u16) -> ProbeOutcome {
    Ok(respond(url, status))
}

pub fn refused(url: &Url) -> ProbeOutcome {
    Err(ProbeFailure::Connect {
        url: url.to_string(),
        reason: "connection refused".to_string(),
    })
}
