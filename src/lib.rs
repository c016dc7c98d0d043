//! crmscan - Web Exposure Scanner
//!
//! Probes a single web target over HTTP(S) and records service availability,
//! security response headers, HTTPS posture, endpoints discovered from a
//! wordlist, coarse technology fingerprints and latency statistics. Results
//! are serialized as JSON, and finding lists can be rendered as HTML and
//! Markdown reports.

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod report;
pub mod scanner;
pub mod wordlist;
