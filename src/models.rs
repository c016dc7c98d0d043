//! Core data models for crmscan

use chrono::Local;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;
use url::Url;

/// Error marker reason used when a stage's single probe failed
pub const ERROR_REQUEST_FAILED: &str = "request failed";

/// Error marker reason used when every performance sample failed
pub const ERROR_ALL_REQUESTS_FAILED: &str = "all requests failed";

/// Browser-like identity sent with every probe
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0 Safari/537.36";

/// Rounds a duration in seconds to millisecond precision
pub fn round_secs(secs: f64) -> f64 {
    (secs * 1000.0).round() / 1000.0
}

/// Reachability classification of the target
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    /// Target answered with a success or redirect status
    Online,
    /// Target answered, but with a client or server error status
    Issues,
    /// The availability probe failed at the transport level
    Offline,
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityStatus::Online => write!(f, "online"),
            AvailabilityStatus::Issues => write!(f, "issues"),
            AvailabilityStatus::Offline => write!(f, "offline"),
        }
    }
}

/// Result of the availability stage
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Availability {
    pub status: AvailabilityStatus,
    /// HTTP status code, 0 when unreachable
    pub status_code: u16,
    /// Seconds, rounded to 3 decimals
    pub response_time: f64,
    pub headers: BTreeMap<String, String>,
}

impl Availability {
    pub fn is_reachable(&self) -> bool {
        self.status != AvailabilityStatus::Offline
    }
}

/// A wordlist path that passed the acceptance rule
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EndpointResult {
    /// The wordlist entry as written, not the resolved URL
    pub endpoint: String,
    pub status_code: u16,
    pub content_type: String,
    /// Body size in bytes
    pub size: u64,
}

/// Outcome of a stage that either produced data or recorded an error marker.
///
/// `Failed` serializes as the single-key mapping `{"error": <reason>}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum StageOutcome<T> {
    Completed(T),
    Failed { error: String },
}

impl<T> StageOutcome<T> {
    pub fn failed(reason: impl Into<String>) -> Self {
        StageOutcome::Failed {
            error: reason.into(),
        }
    }

    pub fn completed(&self) -> Option<&T> {
        match self {
            StageOutcome::Completed(value) => Some(value),
            StageOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            StageOutcome::Completed(_) => None,
            StageOutcome::Failed { error } => Some(error),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StageOutcome::Failed { .. })
    }
}

/// Values of the fixed security header set, in lookup order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityHeaders {
    entries: Vec<(String, Option<String>)>,
}

impl SecurityHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        self.entries.push((name.into(), value));
    }

    /// Returns the recorded value for `name`; `None` if absent or not tracked
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn present_count(&self) -> usize {
        self.entries.iter().filter(|(_, v)| v.is_some()).count()
    }
}

impl Serialize for SecurityHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(n, v)| (n, v)))
    }
}

/// HTTPS posture of the target
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SslInfo {
    pub https_enabled: bool,
    pub redirects_to_https: bool,
}

/// Latency statistics over successful samples, in seconds
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PerformanceStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    /// Number of successful samples
    pub total_requests: usize,
}

/// Server labels and detected technologies
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TechnologyInfo {
    pub server: String,
    pub powered_by: String,
    pub detected: Vec<String>,
}

/// Full state of one scan run.
///
/// `timestamp` and `target` are fixed at construction. Each remaining slot is
/// written at most once, by the stage that owns it; an unwritten slot means
/// the stage never ran.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    timestamp: String,
    target: String,
    availability: Option<Availability>,
    endpoints: Option<Vec<EndpointResult>>,
    security_headers: Option<StageOutcome<SecurityHeaders>>,
    ssl: Option<StageOutcome<SslInfo>>,
    performance: Option<StageOutcome<PerformanceStats>>,
    technologies: Option<StageOutcome<TechnologyInfo>>,
}

impl ScanResult {
    /// Creates an empty result stamped with the current local time
    pub fn new(target: &Url) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            target: target.to_string(),
            availability: None,
            endpoints: None,
            security_headers: None,
            ssl: None,
            performance: None,
            technologies: None,
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Normalized base URL, always ending in `/`
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn availability(&self) -> Option<&Availability> {
        self.availability.as_ref()
    }

    /// Accepted endpoints in wordlist order; empty when discovery never ran
    pub fn endpoints(&self) -> &[EndpointResult] {
        self.endpoints.as_deref().unwrap_or(&[])
    }

    pub fn security_headers(&self) -> Option<&StageOutcome<SecurityHeaders>> {
        self.security_headers.as_ref()
    }

    pub fn ssl(&self) -> Option<&StageOutcome<SslInfo>> {
        self.ssl.as_ref()
    }

    pub fn performance(&self) -> Option<&StageOutcome<PerformanceStats>> {
        self.performance.as_ref()
    }

    pub fn technologies(&self) -> Option<&StageOutcome<TechnologyInfo>> {
        self.technologies.as_ref()
    }

    pub(crate) fn record_availability(&mut self, value: Availability) {
        write_once(&mut self.availability, value, "availability");
    }

    pub(crate) fn record_endpoints(&mut self, value: Vec<EndpointResult>) {
        write_once(&mut self.endpoints, value, "endpoints");
    }

    pub(crate) fn record_security_headers(&mut self, value: StageOutcome<SecurityHeaders>) {
        write_once(&mut self.security_headers, value, "security_headers");
    }

    pub(crate) fn record_ssl(&mut self, value: StageOutcome<SslInfo>) {
        write_once(&mut self.ssl, value, "ssl");
    }

    pub(crate) fn record_performance(&mut self, value: StageOutcome<PerformanceStats>) {
        write_once(&mut self.performance, value, "performance");
    }

    pub(crate) fn record_technologies(&mut self, value: StageOutcome<TechnologyInfo>) {
        write_once(&mut self.technologies, value, "technologies");
    }

    /// Converts the result into its nested JSON mapping
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// Stores `value` unless the slot already holds one; the first write wins
fn write_once<T>(slot: &mut Option<T>, value: T, name: &str) {
    if slot.is_some() {
        warn!("Slot '{name}' already recorded, keeping the first result");
        return;
    }
    *slot = Some(value);
}

#[derive(Serialize)]
struct SerializedResult<'a> {
    timestamp: &'a str,
    target: &'a str,
    tests: SerializedStages<'a>,
}

#[derive(Serialize)]
struct SerializedStages<'a> {
    availability: &'a Option<Availability>,
    endpoints: &'a [EndpointResult],
    #[serde(serialize_with = "slot_or_empty")]
    security_headers: &'a Option<StageOutcome<SecurityHeaders>>,
    #[serde(serialize_with = "slot_or_empty")]
    ssl: &'a Option<StageOutcome<SslInfo>>,
    #[serde(serialize_with = "slot_or_empty")]
    performance: &'a Option<StageOutcome<PerformanceStats>>,
    #[serde(serialize_with = "slot_or_empty")]
    technologies: &'a Option<StageOutcome<TechnologyInfo>>,
}

/// Unset mapping slots serialize as `{}`
fn slot_or_empty<T, S>(slot: &&Option<StageOutcome<T>>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match slot {
        Some(outcome) => outcome.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

impl Serialize for ScanResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SerializedResult {
            timestamp: &self.timestamp,
            target: &self.target,
            tests: SerializedStages {
                availability: &self.availability,
                endpoints: self.endpoints(),
                security_headers: &self.security_headers,
                ssl: &self.ssl,
                performance: &self.performance,
                technologies: &self.technologies,
            },
        }
        .serialize(serializer)
    }
}

/// Configuration for a scan session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Target URL or bare host
    pub target: String,
    /// Default per-request timeout in seconds
    pub timeout_secs: u64,
    /// Number of performance samples
    pub performance_requests: usize,
    /// Maximum in-flight endpoint discovery probes
    pub threads: usize,
    /// User-Agent header value
    pub user_agent: String,
    /// Optional wordlist file replacing the compiled wordlist
    pub wordlist_path: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            timeout_secs: 10,
            performance_requests: 10,
            threads: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            wordlist_path: None,
        }
    }
}
