//! Probe client: single-attempt GET requests that never raise transport faults

use crate::error::Result;
use crate::models::ScanConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

const MAX_REDIRECTS: usize = 10;

/// Per-call overrides for a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    /// Replaces the client's default timeout when set
    pub timeout: Option<Duration>,
    pub follow_redirects: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            follow_redirects: true,
        }
    }
}

impl RequestOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }
}

/// A completed HTTP exchange
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    /// Wall-clock time from request start to body completion
    pub elapsed: Duration,
    /// Final URL after any followed redirects
    pub url: Url,
}

impl ProbeResponse {
    /// Creates an empty response, mainly for scripted probes
    pub fn new(status: StatusCode, url: Url) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
            elapsed: Duration::ZERO,
            url,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Case-insensitive header lookup; see [`joined_header`]
    pub fn header(&self, name: &str) -> Option<String> {
        joined_header(&self.headers, name)
    }

    pub fn content_type(&self) -> Option<String> {
        self.header(CONTENT_TYPE.as_str())
    }

    /// Body decoded as UTF-8, lossily
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// True for any status below 400
    pub fn is_ok(&self) -> bool {
        self.status.as_u16() < 400
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// All values of header `name` joined with `", "`, in received order.
///
/// Non-UTF-8 bytes are replaced. `None` when the header is absent.
pub fn joined_header(headers: &HeaderMap, name: &str) -> Option<String> {
    let values: Vec<String> = headers
        .get_all(name)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect();

    (!values.is_empty()).then(|| values.join(", "))
}

/// Transport-level fault of a single probe
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeFailure {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
}

impl ProbeFailure {
    fn from_reqwest(url: &Url, err: &reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            ProbeFailure::Timeout { url }
        } else if err.is_connect() {
            ProbeFailure::Connect {
                url,
                reason: err.to_string(),
            }
        } else {
            ProbeFailure::Transport {
                url,
                reason: err.to_string(),
            }
        }
    }

    pub fn url(&self) -> &str {
        match self {
            ProbeFailure::Timeout { url }
            | ProbeFailure::Connect { url, .. }
            | ProbeFailure::Transport { url, .. } => url,
        }
    }
}

/// Either a response or the failure marker for a transport fault
pub type ProbeOutcome = std::result::Result<ProbeResponse, ProbeFailure>;

/// Issues GET probes against the target.
///
/// Implementations make exactly one attempt per call and report transport
/// faults as [`ProbeFailure`] instead of erroring past this boundary.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn get(&self, url: &Url, options: RequestOptions) -> ProbeOutcome;
}

/// reqwest-backed probe client with a fixed identity and default timeout
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    no_redirect_client: Client,
    timeout: Duration,
    request_count: Arc<AtomicU64>,
}

impl HttpClient {
    /// Creates a new HttpClient from scan configuration
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let build = |policy: reqwest::redirect::Policy| {
            Client::builder()
                .user_agent(&config.user_agent)
                .redirect(policy)
                .danger_accept_invalid_certs(false)
                .build()
        };

        Ok(Self {
            client: build(reqwest::redirect::Policy::limited(MAX_REDIRECTS))?,
            no_redirect_client: build(reqwest::redirect::Policy::none())?,
            timeout: Duration::from_secs(config.timeout_secs),
            request_count: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Default timeout applied when a call does not override it
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the total number of probes issued
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    async fn send(
        &self,
        url: &Url,
        options: RequestOptions,
    ) -> std::result::Result<ProbeResponse, reqwest::Error> {
        let client = if options.follow_redirects {
            &self.client
        } else {
            &self.no_redirect_client
        };
        let timeout = options.timeout.unwrap_or(self.timeout);

        let start = Instant::now();
        let response = client.get(url.clone()).timeout(timeout).send().await?;
        let status = response.status();
        let final_url = response.url().clone();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(ProbeResponse {
            status,
            headers,
            body,
            elapsed: start.elapsed(),
            url: final_url,
        })
    }
}

#[async_trait]
impl Probe for HttpClient {
    async fn get(&self, url: &Url, options: RequestOptions) -> ProbeOutcome {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        debug!("GET {url}");

        match self.send(url, options).await {
            Ok(response) => {
                debug!("Response: {} for {}", response.status, response.url);
                Ok(response)
            }
            Err(e) => {
                let failure = ProbeFailure::from_reqwest(url, &e);
                warn!("{failure}");
                Err(failure)
            }
        }
    }
}
