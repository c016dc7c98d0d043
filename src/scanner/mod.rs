//! Scan orchestration: a fixed-order stage pipeline gated on availability

pub mod availability;
pub mod discovery;
pub mod headers;
pub mod performance;
pub mod ssl;
pub mod technology;

use crate::config::normalize_target;
use crate::error::Result;
use crate::http::Probe;
use crate::models::{ScanConfig, ScanResult};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};
use url::Url;

/// Pipeline state.
///
/// `Init -> Availability -> (Aborted | SecurityHeaders -> Tls ->
/// EndpointDiscovery -> Technology -> Performance -> Done)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Availability,
    SecurityHeaders,
    Tls,
    EndpointDiscovery,
    Technology,
    Performance,
    Done,
    Aborted,
}

impl Phase {
    /// Stages in execution order
    pub const STAGES: [Phase; 6] = [
        Phase::Availability,
        Phase::SecurityHeaders,
        Phase::Tls,
        Phase::EndpointDiscovery,
        Phase::Technology,
        Phase::Performance,
    ];

    /// Returns the following phase. `target_reachable` is only consulted
    /// when leaving `Availability`; terminal phases stay put.
    pub fn next(self, target_reachable: bool) -> Phase {
        match self {
            Phase::Init => Phase::Availability,
            Phase::Availability if target_reachable => Phase::SecurityHeaders,
            Phase::Availability => Phase::Aborted,
            Phase::SecurityHeaders => Phase::Tls,
            Phase::Tls => Phase::EndpointDiscovery,
            Phase::EndpointDiscovery => Phase::Technology,
            Phase::Technology => Phase::Performance,
            Phase::Performance => Phase::Done,
            Phase::Done => Phase::Done,
            Phase::Aborted => Phase::Aborted,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Aborted)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::Availability => "availability",
            Phase::SecurityHeaders => "security headers",
            Phase::Tls => "ssl",
            Phase::EndpointDiscovery => "endpoints",
            Phase::Technology => "technologies",
            Phase::Performance => "performance",
            Phase::Done => "done",
            Phase::Aborted => "aborted",
        };
        write!(f, "{name}")
    }
}

/// Drives one scan of one target through every stage
pub struct ScanEngine {
    probe: Arc<dyn Probe>,
    target: Url,
    wordlist: Vec<String>,
    performance_requests: usize,
    concurrency: usize,
    show_progress: bool,
}

impl ScanEngine {
    /// Creates an engine for `config.target`, normalizing it first
    pub fn new(probe: Arc<dyn Probe>, config: &ScanConfig, wordlist: Vec<String>) -> Result<Self> {
        Ok(Self {
            probe,
            target: normalize_target(&config.target)?,
            wordlist,
            performance_requests: config.performance_requests,
            concurrency: config.threads.max(1),
            show_progress: false,
        })
    }

    /// Shows a terminal progress bar while running
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    /// Runs the pipeline to a terminal phase and returns the result record
    pub async fn run(&self) -> ScanResult {
        let mut result = ScanResult::new(&self.target);
        let probe = self.probe.as_ref();
        let target = &self.target;

        let pb = self.progress_bar();
        info!("{}", "=".repeat(60));
        info!("Starting scan of {target}");
        info!("{}", "=".repeat(60));

        let mut phase = Phase::Init;
        let mut reachable = false;

        while !phase.is_terminal() {
            phase = phase.next(reachable);
            pb.set_message(format!("Running {phase}..."));

            match phase {
                Phase::Availability => {
                    let availability = availability::check(probe, target).await;
                    reachable = availability.is_reachable();
                    result.record_availability(availability);
                }
                Phase::SecurityHeaders => {
                    result.record_security_headers(headers::inspect(probe, target).await);
                }
                Phase::Tls => {
                    result.record_ssl(ssl::inspect(probe, target).await);
                }
                Phase::EndpointDiscovery => {
                    result.record_endpoints(
                        discovery::discover(probe, target, &self.wordlist, self.concurrency).await,
                    );
                }
                Phase::Technology => {
                    result.record_technologies(technology::fingerprint(probe, target).await);
                }
                Phase::Performance => {
                    result.record_performance(
                        performance::sample(probe, target, self.performance_requests).await,
                    );
                }
                Phase::Aborted => {
                    error!("Target is not reachable, skipping remaining stages");
                }
                Phase::Done => {
                    info!("Scan complete");
                }
                Phase::Init => {}
            }

            if !phase.is_terminal() {
                pb.inc(1);
            }
        }

        pb.finish_and_clear();
        result
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(Phase::STAGES.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb
    }
}
