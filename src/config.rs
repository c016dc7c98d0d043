//! Configuration management for crmscan

use crate::error::{CrmScanError, Result};
use crate::models::ScanConfig;
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// File-based configuration structure matching default.toml
#[derive(Debug, Deserialize)]
struct FileConfig {
    scan: Option<ScanSection>,
    discovery: Option<DiscoverySection>,
}

#[derive(Debug, Deserialize)]
struct ScanSection {
    timeout_secs: Option<u64>,
    performance_requests: Option<usize>,
    threads: Option<usize>,
    user_agent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DiscoverySection {
    wordlist_path: Option<String>,
}

/// Loads configuration from a TOML file and merges with defaults
pub fn load_config(path: &Path) -> Result<ScanConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<ScanConfig> {
    let file_config: FileConfig = toml::from_str(content)?;
    let mut config = ScanConfig::default();

    if let Some(scan) = file_config.scan {
        if let Some(timeout) = scan.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(requests) = scan.performance_requests {
            config.performance_requests = requests;
        }
        if let Some(threads) = scan.threads {
            config.threads = threads;
        }
        if let Some(ua) = scan.user_agent {
            config.user_agent = ua;
        }
    }

    if let Some(discovery) = file_config.discovery {
        config.wordlist_path = discovery.wordlist_path;
    }

    validate(&config)?;
    Ok(config)
}

/// Merges CLI arguments into an existing ScanConfig
pub fn merge_cli_args(
    config: &mut ScanConfig,
    target: String,
    timeout: Option<u64>,
    requests: Option<usize>,
    threads: Option<usize>,
) -> Result<()> {
    config.target = target;

    if let Some(t) = timeout {
        config.timeout_secs = t;
    }
    if let Some(n) = requests {
        config.performance_requests = n;
    }
    if let Some(t) = threads {
        config.threads = t;
    }

    validate(config)
}

fn validate(config: &ScanConfig) -> Result<()> {
    if config.timeout_secs == 0 {
        return Err(CrmScanError::ConfigError(
            "timeout must be at least 1 second".to_string(),
        ));
    }
    if config.threads == 0 {
        return Err(CrmScanError::ConfigError(
            "threads must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Normalizes a target into a base URL ending in `/`.
///
/// Bare hosts get an `https://` scheme.
pub fn normalize_target(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CrmScanError::InvalidTarget(raw.to_string()));
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let base = format!("{}/", with_scheme.trim_end_matches('/'));

    let url = Url::parse(&base).map_err(|_| CrmScanError::InvalidTarget(raw.to_string()))?;
    if url.host_str().is_none() {
        return Err(CrmScanError::InvalidTarget(raw.to_string()));
    }
    Ok(url)
}
