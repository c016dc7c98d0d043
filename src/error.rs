//! Error types for crmscan

use thiserror::Error;

/// Main error type for crmscan operations.
///
/// Transport faults during probing are not represented here; they stay inside
/// the probe boundary as [`crate::http::ProbeFailure`] values.
#[derive(Debug, Error)]
pub enum CrmScanError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid target '{0}'")]
    InvalidTarget(String),
}

/// Result type alias for crmscan operations
pub type Result<T> = std::result::Result<T, CrmScanError>;
