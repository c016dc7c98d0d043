//! Report generation
//!
//! Every renderer consumes the same JSON mapping. The structured renderer
//! writes it verbatim; the HTML and Markdown renderers project its
//! `vulnerabilities` list. Renderers are pure `render` functions, and
//! [`ReportGenerator`] performs the single file write for each format.

pub mod html;
pub mod json;
pub mod markdown;

use crate::error::Result;
use crate::models::ScanResult;
use chrono::Local;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Footer appended to HTML and Markdown reports
pub const DISCLAIMER: &str = "This report was generated for educational purposes and authorized \
security testing only. Do not use this information for malicious activity.";

const NOT_AVAILABLE: &str = "N/A";

/// One finding projected out of the report mapping
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Vulnerability {
    pub title: String,
    pub severity: String,
    pub kind: String,
    pub description: String,
    pub impact: String,
    pub recommendation: String,
}

impl Vulnerability {
    /// Reads a finding; missing or null fields become `N/A`
    pub fn from_value(value: &Value) -> Self {
        Self {
            title: field(value, "title"),
            severity: field(value, "severity"),
            kind: field(value, "type"),
            description: field(value, "description"),
            impact: field(value, "impact"),
            recommendation: field(value, "recommendation"),
        }
    }

    pub fn color(&self) -> &'static str {
        severity_color(&self.severity)
    }
}

/// Display color for a severity label; unknown labels are gray
pub fn severity_color(severity: &str) -> &'static str {
    match severity {
        "High" => "#dc3545",
        "Medium" => "#fd7e14",
        "Low" => "#ffc107",
        "Informational" => "#17a2b8",
        _ => "#6c757d",
    }
}

/// Projects the `vulnerabilities` list; anything but an array yields none
pub fn vulnerabilities(data: &Value) -> Vec<Vulnerability> {
    data.get("vulnerabilities")
        .and_then(Value::as_array)
        .map(|list| list.iter().map(Vulnerability::from_value).collect())
        .unwrap_or_default()
}

/// The `target` field of the mapping, or `N/A`
pub fn report_target(data: &Value) -> String {
    field(data, "target")
}

fn field(value: &Value, key: &str) -> String {
    match value.get(key) {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Report generation time shown in document headers
fn generated_at() -> String {
    Local::now().format("%d/%m/%Y %H:%M:%S").to_string()
}

/// Writes rendered content, creating missing parent directories
fn write_report(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Renders one report mapping into JSON, HTML and Markdown files
pub struct ReportGenerator {
    data: Value,
}

impl ReportGenerator {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// Uses a scan result's nested mapping as report data
    pub fn from_scan(result: &ScanResult) -> Result<Self> {
        Ok(Self::new(result.to_value()?))
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn generate_json(&self, output_path: &Path) -> Result<PathBuf> {
        write_report(output_path, &json::render(&self.data)?)?;
        info!("JSON report saved to {}", output_path.display());
        Ok(output_path.to_path_buf())
    }

    pub fn generate_html(&self, output_path: &Path) -> Result<PathBuf> {
        write_report(output_path, &html::render(&self.data, &generated_at())?)?;
        info!("HTML report saved to {}", output_path.display());
        Ok(output_path.to_path_buf())
    }

    pub fn generate_markdown(&self, output_path: &Path) -> Result<PathBuf> {
        write_report(output_path, &markdown::render(&self.data, &generated_at()))?;
        info!("Markdown report saved to {}", output_path.display());
        Ok(output_path.to_path_buf())
    }

    /// Writes `{prefix}.json`, `{prefix}.html` and `{prefix}.md`.
    ///
    /// Every format is attempted; a failed write is logged and left out.
    /// Returns format name and produced file for each written report, in
    /// json, html, markdown order.
    pub fn generate_all(&self, prefix: &str) -> Vec<(&'static str, PathBuf)> {
        let outputs = [
            ("json", self.generate_json(Path::new(&format!("{prefix}.json")))),
            ("html", self.generate_html(Path::new(&format!("{prefix}.html")))),
            ("markdown", self.generate_markdown(Path::new(&format!("{prefix}.md")))),
        ];

        outputs
            .into_iter()
            .filter_map(|(format, written)| match written {
                Ok(path) => Some((format, path)),
                Err(e) => {
                    error!("Could not write {format} report for {prefix}: {e}");
                    None
                }
            })
            .collect()
    }
}
