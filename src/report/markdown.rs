//! Markdown report generation

use super::{report_target, vulnerabilities, Vulnerability, DISCLAIMER};
use serde_json::Value;

/// Renders the vulnerabilities of `data` as a heading and bullet document
pub fn render(data: &Value, generated_at: &str) -> String {
    let findings = vulnerabilities(data);

    let mut md = format!(
        "# Security Report\n\n\
         **Target:** {}  \n\
         **Date:** {generated_at}  \n\
         **Total Vulnerabilities:** {}\n\n\
         ---\n\n\
         ## Vulnerabilities Found\n\n",
        report_target(data),
        findings.len()
    );

    if findings.is_empty() {
        md.push_str("No vulnerabilities found.\n\n");
    }
    for vuln in &findings {
        md.push_str(&finding_section(vuln));
    }

    md.push_str("## ⚠️ Legal Notice\n\n");
    md.push_str(DISCLAIMER);
    md.push('\n');
    md
}

fn finding_section(vuln: &Vulnerability) -> String {
    format!(
        "### {}\n\n\
         - **Severity:** {}\n\
         - **Type:** {}\n\
         - **Description:** {}\n\
         - **Impact:** {}\n\
         - **Recommendation:** {}\n\n\
         ---\n\n",
        vuln.title,
        vuln.severity,
        vuln.kind,
        vuln.description,
        vuln.impact,
        vuln.recommendation
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_bullets() {
        let data = json!({
            "target": "https://crm.example.com/",
            "vulnerabilities": [{
                "title": "Exposed .git directory",
                "severity": "High",
                "type": "Information Disclosure",
                "description": "The .git directory is readable.",
                "recommendation": "Block access to /.git"
            }]
        });

        let md = render(&data, "01/01/2026 10:00:00");

        assert!(md.starts_with("# Security Report\n"));
        assert!(md.contains("**Target:** https://crm.example.com/"));
        assert!(md.contains("**Total Vulnerabilities:** 1"));
        assert!(md.contains("### Exposed .git directory\n"));
        assert!(md.contains("- **Severity:** High\n"));
        assert!(md.contains("- **Type:** Information Disclosure\n"));
        assert!(md.contains("- **Impact:** N/A\n"));
        assert!(md.trim_end().ends_with(DISCLAIMER));
    }

    #[test]
    fn test_render_without_findings() {
        let md = render(&json!({"target": "https://x/"}), "now");
        assert!(md.contains("**Total Vulnerabilities:** 0"));
        assert!(md.contains("No vulnerabilities found."));
        assert!(md.contains("## ⚠️ Legal Notice"));
    }
}
