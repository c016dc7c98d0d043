//! HTML report generation using Tera templates

use super::{report_target, vulnerabilities, Vulnerability, DISCLAIMER};
use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use tera::{Context, Tera};

#[derive(Serialize)]
struct FindingView<'a> {
    #[serde(flatten)]
    vulnerability: &'a Vulnerability,
    color: &'static str,
}

/// Renders the vulnerabilities of `data` as a styled HTML document
pub fn render(data: &Value, generated_at: &str) -> Result<String> {
    let findings = vulnerabilities(data);
    let views: Vec<FindingView<'_>> = findings
        .iter()
        .map(|v| FindingView {
            vulnerability: v,
            color: v.color(),
        })
        .collect();

    let mut tera = Tera::default();
    tera.add_raw_template("report.html", template())?;

    let mut context = Context::new();
    context.insert("target", &report_target(data));
    context.insert("generated_at", generated_at);
    context.insert("total_findings", &views.len());
    context.insert("findings", &views);
    context.insert("disclaimer", DISCLAIMER);

    Ok(tera.render("report.html", &context)?)
}

fn template() -> &'static str {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Security Report</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; background: #f5f5f5; padding: 20px; }
        .container { max-width: 1200px; margin: 0 auto; background: white; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); padding: 30px; }
        h1 { color: #333; border-bottom: 3px solid #007bff; padding-bottom: 15px; margin-bottom: 30px; }
        h2 { margin-bottom: 20px; }
        .info { background: #e7f3ff; padding: 15px; border-radius: 5px; margin-bottom: 30px; }
        .vulnerability { background: #fff; border: 1px solid #ddd; border-radius: 5px; padding: 20px; margin-bottom: 20px; }
        .vulnerability h3 { color: #333; margin-bottom: 15px; display: flex; justify-content: space-between; align-items: center; }
        .severity { color: white; padding: 5px 15px; border-radius: 20px; font-size: 12px; font-weight: bold; }
        .vulnerability p { margin: 10px 0; line-height: 1.6; }
        .vulnerability strong { color: #555; }
        .disclaimer { margin-top: 40px; padding: 20px; background: #f8f9fa; border-radius: 5px; }
    </style>
</head>
<body>
    <div class="container">
        <h1>Security Analysis Report</h1>
        <div class="info">
            <p><strong>Target:</strong> {{ target }}</p>
            <p><strong>Date:</strong> {{ generated_at }}</p>
            <p><strong>Total Findings:</strong> {{ total_findings }}</p>
        </div>
        <h2>Vulnerabilities Found</h2>
        {% for finding in findings %}
        <div class="vulnerability" style="border-left: 4px solid {{ finding.color }};">
            <h3>{{ finding.title }}
                <span class="severity" style="background: {{ finding.color }};">{{ finding.severity }}</span>
            </h3>
            <p><strong>Type:</strong> {{ finding.kind }}</p>
            <p><strong>Description:</strong> {{ finding.description }}</p>
            <p><strong>Impact:</strong> {{ finding.impact }}</p>
            <p><strong>Recommendation:</strong> {{ finding.recommendation }}</p>
        </div>
        {% endfor %}
        {% if total_findings == 0 %}
        <p>No vulnerabilities found.</p>
        {% endif %}
        <div class="disclaimer">
            <h3>&#9888;&#65039; Legal Notice</h3>
            <p>{{ disclaimer }}</p>
        </div>
    </div>
</body>
</html>"#
}
