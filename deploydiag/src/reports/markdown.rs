//! Markdown rendering of a deployment report

use crate::models::deployment::{DeploymentReport, StageStatus};
use crate::models::snapshot::Recommendation;

fn seconds(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |s| format!("{s:.0}s"))
}

fn status_label(status: StageStatus) -> &'static str {
    match status {
        StageStatus::Success => "Success",
        StageStatus::Failure => "Failure",
        StageStatus::Unknown => "Unknown",
    }
}

/// Render the deployment analysis as a markdown document
pub fn render_deployment(report: &DeploymentReport, recommendations: &[Recommendation]) -> String {
    let mut out = String::from("# Deployment Analysis Report\n\n");
    out.push_str(&format!("## Deployment Status: {}\n\n", report.status));
    out.push_str(&format!(
        "Total duration: {}\n\n",
        seconds(report.total_duration_seconds)
    ));

    out.push_str("### Deployment Stages\n\n");
    if report.stages.is_empty() {
        out.push_str("No stages recorded\n\n");
    } else {
        out.push_str("| Stage | Start | End | Duration | Status |\n");
        out.push_str("|---|---|---|---|---|\n");
        for stage in &report.stages {
            let start = stage.start.map_or_else(|| "n/a".to_string(), |t| t.to_string());
            let end = stage.end.map_or_else(|| "n/a".to_string(), |t| t.to_string());
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                stage.name,
                start,
                end,
                seconds(stage.duration_seconds),
                status_label(stage.status)
            ));
        }
        out.push('\n');
    }

    out.push_str("### Errors Detected\n\n");
    if report.errors.is_empty() {
        out.push_str("No errors\n\n");
    } else {
        for error in &report.errors {
            out.push_str(&format!("- {}\n", error.message));
        }
        out.push('\n');
    }

    out.push_str("### Recommendations\n\n");
    if recommendations.is_empty() {
        out.push_str("No action needed\n");
    } else {
        for (i, recommendation) in recommendations.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, recommendation));
        }
    }

    out
}
