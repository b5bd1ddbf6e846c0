//! Deployment report assembly

use tracing::info;

use crate::models::deployment::{DeploymentReport, DeploymentStatus};
use crate::parse::{parse_log, ParsedLog};
use crate::timespan::total_span;

/// Errors at or above this count make a deployment a critical failure
pub const CRITICAL_ERROR_COUNT: usize = 3;

/// Classify a deployment by how many errors its log contains
pub fn classify_deployment(error_count: usize) -> DeploymentStatus {
    match error_count {
        0 => DeploymentStatus::Success,
        n if n < CRITICAL_ERROR_COUNT => DeploymentStatus::PartialFailure,
        _ => DeploymentStatus::CriticalFailure,
    }
}

/// Parse a deployment log and build its report
pub fn analyze_log(text: &str) -> DeploymentReport {
    build_report(parse_log(text))
}

/// Build a report from already-parsed stages and errors
pub fn build_report(parsed: ParsedLog) -> DeploymentReport {
    let span = total_span(&parsed.stages);
    let status = classify_deployment(parsed.errors.len());

    info!(
        "Deployment analysis: status={}, stages={}, errors={}, total_duration={:?}",
        status,
        parsed.stages.len(),
        parsed.errors.len(),
        span.total_seconds
    );

    DeploymentReport {
        start_time: span.start,
        end_time: span.end,
        total_duration_seconds: span.total_seconds,
        stages: parsed.stages,
        errors: parsed.errors,
        status,
    }
}
