//! Deployment readiness report

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use tracing::info;

use crate::analysis::recommend::RecommendationEngine;
use crate::analysis::snapshot::SnapshotBuilder;
use crate::models::health::HealthReport;
use crate::models::metrics::MetricsDocument;
use crate::models::readiness::{
    ComponentStatus, ReadinessMetrics, ReadinessReport, VerificationState,
};
use crate::parse::versions::extract_versions;
use crate::timespan::{parse_lenient_timestamp, window};

/// Component versions from the log, verified against live service health
///
/// A component is verified only when a health report carries a service of
/// the same name in the healthy state.
pub fn component_statuses(
    log_text: &str,
    components: &[String],
    health: Option<&HealthReport>,
) -> BTreeMap<String, ComponentStatus> {
    extract_versions(log_text, components)
        .into_iter()
        .map(|(name, version)| {
            let verified = health
                .and_then(|report| report.services.get(&name))
                .is_some_and(|service| service.is_healthy());
            let status = if verified {
                VerificationState::Verified
            } else {
                VerificationState::NotVerified
            };
            (name, ComponentStatus { status, version })
        })
        .collect()
}

/// Stage counts and overall deployment time from the metrics `stages`
pub fn stage_summary(metrics: &MetricsDocument) -> ReadinessMetrics {
    let stages = metrics.stages.values();
    let span = window(
        stages
            .clone()
            .filter_map(|stage| stage.start.as_deref().and_then(parse_lenient_timestamp)),
        stages
            .clone()
            .filter_map(|stage| stage.end.as_deref().and_then(parse_lenient_timestamp)),
    );
    let successful_stages = stages.clone().filter(|stage| stage.is_success()).count();

    ReadinessMetrics {
        total_deployment_time: span.total_seconds,
        successful_stages,
        failed_stages: metrics.stages.len() - successful_stages,
    }
}

/// Build the readiness report
pub fn build_readiness(
    timestamp: DateTime<Local>,
    log_text: &str,
    metrics: &MetricsDocument,
    health: Option<&HealthReport>,
    components: &[String],
    engine: &RecommendationEngine,
) -> ReadinessReport {
    let system_components = component_statuses(log_text, components, health);
    let deployment_metrics = stage_summary(metrics);

    let mut builder = SnapshotBuilder::new()
        .metrics(metrics)
        .components(&system_components);
    if let Some(report) = health {
        builder = builder.health(report);
    }
    let recommendations = engine.recommend(&builder.build());

    info!(
        "Readiness: {}/{} components verified, {} failed stages",
        system_components.values().filter(|c| c.is_verified()).count(),
        system_components.len(),
        deployment_metrics.failed_stages
    );

    ReadinessReport {
        timestamp,
        system_components,
        deployment_metrics,
        recommendations,
    }
}
