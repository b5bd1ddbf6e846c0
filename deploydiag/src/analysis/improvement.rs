//! Continuous-improvement report

use chrono::{DateTime, Local};
use tracing::info;

use crate::analysis::recommend::RecommendationEngine;
use crate::analysis::snapshot::SnapshotBuilder;
use crate::models::health::HealthReport;
use crate::models::improvement::{ErrorFrequency, ImprovementReport};
use crate::models::metrics::MetricsDocument;

/// Build the improvement report from merged metrics and grouped errors,
/// optionally with live resource readings
pub fn build_improvement(
    timestamp: DateTime<Local>,
    performance_metrics: MetricsDocument,
    error_analysis: Vec<ErrorFrequency>,
    health: Option<&HealthReport>,
    engine: &RecommendationEngine,
) -> ImprovementReport {
    let mut builder = SnapshotBuilder::new()
        .metrics(&performance_metrics)
        .error_frequency(&error_analysis);
    if let Some(report) = health {
        builder = builder.health(report);
    }
    let optimization_recommendations = engine.recommend(&builder.build());

    info!(
        "Improvement analysis: {} error groups, {} recommendations",
        error_analysis.len(),
        optimization_recommendations.len()
    );

    ImprovementReport {
        timestamp,
        performance_metrics,
        error_analysis,
        optimization_recommendations,
    }
}
