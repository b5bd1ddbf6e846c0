//! Assembles the recommendation engine's input from whichever reports exist

use std::collections::BTreeMap;

use crate::models::deployment::DeploymentReport;
use crate::models::health::HealthReport;
use crate::models::improvement::ErrorFrequency;
use crate::models::metrics::MetricsDocument;
use crate::models::readiness::ComponentStatus;
use crate::models::snapshot::DiagnosticSnapshot;

#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    snapshot: DiagnosticSnapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay a metrics document; later documents win per key
    pub fn metrics(mut self, metrics: &MetricsDocument) -> Self {
        self.snapshot.metrics.merge(metrics.clone());
        self
    }

    /// Count the deployment's errors and failed stages
    pub fn deployment(mut self, report: &DeploymentReport) -> Self {
        self.snapshot.error_count += report.errors.len();
        self.snapshot.failed_stages += report.failed_stages().count();
        self
    }

    /// Take live resource readings, when the report has them
    pub fn health(mut self, report: &HealthReport) -> Self {
        if report.resources.is_some() {
            self.snapshot.resources = report.resources;
        }
        self
    }

    /// Each distinct error group counts as one error
    pub fn error_frequency(mut self, groups: &[ErrorFrequency]) -> Self {
        self.snapshot.error_count += groups.len();
        self
    }

    pub fn components(mut self, components: &BTreeMap<String, ComponentStatus>) -> Self {
        self.snapshot
            .components
            .extend(components.iter().map(|(name, status)| (name.clone(), status.clone())));
        self
    }

    pub fn build(mut self) -> DiagnosticSnapshot {
        self.snapshot.failed_stages += self
            .snapshot
            .metrics
            .stages
            .values()
            .filter(|stage| !stage.is_success())
            .count();
        self.snapshot
    }
}
