//! Merged input of the recommendation engine

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::health::ResourceUsage;
use crate::models::metrics::MetricsDocument;
use crate::models::readiness::ComponentStatus;

/// A human-readable action item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recommendation(pub String);

impl Recommendation {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the recommendation rules look at, merged from whichever
/// reports were available
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticSnapshot {
    pub metrics: MetricsDocument,

    /// Live resource readings, preferred over the metrics document
    pub resources: Option<ResourceUsage>,

    pub error_count: usize,

    pub failed_stages: usize,

    pub components: BTreeMap<String, ComponentStatus>,
}

impl DiagnosticSnapshot {
    pub fn cpu_usage(&self) -> Option<f64> {
        self.resources
            .map(|r| r.cpu_pct)
            .or(self.metrics.cpu_usage)
    }

    pub fn memory_usage(&self) -> Option<f64> {
        self.resources
            .map(|r| r.memory_pct)
            .or(self.metrics.memory_usage)
    }
}
