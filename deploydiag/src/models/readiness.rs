//! Deployment readiness models

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::snapshot::Recommendation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationState {
    Verified,
    #[serde(rename = "Not Verified")]
    NotVerified,
}

/// A deployed system component (backend, frontend, database, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub status: VerificationState,
    pub version: Option<String>,
}

impl ComponentStatus {
    pub fn is_verified(&self) -> bool {
        self.status == VerificationState::Verified
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadinessMetrics {
    pub total_deployment_time: Option<f64>,
    pub successful_stages: usize,
    pub failed_stages: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub timestamp: DateTime<Local>,
    pub system_components: BTreeMap<String, ComponentStatus>,
    pub deployment_metrics: ReadinessMetrics,
    pub recommendations: Vec<Recommendation>,
}
