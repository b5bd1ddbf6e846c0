//! Continuous-improvement models

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::metrics::MetricsDocument;
use crate::models::snapshot::Recommendation;

/// A group of identical error-line prefixes and how often they occurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorFrequency {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementReport {
    pub timestamp: DateTime<Local>,
    pub performance_metrics: MetricsDocument,
    pub error_analysis: Vec<ErrorFrequency>,
    pub optimization_recommendations: Vec<Recommendation>,
}
