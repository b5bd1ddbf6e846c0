//! Rule-based remediation hints
//!
//! Rules are evaluated independently; every rule whose condition holds
//! fires, and the output keeps rule declaration order.

use serde::{Deserialize, Serialize};

use crate::models::snapshot::{DiagnosticSnapshot, Recommendation};

/// Limits above which a rule fires (all comparisons are strict)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendationThresholds {
    #[serde(default = "default_response_time_ms")]
    pub response_time_ms: f64,

    #[serde(default = "default_database_query_time_ms")]
    pub database_query_time_ms: f64,

    #[serde(default = "default_error_count")]
    pub error_count: usize,

    #[serde(default = "default_cpu_pct")]
    pub cpu_pct: f64,

    #[serde(default = "default_memory_pct")]
    pub memory_pct: f64,
}

fn default_response_time_ms() -> f64 {
    500.0
}

fn default_database_query_time_ms() -> f64 {
    200.0
}

fn default_error_count() -> usize {
    10
}

fn default_cpu_pct() -> f64 {
    70.0
}

fn default_memory_pct() -> f64 {
    80.0
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            response_time_ms: default_response_time_ms(),
            database_query_time_ms: default_database_query_time_ms(),
            error_count: default_error_count(),
            cpu_pct: default_cpu_pct(),
            memory_pct: default_memory_pct(),
        }
    }
}

struct Rule {
    message: &'static str,
    applies: fn(&DiagnosticSnapshot, &RecommendationThresholds) -> bool,
}

fn above(value: Option<f64>, limit: f64) -> bool {
    value.is_some_and(|value| value > limit)
}

const RULES: &[Rule] = &[
    Rule {
        message: "Optimize backend response times by implementing caching",
        applies: |s, t| above(s.metrics.response_time, t.response_time_ms),
    },
    Rule {
        message: "Review and optimize database query performance",
        applies: |s, t| above(s.metrics.database_query_time, t.database_query_time_ms),
    },
    Rule {
        message: "Conduct comprehensive error log analysis to identify recurring issues",
        applies: |s, t| s.error_count > t.error_count,
    },
    Rule {
        message: "Consider horizontal scaling or optimizing CPU-intensive processes",
        applies: |s, t| above(s.cpu_usage(), t.cpu_pct),
    },
    Rule {
        message: "Implement memory profiling and optimize memory-intensive operations",
        applies: |s, t| above(s.memory_usage(), t.memory_pct),
    },
    Rule {
        message: "Review and optimize deployment stages with failures",
        applies: |s, _| s.failed_stages > 0,
    },
    Rule {
        message: "Manually verify system component statuses",
        applies: |s, _| s.components.values().any(|c| !c.is_verified()),
    },
];

/// Applies the rule table with a fixed set of thresholds
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    thresholds: RecommendationThresholds,
}

impl RecommendationEngine {
    pub fn new(thresholds: RecommendationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn recommend(&self, snapshot: &DiagnosticSnapshot) -> Vec<Recommendation> {
        RULES
            .iter()
            .filter(|rule| (rule.applies)(snapshot, &self.thresholds))
            .map(|rule| Recommendation(rule.message.to_string()))
            .collect()
    }
}

/// Recommendations under the default thresholds
pub fn recommend(snapshot: &DiagnosticSnapshot) -> Vec<Recommendation> {
    RecommendationEngine::default().recommend(snapshot)
}
