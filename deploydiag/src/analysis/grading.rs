//! Overall health grading
//!
//! Six independent boolean criteria each contribute one vote. The grade is
//! a function of how many hold, not a weighted average: no criterion
//! outweighs another.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::health::{
    ConnectivityStatus, OverallHealth, ResourceUsage, SecurityCheck, ServiceStatus,
};

/// Number of criteria in the vote
pub const CRITERIA_COUNT: usize = 6;

/// Resource limits; usage must be strictly below each to pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthThresholds {
    #[serde(default = "default_cpu_pct")]
    pub cpu_pct: f64,

    #[serde(default = "default_memory_pct")]
    pub memory_pct: f64,

    #[serde(default = "default_disk_pct")]
    pub disk_pct: f64,
}

fn default_cpu_pct() -> f64 {
    80.0
}

fn default_memory_pct() -> f64 {
    85.0
}

fn default_disk_pct() -> f64 {
    90.0
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            cpu_pct: default_cpu_pct(),
            memory_pct: default_memory_pct(),
            disk_pct: default_disk_pct(),
        }
    }
}

/// Outcome of each criterion
///
/// Empty signal categories pass their "all" criterion (nothing failed).
/// Missing resource readings fail the three resource criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCriteria {
    pub services_healthy: bool,
    pub connectivity_ok: bool,
    pub cpu_ok: bool,
    pub memory_ok: bool,
    pub disk_ok: bool,
    pub security_valid: bool,
}

impl HealthCriteria {
    pub fn evaluate(
        resources: Option<&ResourceUsage>,
        services: &BTreeMap<String, ServiceStatus>,
        connectivity: &BTreeMap<String, ConnectivityStatus>,
        security: &BTreeMap<String, SecurityCheck>,
        thresholds: &HealthThresholds,
    ) -> Self {
        Self {
            services_healthy: services.values().all(ServiceStatus::is_healthy),
            connectivity_ok: connectivity.values().all(ConnectivityStatus::is_connected),
            cpu_ok: resources.is_some_and(|r| r.cpu_pct < thresholds.cpu_pct),
            memory_ok: resources.is_some_and(|r| r.memory_pct < thresholds.memory_pct),
            disk_ok: resources.is_some_and(|r| r.disk_pct < thresholds.disk_pct),
            security_valid: security.values().all(|check| check.valid),
        }
    }

    /// How many criteria hold
    pub fn passing(&self) -> usize {
        [
            self.services_healthy,
            self.connectivity_ok,
            self.cpu_ok,
            self.memory_ok,
            self.disk_ok,
            self.security_valid,
        ]
        .into_iter()
        .filter(|ok| *ok)
        .count()
    }

    pub fn grade(&self) -> OverallHealth {
        grade(self.passing())
    }
}

/// Map a passing-criteria count to a grade
pub fn grade(passing: usize) -> OverallHealth {
    match passing {
        k if k >= CRITERIA_COUNT => OverallHealth::Excellent,
        4..=5 => OverallHealth::Good,
        2..=3 => OverallHealth::NeedsAttention,
        _ => OverallHealth::Critical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(cpu: f64, memory: f64, disk: f64) -> ResourceUsage {
        ResourceUsage {
            cpu_pct: cpu,
            memory_pct: memory,
            disk_pct: disk,
        }
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(grade(6), OverallHealth::Excellent);
        assert_eq!(grade(5), OverallHealth::Good);
        assert_eq!(grade(4), OverallHealth::Good);
        assert_eq!(grade(3), OverallHealth::NeedsAttention);
        assert_eq!(grade(2), OverallHealth::NeedsAttention);
        assert_eq!(grade(1), OverallHealth::Critical);
        assert_eq!(grade(0), OverallHealth::Critical);
    }

    #[test]
    fn test_grade_is_monotonic() {
        for k in 0..CRITERIA_COUNT {
            assert!(grade(k + 1) >= grade(k), "grade({}) < grade({})", k + 1, k);
        }
    }

    #[test]
    fn test_resource_thresholds_are_strict() {
        let empty = BTreeMap::new();
        let thresholds = HealthThresholds::default();

        let at_limit = usage(80.0, 85.0, 90.0);
        let criteria =
            HealthCriteria::evaluate(Some(&at_limit), &empty, &BTreeMap::new(), &BTreeMap::new(), &thresholds);
        assert!(!criteria.cpu_ok);
        assert!(!criteria.memory_ok);
        assert!(!criteria.disk_ok);
        assert_eq!(criteria.passing(), 3);

        let below = usage(79.9, 84.9, 89.9);
        let criteria =
            HealthCriteria::evaluate(Some(&below), &empty, &BTreeMap::new(), &BTreeMap::new(), &thresholds);
        assert_eq!(criteria.passing(), 6);
        assert_eq!(criteria.grade(), OverallHealth::Excellent);
    }

    #[test]
    fn test_empty_categories_pass_missing_resources_fail() {
        let criteria = HealthCriteria::evaluate(
            None,
            &BTreeMap::new(),
            &BTreeMap::new(),
            &BTreeMap::new(),
            &HealthThresholds::default(),
        );
        assert!(criteria.services_healthy);
        assert!(criteria.connectivity_ok);
        assert!(criteria.security_valid);
        assert_eq!(criteria.passing(), 3);
        assert_eq!(criteria.grade(), OverallHealth::NeedsAttention);
    }

    #[test]
    fn test_one_failure_per_category() {
        let mut services = BTreeMap::new();
        services.insert("api".to_string(), ServiceStatus::reached("api", 200));
        services.insert("web".to_string(), ServiceStatus::reached("web", 500));
        let mut connectivity = BTreeMap::new();
        connectivity.insert(
            "https://github.com".to_string(),
            ConnectivityStatus::unreachable("https://github.com"),
        );
        let mut security = BTreeMap::new();
        security.insert("tls".to_string(), SecurityCheck::failed("tls"));

        let criteria = HealthCriteria::evaluate(
            Some(&usage(10.0, 10.0, 10.0)),
            &services,
            &connectivity,
            &security,
            &HealthThresholds::default(),
        );
        assert!(!criteria.services_healthy);
        assert!(!criteria.connectivity_ok);
        assert!(!criteria.security_valid);
        assert_eq!(criteria.grade(), OverallHealth::NeedsAttention);
    }
}
