//! Health signal models

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Raw resource percentages, passed through unmodified
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    pub cpu_pct: f64,
    pub memory_pct: f64,
    pub disk_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceState {
    Healthy,
    /// Reached, but answered with a non-success code
    Unhealthy,
    /// Never reached (connection error or timeout)
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub name: String,
    pub reachable: bool,
    pub status_code: Option<u16>,
    pub status: ServiceState,
}

impl ServiceStatus {
    /// The probe got an HTTP answer
    pub fn reached(name: impl Into<String>, status_code: u16) -> Self {
        let status = if is_success_code(status_code) {
            ServiceState::Healthy
        } else {
            ServiceState::Unhealthy
        };
        Self {
            name: name.into(),
            reachable: true,
            status_code: Some(status_code),
            status,
        }
    }

    /// The probe failed before getting an answer
    pub fn unreachable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reachable: false,
            status_code: None,
            status: ServiceState::Unreachable,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == ServiceState::Healthy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectivityState {
    Connected,
    Disconnected,
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityStatus {
    pub target: String,
    pub reachable: bool,
    pub status_code: Option<u16>,
    pub status: ConnectivityState,
}

impl ConnectivityStatus {
    pub fn reached(target: impl Into<String>, status_code: u16) -> Self {
        let status = if is_success_code(status_code) {
            ConnectivityState::Connected
        } else {
            ConnectivityState::Disconnected
        };
        Self {
            target: target.into(),
            reachable: true,
            status_code: Some(status_code),
            status,
        }
    }

    pub fn unreachable(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            reachable: false,
            status_code: None,
            status: ConnectivityState::Unreachable,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectivityState::Connected
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityState {
    Valid,
    Invalid,
    CheckFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityCheck {
    pub name: String,
    pub valid: bool,
    pub status: SecurityState,
}

impl SecurityCheck {
    pub fn completed(name: impl Into<String>, valid: bool) -> Self {
        Self {
            name: name.into(),
            valid,
            status: if valid {
                SecurityState::Valid
            } else {
                SecurityState::Invalid
            },
        }
    }

    pub fn failed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            valid: false,
            status: SecurityState::CheckFailed,
        }
    }
}

/// One unit of live health data produced by a probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HealthSignal {
    ResourceUsage(ResourceUsage),
    ServiceStatus(ServiceStatus),
    ConnectivityStatus(ConnectivityStatus),
    SecurityCheck(SecurityCheck),
}

/// Overall verdict. Variants are declared worst-first so `Ord` follows the
/// ordinal scale Critical < NeedsAttention < Good < Excellent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallHealth {
    Critical,
    NeedsAttention,
    Good,
    Excellent,
}

impl fmt::Display for OverallHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OverallHealth::Critical => "CRITICAL",
            OverallHealth::NeedsAttention => "NEEDS_ATTENTION",
            OverallHealth::Good => "GOOD",
            OverallHealth::Excellent => "EXCELLENT",
        };
        f.write_str(label)
    }
}

/// Point-in-time merged health report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub timestamp: DateTime<Local>,

    /// `None` when the resource probe was unavailable
    pub resources: Option<ResourceUsage>,

    pub services: BTreeMap<String, ServiceStatus>,

    pub connectivity: BTreeMap<String, ConnectivityStatus>,

    pub security: BTreeMap<String, SecurityCheck>,

    pub overall_health: OverallHealth,
}

fn is_success_code(code: u16) -> bool {
    (200..300).contains(&code)
}
