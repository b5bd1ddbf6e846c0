//! Deployment analysis models

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Outcome of a single deployment stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageStatus {
    Success,
    Failure,
    Unknown,
}

/// A stage marker extracted from deployment log text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    /// Stage name as written in the marker
    pub name: String,

    /// Start timestamp, `None` when unparsable
    pub start: Option<NaiveDateTime>,

    /// End timestamp, `None` when unparsable
    pub end: Option<NaiveDateTime>,

    /// Elapsed seconds, `None` unless both endpoints resolve and end >= start
    pub duration_seconds: Option<f64>,

    pub status: StageStatus,
}

impl StageRecord {
    /// Whether both endpoints resolved into a valid window
    pub fn is_resolved(&self) -> bool {
        self.duration_seconds.is_some()
    }
}

/// One `ERROR:` line from the deployment log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub message: String,
}

/// Deployment verdict, a pure function of the error count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentStatus {
    Success,
    #[serde(rename = "Partial Failure")]
    PartialFailure,
    #[serde(rename = "Critical Failure")]
    CriticalFailure,
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeploymentStatus::Success => "Success",
            DeploymentStatus::PartialFailure => "Partial Failure",
            DeploymentStatus::CriticalFailure => "Critical Failure",
        };
        f.write_str(label)
    }
}

/// Structured result of analyzing one deployment log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentReport {
    /// Earliest start among resolved stages
    pub start_time: Option<NaiveDateTime>,

    /// Latest end among resolved stages
    pub end_time: Option<NaiveDateTime>,

    /// Wall-clock span covering every resolved stage
    pub total_duration_seconds: Option<f64>,

    /// Stages in document order, duplicates preserved
    pub stages: Vec<StageRecord>,

    /// Errors in first-seen order
    pub errors: Vec<ErrorRecord>,

    pub status: DeploymentStatus,
}

impl DeploymentReport {
    /// Stages that ended in an explicit failure marker
    pub fn failed_stages(&self) -> impl Iterator<Item = &StageRecord> {
        self.stages
            .iter()
            .filter(|stage| stage.status == StageStatus::Failure)
    }
}
