//! Marker grammar for deployment logs

use regex::Regex;
use std::sync::LazyLock;

use crate::models::deployment::StageStatus;

macro_rules! marker_pattern {
    ($name:ident, $regex_str:expr) => {
        pub static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

// ── Stage markers ──────────────────────────────────────────────────────────
marker_pattern!(
    RE_STAGE_COMPLETED,
    r"\[DEPLOY\] (?P<name>.+?) - Started at (?P<start>.+?) - Completed at (?P<end>[^\r\n]*)"
);
marker_pattern!(
    RE_STAGE_FAILED,
    r"\[DEPLOY\] (?P<name>.+?) - Started at (?P<start>.+?) - Failed at (?P<end>[^\r\n]*)"
);

// ── Errors ─────────────────────────────────────────────────────────────────
marker_pattern!(RE_ERROR_LINE, r"(?m)^ERROR:[ \t]*(?P<message>[^\r\n]*)");

// ── Error frequency keys ───────────────────────────────────────────────────
marker_pattern!(RE_DATE_PREFIX, r"^[0-9]{4}-[0-9]{2}-[0-9]{2}");

/// Template for component version lines; `{component}` is replaced with the
/// escaped component name.
pub const VERSION_TEMPLATE: &str = r"(?i)\b{component} Version:\s*(?P<version>[0-9][0-9.]*)";

/// Outcome a stage marker announces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerOutcome {
    Completed,
    Failed,
}

impl MarkerOutcome {
    /// Stage status for a marker of this kind, given whether its duration
    /// resolved
    pub fn status(self, resolved: bool) -> StageStatus {
        match (self, resolved) {
            (MarkerOutcome::Failed, _) => StageStatus::Failure,
            (MarkerOutcome::Completed, true) => StageStatus::Success,
            (MarkerOutcome::Completed, false) => StageStatus::Unknown,
        }
    }
}

/// A compiled stage marker pattern
pub struct StagePattern {
    pub name: &'static str,
    pub regex: &'static LazyLock<Option<Regex>>,
    pub outcome: MarkerOutcome,
}

/// All stage marker patterns
pub fn stage_patterns() -> Vec<StagePattern> {
    vec![
        StagePattern {
            name: "stage_completed",
            regex: &RE_STAGE_COMPLETED,
            outcome: MarkerOutcome::Completed,
        },
        StagePattern {
            name: "stage_failed",
            regex: &RE_STAGE_FAILED,
            outcome: MarkerOutcome::Failed,
        },
    ]
}
