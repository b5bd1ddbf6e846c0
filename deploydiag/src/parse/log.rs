//! Stage and error extraction from deployment log text

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::deployment::{ErrorRecord, StageRecord};
use crate::parse::patterns::{stage_patterns, RE_ERROR_LINE};
use crate::timespan::{duration, parse_timestamp};

/// Stages and errors found in one log, both in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedLog {
    pub stages: Vec<StageRecord>,
    pub errors: Vec<ErrorRecord>,
}

/// Parse raw log text
///
/// Text that matches no marker is ignored. A marker with a malformed
/// timestamp still yields a stage; only its affected fields are `None`.
pub fn parse_log(text: &str) -> ParsedLog {
    let stages = parse_stages(text);
    let errors = parse_errors(text);
    debug!(
        "Parsed deployment log: {} stages, {} errors",
        stages.len(),
        errors.len()
    );
    ParsedLog { stages, errors }
}

fn parse_stages(text: &str) -> Vec<StageRecord> {
    let mut found: Vec<(usize, StageRecord)> = Vec::new();

    for pattern in stage_patterns() {
        let Some(re) = pattern.regex.as_ref() else {
            warn!("Stage pattern {} is unavailable", pattern.name);
            continue;
        };
        for caps in re.captures_iter(text) {
            let (Some(whole), Some(name), Some(start), Some(end)) = (
                caps.get(0),
                caps.name("name"),
                caps.name("start"),
                caps.name("end"),
            ) else {
                continue;
            };

            let duration_seconds = duration(start.as_str(), end.as_str());
            let record = StageRecord {
                name: name.as_str().trim().to_string(),
                start: parse_timestamp(start.as_str()),
                end: parse_timestamp(end.as_str()),
                duration_seconds,
                status: pattern.outcome.status(duration_seconds.is_some()),
            };
            found.push((whole.start(), record));
        }
    }

    // patterns are scanned one after another; restore document order
    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, record)| record).collect()
}

fn parse_errors(text: &str) -> Vec<ErrorRecord> {
    let Some(re) = RE_ERROR_LINE.as_ref() else {
        warn!("Error line pattern is unavailable");
        return Vec::new();
    };
    re.captures_iter(text)
        .filter_map(|caps| caps.name("message"))
        .map(|message| ErrorRecord {
            message: message.as_str().trim_end().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::deployment::StageStatus;

    const LOG: &str = "\
2024-01-01 09:59:58 INFO pipeline booting
[DEPLOY] build - Started at 2024-01-01 10:00:00 - Completed at 2024-01-01 10:02:00
[DEPLOY] migrate - Started at 2024-01-01 10:02:00 - Failed at 2024-01-01 10:02:30
ERROR: migration 0042 failed
[DEPLOY] build - Started at 2024-01-01 10:03:00 - Completed at 2024-01-01 10:04:00
WARN: ERROR: not at line start
ERROR: retry budget exhausted  
";

    #[test]
    fn test_stages_in_document_order_with_duplicates() {
        let parsed = parse_log(LOG);
        let names: Vec<_> = parsed.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["build", "migrate", "build"]);

        assert_eq!(parsed.stages[0].duration_seconds, Some(120.0));
        assert_eq!(parsed.stages[0].status, StageStatus::Success);
        assert_eq!(parsed.stages[1].duration_seconds, Some(30.0));
        assert_eq!(parsed.stages[1].status, StageStatus::Failure);
        assert_eq!(parsed.stages[2].duration_seconds, Some(60.0));
    }

    #[test]
    fn test_errors_only_at_line_start() {
        let parsed = parse_log(LOG);
        let messages: Vec<_> = parsed.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["migration 0042 failed", "retry budget exhausted"]);
    }

    #[test]
    fn test_malformed_timestamp_degrades_stage() {
        let parsed = parse_log(
            "[DEPLOY] publish - Started at 2024-01-01 10:00:00 - Completed at whenever\n",
        );
        assert_eq!(parsed.stages.len(), 1);
        let stage = &parsed.stages[0];
        assert_eq!(stage.name, "publish");
        assert!(stage.start.is_some());
        assert_eq!(stage.end, None);
        assert_eq!(stage.duration_seconds, None);
        assert_eq!(stage.status, StageStatus::Unknown);
    }

    #[test]
    fn test_crlf_line_endings() {
        let parsed = parse_log(
            "[DEPLOY] build - Started at 2024-01-01 10:00:00 - Completed at 2024-01-01 10:00:05\r\nERROR: disk full\r\n",
        );
        assert_eq!(parsed.stages[0].duration_seconds, Some(5.0));
        assert_eq!(parsed.errors[0].message, "disk full");
    }

    #[test]
    fn test_no_markers() {
        let parsed = parse_log("nothing to see here\n[DEPLOY] half a marker\n");
        assert_eq!(parsed, ParsedLog::default());
        assert_eq!(parse_log(""), ParsedLog::default());
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(parse_log(LOG), parse_log(LOG));
    }
}
