//! Duration and timespan resolution
//!
//! Timestamps in deployment markers use the fixed `YYYY-MM-DD HH:MM:SS`
//! form. Anything that fails to parse, and any window whose end precedes
//! its start, resolves to `None` and is logged; it never fails the caller.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::deployment::StageRecord;

/// Format of timestamps inside `[DEPLOY]` markers
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Extra forms accepted for timestamps inside metrics documents
const LENIENT_FORMATS: &[&str] = &[
    TIMESTAMP_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Wall-clock window covering a set of stages
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Timespan {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub total_seconds: Option<f64>,
}

/// Parse a marker timestamp in the fixed format
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT).ok()
}

/// Parse a metrics timestamp: the fixed format, ISO-8601 with `T`,
/// fractional seconds, or RFC 3339 with an offset (kept as local wall time)
pub fn parse_lenient_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    LENIENT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|at| at.naive_local())
        })
}

/// Seconds between two marker timestamps
pub fn duration(start: &str, end: &str) -> Option<f64> {
    let parsed_start = parse_timestamp(start);
    if parsed_start.is_none() {
        warn!("Duration calculation error: unparsable start timestamp {:?}", start);
    }
    let parsed_end = parse_timestamp(end);
    if parsed_end.is_none() {
        warn!("Duration calculation error: unparsable end timestamp {:?}", end);
    }
    duration_between(parsed_start, parsed_end)
}

/// Seconds between two already-parsed timestamps
pub fn duration_between(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Option<f64> {
    let (start, end) = (start?, end?);
    if end < start {
        warn!("Duration calculation error: end {} precedes start {}", end, start);
        return None;
    }
    Some(seconds(end - start))
}

/// Span across every stage whose own duration resolved
pub fn total_span(stages: &[StageRecord]) -> Timespan {
    let resolved = stages.iter().filter(|stage| stage.is_resolved());
    window(
        resolved.clone().filter_map(|stage| stage.start),
        resolved.filter_map(|stage| stage.end),
    )
}

/// Earliest start to latest end. `total_seconds` is `None` when either side
/// is empty or the latest end precedes the earliest start.
pub fn window<S, E>(starts: S, ends: E) -> Timespan
where
    S: IntoIterator<Item = NaiveDateTime>,
    E: IntoIterator<Item = NaiveDateTime>,
{
    let start = starts.into_iter().min();
    let end = ends.into_iter().max();
    let total_seconds = match (start, end) {
        (Some(start), Some(end)) if end >= start => Some(seconds(end - start)),
        _ => None,
    };
    Timespan {
        start,
        end,
        total_seconds,
    }
}

fn seconds(delta: chrono::TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::deployment::StageStatus;

    fn stage(start: &str, end: &str) -> StageRecord {
        let start = parse_timestamp(start);
        let end = parse_timestamp(end);
        StageRecord {
            name: "stage".to_string(),
            start,
            end,
            duration_seconds: duration_between(start, end),
            status: StageStatus::Success,
        }
    }

    #[test]
    fn test_duration_well_formed() {
        assert_eq!(duration("2024-01-01 10:00:00", "2024-01-01 10:02:00"), Some(120.0));
        assert_eq!(duration("2024-01-01 23:59:30", "2024-01-02 00:00:15"), Some(45.0));
        assert_eq!(duration("2024-01-01 10:00:00", "2024-01-01 10:00:00"), Some(0.0));
    }

    #[test]
    fn test_duration_end_before_start() {
        assert_eq!(duration("2024-01-01 10:02:00", "2024-01-01 10:00:00"), None);
    }

    #[test]
    fn test_duration_unparsable() {
        assert_eq!(duration("2024-01-01 10:00:00", "soon"), None);
        assert_eq!(duration("yesterday", "2024-01-01 10:00:00"), None);
        assert_eq!(duration("2024-13-01 10:00:00", "2024-13-01 10:01:00"), None);
        assert_eq!(duration("", ""), None);
    }

    #[test]
    fn test_lenient_timestamp_forms() {
        let expected = parse_timestamp("2024-01-01 10:00:00");
        assert_eq!(parse_lenient_timestamp("2024-01-01T10:00:00"), expected);
        assert_eq!(parse_lenient_timestamp("2024-01-01 10:00:00"), expected);
        assert_eq!(parse_lenient_timestamp("2024-01-01T10:00:00+02:00"), expected);
        assert!(parse_lenient_timestamp("2024-01-01T10:00:00.250").is_some());
        assert_eq!(parse_lenient_timestamp("not a time"), None);
    }

    #[test]
    fn test_total_span_skips_unresolved() {
        let mut broken = stage("2023-12-31 00:00:00", "garbage");
        broken.end = None;
        let stages = vec![
            stage("2024-01-01 10:00:00", "2024-01-01 10:02:00"),
            broken,
            stage("2024-01-01 10:05:00", "2024-01-01 10:10:00"),
        ];

        let span = total_span(&stages);
        assert_eq!(span.start, parse_timestamp("2024-01-01 10:00:00"));
        assert_eq!(span.end, parse_timestamp("2024-01-01 10:10:00"));
        assert_eq!(span.total_seconds, Some(600.0));
    }

    #[test]
    fn test_total_span_empty() {
        assert_eq!(total_span(&[]), Timespan::default());

        let inverted = stage("2024-01-01 10:02:00", "2024-01-01 10:00:00");
        assert_eq!(total_span(&[inverted]).total_seconds, None);
    }
}
