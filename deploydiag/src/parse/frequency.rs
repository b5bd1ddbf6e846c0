//! Error-frequency grouping over raw log lines

use std::collections::BTreeMap;

use crate::models::improvement::ErrorFrequency;
use crate::parse::patterns::RE_DATE_PREFIX;

/// Number of leading whitespace-separated fields that form a group key
const KEY_FIELDS: usize = 5;

const SEVERITY_MARKERS: &[&str] = &["ERROR", "CRITICAL"];

/// Group error and critical lines by their first fields
///
/// Only lines whose key starts with a `YYYY-MM-DD` date are counted. The
/// result is sorted by key.
pub fn error_frequency<'a, I>(lines: I) -> Vec<ErrorFrequency>
where
    I: IntoIterator<Item = &'a str>,
{
    let Some(date_prefix) = RE_DATE_PREFIX.as_ref() else {
        return Vec::new();
    };

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for line in lines {
        if !SEVERITY_MARKERS.iter().any(|marker| line.contains(marker)) {
            continue;
        }
        let key = line
            .split_whitespace()
            .take(KEY_FIELDS)
            .collect::<Vec<_>>()
            .join(" ");
        if date_prefix.is_match(&key) {
            *counts.entry(key).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|(key, count)| ErrorFrequency { key, count })
        .collect()
}
