//! Typed view over the metrics documents written by the deployment pipeline
//!
//! The documents are loosely structured JSON. Known fields are lifted into
//! optional typed fields; a field with the wrong shape becomes `None` rather
//! than failing the whole document. Unknown keys are carried in `extra`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Stage entry of the `stages` mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl StageMetrics {
    fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            start: text("start"),
            end: text("end"),
            status: text("status"),
        }
    }

    /// Only an explicit `"Success"` counts as successful
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("Success")
    }
}

/// Performance and deployment metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsDocument {
    /// Backend response time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,

    /// Database query time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_query_time: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_usage: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<f64>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub stages: BTreeMap<String, StageMetrics>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const KNOWN_KEYS: &[&str] = &[
    "response_time",
    "database_query_time",
    "cpu_usage",
    "memory_usage",
    "stages",
];

impl MetricsDocument {
    /// Build from arbitrary JSON. Anything that is not an object yields an
    /// empty document.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let number = |key: &str| object.get(key).and_then(Value::as_f64);

        let stages = object
            .get("stages")
            .and_then(Value::as_object)
            .map(|stages| {
                stages
                    .iter()
                    .map(|(name, stage)| (name.clone(), StageMetrics::from_value(stage)))
                    .collect()
            })
            .unwrap_or_default();

        let extra = object
            .iter()
            .filter(|(key, _)| !KNOWN_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            response_time: number("response_time"),
            database_query_time: number("database_query_time"),
            cpu_usage: number("cpu_usage"),
            memory_usage: number("memory_usage"),
            stages,
            extra,
        }
    }

    /// Overlay `other` on top of `self`: every key present in `other`
    /// replaces the one here, keys absent from `other` are kept.
    pub fn merge(&mut self, other: MetricsDocument) {
        if other.response_time.is_some() {
            self.response_time = other.response_time;
        }
        if other.database_query_time.is_some() {
            self.database_query_time = other.database_query_time;
        }
        if other.cpu_usage.is_some() {
            self.cpu_usage = other.cpu_usage;
        }
        if other.memory_usage.is_some() {
            self.memory_usage = other.memory_usage;
        }
        if !other.stages.is_empty() {
            self.stages = other.stages;
        }
        self.extra.extend(other.extra);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl<'de> Deserialize<'de> for MetricsDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}
