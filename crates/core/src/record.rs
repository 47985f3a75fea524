// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark records as they arrive from the fetched documents.
//!
//! Records are created wholesale from a snapshot and never mutated.
//! Timestamps stay in their raw string form: a malformed timestamp is a
//! per-entry data problem the aggregator logs and skips, not a reason to
//! reject the whole document.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::metric::{lenient_number, number_from_json, Metric, MetricValues};

/// One row of current benchmark data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Unique identifier of the benchmarked model configuration.
    pub key: String,
    /// Provider name (e.g. `openai`).
    #[serde(default, deserialize_with = "lenient_text")]
    pub provider: String,
    /// Upstream model name.
    #[serde(default, deserialize_with = "lenient_text")]
    pub model: String,
    /// The five metric values.
    #[serde(flatten)]
    pub metrics: MetricValues,
    /// When this row was last measured (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ResultRecord {
    /// Create a record with no measured metrics.
    pub fn new(key: impl Into<String>, provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            provider: provider.into(),
            model: model.into(),
            metrics: MetricValues::default(),
            updated_at: None,
        }
    }

    /// Builder-style metric assignment.
    pub fn with_metric(mut self, metric: Metric, value: f64) -> Self {
        self.metrics.set(metric, Some(value));
        self
    }

    /// Value of one metric.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(metric)
    }

    /// Parsed `updated_at`, if present and well-formed.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at.as_deref().and_then(parse_timestamp)
    }
}

/// One timestamped observation for a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Observation time as written by the runner (ISO 8601).
    pub timestamp: String,
    /// Model key; shared by every entry of the same model.
    pub key: String,
    /// Provider name.
    #[serde(default, deserialize_with = "lenient_text")]
    pub provider: String,
    /// Upstream model name.
    #[serde(
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub model: Option<String>,
    /// The five metric values.
    #[serde(flatten)]
    pub metrics: MetricValues,
}

impl HistoryEntry {
    /// Create an entry with no measured metrics.
    pub fn new(
        timestamp: impl Into<String>,
        key: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            key: key.into(),
            provider: provider.into(),
            model: None,
            metrics: MetricValues::default(),
        }
    }

    /// Builder-style metric assignment.
    pub fn with_metric(mut self, metric: Metric, value: f64) -> Self {
        self.metrics.set(metric, Some(value));
        self
    }

    /// Parsed timestamp, `None` when malformed.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

/// Metadata about the benchmark run that produced the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// When the run finished (ISO 8601).
    #[serde(
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub generated_at: Option<String>,
    /// Set when the run hit failures; shown as an error banner.
    #[serde(
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub error_message: Option<String>,
    /// Measured runs per model.
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub runs: Option<u32>,
    /// `streaming`, `nonstreaming` or `both`.
    #[serde(
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub mode: Option<String>,
    /// Model keys the run was configured with.
    #[serde(
        default,
        deserialize_with = "lenient_text_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub models: Vec<String>,
    /// Per-request timeout used by the run.
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_timeout_seconds: Option<f64>,
}

impl RunMetadata {
    /// Parsed `generated_at`.
    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.generated_at.as_deref().and_then(parse_timestamp)
    }

    /// The run's error message, ignoring blank strings.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// Parse an ISO 8601 instant.
///
/// RFC 3339 with an offset is preferred; a timestamp without offset is read
/// as UTC. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

// Descriptive fields are display-only: a wrong type degrades to "absent"
// instead of failing the record it belongs to.

fn text_from_json(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional_text(deserializer)?.unwrap_or_default())
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(text_from_json))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(number_from_json)
        .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32))
}

fn lenient_text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Ok(items.into_iter().filter_map(text_from_json).collect()),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_result_record_from_runner_json() {
        let record: ResultRecord = serde_json::from_value(json!({
            "key": "gpt4o",
            "provider": "openai",
            "model": "gpt-4o",
            "nonstreaming_avg_s": 1.5,
            "nonstreaming_runs": [{"seconds": 1.5}],
            "streaming_ttfb_avg_s": 0.4,
            "streaming_total_avg_s": null,
            "total_tokens": 1234,
            "updated_at": "2025-09-07T12:00:00+00:00"
        }))
        .unwrap();

        assert_eq!(record.key, "gpt4o");
        assert_eq!(record.metric(Metric::NonstreamingAvg), Some(1.5));
        assert_eq!(record.metric(Metric::StreamingTtfbAvg), Some(0.4));
        assert_eq!(record.metric(Metric::StreamingTotalAvg), None);
        assert_eq!(
            record.updated_at(),
            Some(Utc.with_ymd_and_hms(2025, 9, 7, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_history_entry_keeps_raw_timestamp() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "timestamp": "yesterday",
            "key": "claude",
            "provider": "anthropic",
            "stream_tokens_per_second": 80
        }))
        .unwrap();

        assert_eq!(entry.timestamp, "yesterday");
        assert!(entry.parsed_timestamp().is_none());
        assert_eq!(entry.metrics.get(Metric::StreamTokensPerSecond), Some(80.0));
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2025, 9, 7, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2025-09-07T12:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-09-07T14:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-09-07T12:00:00"), Some(expected));
        assert!(parse_timestamp("2025-09-07T12:00:00.123456+00:00").is_some());
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("not a date"), None);
    }

    #[test]
    fn test_null_descriptive_fields_become_empty() {
        let record: ResultRecord = serde_json::from_value(json!({
            "key": "mystery",
            "provider": null,
            "model": null,
            "nonstreaming_avg_s": 1.0
        }))
        .unwrap();
        assert_eq!(record.provider, "");
        assert_eq!(record.model, "");
        assert_eq!(record.metric(Metric::NonstreamingAvg), Some(1.0));

        let entry: HistoryEntry = serde_json::from_value(json!({
            "timestamp": "2025-09-07T12:00:00Z",
            "key": "mystery",
            "provider": null,
            "model": null
        }))
        .unwrap();
        assert_eq!(entry.provider, "");
        assert_eq!(entry.model, None);
    }

    #[test]
    fn test_run_metadata_tolerates_odd_auxiliary_fields() {
        let meta: RunMetadata = serde_json::from_value(json!({
            "error_message": "Benchmark failures encountered.",
            "runs": "3",
            "mode": ["both"],
            "models": "gpt4o",
            "request_timeout_seconds": "30"
        }))
        .unwrap();
        assert_eq!(meta.error_message(), Some("Benchmark failures encountered."));
        assert_eq!(meta.runs, Some(3));
        assert_eq!(meta.mode, None);
        assert!(meta.models.is_empty());
        assert_eq!(meta.request_timeout_seconds, Some(30.0));

        let meta: RunMetadata = serde_json::from_value(json!({"runs": -1, "models": ["a", 2, null]})).unwrap();
        assert_eq!(meta.runs, None);
        assert_eq!(meta.models, vec!["a".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_run_metadata_defaults_and_blank_error() {
        let meta: RunMetadata = serde_json::from_value(json!({
            "generated_at": "2025-09-07T12:00:00Z",
            "runs": 3,
            "error_message": "   "
        }))
        .unwrap();
        assert_eq!(meta.runs, Some(3));
        assert!(meta.error_message().is_none());
        assert!(meta.generated_at().is_some());
        assert!(meta.models.is_empty());
    }
}
