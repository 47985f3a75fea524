// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Building a [`RecordStore`] from a [`DataSource`], and exporting views.
//!
//! Only the results document is required. Metadata and history are
//! optional extras: when they are missing or broken the dashboard still
//! renders with an empty banner or empty charts.

use apispeed_core::{HistoryEntry, RecordStore, ResultRecord, RunMetadata};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

use crate::error::Result;
use crate::source::{DataSource, Document};

/// Fetch all three documents concurrently and build a snapshot.
///
/// Fails only when the results document cannot be fetched or parsed.
pub async fn load_store(source: &dyn DataSource) -> Result<RecordStore> {
    let (results, meta, history) = tokio::join!(
        source.fetch(Document::Results),
        source.fetch(Document::Meta),
        source.fetch(Document::History),
    );

    let results: Vec<ResultRecord> = parse_array(&results?, Document::Results)?;

    let meta = match meta.and_then(|body| parse_meta(&body)) {
        Ok(meta) => meta,
        Err(e) => {
            warn!(source = %source.describe(), error = %e, "Run metadata unavailable");
            RunMetadata::default()
        }
    };

    let history: Vec<HistoryEntry> = match history.and_then(|body| parse_array(&body, Document::History)) {
        Ok(history) => history,
        Err(e) => {
            info!(source = %source.describe(), error = %e, "No history available");
            Vec::new()
        }
    };

    info!(
        source = %source.describe(),
        results = results.len(),
        history = history.len(),
        "Loaded benchmark snapshot"
    );

    Ok(RecordStore::new(results, history, meta))
}

/// Parse a JSON array, skipping elements that do not deserialize.
///
/// A document that is valid JSON but not an array yields an empty list.
pub fn parse_array<T: DeserializeOwned>(body: &str, document: Document) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Array(items) = value else {
        warn!(document = %document, "Document is not an array; treating as empty");
        return Ok(Vec::new());
    };

    let total = items.len();
    let parsed: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(document = %document, index, error = %e, "Skipping malformed element");
                None
            }
        })
        .collect();

    if parsed.len() < total {
        warn!(document = %document, kept = parsed.len(), total, "Some elements were skipped");
    }
    Ok(parsed)
}

fn parse_meta(body: &str) -> Result<RunMetadata> {
    let value: Value = serde_json::from_str(body)?;
    if value.is_null() {
        return Ok(RunMetadata::default());
    }
    Ok(serde_json::from_value(value)?)
}

/// Write `value` as pretty JSON.
pub async fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::source::FileSource;
    use apispeed_core::history::DEFAULT_PROVIDER;
    use apispeed_core::{compute_series, Metric, ViewConfiguration};
    use chrono::{DateTime, Utc};
    use tempfile::TempDir;

    async fn data_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            tokio::fs::write(dir.path().join(name), body).await.unwrap();
        }
        dir
    }

    const RESULTS: &str = r#"[
        {"key": "gpt4o", "provider": "openai", "model": "gpt-4o", "nonstreaming_avg_s": 1.8},
        {"key": "sonnet", "provider": "anthropic", "model": "claude", "nonstreaming_avg_s": "n/a"}
    ]"#;

    #[tokio::test]
    async fn test_load_full_snapshot() {
        let dir = data_dir(&[
            ("results.json", RESULTS),
            ("meta.json", r#"{"generated_at": "2025-09-07T12:00:00Z", "runs": 3, "error_message": "Benchmark failures encountered."}"#),
            ("history.json", r#"[{"timestamp": "2025-09-06T12:00:00Z", "key": "gpt4o", "provider": "openai", "nonstreaming_avg_s": 1.7}]"#),
        ])
        .await;

        let store = load_store(&FileSource::new(dir.path())).await.unwrap();
        assert_eq!(store.results().len(), 2);
        assert_eq!(store.results()[1].metric(Metric::NonstreamingAvg), None);
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.meta().runs, Some(3));
        assert_eq!(store.meta().error_message(), Some("Benchmark failures encountered."));
    }

    #[tokio::test]
    async fn test_missing_results_is_fatal() {
        let dir = data_dir(&[("meta.json", "{}")]).await;
        let err = load_store(&FileSource::new(dir.path())).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_optional_documents_degrade() {
        let dir = data_dir(&[("results.json", RESULTS), ("meta.json", "not json")]).await;
        let store = load_store(&FileSource::new(dir.path())).await.unwrap();
        assert_eq!(store.results().len(), 2);
        assert!(store.history().is_empty());
        assert_eq!(store.meta(), &RunMetadata::default());
    }

    #[tokio::test]
    async fn test_null_meta_is_empty() {
        let dir = data_dir(&[("results.json", "[]"), ("meta.json", "null")]).await;
        let store = load_store(&FileSource::new(dir.path())).await.unwrap();
        assert!(store.is_empty());
        assert!(store.meta().error_message().is_none());
    }

    #[tokio::test]
    async fn test_null_descriptive_fields_keep_rows() {
        let dir = data_dir(&[
            ("results.json", r#"[{"key": "mystery", "provider": "acme", "model": null, "nonstreaming_avg_s": 2.0}]"#),
            ("meta.json", r#"{"error_message": "Benchmark failures encountered.", "runs": "3"}"#),
            (
                "history.json",
                r#"[{"timestamp": "2025-09-06T12:00:00Z", "key": "mystery", "provider": null, "nonstreaming_avg_s": 2.1}]"#,
            ),
        ])
        .await;

        let store = load_store(&FileSource::new(dir.path())).await.unwrap();
        assert_eq!(store.results().len(), 1);
        assert_eq!(store.results()[0].model, "");
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.meta().error_message(), Some("Benchmark failures encountered."));
        assert_eq!(store.meta().runs, Some(3));

        let now = "2025-09-07T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let charts = compute_series(store.history(), &ViewConfiguration::default(), now);
        let series = &charts[0].series[0];
        assert_eq!(series.model_key, "mystery");
        assert_eq!(series.provider, DEFAULT_PROVIDER);
    }

    #[test]
    fn test_parse_array_skips_bad_elements() {
        let body = r#"[{"key": "a"}, {"provider": "no key"}, 42, {"key": "b", "provider": "openai"}]"#;
        let rows: Vec<ResultRecord> = parse_array(body, Document::Results).unwrap();
        let keys: Vec<_> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_array_non_array_is_empty() {
        let rows: Vec<HistoryEntry> = parse_array(r#"{"entries": []}"#, Document::History).unwrap();
        assert!(rows.is_empty());
        assert!(parse_array::<HistoryEntry>("{", Document::History).is_err());
    }

    #[tokio::test]
    async fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        let rows = vec![ResultRecord::new("gpt4o", "openai", "gpt-4o").with_metric(Metric::NonstreamingAvg, 1.5)];
        write_json(&path, &rows).await.unwrap();

        let back: Vec<ResultRecord> = serde_json::from_str(&tokio::fs::read_to_string(&path).await.unwrap()).unwrap();
        assert_eq!(back, rows);
    }
}
