// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! History Aggregator: time-windowed, per-model trend series.
//!
//! # Pipeline
//!
//! 1. Parse each entry's timestamp; malformed entries are logged and dropped.
//! 2. Keep entries with `timestamp >= now - window`.
//! 3. Apply the model filter.
//! 4. Stable-sort by timestamp and group by key in order of first appearance.
//! 5. Assign styles per provider group (see [`crate::palette`]).
//! 6. Extract `(timestamp, value)` points for each selected metric.
//!
//! A model with no surviving entries produces no series at all.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::metric::Metric;
use crate::notice::Notice;
use crate::palette::{assign_styles, SeriesStyle};
use crate::record::HistoryEntry;
use crate::store::RecordStore;
use crate::view::ViewConfiguration;

/// Provider name used when an entry carries none.
pub const DEFAULT_PROVIDER: &str = "default";

/// One observation on a trend line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// Observation time.
    pub timestamp: DateTime<Utc>,
    /// Measured value; `None` draws a gap.
    pub value: Option<f64>,
}

/// Time-ordered observations of one metric for one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Model key.
    pub model_key: String,
    /// Provider of the model's earliest entry in the window.
    pub provider: String,
    /// Assigned color and marker.
    pub style: SeriesStyle,
    /// Points in ascending timestamp order.
    pub points: Vec<SeriesPoint>,
}

impl Series {
    /// Most recent present value.
    pub fn latest_value(&self) -> Option<f64> {
        self.points.iter().rev().find_map(|p| p.value)
    }
}

/// All series for one metric: the contents of one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    /// The charted metric.
    pub metric: Metric,
    /// One series per model, in order of first appearance.
    pub series: Vec<Series>,
}

impl MetricSeries {
    /// Whether the chart has nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Output of one history recompute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryView {
    /// One entry per selected metric.
    pub metrics: Vec<MetricSeries>,
    /// Set when no metric has any series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// An entry that survived parsing and filtering.
#[derive(Debug, Clone, Copy)]
struct TimedEntry<'a> {
    timestamp: DateTime<Utc>,
    entry: &'a HistoryEntry,
}

/// Entries grouped by model, with styles already assigned.
struct ModelGroup<'a> {
    key: &'a str,
    provider: &'a str,
    style: SeriesStyle,
    entries: Vec<TimedEntry<'a>>,
}

/// Build the series for every metric selected in `config`.
pub fn compute_series(
    history: &[HistoryEntry],
    config: &ViewConfiguration,
    now: DateTime<Utc>,
) -> Vec<MetricSeries> {
    let groups = group_models(select_window(history, config, now));

    config
        .selected_metric()
        .metrics()
        .into_iter()
        .map(|metric| MetricSeries {
            metric,
            series: groups.iter().map(|g| extract_series(g, metric)).collect(),
        })
        .collect()
}

/// [`compute_series`] over a store, plus the empty-state notice.
pub fn compute_history_view(
    store: &RecordStore,
    config: &ViewConfiguration,
    now: DateTime<Utc>,
) -> HistoryView {
    let metrics = compute_series(store.history(), config, now);
    let notice = metrics
        .iter()
        .all(MetricSeries::is_empty)
        .then(Notice::no_history);

    HistoryView { metrics, notice }
}

/// Earliest instant still inside the window.
pub fn window_cutoff(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn select_window<'a>(
    history: &'a [HistoryEntry],
    config: &ViewConfiguration,
    now: DateTime<Utc>,
) -> Vec<TimedEntry<'a>> {
    let cutoff = window_cutoff(now, config.time_window_days());
    let model_filter = config.model_filter();

    let mut selected: Vec<TimedEntry<'a>> = history
        .iter()
        .filter_map(|entry| match entry.parsed_timestamp() {
            Some(timestamp) => Some(TimedEntry { timestamp, entry }),
            None => {
                warn!(
                    key = %entry.key,
                    timestamp = %entry.timestamp,
                    "Skipping history entry with invalid timestamp"
                );
                None
            }
        })
        .filter(|t| t.timestamp >= cutoff)
        .filter(|t| model_filter.matches(&t.entry.key))
        .collect();

    selected.sort_by_key(|t| t.timestamp);

    debug!(
        selected = selected.len(),
        total = history.len(),
        cutoff = %cutoff.to_rfc3339(),
        model_filter = %model_filter,
        "Selected history entries"
    );

    selected
}

fn group_models<'a>(entries: Vec<TimedEntry<'a>>) -> Vec<ModelGroup<'a>> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut grouped: Vec<(&'a str, &'a str, Vec<TimedEntry<'a>>)> = Vec::new();

    for timed in entries {
        let key = timed.entry.key.as_str();
        match index.get(key) {
            Some(&i) => grouped[i].2.push(timed),
            None => {
                let provider = match timed.entry.provider.trim() {
                    "" => DEFAULT_PROVIDER,
                    p => p,
                };
                index.insert(key, grouped.len());
                grouped.push((key, provider, vec![timed]));
            }
        }
    }

    let styles = assign_styles(grouped.iter().map(|(key, provider, _)| (*key, *provider)));
    grouped
        .into_iter()
        .filter_map(|(key, provider, entries)| {
            styles.get(key).map(|style| ModelGroup {
                key,
                provider,
                style: *style,
                entries,
            })
        })
        .collect()
}

fn extract_series(group: &ModelGroup<'_>, metric: Metric) -> Series {
    Series {
        model_key: group.key.to_string(),
        provider: group.provider.to_string(),
        style: group.style,
        points: group
            .entries
            .iter()
            .map(|t| SeriesPoint {
                timestamp: t.timestamp,
                value: t.entry.metrics.get(metric),
            })
            .collect(),
    }
}
