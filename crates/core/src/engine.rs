// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Filter-Sort Engine for the results table.
//!
//! # Ordering rules
//!
//! - Numeric columns: a missing value sorts after every present value in
//!   both directions. The direction only reverses the order among present
//!   values.
//! - Text columns: case-insensitive lexicographic order.
//! - The sort is stable, so ties keep their document order.

use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use crate::metric::Metric;
use crate::notice::Notice;
use crate::record::ResultRecord;
use crate::store::RecordStore;
use crate::view::{SortDirection, SortKey, ViewConfiguration};

/// Output of one table recompute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    /// Visible rows in display order.
    pub rows: Vec<ResultRecord>,
    /// Number of rows in the unfiltered snapshot.
    pub total: usize,
    /// Diagnostic for the empty states.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// Filter and sort `records` for display. Never mutates its inputs.
pub fn compute_visible_rows(records: &[ResultRecord], config: &ViewConfiguration) -> Vec<ResultRecord> {
    let mut rows = filter_rows(records, config);
    if let Some(key) = config.sort_key() {
        sort_rows(&mut rows, key, config.sort_direction());
    }

    debug!(
        visible = rows.len(),
        total = records.len(),
        sort_key = %config.sort_key().map(|k| k.as_str()).unwrap_or("none"),
        sort_direction = %config.sort_direction(),
        "Computed visible rows"
    );

    rows.into_iter().cloned().collect()
}

/// [`compute_visible_rows`] plus the diagnostic for the empty states.
pub fn compute_table_view(store: &RecordStore, config: &ViewConfiguration) -> TableView {
    let rows = compute_visible_rows(store.results(), config);
    let notice = match (rows.is_empty(), store.is_empty()) {
        (false, _) => None,
        (true, true) => Some(Notice::no_results()),
        (true, false) => Some(Notice::no_matching_rows()),
    };

    TableView {
        rows,
        total: store.results().len(),
        notice,
    }
}

/// Rows passing the provider filter and search text, in document order.
pub fn filter_rows<'a>(records: &'a [ResultRecord], config: &ViewConfiguration) -> Vec<&'a ResultRecord> {
    let query = config.search_query().trim().to_lowercase();
    let provider = config.provider_filter().trim().to_lowercase();

    records
        .iter()
        .filter(|r| provider.is_empty() || r.provider.to_lowercase() == provider)
        .filter(|r| {
            query.is_empty() || format!("{} {}", r.key, r.model).to_lowercase().contains(&query)
        })
        .collect()
}

/// Stable in-place sort of `rows` on one column.
pub fn sort_rows(rows: &mut [&ResultRecord], key: SortKey, direction: SortDirection) {
    match key {
        SortKey::Metric(metric) => {
            rows.sort_by(|a, b| compare_metric(a, b, metric, direction));
        }
        SortKey::Key => rows.sort_by(|a, b| compare_text(&a.key, &b.key, direction)),
        SortKey::Provider => rows.sort_by(|a, b| compare_text(&a.provider, &b.provider, direction)),
        SortKey::Model => rows.sort_by(|a, b| compare_text(&a.model, &b.model, direction)),
    }
}

fn compare_metric(a: &ResultRecord, b: &ResultRecord, metric: Metric, direction: SortDirection) -> Ordering {
    compare_optional(a.metric(metric), b.metric(metric), direction)
}

/// Missing is decided before the direction is applied, so it stays last.
pub fn compare_optional(a: Option<f64>, b: Option<f64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => direction.apply(x.total_cmp(&y)),
    }
}

fn compare_text(a: &str, b: &str, direction: SortDirection) -> Ordering {
    direction.apply(a.to_lowercase().cmp(&b.to_lowercase()))
}
