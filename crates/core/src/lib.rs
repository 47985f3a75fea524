// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! View-state and data-transformation pipeline for the APISpeed dashboard.
//!
//! This crate turns an immutable snapshot of benchmark results and history
//! ([`RecordStore`]) plus the user's current [`ViewConfiguration`] into the
//! exact rows and chart series a presentation layer should draw.
//!
//! Everything here is pure and synchronous: no I/O, no shared mutable state.
//! Fetching documents lives in `apispeed-store`; drawing lives in whatever
//! implements [`Presenter`].
//!
//! # Quick Start
//!
//! ```
//! use apispeed_core::{compute_visible_rows, Metric, ResultRecord, SortDirection, SortKey, ViewConfiguration};
//!
//! let rows: Vec<ResultRecord> = serde_json::from_str(r#"[
//!     {"key": "gpt4", "provider": "openai", "model": "gpt-4", "nonstreaming_avg_s": 1.2},
//!     {"key": "gpt4-fast", "provider": "openai", "model": "gpt-4", "nonstreaming_avg_s": null}
//! ]"#).unwrap();
//!
//! let config = ViewConfiguration::default()
//!     .with_sort(SortKey::Metric(Metric::NonstreamingAvg), SortDirection::Descending);
//!
//! let visible = compute_visible_rows(&rows, &config);
//! assert_eq!(visible[0].key, "gpt4");
//! ```
//!
//! # Modules
//!
//! - [`metric`] - The five measured quantities and lenient value parsing
//! - [`record`] - Result, history and run-metadata records
//! - [`store`] - The immutable [`RecordStore`] snapshot
//! - [`view`] - [`ViewConfiguration`] snapshots and their setters
//! - [`engine`] - Filter-Sort Engine for the results table
//! - [`history`] - History Aggregator for trend charts
//! - [`palette`] - Deterministic per-model color and marker assignment
//! - [`notice`] - User-facing diagnostics
//! - [`display`] - Number and timestamp formatting
//! - [`controller`] - Recompute-on-change controller and the [`Presenter`] seam

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod controller;
pub mod display;
pub mod engine;
pub mod error;
pub mod history;
pub mod metric;
pub mod notice;
pub mod palette;
pub mod record;
pub mod store;
pub mod view;

pub use controller::{Clock, DashboardController, FixedClock, Presenter, SystemClock};
pub use display::{DisplayOptions, DisplayTimezone, TimeDisplayMode};
pub use engine::{compute_table_view, compute_visible_rows, TableView};
pub use error::{Error, Result};
pub use history::{compute_history_view, compute_series, HistoryView, MetricSeries, Series, SeriesPoint};
pub use metric::{Metric, MetricValues};
pub use notice::{Notice, NoticeKind};
pub use palette::{HslColor, PointStyle, SeriesStyle};
pub use record::{HistoryEntry, ResultRecord, RunMetadata};
pub use store::RecordStore;
pub use view::{MetricSelection, ModelFilter, SortDirection, SortKey, ViewConfiguration, ViewMode};
