// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! User-facing diagnostics.
//!
//! A recompute produces at most one [`Notice`]. It is data handed to the
//! presentation layer, never an error the pipeline raises.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::RunMetadata;

/// Message shown when the snapshot has no results at all.
pub const NO_RESULTS_MESSAGE: &str = "No benchmark results available. Check API keys or view later.";

/// Message shown when filters hide every row.
pub const NO_MATCHING_ROWS_MESSAGE: &str = "No rows match current filters.";

/// Message shown when no history survives the window and model filter.
pub const NO_HISTORY_MESSAGE: &str = "No historical data available for the selected criteria.";

/// Message shown when the results document could not be fetched.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load benchmark data. Please try again later.";

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// Expected empty state, e.g. filters matched nothing.
    Info,
    /// Something is wrong with the data itself.
    Error,
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity.
    pub kind: NoticeKind,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    /// Informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    /// Error-class notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    /// The snapshot contains no results.
    pub fn no_results() -> Self {
        Self::error(NO_RESULTS_MESSAGE)
    }

    /// Filters hid every row.
    pub fn no_matching_rows() -> Self {
        Self::info(NO_MATCHING_ROWS_MESSAGE)
    }

    /// Nothing to chart.
    pub fn no_history() -> Self {
        Self::info(NO_HISTORY_MESSAGE)
    }

    /// The snapshot could not be loaded.
    pub fn load_failed() -> Self {
        Self::error(LOAD_FAILED_MESSAGE)
    }

    /// The run's own error banner, if it reported one.
    pub fn from_meta(meta: &RunMetadata) -> Option<Self> {
        meta.error_message().map(Self::error)
    }

    /// Whether this is an error-class notice.
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_states_have_distinct_kinds() {
        assert_eq!(Notice::no_results().kind, NoticeKind::Error);
        assert_eq!(Notice::no_matching_rows().kind, NoticeKind::Info);
        assert_ne!(Notice::no_results().message, Notice::no_matching_rows().message);
    }

    #[test]
    fn test_meta_banner() {
        let mut meta = RunMetadata::default();
        assert!(Notice::from_meta(&meta).is_none());

        meta.error_message = Some("Benchmark failures encountered.".to_string());
        let notice = Notice::from_meta(&meta).unwrap();
        assert!(notice.is_error());
        assert_eq!(notice.to_string(), "Benchmark failures encountered.");
    }

    #[test]
    fn test_serialized_kind_is_lowercase() {
        let json = serde_json::to_value(Notice::no_history()).unwrap();
        assert_eq!(json["kind"], "info");
    }
}
