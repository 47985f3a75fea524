// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the view pipeline.
//!
//! Nothing in the pipeline itself fails: missing values, malformed
//! timestamps and empty results are all data. These errors only come from
//! building a configuration out of untrusted strings or numbers.

use thiserror::Error;

/// Errors raised while building view configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A value was outside its allowed range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Not one of the five metric names.
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Not a sortable column.
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    /// Not one of the accepted spellings for an enumerated option.
    #[error("Unknown {kind}: {value}")]
    UnknownValue {
        /// What was being parsed (e.g. "sort direction").
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}

impl Error {
    /// Shortcut for [`Error::InvalidInput`].
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    pub(crate) fn unknown_value(kind: &'static str, value: impl Into<String>) -> Self {
        Error::UnknownValue {
            kind,
            value: value.into(),
        }
    }
}

/// Result type for view configuration operations.
pub type Result<T> = std::result::Result<T, Error>;
