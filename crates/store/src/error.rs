// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for loading and configuration.

use thiserror::Error;

/// Errors raised while fetching documents or reading settings.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested document does not exist at the source.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Unexpected status {status} fetching {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Document body is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings could not be loaded or validated.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Shortcut for [`StoreError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        StoreError::Config(msg.into())
    }
}

impl From<config::ConfigError> for StoreError {
    fn from(err: config::ConfigError) -> Self {
        StoreError::Config(err.to_string())
    }
}

impl From<apispeed_core::Error> for StoreError {
    fn from(err: apispeed_core::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
