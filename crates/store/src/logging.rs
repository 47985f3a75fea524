// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Subscriber setup shared by the binaries.

use tracing_subscriber::EnvFilter;

use crate::error::{Result, StoreError};
use crate::settings::LoggingSettings;

/// Install the global subscriber. `RUST_LOG` wins over `settings.level`.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init(settings: &LoggingSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| StoreError::config(format!("invalid log level '{}': {}", settings.level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| StoreError::config(format!("failed to install logger: {}", e)))
}
