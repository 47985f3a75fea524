// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Layered settings shared by the CLI and the HTTP service.
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. `apispeed.toml` in the working directory, or an explicit file
//! 3. `APISPEED_*` environment variables, `__` separating sections
//!    (e.g. `APISPEED_DISPLAY__NUMBER_PRECISION=2`)
//!
//! A `.env` file is loaded into the environment first.

use apispeed_core::{DisplayOptions, MetricSelection, ViewConfiguration, ViewMode};
use apispeed_core::display::MAX_NUMBER_PRECISION;
use apispeed_core::view::DEFAULT_TIME_WINDOW_DAYS;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::source::{source_from_location, DataSource};

const ENV_PREFIX: &str = "APISPEED";
const DEFAULT_CONFIG_NAME: &str = "apispeed";

/// Where documents are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Directory path or `http(s)://` base URL.
    pub location: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            location: "docs/data".to_string(),
        }
    }
}

/// Initial view state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// History window in days.
    pub time_window_days: u32,
    /// Metric field name, or `all`.
    pub metric: String,
    /// Starting view.
    pub mode: ViewMode,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            time_window_days: DEFAULT_TIME_WINDOW_DAYS,
            metric: "all".to_string(),
            mode: ViewMode::History,
        }
    }
}

/// Logging options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive.
    pub level: String,
    /// Emit JSON lines instead of text.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// HTTP service options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Listen address.
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// All settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Document source.
    pub source: SourceSettings,
    /// Number and time formatting.
    pub display: DisplayOptions,
    /// Initial view.
    pub view: ViewSettings,
    /// Logging.
    pub logging: LoggingSettings,
    /// HTTP service.
    pub server: ServerSettings,
}

impl Settings {
    /// Load `.env`, then layer defaults, the config file and the environment.
    ///
    /// With `path` the file must exist; without it `apispeed.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!(path = %env_file.display(), "Loaded .env");
        }
        Self::build(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn build(path: Option<&Path>, env: Environment) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let mut settings: Settings = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(file)
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;

        if settings.display.number_precision > MAX_NUMBER_PRECISION {
            warn!(
                requested = settings.display.number_precision,
                max = MAX_NUMBER_PRECISION,
                "display.number_precision clamped"
            );
            settings.display.number_precision = MAX_NUMBER_PRECISION;
        }

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.source.location.trim().is_empty() {
            return Err(StoreError::config("source.location must not be empty"));
        }
        self.initial_view().map(|_| ())
    }

    /// The configured starting view.
    pub fn initial_view(&self) -> Result<ViewConfiguration> {
        let metric: MetricSelection = self.view.metric.parse()?;
        let config = ViewConfiguration::default()
            .with_time_window_days(self.view.time_window_days)?
            .with_selected_metric(metric)
            .with_view_mode(self.view.mode);
        Ok(config)
    }

    /// Source for [`SourceSettings::location`].
    pub fn data_source(&self) -> Box<dyn DataSource> {
        source_from_location(&self.source.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apispeed_core::{DisplayTimezone, Metric, TimeDisplayMode};
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::build(None, env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.source.location, "docs/data");
        assert_eq!(settings.server.bind, "127.0.0.1:8080");
        assert_eq!(settings.display.number_precision, 3);

        let view = settings.initial_view().unwrap();
        assert_eq!(view.time_window_days(), 30);
        assert_eq!(view.view_mode(), ViewMode::History);
        assert_eq!(view.selected_metric(), MetricSelection::All);
    }

    #[test]
    fn test_file_then_env_layering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        std::fs::write(
            &path,
            r#"
[source]
location = "https://example.org/data"

[display]
time_mode = "absolute"
timezone = "UTC"

[view]
time_window_days = 7
metric = "streaming_ttfb_avg_s"
"#,
        )
        .unwrap();

        let settings = Settings::build(
            Some(&path),
            env(&[("APISPEED_VIEW__TIME_WINDOW_DAYS", "14"), ("APISPEED_LOGGING__JSON", "true")]),
        )
        .unwrap();

        assert_eq!(settings.source.location, "https://example.org/data");
        assert_eq!(settings.display.time_mode, TimeDisplayMode::Absolute);
        assert_eq!(settings.display.timezone, DisplayTimezone::Utc);
        assert_eq!(settings.view.time_window_days, 14);
        assert!(settings.logging.json);

        let view = settings.initial_view().unwrap();
        assert_eq!(view.selected_metric(), MetricSelection::Single(Metric::StreamingTtfbAvg));
    }

    #[test]
    fn test_invalid_view_is_rejected() {
        assert!(Settings::build(None, env(&[("APISPEED_VIEW__TIME_WINDOW_DAYS", "0")])).is_err());
        assert!(Settings::build(None, env(&[("APISPEED_VIEW__METRIC", "latency")])).is_err());
    }

    #[test]
    fn test_oversized_precision_is_clamped() {
        let settings = Settings::build(None, env(&[("APISPEED_DISPLAY__NUMBER_PRECISION", "100000")])).unwrap();
        assert_eq!(settings.display.number_precision, MAX_NUMBER_PRECISION);

        let settings = Settings::build(None, env(&[("APISPEED_DISPLAY__NUMBER_PRECISION", "5")])).unwrap();
        assert_eq!(settings.display.number_precision, 5);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(Settings::build(Some(&missing), env(&[])), Err(StoreError::Config(_))));
    }
}
