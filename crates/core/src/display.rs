// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Number and timestamp formatting shared by every presentation layer.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::record::parse_timestamp;

/// Placeholder for a missing metric value.
pub const MISSING_VALUE: &str = "-";

/// Placeholder for a missing timestamp.
pub const MISSING_TIME: &str = "N/A";

/// Largest number of decimals rendered; larger requests are clamped.
pub const MAX_NUMBER_PRECISION: usize = 100;

const ABSOLUTE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How timestamps are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeDisplayMode {
    /// `5m ago`
    #[default]
    Relative,
    /// `2025-09-07 12:00:00`
    Absolute,
}

impl FromStr for TimeDisplayMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "relative" => Ok(Self::Relative),
            "absolute" => Ok(Self::Absolute),
            other => Err(Error::unknown_value("time display mode", other)),
        }
    }
}

/// Timezone used for absolute timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayTimezone {
    /// The machine's local timezone.
    #[default]
    #[serde(rename = "local", alias = "Local", alias = "LOCAL")]
    Local,
    /// UTC.
    #[serde(rename = "UTC", alias = "utc", alias = "Utc")]
    Utc,
}

impl FromStr for DisplayTimezone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "utc" => Ok(Self::Utc),
            other => Err(Error::unknown_value("timezone", other)),
        }
    }
}

/// Display settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Relative or absolute timestamps.
    pub time_mode: TimeDisplayMode,
    /// Timezone for absolute timestamps.
    pub timezone: DisplayTimezone,
    /// Decimal places for metric values.
    pub number_precision: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            time_mode: TimeDisplayMode::Relative,
            timezone: DisplayTimezone::Local,
            number_precision: 3,
        }
    }
}

impl DisplayOptions {
    /// Format a metric value.
    pub fn number(&self, value: Option<f64>) -> String {
        format_number(value, self.number_precision)
    }

    /// Format a raw timestamp relative to `now`.
    pub fn time(&self, raw: Option<&str>, now: DateTime<Utc>) -> String {
        format_time(raw, self, now)
    }
}

/// Fixed-point rendering, `-` when missing.
///
/// `precision` is clamped to [`MAX_NUMBER_PRECISION`].
pub fn format_number(value: Option<f64>, precision: usize) -> String {
    let precision = precision.min(MAX_NUMBER_PRECISION);
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => MISSING_VALUE.to_string(),
    }
}

/// Render a raw timestamp according to `options`.
///
/// Missing or blank input renders as `N/A`; input that does not parse is
/// returned unchanged.
pub fn format_time(raw: Option<&str>, options: &DisplayOptions, now: DateTime<Utc>) -> String {
    let raw = match raw.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return MISSING_TIME.to_string(),
    };
    let Some(instant) = parse_timestamp(raw) else {
        return raw.to_string();
    };

    match options.time_mode {
        TimeDisplayMode::Relative => format_relative(instant, now),
        TimeDisplayMode::Absolute => format_absolute(instant, options.timezone),
    }
}

fn format_relative(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - instant).num_seconds().max(1);
    if secs < 60 {
        return format!("{secs}s ago");
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{mins}m ago");
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

fn format_absolute(instant: DateTime<Utc>, timezone: DisplayTimezone) -> String {
    match timezone {
        DisplayTimezone::Utc => format!("{} UTC", instant.format(ABSOLUTE_FORMAT)),
        DisplayTimezone::Local => instant
            .with_timezone(&Local)
            .format(ABSOLUTE_FORMAT)
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 7, 12, 0, 0).unwrap()
    }

    fn ago(d: Duration) -> String {
        (now() - d).to_rfc3339()
    }

    #[test]
    fn test_format_number_clamps_precision() {
        let rendered = format_number(Some(1.5), usize::MAX);
        assert_eq!(rendered.len(), "1.".len() + MAX_NUMBER_PRECISION);
        assert!(rendered.starts_with("1.5"));
        assert_eq!(format_number(None, usize::MAX), MISSING_VALUE);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(Some(1.23456), 3), "1.235");
        assert_eq!(format_number(Some(2.0), 1), "2.0");
        assert_eq!(format_number(None, 3), "-");
    }

    #[test]
    fn test_relative_time_buckets() {
        let opts = DisplayOptions::default();
        assert_eq!(opts.time(Some(&ago(Duration::zero())), now()), "1s ago");
        assert_eq!(opts.time(Some(&ago(Duration::seconds(42))), now()), "42s ago");
        assert_eq!(opts.time(Some(&ago(Duration::minutes(5))), now()), "5m ago");
        assert_eq!(opts.time(Some(&ago(Duration::hours(3))), now()), "3h ago");
        assert_eq!(opts.time(Some(&ago(Duration::days(9))), now()), "9d ago");
    }

    #[test]
    fn test_future_timestamp_clamps_to_one_second() {
        let opts = DisplayOptions::default();
        let future = (now() + Duration::hours(1)).to_rfc3339();
        assert_eq!(opts.time(Some(&future), now()), "1s ago");
    }

    #[test]
    fn test_absolute_utc() {
        let opts = DisplayOptions {
            time_mode: TimeDisplayMode::Absolute,
            timezone: DisplayTimezone::Utc,
            ..DisplayOptions::default()
        };
        assert_eq!(
            opts.time(Some("2025-09-07T08:30:05+00:00"), now()),
            "2025-09-07 08:30:05 UTC"
        );
    }

    #[test]
    fn test_missing_and_unparseable_times() {
        let opts = DisplayOptions::default();
        assert_eq!(opts.time(None, now()), "N/A");
        assert_eq!(opts.time(Some("  "), now()), "N/A");
        assert_eq!(opts.time(Some("last tuesday"), now()), "last tuesday");
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let opts: DisplayOptions =
            serde_json::from_str(r#"{"timezone": "utc", "time_mode": "absolute"}"#).unwrap();
        assert_eq!(opts.timezone, DisplayTimezone::Utc);
        assert_eq!(opts.time_mode, TimeDisplayMode::Absolute);
        assert_eq!(opts.number_precision, 3);
    }

    #[test]
    fn test_parse_options() {
        assert_eq!("UTC".parse::<DisplayTimezone>().unwrap(), DisplayTimezone::Utc);
        assert_eq!("Relative".parse::<TimeDisplayMode>().unwrap(), TimeDisplayMode::Relative);
        assert!("mars".parse::<DisplayTimezone>().is_err());
    }
}
