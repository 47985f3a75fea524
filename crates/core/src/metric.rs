// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! The five measured quantities.
//!
//! Every result row and history entry carries the same five optional
//! metrics. A metric that was not measured, was `null`, or arrived as
//! something that does not parse as a finite number is represented as
//! `None`, the one canonical "missing" value the rest of the pipeline
//! reasons about.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// One measured quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Average wall-clock latency of a non-streaming request, in seconds.
    #[serde(rename = "nonstreaming_avg_s")]
    NonstreamingAvg,
    /// Completion tokens per second for non-streaming requests.
    #[serde(rename = "nonstream_tokens_per_second")]
    NonstreamTokensPerSecond,
    /// Average time to first byte of a streaming request, in seconds.
    #[serde(rename = "streaming_ttfb_avg_s")]
    StreamingTtfbAvg,
    /// Average total latency of a streaming request, in seconds.
    #[serde(rename = "streaming_total_avg_s")]
    StreamingTotalAvg,
    /// Completion tokens per second for streaming requests.
    #[serde(rename = "stream_tokens_per_second")]
    StreamTokensPerSecond,
}

impl Metric {
    /// All metrics, in the order the trend charts are laid out.
    pub const ALL: [Metric; 5] = [
        Metric::NonstreamingAvg,
        Metric::StreamingTtfbAvg,
        Metric::StreamingTotalAvg,
        Metric::NonstreamTokensPerSecond,
        Metric::StreamTokensPerSecond,
    ];

    /// The JSON field name, also used in query strings and sort keys.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::NonstreamingAvg => "nonstreaming_avg_s",
            Self::NonstreamTokensPerSecond => "nonstream_tokens_per_second",
            Self::StreamingTtfbAvg => "streaming_ttfb_avg_s",
            Self::StreamingTotalAvg => "streaming_total_avg_s",
            Self::StreamTokensPerSecond => "stream_tokens_per_second",
        }
    }

    /// Chart title for this metric.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NonstreamingAvg => "Non-streaming Average (seconds)",
            Self::NonstreamTokensPerSecond => "Non-streaming Tokens per Second",
            Self::StreamingTtfbAvg => "Time to First Byte (seconds)",
            Self::StreamingTotalAvg => "Streaming Total (seconds)",
            Self::StreamTokensPerSecond => "Streaming Tokens per Second",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Metric::ALL
            .into_iter()
            .find(|m| m.field_name() == trimmed)
            .ok_or_else(|| Error::UnknownMetric(trimmed.to_string()))
    }
}

/// The five optional metric values of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricValues {
    /// See [`Metric::NonstreamingAvg`].
    #[serde(default, deserialize_with = "lenient_number")]
    pub nonstreaming_avg_s: Option<f64>,
    /// See [`Metric::NonstreamTokensPerSecond`].
    #[serde(default, deserialize_with = "lenient_number")]
    pub nonstream_tokens_per_second: Option<f64>,
    /// See [`Metric::StreamingTtfbAvg`].
    #[serde(default, deserialize_with = "lenient_number")]
    pub streaming_ttfb_avg_s: Option<f64>,
    /// See [`Metric::StreamingTotalAvg`].
    #[serde(default, deserialize_with = "lenient_number")]
    pub streaming_total_avg_s: Option<f64>,
    /// See [`Metric::StreamTokensPerSecond`].
    #[serde(default, deserialize_with = "lenient_number")]
    pub stream_tokens_per_second: Option<f64>,
}

impl MetricValues {
    /// Value of one metric, `None` when missing.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::NonstreamingAvg => self.nonstreaming_avg_s,
            Metric::NonstreamTokensPerSecond => self.nonstream_tokens_per_second,
            Metric::StreamingTtfbAvg => self.streaming_ttfb_avg_s,
            Metric::StreamingTotalAvg => self.streaming_total_avg_s,
            Metric::StreamTokensPerSecond => self.stream_tokens_per_second,
        }
    }

    /// Set one metric. Non-finite values are stored as missing.
    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        let value = value.filter(|v| v.is_finite());
        match metric {
            Metric::NonstreamingAvg => self.nonstreaming_avg_s = value,
            Metric::NonstreamTokensPerSecond => self.nonstream_tokens_per_second = value,
            Metric::StreamingTtfbAvg => self.streaming_ttfb_avg_s = value,
            Metric::StreamingTotalAvg => self.streaming_total_avg_s = value,
            Metric::StreamTokensPerSecond => self.stream_tokens_per_second = value,
        }
    }

    /// Builder-style [`MetricValues::set`].
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.set(metric, Some(value));
        self
    }
}

/// Accepts finite JSON numbers and numeric strings; everything else is missing.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(number_from_json))
}

pub(crate) fn number_from_json(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|v| v.is_finite())
}
