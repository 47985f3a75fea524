// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! View Configuration: how the user currently wants the data sliced.
//!
//! A [`ViewConfiguration`] is a value, not shared state. Each user action
//! produces a new snapshot through one of the consuming `with_*` methods;
//! the engine and aggregator only ever borrow a snapshot.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::metric::Metric;

/// Default history window, in days.
pub const DEFAULT_TIME_WINDOW_DAYS: u32 = 30;

/// Sort direction for the results table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Largest first.
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// The other direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Apply the direction to a base ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        })
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(Error::unknown_value("sort direction", other)),
        }
    }
}

/// A sortable column of the results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// The record key.
    Key,
    /// The provider name.
    Provider,
    /// The upstream model name.
    Model,
    /// One of the numeric metrics.
    Metric(Metric),
}

impl SortKey {
    /// Wire name of the column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Provider => "provider",
            Self::Model => "model",
            Self::Metric(m) => m.field_name(),
        }
    }

    /// Whether values in this column compare as numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Metric(_))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "key" => Ok(Self::Key),
            "provider" => Ok(Self::Provider),
            "model" => Ok(Self::Model),
            other => other
                .parse::<Metric>()
                .map(Self::Metric)
                .map_err(|_| Error::UnknownSortKey(other.to_string())),
        }
    }
}

/// Which models the history view shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ModelFilter {
    /// Every model.
    #[default]
    All,
    /// Only the model with this key.
    Model(String),
}

impl ModelFilter {
    /// Whether an entry with `key` passes the filter.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::All => true,
            Self::Model(selected) => selected == key,
        }
    }
}

impl fmt::Display for ModelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Model(key) => f.write_str(key),
        }
    }
}

impl FromStr for ModelFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" => Err(Error::invalid_input("model filter must not be empty")),
            "all" => Ok(Self::All),
            key => Ok(Self::Model(key.to_string())),
        }
    }
}

/// Which metrics the history view charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MetricSelection {
    /// One chart per metric.
    #[default]
    All,
    /// A single chart.
    Single(Metric),
}

impl MetricSelection {
    /// The selected metrics in chart order.
    pub fn metrics(&self) -> Vec<Metric> {
        match self {
            Self::All => Metric::ALL.to_vec(),
            Self::Single(m) => vec![*m],
        }
    }
}

impl fmt::Display for MetricSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Single(m) => f.write_str(m.field_name()),
        }
    }
}

impl FromStr for MetricSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "all" => Ok(Self::All),
            other => other.parse().map(Self::Single),
        }
    }
}

/// Which view is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// The sortable results table.
    Table,
    /// The trend charts.
    #[default]
    History,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::History => "history",
        })
    }
}

impl FromStr for ViewMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "history" => Ok(Self::History),
            other => Err(Error::unknown_value("view mode", other)),
        }
    }
}

/// A snapshot of every user-chosen display parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfiguration {
    search_query: String,
    provider_filter: String,
    sort_key: Option<SortKey>,
    sort_direction: SortDirection,
    time_window_days: u32,
    model_filter: ModelFilter,
    selected_metric: MetricSelection,
    view_mode: ViewMode,
}

impl Default for ViewConfiguration {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            provider_filter: String::new(),
            sort_key: None,
            sort_direction: SortDirection::Ascending,
            time_window_days: DEFAULT_TIME_WINDOW_DAYS,
            model_filter: ModelFilter::All,
            selected_metric: MetricSelection::All,
            view_mode: ViewMode::History,
        }
    }
}

impl ViewConfiguration {
    /// Free-text search over key and model.
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Provider filter; empty means no filter.
    pub fn provider_filter(&self) -> &str {
        &self.provider_filter
    }

    /// Active sort column, if any.
    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort_key
    }

    /// Active sort direction.
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// History window in days (always positive).
    pub fn time_window_days(&self) -> u32 {
        self.time_window_days
    }

    /// History model filter.
    pub fn model_filter(&self) -> &ModelFilter {
        &self.model_filter
    }

    /// History metric selection.
    pub fn selected_metric(&self) -> MetricSelection {
        self.selected_metric
    }

    /// Active view.
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Replace the search text.
    pub fn with_search_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    /// Replace the provider filter.
    pub fn with_provider_filter(mut self, provider: impl Into<String>) -> Self {
        self.provider_filter = provider.into();
        self
    }

    /// Sort by `key` in `direction`.
    pub fn with_sort(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort_key = Some(key);
        self.sort_direction = direction;
        self
    }

    /// Header-click behaviour: the same key flips direction, a new key sorts ascending.
    pub fn toggle_sort(mut self, key: SortKey) -> Self {
        if self.sort_key == Some(key) {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_key = Some(key);
            self.sort_direction = SortDirection::Ascending;
        }
        self
    }

    /// Back to document order.
    pub fn without_sort(mut self) -> Self {
        self.sort_key = None;
        self.sort_direction = SortDirection::Ascending;
        self
    }

    /// Reset search text and provider filter; sorting is kept.
    pub fn clear_filters(mut self) -> Self {
        self.search_query.clear();
        self.provider_filter.clear();
        self
    }

    /// Replace the history window. Zero days is rejected.
    pub fn with_time_window_days(mut self, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(Error::invalid_input("time window must be at least one day"));
        }
        self.time_window_days = days;
        Ok(self)
    }

    /// Replace the history model filter.
    pub fn with_model_filter(mut self, filter: ModelFilter) -> Self {
        self.model_filter = filter;
        self
    }

    /// Replace the history metric selection.
    pub fn with_selected_metric(mut self, selection: MetricSelection) -> Self {
        self.selected_metric = selection;
        self
    }

    /// Switch view.
    pub fn with_view_mode(mut self, mode: ViewMode) -> Self {
        self.view_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewConfiguration::default();
        assert_eq!(config.search_query(), "");
        assert_eq!(config.provider_filter(), "");
        assert_eq!(config.sort_key(), None);
        assert_eq!(config.sort_direction(), SortDirection::Ascending);
        assert_eq!(config.time_window_days(), 30);
        assert_eq!(config.model_filter(), &ModelFilter::All);
        assert_eq!(config.selected_metric(), MetricSelection::All);
        assert_eq!(config.view_mode(), ViewMode::History);
    }

    #[test]
    fn test_toggle_sort_same_key_flips_direction() {
        let key = SortKey::Metric(Metric::StreamingTtfbAvg);
        let config = ViewConfiguration::default().toggle_sort(key);
        assert_eq!(config.sort_direction(), SortDirection::Ascending);

        let config = config.toggle_sort(key);
        assert_eq!(config.sort_key(), Some(key));
        assert_eq!(config.sort_direction(), SortDirection::Descending);

        let config = config.toggle_sort(key);
        assert_eq!(config.sort_direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_toggle_sort_new_key_resets_to_ascending() {
        let config = ViewConfiguration::default()
            .with_sort(SortKey::Provider, SortDirection::Descending)
            .toggle_sort(SortKey::Model);
        assert_eq!(config.sort_key(), Some(SortKey::Model));
        assert_eq!(config.sort_direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_setters_do_not_touch_original() {
        let original = ViewConfiguration::default();
        let changed = original.clone().with_search_query("gpt");
        assert_eq!(original.search_query(), "");
        assert_eq!(changed.search_query(), "gpt");
    }

    #[test]
    fn test_clear_filters_keeps_sort() {
        let config = ViewConfiguration::default()
            .with_search_query("gpt")
            .with_provider_filter("openai")
            .with_sort(SortKey::Key, SortDirection::Descending)
            .clear_filters();
        assert_eq!(config.search_query(), "");
        assert_eq!(config.provider_filter(), "");
        assert_eq!(config.sort_key(), Some(SortKey::Key));
        assert_eq!(config.sort_direction(), SortDirection::Descending);
    }

    #[test]
    fn test_zero_day_window_rejected() {
        let err = ViewConfiguration::default()
            .with_time_window_days(0)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let config = ViewConfiguration::default().with_time_window_days(7).unwrap();
        assert_eq!(config.time_window_days(), 7);
    }

    #[test]
    fn test_parse_sort_keys() {
        assert_eq!("key".parse::<SortKey>().unwrap(), SortKey::Key);
        assert_eq!(
            "stream_tokens_per_second".parse::<SortKey>().unwrap(),
            SortKey::Metric(Metric::StreamTokensPerSecond)
        );
        assert_eq!(
            "latency".parse::<SortKey>().unwrap_err(),
            Error::UnknownSortKey("latency".to_string())
        );
    }

    #[test]
    fn test_parse_selectors() {
        assert_eq!("all".parse::<ModelFilter>().unwrap(), ModelFilter::All);
        assert_eq!(
            "gpt4o".parse::<ModelFilter>().unwrap(),
            ModelFilter::Model("gpt4o".to_string())
        );
        assert!("".parse::<ModelFilter>().is_err());

        assert_eq!("all".parse::<MetricSelection>().unwrap(), MetricSelection::All);
        assert_eq!(
            "streaming_ttfb_avg_s".parse::<MetricSelection>().unwrap(),
            MetricSelection::Single(Metric::StreamingTtfbAvg)
        );
        assert_eq!(MetricSelection::All.metrics().len(), 5);

        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Descending);
        assert_eq!("table".parse::<ViewMode>().unwrap(), ViewMode::Table);
        assert!("grid".parse::<ViewMode>().is_err());
    }
}
