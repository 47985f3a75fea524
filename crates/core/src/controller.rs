// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! View Configuration Controller.
//!
//! The controller is the only place a [`ViewConfiguration`] changes. Each
//! setter builds the next snapshot, synchronously recomputes the affected
//! view and hands the result to the [`Presenter`]. There is no batching or
//! scheduling: a setter returns only after the presenter has been called.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::engine::compute_table_view;
use crate::error::Result;
use crate::history::{compute_history_view, MetricSeries};
use crate::notice::Notice;
use crate::record::ResultRecord;
use crate::store::RecordStore;
use crate::view::{MetricSelection, ModelFilter, SortDirection, SortKey, ViewConfiguration, ViewMode};

/// The Presentation Adapter seam: whatever draws tables and charts.
#[cfg_attr(test, mockall::automock)]
pub trait Presenter {
    /// Draw the results table.
    fn render_rows(&mut self, rows: &[ResultRecord]);

    /// Draw one chart per entry.
    fn render_series(&mut self, series: &[MetricSeries]);

    /// Show the diagnostic banner.
    fn show_notice(&mut self, notice: &Notice);

    /// Hide the diagnostic banner.
    fn clear_notice(&mut self);
}

/// Source of the "now" instant used for history windows.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Owns the snapshot, the current configuration and the presenter.
pub struct DashboardController<P, C = SystemClock> {
    store: Arc<RecordStore>,
    config: ViewConfiguration,
    presenter: P,
    clock: C,
}

impl<P: Presenter> DashboardController<P, SystemClock> {
    /// Controller with the default configuration and wall-clock time.
    pub fn new(store: Arc<RecordStore>, presenter: P) -> Self {
        Self::with_parts(store, ViewConfiguration::default(), presenter, SystemClock)
    }
}

impl<P: Presenter, C: Clock> DashboardController<P, C> {
    /// Controller with an explicit starting configuration and clock.
    pub fn with_parts(store: Arc<RecordStore>, config: ViewConfiguration, presenter: P, clock: C) -> Self {
        Self {
            store,
            config,
            presenter,
            clock,
        }
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> &ViewConfiguration {
        &self.config
    }

    /// Current record snapshot.
    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// The presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Mutable access to the presenter, for out-of-band notices.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Consume the controller, returning the presenter.
    pub fn into_presenter(self) -> P {
        self.presenter
    }

    /// First render of the active view.
    ///
    /// Exactly one notice is published: the view's own diagnostic when it has
    /// one, otherwise the run's error banner. The banner stays up until a
    /// later recompute replaces or clears it.
    pub fn start(&mut self) {
        let notice = self.render_active().or_else(|| Notice::from_meta(self.store.meta()));
        if let Some(notice) = notice {
            self.presenter.show_notice(&notice);
        }
    }

    /// Re-render the active view.
    pub fn refresh(&mut self) {
        let notice = self.render_active();
        self.publish(notice.as_ref());
    }

    /// Change the search text.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.config = self.config.clone().with_search_query(query);
        self.recompute_table();
    }

    /// Change the provider filter (empty for none).
    pub fn set_provider_filter(&mut self, provider: impl Into<String>) {
        self.config = self.config.clone().with_provider_filter(provider);
        self.recompute_table();
    }

    /// Header click on `key`.
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.config = self.config.clone().toggle_sort(key);
        self.recompute_table();
    }

    /// Sort explicitly.
    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) {
        self.config = self.config.clone().with_sort(key, direction);
        self.recompute_table();
    }

    /// Reset search text and provider filter.
    pub fn clear_filters(&mut self) {
        self.config = self.config.clone().clear_filters();
        self.recompute_table();
    }

    /// Change the history window. On error nothing changes and nothing is rendered.
    pub fn set_time_window_days(&mut self, days: u32) -> Result<()> {
        self.config = self.config.clone().with_time_window_days(days)?;
        self.recompute_history();
        Ok(())
    }

    /// Change the history model filter.
    pub fn set_model_filter(&mut self, filter: ModelFilter) {
        self.config = self.config.clone().with_model_filter(filter);
        self.recompute_history();
    }

    /// Change the charted metrics.
    pub fn set_selected_metric(&mut self, selection: MetricSelection) {
        self.config = self.config.clone().with_selected_metric(selection);
        self.recompute_history();
    }

    /// Switch between table and history.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.config = self.config.clone().with_view_mode(mode);
        self.refresh();
    }

    /// Swap in a freshly fetched snapshot and re-render.
    pub fn replace_store(&mut self, store: Arc<RecordStore>) {
        self.store = store;
        self.refresh();
    }

    fn recompute_table(&mut self) {
        let notice = self.render_table();
        self.publish(notice.as_ref());
    }

    fn recompute_history(&mut self) {
        let notice = self.render_history();
        self.publish(notice.as_ref());
    }

    fn render_active(&mut self) -> Option<Notice> {
        match self.config.view_mode() {
            ViewMode::Table => self.render_table(),
            ViewMode::History => self.render_history(),
        }
    }

    fn render_table(&mut self) -> Option<Notice> {
        let view = compute_table_view(&self.store, &self.config);
        debug!(visible = view.rows.len(), total = view.total, "Table recomputed");
        self.presenter.render_rows(&view.rows);
        view.notice
    }

    fn render_history(&mut self) -> Option<Notice> {
        let view = compute_history_view(&self.store, &self.config, self.clock.now());
        debug!(
            charts = view.metrics.len(),
            series = view.metrics.iter().map(|m| m.series.len()).sum::<usize>(),
            "History recomputed"
        );
        self.presenter.render_series(&view.metrics);
        view.notice
    }

    fn publish(&mut self, notice: Option<&Notice>) {
        match notice {
            Some(notice) => self.presenter.show_notice(notice),
            None => self.presenter.clear_notice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Metric;
    use crate::notice::NoticeKind;
    use crate::record::{HistoryEntry, RunMetadata};
    use chrono::{Duration, TimeZone};
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 30, 12, 0, 0).unwrap()
    }

    fn store(meta: RunMetadata) -> Arc<RecordStore> {
        let results = vec![
            ResultRecord::new("gpt4o", "openai", "gpt-4o").with_metric(Metric::NonstreamingAvg, 1.8),
            ResultRecord::new("sonnet", "anthropic", "claude-3-5-sonnet"),
            ResultRecord::new("flash", "gemini", "gemini-2.0-flash").with_metric(Metric::NonstreamingAvg, 0.9),
        ];
        let history = vec![
            HistoryEntry::new((now() - Duration::days(2)).to_rfc3339(), "gpt4o", "openai")
                .with_metric(Metric::NonstreamingAvg, 1.7),
            HistoryEntry::new((now() - Duration::days(20)).to_rfc3339(), "flash", "gemini")
                .with_metric(Metric::NonstreamingAvg, 1.0),
        ];
        Arc::new(RecordStore::new(results, history, meta))
    }

    fn controller(presenter: MockPresenter) -> DashboardController<MockPresenter, FixedClock> {
        DashboardController::with_parts(
            store(RunMetadata::default()),
            ViewConfiguration::default().with_view_mode(ViewMode::Table),
            presenter,
            FixedClock(now()),
        )
    }

    #[test]
    fn test_search_recomputes_table_synchronously() {
        let mut presenter = MockPresenter::new();
        presenter
            .expect_render_rows()
            .withf(|rows: &[ResultRecord]| rows.len() == 1 && rows[0].key == "gpt4o")
            .times(1)
            .return_const(());
        presenter.expect_clear_notice().times(1).return_const(());

        let mut controller = controller(presenter);
        controller.set_search_query("gpt");
        assert_eq!(controller.config().search_query(), "gpt");
    }

    #[test]
    fn test_filtered_to_zero_shows_info_notice() {
        let mut presenter = MockPresenter::new();
        presenter
            .expect_render_rows()
            .withf(|rows: &[ResultRecord]| rows.is_empty())
            .times(1)
            .return_const(());
        presenter
            .expect_show_notice()
            .withf(|n: &Notice| n.kind == NoticeKind::Info)
            .times(1)
            .return_const(());

        let mut controller = controller(presenter);
        controller.set_provider_filter("mistral");
    }

    #[test]
    fn test_toggle_sort_twice_descends() {
        let mut seq = Sequence::new();
        let mut presenter = MockPresenter::new();
        presenter
            .expect_render_rows()
            .withf(|rows: &[ResultRecord]| rows[0].key == "flash")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        presenter
            .expect_clear_notice()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        presenter
            .expect_render_rows()
            .withf(|rows: &[ResultRecord]| {
                let keys: Vec<_> = rows.iter().map(|r| r.key.as_str()).collect();
                keys == ["gpt4o", "flash", "sonnet"]
            })
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        presenter
            .expect_clear_notice()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mut controller = controller(presenter);
        let key = SortKey::Metric(Metric::NonstreamingAvg);
        controller.toggle_sort(key);
        controller.toggle_sort(key);
        assert_eq!(controller.config().sort_direction(), SortDirection::Descending);
    }

    #[test]
    fn test_time_window_recomputes_history() {
        let mut presenter = MockPresenter::new();
        presenter
            .expect_render_series()
            .withf(|charts: &[MetricSeries]| {
                charts.len() == 5 && charts.iter().all(|c| c.series.len() == 1 && c.series[0].model_key == "gpt4o")
            })
            .times(1)
            .return_const(());
        presenter.expect_clear_notice().times(1).return_const(());

        let mut controller = controller(presenter);
        controller.set_time_window_days(7).unwrap();
    }

    #[test]
    fn test_invalid_window_leaves_state_untouched() {
        let presenter = MockPresenter::new();
        let mut controller = controller(presenter);
        let before = controller.config().clone();
        assert!(controller.set_time_window_days(0).is_err());
        assert_eq!(controller.config(), &before);
    }

    #[test]
    fn test_unknown_model_shows_no_history_notice() {
        let mut presenter = MockPresenter::new();
        presenter
            .expect_render_series()
            .withf(|charts: &[MetricSeries]| charts.len() == 1 && charts[0].series.len() == 2)
            .times(1)
            .return_const(());
        presenter.expect_clear_notice().times(1).return_const(());
        presenter
            .expect_render_series()
            .withf(|charts: &[MetricSeries]| charts.len() == 1 && charts[0].is_empty())
            .times(1)
            .return_const(());
        presenter
            .expect_show_notice()
            .with(eq(Notice::no_history()))
            .times(1)
            .return_const(());

        let mut controller = controller(presenter);
        controller.set_selected_metric(MetricSelection::Single(Metric::StreamingTtfbAvg));
        controller.set_model_filter(ModelFilter::Model("llama3".to_string()));
    }

    #[test]
    fn test_start_shows_meta_banner_and_keeps_it() {
        let mut presenter = MockPresenter::new();
        presenter
            .expect_show_notice()
            .withf(|n: &Notice| n.is_error() && n.message == "Benchmark failures encountered.")
            .times(1)
            .return_const(());
        presenter.expect_render_series().times(1).return_const(());
        presenter.expect_clear_notice().never();

        let meta = RunMetadata {
            error_message: Some("Benchmark failures encountered.".to_string()),
            ..RunMetadata::default()
        };
        let mut controller =
            DashboardController::with_parts(store(meta), ViewConfiguration::default(), presenter, FixedClock(now()));
        controller.start();
    }

    #[test]
    fn test_start_with_empty_snapshot_shows_single_notice() {
        let mut presenter = MockPresenter::new();
        presenter
            .expect_render_rows()
            .withf(|rows: &[ResultRecord]| rows.is_empty())
            .times(1)
            .return_const(());
        presenter
            .expect_show_notice()
            .with(eq(Notice::no_results()))
            .times(1)
            .return_const(());
        presenter.expect_clear_notice().never();

        let meta = RunMetadata {
            error_message: Some("Benchmark failures encountered.".to_string()),
            ..RunMetadata::default()
        };
        let empty = Arc::new(RecordStore::new(Vec::new(), Vec::new(), meta));
        let mut controller = DashboardController::with_parts(
            empty,
            ViewConfiguration::default().with_view_mode(ViewMode::Table),
            presenter,
            FixedClock(now()),
        );
        controller.start();
    }

    #[test]
    fn test_replace_store_with_empty_snapshot_reports_error() {
        let mut presenter = MockPresenter::new();
        presenter
            .expect_render_rows()
            .withf(|rows: &[ResultRecord]| rows.is_empty())
            .times(1)
            .return_const(());
        presenter
            .expect_show_notice()
            .with(eq(Notice::no_results()))
            .times(1)
            .return_const(());

        let mut controller = controller(presenter);
        controller.replace_store(Arc::new(RecordStore::default()));
        assert!(controller.store().is_empty());
    }

    #[test]
    fn test_view_mode_switch_renders_new_view() {
        let mut presenter = MockPresenter::new();
        presenter.expect_render_series().times(1).return_const(());
        presenter.expect_clear_notice().times(1).return_const(());
        presenter.expect_render_rows().never();

        let mut controller = controller(presenter);
        controller.set_view_mode(ViewMode::History);
        assert_eq!(controller.config().view_mode(), ViewMode::History);
    }
}
