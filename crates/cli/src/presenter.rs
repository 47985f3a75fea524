// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! A [`Presenter`] that writes Markdown to a terminal.

use apispeed_core::{DisplayOptions, MetricSeries, Notice, NoticeKind, Presenter, ResultRecord};
use apispeed_store::report::{render_history_summary, render_table};
use chrono::Utc;
use colored::Colorize;
use std::io::{self, Write};
use tracing::warn;

/// Tables and charts go to `out`, notices to `err`.
///
/// A terminal cannot take back what it printed, so clearing a notice only
/// forgets it.
pub struct TerminalPresenter<O = io::Stdout, E = io::Stderr> {
    out: O,
    err: E,
    display: DisplayOptions,
    notice: Option<Notice>,
}

impl TerminalPresenter {
    /// Presenter on stdout and stderr.
    pub fn stdio(display: DisplayOptions) -> Self {
        Self::new(io::stdout(), io::stderr(), display)
    }
}

impl<O: Write, E: Write> TerminalPresenter<O, E> {
    /// Presenter on arbitrary writers.
    pub fn new(out: O, err: E, display: DisplayOptions) -> Self {
        Self {
            out,
            err,
            display,
            notice: None,
        }
    }

    /// The notice currently shown, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// The writers, for inspection.
    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!(error = %e, "Failed to write output");
        }
    }
}

impl<O: Write, E: Write> Presenter for TerminalPresenter<O, E> {
    fn render_rows(&mut self, rows: &[ResultRecord]) {
        let table = render_table(rows, &self.display, Utc::now());
        self.emit(&table);
    }

    fn render_series(&mut self, series: &[MetricSeries]) {
        let summary = render_history_summary(series, &self.display);
        self.emit(&summary);
    }

    fn show_notice(&mut self, notice: &Notice) {
        let label = match notice.kind {
            NoticeKind::Error => "error:".red().bold(),
            NoticeKind::Info => "info:".yellow(),
        };
        if let Err(e) = writeln!(self.err, "{} {}", label, notice.message) {
            warn!(error = %e, "Failed to write notice");
        }
        self.notice = Some(notice.clone());
    }

    fn clear_notice(&mut self) {
        self.notice = None;
    }
}
