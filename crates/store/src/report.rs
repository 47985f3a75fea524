// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Markdown rendering of computed views.
//!
//! These functions only format what the pipeline already computed; they
//! never filter or reorder.

use apispeed_core::display::format_number;
use apispeed_core::notice::NO_HISTORY_MESSAGE;
use apispeed_core::{DisplayOptions, Metric, MetricSeries, ResultRecord};
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Render the results table.
pub fn render_table(rows: &[ResultRecord], display: &DisplayOptions, now: DateTime<Utc>) -> String {
    let mut output = String::new();

    write!(output, "| Key | Provider | Model |").unwrap();
    for metric in Metric::ALL {
        write!(output, " {} |", metric.label()).unwrap();
    }
    writeln!(output).unwrap();
    write!(output, "|-----|----------|-------|").unwrap();
    for _ in Metric::ALL {
        write!(output, "---:|").unwrap();
    }
    writeln!(output).unwrap();

    for row in rows {
        let key = match row.updated_at.as_deref() {
            Some(raw) => format!("{} (updated {})", row.key, display.time(Some(raw), now)),
            None => row.key.clone(),
        };
        write!(output, "| {} | {} | {} |", key, row.provider, row.model).unwrap();
        for metric in Metric::ALL {
            write!(output, " {} |", format_number(row.metric(metric), display.number_precision)).unwrap();
        }
        writeln!(output).unwrap();
    }

    output
}

/// Render one section per charted metric.
pub fn render_history_summary(metrics: &[MetricSeries], display: &DisplayOptions) -> String {
    let mut output = String::new();

    for chart in metrics {
        writeln!(output, "## {}", chart.metric.label()).unwrap();
        writeln!(output).unwrap();

        if chart.is_empty() {
            writeln!(output, "_{}_", NO_HISTORY_MESSAGE).unwrap();
            writeln!(output).unwrap();
            continue;
        }

        for series in &chart.series {
            writeln!(
                output,
                "- **{}** ({}) {} {}: {} points, latest {}",
                series.model_key,
                series.provider,
                series.style.border_color(),
                series.style.point_style,
                series.points.len(),
                display.number(series.latest_value()),
            )
            .unwrap();
        }
        writeln!(output).unwrap();
    }

    output
}
