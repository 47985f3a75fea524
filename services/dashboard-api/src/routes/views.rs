// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Computed table and history views.
//!
//! Every query parameter is optional and layered over the configured
//! default view. Values that do not parse are rejected with `INVALID_QUERY`
//! rather than silently ignored.

use apispeed_core::{
    compute_history_view, compute_table_view, Metric, MetricSelection, ModelFilter, Notice,
    PointStyle, ResultRecord, RunMetadata, Series, SeriesPoint, SortDirection, SortKey,
    ViewConfiguration,
};
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/rows", get(rows))
        .route("/api/v1/series", get(series))
        .route("/api/v1/meta", get(meta))
        .route("/api/v1/models", get(models))
        .route("/api/v1/reload", post(reload))
}

#[derive(Debug, Default, Deserialize)]
pub struct RowsQuery {
    pub search: Option<String>,
    pub provider: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

impl RowsQuery {
    fn apply(&self, mut config: ViewConfiguration) -> Result<ViewConfiguration, ApiError> {
        if let Some(search) = &self.search {
            config = config.with_search_query(search.as_str());
        }
        if let Some(provider) = &self.provider {
            config = config.with_provider_filter(provider.as_str());
        }
        let direction = match self.dir.as_deref() {
            Some(dir) => dir.parse::<SortDirection>()?,
            None => SortDirection::Ascending,
        };
        match self.sort.as_deref().map(str::trim) {
            Some("") | None => {}
            Some(sort) => config = config.with_sort(sort.parse::<SortKey>()?, direction),
        }
        Ok(config)
    }
}

#[derive(Debug, Serialize)]
pub struct RowsResponse {
    pub rows: Vec<ResultRecord>,
    pub total: usize,
    pub visible: usize,
    pub notice: Option<Notice>,
}

async fn rows(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RowsQuery>,
) -> Result<Json<RowsResponse>, ApiError> {
    let config = query.apply(state.default_view.clone())?;
    let store = state.snapshot().await;
    let view = compute_table_view(&store, &config);
    debug!(visible = view.rows.len(), total = view.total, "Served rows");

    Ok(Json(RowsResponse {
        visible: view.rows.len(),
        total: view.total,
        rows: view.rows,
        notice: view.notice,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    pub model: Option<String>,
    pub window: Option<String>,
    pub metric: Option<String>,
}

impl SeriesQuery {
    fn apply(&self, mut config: ViewConfiguration) -> Result<ViewConfiguration, ApiError> {
        if let Some(model) = &self.model {
            config = config.with_model_filter(model.parse::<ModelFilter>()?);
        }
        if let Some(window) = &self.window {
            let days: u32 = window
                .trim()
                .parse()
                .map_err(|_| ApiError::invalid_query(format!("window must be a whole number of days, got '{window}'")))?;
            config = config.with_time_window_days(days)?;
        }
        if let Some(metric) = &self.metric {
            config = config.with_selected_metric(metric.parse::<MetricSelection>()?);
        }
        Ok(config)
    }
}

#[derive(Debug, Serialize)]
pub struct SeriesBody {
    pub model_key: String,
    pub provider: String,
    pub border_color: String,
    pub background_color: String,
    pub point_style: PointStyle,
    pub points: Vec<SeriesPoint>,
}

impl From<Series> for SeriesBody {
    fn from(series: Series) -> Self {
        Self {
            border_color: series.style.border_color(),
            background_color: series.style.background_color(),
            point_style: series.style.point_style,
            model_key: series.model_key,
            provider: series.provider,
            points: series.points,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricBody {
    pub metric: Metric,
    pub label: &'static str,
    pub series: Vec<SeriesBody>,
}

#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    pub metrics: Vec<MetricBody>,
    pub notice: Option<Notice>,
}

async fn series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeriesQuery>,
) -> Result<Json<SeriesResponse>, ApiError> {
    let config = query.apply(state.default_view.clone())?;
    let store = state.snapshot().await;
    let view = compute_history_view(&store, &config, Utc::now());

    let metrics = view
        .metrics
        .into_iter()
        .map(|chart| MetricBody {
            metric: chart.metric,
            label: chart.metric.label(),
            series: chart.series.into_iter().map(SeriesBody::from).collect(),
        })
        .collect();

    Ok(Json(SeriesResponse {
        metrics,
        notice: view.notice,
    }))
}

#[derive(Debug, Serialize)]
pub struct MetaResponse {
    pub meta: RunMetadata,
    pub generated_at_display: String,
    pub notice: Option<Notice>,
}

async fn meta(State(state): State<Arc<AppState>>) -> Json<MetaResponse> {
    let store = state.snapshot().await;
    let meta = store.meta().clone();
    Json(MetaResponse {
        generated_at_display: state.display.time(meta.generated_at.as_deref(), Utc::now()),
        notice: Notice::from_meta(&meta),
        meta,
    })
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub providers: Vec<String>,
}

async fn models(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    let store = state.snapshot().await;
    Json(ModelsResponse {
        models: store.model_keys(),
        providers: store.providers(),
    })
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub status: &'static str,
    pub results: usize,
    pub history: usize,
}

async fn reload(State(state): State<Arc<AppState>>) -> Result<Json<ReloadResponse>, ApiError> {
    match state.reload().await {
        Ok(store) => Ok(Json(ReloadResponse {
            status: "reloaded",
            results: store.results().len(),
            history: store.history().len(),
        })),
        Err(e) => {
            warn!(error = %e, "Reload failed; keeping previous snapshot");
            Err(ApiError::reload_failed(Notice::load_failed().message))
        }
    }
}
