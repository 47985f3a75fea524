// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dashboard API server.

use anyhow::{Context, Result};
use apispeed_store::{load_store, logging, Settings};
use dashboard_api::{app, AppState};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load(None).context("failed to load settings")?;
    logging::init(&settings.logging)?;

    let source: Arc<dyn apispeed_store::DataSource> = Arc::from(settings.data_source());
    let store = load_store(source.as_ref())
        .await
        .with_context(|| format!("failed to load data from {}", source.describe()))?;

    let state = Arc::new(AppState::new(
        source,
        store,
        settings.display,
        settings.initial_view()?,
    ));

    let listener = tokio::net::TcpListener::bind(&settings.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", settings.server.bind))?;
    info!(bind = %settings.server.bind, "Dashboard API listening");

    axum::serve(listener, app(state)).await?;
    Ok(())
}
