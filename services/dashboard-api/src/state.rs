// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared service state.

use apispeed_core::{DisplayOptions, RecordStore, ViewConfiguration};
use apispeed_store::{load_store, DataSource, StoreError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// State shared by every handler.
///
/// The snapshot is swapped as a whole on reload. Handlers clone the `Arc`
/// once and compute against that, so a reload never mixes documents from
/// two fetches within one response.
pub struct AppState {
    source: Arc<dyn DataSource>,
    store: RwLock<Arc<RecordStore>>,
    /// Formatting for display strings in responses.
    pub display: DisplayOptions,
    /// Starting point for every request's view.
    pub default_view: ViewConfiguration,
}

impl AppState {
    /// State around an already loaded snapshot.
    pub fn new(
        source: Arc<dyn DataSource>,
        store: RecordStore,
        display: DisplayOptions,
        default_view: ViewConfiguration,
    ) -> Self {
        Self {
            source,
            store: RwLock::new(Arc::new(store)),
            display,
            default_view,
        }
    }

    /// The current snapshot.
    pub async fn snapshot(&self) -> Arc<RecordStore> {
        self.store.read().await.clone()
    }

    /// Refetch and swap. On failure the old snapshot stays.
    pub async fn reload(&self) -> Result<Arc<RecordStore>, StoreError> {
        let fresh = Arc::new(load_store(self.source.as_ref()).await?);
        *self.store.write().await = fresh.clone();
        info!(
            source = %self.source.describe(),
            results = fresh.results().len(),
            history = fresh.history().len(),
            "Snapshot reloaded"
        );
        Ok(fresh)
    }
}
