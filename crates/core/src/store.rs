// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! The Record Store: one immutable snapshot of a reporting period.

use std::collections::{BTreeSet, HashSet};
use tracing::warn;

use crate::record::{HistoryEntry, ResultRecord, RunMetadata};

/// Immutable snapshot of fetched results, history and run metadata.
///
/// A store is never patched. When new documents arrive a new store is
/// built and swapped in as a whole, so every recompute observes one
/// self-consistent snapshot.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    results: Vec<ResultRecord>,
    history: Vec<HistoryEntry>,
    meta: RunMetadata,
}

impl RecordStore {
    /// Build a snapshot.
    pub fn new(results: Vec<ResultRecord>, history: Vec<HistoryEntry>, meta: RunMetadata) -> Self {
        let mut seen = HashSet::new();
        for record in &results {
            if !seen.insert(record.key.as_str()) {
                warn!(key = %record.key, "Duplicate result key in snapshot");
            }
        }

        Self {
            results,
            history,
            meta,
        }
    }

    /// Current results in document order.
    pub fn results(&self) -> &[ResultRecord] {
        &self.results
    }

    /// Historical entries in document order (not necessarily time-sorted).
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Run metadata.
    pub fn meta(&self) -> &RunMetadata {
        &self.meta
    }

    /// Whether the snapshot has no current results.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Distinct result keys, sorted; the contents of the model selector.
    pub fn model_keys(&self) -> Vec<String> {
        self.results
            .iter()
            .map(|r| r.key.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Distinct providers sorted case-insensitively; the contents of the provider filter.
    pub fn providers(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut providers: Vec<String> = self
            .results
            .iter()
            .filter(|r| !r.provider.is_empty())
            .filter(|r| seen.insert(r.provider.to_lowercase()))
            .map(|r| r.provider.clone())
            .collect();
        providers.sort_by_key(|p| p.to_lowercase());
        providers
    }
}
