// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! In-process result store.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::db::{collections, ResultStore};
use crate::error::Result;
use crate::models::effort::{BestEffort, EffortDistance};
use crate::models::metrics::DerivedActivityMetrics;

/// `DashMap`-backed store; clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    metrics: Arc<DashMap<u64, DerivedActivityMetrics>>,
    efforts: Arc<DashMap<(u64, EffortDistance), BestEffort>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self, activity_id: u64) -> Option<DerivedActivityMetrics> {
        self.metrics.get(&activity_id).map(|m| m.value().clone())
    }

    /// All metrics rows, ordered by activity ID.
    pub fn all_metrics(&self) -> Vec<DerivedActivityMetrics> {
        let mut rows: Vec<_> = self.metrics.iter().map(|m| m.value().clone()).collect();
        rows.sort_by_key(|m| m.activity_id);
        rows
    }

    /// Best efforts of one activity, shortest distance first.
    pub fn best_efforts_for(&self, activity_id: u64) -> Vec<BestEffort> {
        let mut rows: Vec<_> = self
            .efforts
            .iter()
            .filter(|e| e.key().0 == activity_id)
            .map(|e| e.value().clone())
            .collect();
        rows.sort_by_key(BestEffort::key);
        rows
    }

    /// All best efforts, ordered by `(activity_id, effort)`.
    pub fn all_best_efforts(&self) -> Vec<BestEffort> {
        let mut rows: Vec<_> = self.efforts.iter().map(|e| e.value().clone()).collect();
        rows.sort_by_key(BestEffort::key);
        rows
    }

    pub fn best_effort_count(&self) -> usize {
        self.efforts.len()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn upsert_metrics(&self, metrics: &DerivedActivityMetrics) -> Result<()> {
        self.metrics.insert(metrics.activity_id, metrics.clone());
        tracing::debug!(
            collection = collections::ACTIVITY_METRICS,
            activity_id = metrics.activity_id,
            "Upserted metrics"
        );
        Ok(())
    }

    async fn upsert_best_efforts(&self, efforts: &[BestEffort]) -> Result<usize> {
        for effort in efforts {
            self.efforts.insert(effort.key(), effort.clone());
        }
        tracing::debug!(
            collection = collections::BEST_EFFORTS,
            count = efforts.len(),
            "Upserted best efforts"
        );
        Ok(efforts.len())
    }

    async fn delete_best_efforts(&self, activity_id: u64) -> Result<usize> {
        let before = self.efforts.len();
        self.efforts.retain(|(id, _), _| *id != activity_id);
        let count = before.saturating_sub(self.efforts.len());
        tracing::debug!(
            collection = collections::BEST_EFFORTS,
            activity_id,
            count,
            "Deleted best efforts"
        );
        Ok(count)
    }
}
