// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Persistence seam for computed rows.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::effort::BestEffort;
use crate::models::metrics::DerivedActivityMetrics;

/// Collection names as constants.
pub mod collections {
    /// Derived metrics (keyed by activity_id)
    pub const ACTIVITY_METRICS: &str = "activity_metrics";
    /// Best efforts (keyed by activity_id + effort_name)
    pub const BEST_EFFORTS: &str = "best_efforts";
}

/// Accepts computed rows. Every write is an upsert on the natural key, so
/// retried or concurrent processing of one activity never duplicates rows.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Replace the metrics row for `metrics.activity_id`.
    async fn upsert_metrics(&self, metrics: &DerivedActivityMetrics) -> Result<()>;

    /// Insert or replace rows keyed by `(activity_id, effort)`. Returns rows written.
    async fn upsert_best_efforts(&self, efforts: &[BestEffort]) -> Result<usize>;

    /// Remove every best effort of an activity. Returns rows removed.
    async fn delete_best_efforts(&self, activity_id: u64) -> Result<usize>;

    /// Write one activity's efforts, then its metrics row. Returns effort rows written.
    ///
    /// If either write fails the activity's efforts are deleted before the
    /// error is returned, so a failed activity never leaves a new metrics row or
    /// a partial set of efforts behind.
    async fn upsert_activity(
        &self,
        metrics: &DerivedActivityMetrics,
        efforts: &[BestEffort],
    ) -> Result<usize> {
        let written = async {
            let written = if efforts.is_empty() {
                0
            } else {
                self.upsert_best_efforts(efforts).await?
            };
            self.upsert_metrics(metrics).await?;
            Ok::<_, AppError>(written)
        }
        .await;

        if written.is_err() {
            let activity_id = metrics.activity_id;
            if let Err(e) = self.delete_best_efforts(activity_id).await {
                tracing::warn!(activity_id, error = %e, "Failed to roll back best efforts");
            }
        }
        written
    }
}
