// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity processing service.
//!
//! Handles the core workflow:
//! 1. Fetch streams from the telemetry source
//! 2. Compute derived metrics against the athlete's thresholds
//! 3. Extract best efforts for eligible rides
//! 4. Upsert both into the result store

use futures_util::{stream, StreamExt};
use serde::Serialize;

use crate::config::{Config, ThresholdBook, ZoneSettings, DEFAULT_MAX_CONCURRENT_ACTIVITIES};
use crate::db::ResultStore;
use crate::error::Result;
use crate::models::activity::ActivitySummary;
use crate::models::effort::BestEffort;
use crate::models::metrics::DerivedActivityMetrics;
use crate::models::stream::StreamSet;
use crate::services::efforts::BestEffortFinder;
use crate::services::metrics::MetricsCalculator;
use crate::services::telemetry::StreamSource;

/// Computes and stores metrics and best efforts for activities.
pub struct ActivityProcessor<S, D> {
    source: S,
    store: D,
    thresholds: ThresholdBook,
    zones: ZoneSettings,
    efforts: BestEffortFinder,
    max_concurrency: usize,
}

impl<S: StreamSource, D: ResultStore> ActivityProcessor<S, D> {
    pub fn new(source: S, store: D, config: &Config) -> Self {
        Self {
            source,
            store,
            thresholds: config.thresholds.clone(),
            zones: config.zones.clone(),
            efforts: BestEffortFinder::new(config.efforts.clone()),
            max_concurrency: config.max_concurrent_activities,
        }
    }

    pub fn with_parts(
        source: S,
        store: D,
        thresholds: ThresholdBook,
        zones: ZoneSettings,
        efforts: BestEffortFinder,
    ) -> Self {
        Self {
            source,
            store,
            thresholds,
            zones,
            efforts,
            max_concurrency: DEFAULT_MAX_CONCURRENT_ACTIVITIES,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn store(&self) -> &D {
        &self.store
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Derive metrics and best efforts without touching the store.
    pub fn compute(&self, activity: &ActivitySummary, streams: &StreamSet) -> ProcessResult {
        let thresholds = self.thresholds.thresholds_for(activity.athlete_id());
        let metrics = MetricsCalculator::new(&thresholds, &self.zones).calculate(activity, streams);
        let best_efforts = self.efforts.find_best_efforts(activity, streams);
        ProcessResult {
            activity_id: activity.id,
            metrics,
            best_efforts,
        }
    }

    /// Process one activity.
    ///
    /// Everything is computed before the first write, so an error from the
    /// source leaves the store untouched for this activity. A failed store
    /// write is rolled back by [`ResultStore::upsert_activity`]. Upserts are
    /// keyed, making reprocessing idempotent.
    pub async fn process_activity(&self, activity: &ActivitySummary) -> Result<ProcessResult> {
        let athlete_id = activity.athlete_id();
        let activity_id = activity.id;
        tracing::debug!(athlete_id, activity_id, "Processing activity");

        let streams = self.source.fetch_streams(activity).await?;
        let result = self.compute(activity, &streams);

        self.store
            .upsert_activity(&result.metrics, &result.best_efforts)
            .await?;

        tracing::info!(
            athlete_id,
            activity_id,
            effective_tss = result.metrics.effective_tss,
            efforts = result.best_efforts.len(),
            "Activity processed"
        );
        Ok(result)
    }

    /// Process activities with bounded concurrency.
    ///
    /// A failing activity is logged and counted; the rest of the batch continues.
    pub async fn process_batch(&self, activities: &[ActivitySummary]) -> BatchReport {
        let outcomes: Vec<(u64, Result<ProcessResult>)> = stream::iter(activities)
            .map(|activity| async move { (activity.id, self.process_activity(activity).await) })
            .buffer_unordered(self.max_concurrency.max(1))
            .collect()
            .await;

        let mut report = BatchReport::default();
        for (activity_id, outcome) in outcomes {
            match outcome {
                Ok(result) => {
                    report.processed += 1;
                    report.efforts_saved += result.best_efforts.len() as u32;
                }
                Err(e) => {
                    tracing::warn!(
                        activity_id,
                        error = %e,
                        rate_limited = e.is_rate_limited(),
                        "Failed to process activity"
                    );
                    report.failed += 1;
                    report.failed_ids.push(activity_id);
                }
            }
        }
        report.failed_ids.sort_unstable();

        tracing::info!(
            processed = report.processed,
            failed = report.failed,
            efforts_saved = report.efforts_saved,
            "Batch complete"
        );
        report
    }

    /// Delete stored best efforts of activities that are no longer eligible
    /// (indoor, virtual, too short or excluded by name). Returns rows removed.
    pub async fn prune_ineligible_efforts(&self, activities: &[ActivitySummary]) -> Result<usize> {
        let mut removed = 0;
        for activity in activities.iter().filter(|a| !self.efforts.is_eligible(a)) {
            removed += self.store.delete_best_efforts(activity.id).await?;
        }
        if removed > 0 {
            tracing::info!(removed, "Pruned best efforts of ineligible activities");
        }
        Ok(removed)
    }
}

/// Result of processing an activity.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub activity_id: u64,
    pub metrics: DerivedActivityMetrics,
    pub best_efforts: Vec<BestEffort>,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Activities computed and stored.
    pub processed: u32,
    /// Activities that failed; no metrics or efforts were stored for them.
    pub failed: u32,
    /// Best-effort rows written.
    pub efforts_saved: u32,
    /// Failed activity IDs, ascending.
    pub failed_ids: Vec<u64>,
}

impl BatchReport {
    /// Returns true if every activity was processed.
    pub fn is_complete_success(&self) -> bool {
        self.failed == 0
    }

    /// Returns true if all activities failed.
    pub fn is_complete_failure(&self) -> bool {
        self.processed == 0 && self.failed > 0
    }

    /// Returns true if some activities succeeded and some failed.
    pub fn is_partial_failure(&self) -> bool {
        self.processed > 0 && self.failed > 0
    }
}
