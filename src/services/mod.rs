// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - computation and processing layer.

pub mod activity;
pub mod competition;
pub mod efforts;
pub mod heart_rate;
pub mod metrics;
pub mod power;
pub mod streams;
pub mod telemetry;
pub mod training_load;
pub mod zones;

pub use activity::{ActivityProcessor, BatchReport, ProcessResult};
pub use competition::{dense_rank, CompetitionScorer, RankOrder, Ranked};
pub use efforts::BestEffortFinder;
pub use heart_rate::HrMetricsCalculator;
pub use metrics::MetricsCalculator;
pub use power::PowerMetricsCalculator;
pub use telemetry::{Snapshot, SnapshotError, SnapshotSource, StreamSource};
pub use training_load::{DailyLoad, TrainingLoadCalculator};
pub use zones::ZoneTable;
