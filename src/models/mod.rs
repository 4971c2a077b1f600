// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod athlete;
pub mod competition;
pub mod effort;
pub mod metrics;
pub mod stats;
pub mod stream;

pub use activity::ActivitySummary;
pub use athlete::Athlete;
pub use competition::{MonthBreakdown, MonthResult, Points, SeasonData};
pub use effort::{BestEffort, EffortDistance};
pub use metrics::{DerivedActivityMetrics, ProcessingNote};
pub use stats::{PeriodSummary, RideStats};
pub use stream::{StreamKind, StreamSet};
