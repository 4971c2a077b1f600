// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training load trend (CTL / ATL / TSB).
//!
//! Daily effective TSS is folded into two exponentially weighted moving
//! averages with `k = 2 / (N + 1)`:
//! - CTL (chronic load, fitness): N = 42 days
//! - ATL (acute load, fatigue): N = 7 days
//! - TSB (form): CTL - ATL

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::activity::ActivitySummary;
use crate::models::metrics::DerivedActivityMetrics;
use crate::numeric::round_to;
use crate::time_utils::calendar_day;

pub const CTL_DAYS: f64 = 42.0;
pub const ATL_DAYS: f64 = 7.0;

/// One calendar day of the trend. Rest days carry `tss == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyLoad {
    pub date: NaiveDate,
    pub tss: u32,
    pub ctl: f64,
    pub atl: f64,
    pub tsb: f64,
}

/// Sum effective TSS per local calendar day.
///
/// Activities without a metrics row, or with an unparseable start date, are skipped.
pub fn daily_tss(
    activities: &[ActivitySummary],
    metrics: &[DerivedActivityMetrics],
) -> BTreeMap<NaiveDate, u32> {
    let by_id: HashMap<u64, &DerivedActivityMetrics> =
        metrics.iter().map(|m| (m.activity_id, m)).collect();

    let mut days = BTreeMap::new();
    for activity in activities {
        let (Some(m), Some(day)) = (
            by_id.get(&activity.id),
            calendar_day(activity.local_start()),
        ) else {
            continue;
        };
        *days.entry(day).or_insert(0u32) += m.effective_tss;
    }
    days
}

#[derive(Debug, Clone, Copy)]
pub struct TrainingLoadCalculator {
    ctl_days: f64,
    atl_days: f64,
}

impl Default for TrainingLoadCalculator {
    fn default() -> Self {
        Self::with_constants(CTL_DAYS, ATL_DAYS)
    }
}

impl TrainingLoadCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constants(ctl_days: f64, atl_days: f64) -> Self {
        Self { ctl_days, atl_days }
    }

    /// Advance `(ctl, atl)` by one day of load.
    pub fn step(&self, (ctl, atl): (f64, f64), tss: f64) -> (f64, f64) {
        let ctl_k = 2.0 / (self.ctl_days + 1.0);
        let atl_k = 2.0 / (self.atl_days + 1.0);
        (
            ctl * (1.0 - ctl_k) + tss * ctl_k,
            atl * (1.0 - atl_k) + tss * atl_k,
        )
    }

    /// One row per day from the first loaded day through `until` (or the
    /// last loaded day, whichever is later). Both averages start at zero.
    pub fn history(
        &self,
        daily: &BTreeMap<NaiveDate, u32>,
        until: Option<NaiveDate>,
    ) -> Vec<DailyLoad> {
        let (Some(first), Some(last)) = (
            daily.keys().next().copied(),
            daily.keys().next_back().copied(),
        ) else {
            return Vec::new();
        };
        let end = until.map_or(last, |u| u.max(last));

        let mut state = (0.0, 0.0);
        first
            .iter_days()
            .take_while(|day| *day <= end)
            .map(|date| {
                let tss = daily.get(&date).copied().unwrap_or(0);
                state = self.step(state, f64::from(tss));
                let (ctl, atl) = state;
                DailyLoad {
                    date,
                    tss,
                    ctl: round_to(ctl, 1),
                    atl: round_to(atl, 1),
                    tsb: round_to(ctl - atl, 1),
                }
            })
            .collect()
    }
}
