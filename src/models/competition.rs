// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Season competition results.
//!
//! Everything here is produced by the scorer from a snapshot of activities
//! and best efforts; nothing is carried over between months.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::models::athlete::Athlete;
use crate::models::effort::EffortDistance;
use crate::numeric::round_half_up;
use crate::time_utils::YearMonth;

/// League points, held as exact tenths so totals never drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Points(i64);

impl Points {
    pub const ZERO: Points = Points(0);

    pub fn from_tenths(tenths: i64) -> Self {
        Self(tenths)
    }

    /// Whole points, e.g. a +3 bonus.
    pub fn whole(points: u32) -> Self {
        Self(i64::from(points) * 10)
    }

    /// `round(base × weight, 1 decimal)`.
    pub fn weighted(base: u32, weight: f64) -> Self {
        Self(round_half_up(f64::from(base) * weight * 10.0) as i64)
    }

    pub fn tenths(&self) -> i64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 10.0
    }
}

impl Add for Points {
    type Output = Points;

    fn add(self, rhs: Points) -> Points {
        Points(self.0 + rhs.0)
    }
}

impl AddAssign for Points {
    fn add_assign(&mut self, rhs: Points) {
        self.0 += rhs.0;
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Points>>(iter: I) -> Points {
        iter.fold(Points::ZERO, Add::add)
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 10 == 0 {
            write!(f, "{}", self.0 / 10)
        } else {
            write!(f, "{:.1}", self.as_f64())
        }
    }
}

impl Serialize for Points {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Points {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(Points(round_half_up(value * 10.0) as i64))
    }
}

/// Scored outcome of one athlete in one category in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Raw aggregate (meters, or seconds for effort categories)
    pub value: f64,
    /// Dense rank, 1 = best
    pub position: u32,
    /// Points from the position table before weighting
    pub base_points: u32,
    /// Weighted points
    pub points: Points,
    /// Activity that produced the value (effort categories)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<u64>,
}

/// Distinct riding days in the month and the bonus they earned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveDays {
    pub count: u32,
    pub bonus: u32,
}

/// The athlete's single longest ride, present only when it earned a bonus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongestRide {
    pub distance: f64,
    pub bonus: u32,
    pub activity_id: u64,
}

/// Podium entry of the longest-ride bonus table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongestRideBonus {
    pub athlete_id: u64,
    pub distance: f64,
    pub activity_name: Option<String>,
    pub bonus: u32,
    pub activity_id: u64,
}

/// Podium entry of the active-days bonus table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveDaysBonus {
    pub athlete_id: u64,
    pub days: u32,
    pub bonus: u32,
}

/// Per athlete, per month score breakdown.
///
/// The total is derived from the parts at construction and the parts are
/// read-only afterwards, so the two cannot diverge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBreakdown {
    distance: Option<CategoryScore>,
    elevation: Option<CategoryScore>,
    efforts: BTreeMap<EffortDistance, CategoryScore>,
    active_days: ActiveDays,
    longest_ride: Option<LongestRide>,
    total: Points,
}

impl MonthBreakdown {
    pub fn new(
        distance: Option<CategoryScore>,
        elevation: Option<CategoryScore>,
        efforts: BTreeMap<EffortDistance, CategoryScore>,
        active_days: ActiveDays,
        longest_ride: Option<LongestRide>,
    ) -> Self {
        let mut breakdown = Self {
            distance,
            elevation,
            efforts,
            active_days,
            longest_ride,
            total: Points::ZERO,
        };
        breakdown.total = breakdown.sum_of_parts();
        breakdown
    }

    fn sum_of_parts(&self) -> Points {
        let category = |s: &Option<CategoryScore>| s.as_ref().map_or(Points::ZERO, |s| s.points);
        category(&self.distance)
            + category(&self.elevation)
            + self.efforts.values().map(|s| s.points).sum::<Points>()
            + Points::whole(self.active_days.bonus)
            + self
                .longest_ride
                .as_ref()
                .map_or(Points::ZERO, |r| Points::whole(r.bonus))
    }

    pub fn distance(&self) -> Option<&CategoryScore> {
        self.distance.as_ref()
    }

    pub fn elevation(&self) -> Option<&CategoryScore> {
        self.elevation.as_ref()
    }

    pub fn efforts(&self) -> &BTreeMap<EffortDistance, CategoryScore> {
        &self.efforts
    }

    pub fn effort(&self, distance: EffortDistance) -> Option<&CategoryScore> {
        self.efforts.get(&distance)
    }

    pub fn active_days(&self) -> ActiveDays {
        self.active_days
    }

    pub fn longest_ride(&self) -> Option<&LongestRide> {
        self.longest_ride.as_ref()
    }

    pub fn total(&self) -> Points {
        self.total
    }
}

/// Results for one month of the season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthResult {
    pub month: YearMonth,
    /// Monthly total per participating athlete
    pub scores: BTreeMap<u64, Points>,
    pub breakdown: BTreeMap<u64, MonthBreakdown>,
    pub longest_rides: Vec<LongestRideBonus>,
    pub active_days_bonuses: Vec<ActiveDaysBonus>,
}

/// The full season as handed to the reporting collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonData {
    pub athletes: Vec<Athlete>,
    pub months: Vec<MonthResult>,
    /// `month_scores[athlete][month]`, participating months only
    pub month_scores: BTreeMap<u64, BTreeMap<YearMonth, Points>>,
    /// Season total for every roster athlete
    pub total_scores: BTreeMap<u64, Points>,
}

impl SeasonData {
    /// Roster ordered by season total, best first; ties by athlete ID.
    pub fn standings(&self) -> Vec<(u64, Points)> {
        let mut standings: Vec<(u64, Points)> =
            self.total_scores.iter().map(|(id, p)| (*id, *p)).collect();
        standings.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        standings
    }

    pub fn month(&self, month: YearMonth) -> Option<&MonthResult> {
        self.months.iter().find(|m| m.month == month)
    }
}
