// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Seasonal points competition.
//!
//! Each month is scored independently from a snapshot of activities and
//! best efforts:
//! - distance and elevation totals (higher is better)
//! - fastest time per configured effort distance (lower is better, weighted)
//! - bonuses for active days and for the single longest ride
//!
//! Ranks are shared on exact ties and the next distinct value takes the rank
//! equal to its 1-based position, so 150, 150, 120 rank as 1, 1, 3.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::config::{ScoringConfig, SeasonWindow};
use crate::models::activity::ActivitySummary;
use crate::models::athlete::Athlete;
use crate::models::competition::{
    ActiveDays, ActiveDaysBonus, CategoryScore, LongestRide, LongestRideBonus, MonthBreakdown,
    MonthResult, Points, SeasonData,
};
use crate::models::effort::{BestEffort, EffortDistance};
use crate::time_utils::{calendar_day, YearMonth};

/// Sort direction for a ranked category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOrder {
    /// Larger values rank first (distance, elevation, days)
    HigherIsBetter,
    /// Smaller values rank first (effort times)
    LowerIsBetter,
}

/// One entry of a ranked category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<K> {
    pub key: K,
    pub value: f64,
    pub position: u32,
}

/// Rank `values`, sharing positions on exact ties.
///
/// The sort is stable, so tied entries keep their input order.
pub fn dense_rank<K: Copy>(values: &[(K, f64)], order: RankOrder) -> Vec<Ranked<K>> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| match order {
        RankOrder::HigherIsBetter => b.1.total_cmp(&a.1),
        RankOrder::LowerIsBetter => a.1.total_cmp(&b.1),
    });

    let mut ranked: Vec<Ranked<K>> = Vec::with_capacity(sorted.len());
    for (idx, (key, value)) in sorted.into_iter().enumerate() {
        let position = match ranked.last() {
            Some(prev) if prev.value == value => prev.position,
            _ => idx as u32 + 1,
        };
        ranked.push(Ranked {
            key,
            value,
            position,
        });
    }
    ranked
}

/// Raw per-athlete aggregates for one month.
#[derive(Debug, Default)]
struct MonthAggregates<'a> {
    distance: BTreeMap<u64, f64>,
    elevation: BTreeMap<u64, f64>,
    active_days: BTreeMap<u64, BTreeSet<NaiveDate>>,
    longest: BTreeMap<u64, &'a ActivitySummary>,
    /// Fastest effort per distance per athlete: (seconds, activity)
    efforts: BTreeMap<EffortDistance, BTreeMap<u64, (u32, u64)>>,
}

/// Scores months and seasons from snapshots.
#[derive(Debug, Clone, Default)]
pub struct CompetitionScorer {
    scoring: ScoringConfig,
    season: SeasonWindow,
}

impl CompetitionScorer {
    pub fn new(scoring: ScoringConfig, season: SeasonWindow) -> Self {
        Self { scoring, season }
    }

    pub fn season(&self) -> &SeasonWindow {
        &self.season
    }

    /// Score every month of the season for the roster.
    ///
    /// Activities and efforts of athletes outside the roster are ignored.
    pub fn score_season(
        &self,
        athletes: &[Athlete],
        activities: &[ActivitySummary],
        efforts: &[BestEffort],
    ) -> SeasonData {
        let months: Vec<MonthResult> = self
            .season
            .months()
            .iter()
            .map(|month| self.score_month(*month, athletes, activities, efforts))
            .collect();

        let mut month_scores: BTreeMap<u64, BTreeMap<YearMonth, Points>> = BTreeMap::new();
        for result in &months {
            for (athlete_id, points) in &result.scores {
                month_scores
                    .entry(*athlete_id)
                    .or_default()
                    .insert(result.month, *points);
            }
        }

        let total_scores: BTreeMap<u64, Points> = athletes
            .iter()
            .map(|a| {
                let total = month_scores
                    .get(&a.athlete_id)
                    .map(|by_month| by_month.values().copied().sum())
                    .unwrap_or(Points::ZERO);
                (a.athlete_id, total)
            })
            .collect();

        tracing::info!(
            athletes = athletes.len(),
            months = months.len(),
            activities = activities.len(),
            efforts = efforts.len(),
            "Season scored"
        );

        SeasonData {
            athletes: athletes.to_vec(),
            months,
            month_scores,
            total_scores,
        }
    }

    /// Score one month. Athletes with no data that month are absent.
    pub fn score_month(
        &self,
        month: YearMonth,
        athletes: &[Athlete],
        activities: &[ActivitySummary],
        efforts: &[BestEffort],
    ) -> MonthResult {
        let roster: HashSet<u64> = athletes.iter().map(|a| a.athlete_id).collect();
        let aggregates = self.aggregate(month, &roster, activities, efforts);

        let distance = self.category_scores(&aggregates.distance, 1.0);
        let elevation = self.category_scores(&aggregates.elevation, 1.0);

        let mut effort_scores: BTreeMap<EffortDistance, BTreeMap<u64, CategoryScore>> =
            BTreeMap::new();
        for category in &self.scoring.effort_categories {
            let Some(best) = aggregates.efforts.get(&category.distance) else {
                continue;
            };
            let times: Vec<(u64, f64)> = best
                .iter()
                .map(|(athlete_id, (secs, _))| (*athlete_id, f64::from(*secs)))
                .collect();
            let scores = self
                .score_ranked(&times, RankOrder::LowerIsBetter, category.weight)
                .map(|(athlete_id, mut score)| {
                    score.activity_id = best.get(&athlete_id).map(|(_, id)| *id);
                    (athlete_id, score)
                })
                .collect();
            effort_scores.insert(category.distance, scores);
        }

        let active_days_bonuses = self.active_days_bonuses(&aggregates.active_days);
        let longest_rides = self.longest_ride_bonuses(&aggregates.longest);

        let participants: BTreeSet<u64> = aggregates
            .distance
            .keys()
            .chain(aggregates.elevation.keys())
            .chain(aggregates.active_days.keys())
            .chain(aggregates.longest.keys())
            .chain(effort_scores.values().flat_map(|m| m.keys()))
            .copied()
            .collect();

        let breakdown: BTreeMap<u64, MonthBreakdown> = participants
            .iter()
            .map(|athlete_id| {
                let efforts = effort_scores
                    .iter()
                    .filter_map(|(d, scores)| scores.get(athlete_id).map(|s| (*d, s.clone())))
                    .collect();
                let active_days = ActiveDays {
                    count: aggregates
                        .active_days
                        .get(athlete_id)
                        .map_or(0, |days| days.len() as u32),
                    bonus: active_days_bonuses
                        .iter()
                        .find(|b| b.athlete_id == *athlete_id)
                        .map_or(0, |b| b.bonus),
                };
                let longest_ride = longest_rides
                    .iter()
                    .find(|r| r.athlete_id == *athlete_id)
                    .map(|r| LongestRide {
                        distance: r.distance,
                        bonus: r.bonus,
                        activity_id: r.activity_id,
                    });
                let entry = MonthBreakdown::new(
                    distance.get(athlete_id).cloned(),
                    elevation.get(athlete_id).cloned(),
                    efforts,
                    active_days,
                    longest_ride,
                );
                (*athlete_id, entry)
            })
            .collect();

        let scores = breakdown
            .iter()
            .map(|(athlete_id, b)| (*athlete_id, b.total()))
            .collect();

        tracing::debug!(
            month = %month,
            participants = breakdown.len(),
            "Month scored"
        );

        MonthResult {
            month,
            scores,
            breakdown,
            longest_rides,
            active_days_bonuses,
        }
    }

    fn aggregate<'a>(
        &self,
        month: YearMonth,
        roster: &HashSet<u64>,
        activities: &'a [ActivitySummary],
        efforts: &[BestEffort],
    ) -> MonthAggregates<'a> {
        let mut agg = MonthAggregates::default();

        for activity in activities {
            let athlete_id = activity.athlete_id();
            if !roster.contains(&athlete_id) {
                continue;
            }
            let Some(day) = calendar_day(activity.local_start()).filter(|d| month.contains(*d))
            else {
                continue;
            };
            *agg.distance.entry(athlete_id).or_insert(0.0) += activity.distance;
            *agg.elevation.entry(athlete_id).or_insert(0.0) += activity.total_elevation_gain;
            agg.active_days.entry(athlete_id).or_default().insert(day);
            agg.longest
                .entry(athlete_id)
                .and_modify(|longest| {
                    if activity.distance > longest.distance {
                        *longest = activity;
                    }
                })
                .or_insert(activity);
        }

        for effort in efforts {
            if !roster.contains(&effort.athlete_id)
                || !month.contains_timestamp(&effort.activity_date)
            {
                continue;
            }
            agg.efforts
                .entry(effort.effort)
                .or_default()
                .entry(effort.athlete_id)
                .and_modify(|best| {
                    if effort.moving_time < best.0 {
                        *best = (effort.moving_time, effort.activity_id);
                    }
                })
                .or_insert((effort.moving_time, effort.activity_id));
        }

        agg
    }

    fn category_scores(
        &self,
        values: &BTreeMap<u64, f64>,
        weight: f64,
    ) -> BTreeMap<u64, CategoryScore> {
        let values: Vec<(u64, f64)> = values.iter().map(|(k, v)| (*k, *v)).collect();
        self.score_ranked(&values, RankOrder::HigherIsBetter, weight)
            .collect()
    }

    fn score_ranked<'s>(
        &'s self,
        values: &[(u64, f64)],
        order: RankOrder,
        weight: f64,
    ) -> impl Iterator<Item = (u64, CategoryScore)> + 's {
        dense_rank(values, order).into_iter().map(move |entry| {
            let base_points = self.scoring.base_points(entry.position);
            let score = CategoryScore {
                value: entry.value,
                position: entry.position,
                base_points,
                points: Points::weighted(base_points, weight),
                activity_id: None,
            };
            (entry.key, score)
        })
    }

    fn active_days_bonuses(
        &self,
        active_days: &BTreeMap<u64, BTreeSet<NaiveDate>>,
    ) -> Vec<ActiveDaysBonus> {
        let counts: Vec<(u64, f64)> = active_days
            .iter()
            .map(|(athlete_id, days)| (*athlete_id, days.len() as f64))
            .collect();
        dense_rank(&counts, RankOrder::HigherIsBetter)
            .into_iter()
            .filter_map(|entry| {
                let bonus = self.scoring.bonus(entry.position);
                (bonus > 0).then_some(ActiveDaysBonus {
                    athlete_id: entry.key,
                    days: entry.value as u32,
                    bonus,
                })
            })
            .collect()
    }

    fn longest_ride_bonuses(
        &self,
        longest: &BTreeMap<u64, &ActivitySummary>,
    ) -> Vec<LongestRideBonus> {
        let distances: Vec<(u64, f64)> = longest
            .iter()
            .map(|(athlete_id, ride)| (*athlete_id, ride.distance))
            .collect();
        dense_rank(&distances, RankOrder::HigherIsBetter)
            .into_iter()
            .filter_map(|entry| {
                let bonus = self.scoring.bonus(entry.position);
                let ride = longest.get(&entry.key)?;
                (bonus > 0).then(|| LongestRideBonus {
                    athlete_id: entry.key,
                    distance: entry.value,
                    activity_name: Some(ride.name.clone()).filter(|n| !n.is_empty()),
                    bonus,
                    activity_id: ride.id,
                })
            })
            .collect()
    }
}
