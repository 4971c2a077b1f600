// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Engine configuration loaded from environment variables.
//!
//! Physiological thresholds, zone tables, effort targets, the points tables
//! and the season window are all configuration; the calculators receive them
//! by value and never read globals.

use chrono::Datelike;
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::models::effort::EffortDistance;
use crate::time_utils::YearMonth;

const DEFAULT_FTP: u32 = 280;
const DEFAULT_MAX_HR: u32 = 190;
const DEFAULT_RESTING_HR: u32 = 45;
pub const DEFAULT_MAX_CONCURRENT_ACTIVITIES: usize = 8;

/// Per-athlete physiological constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Validate)]
#[validate(schema(function = "validate_heart_rate_range"))]
pub struct AthleteThresholds {
    /// Functional threshold power (watts)
    #[validate(range(min = 1, max = 2000))]
    pub ftp: u32,
    /// Maximum heart rate (bpm)
    #[validate(range(min = 1, max = 250))]
    pub max_hr: u32,
    /// Resting heart rate (bpm)
    pub resting_hr: u32,
}

fn validate_heart_rate_range(thresholds: &AthleteThresholds) -> Result<(), ValidationError> {
    if thresholds.resting_hr >= thresholds.max_hr {
        return Err(ValidationError::new("resting_hr_not_below_max_hr"));
    }
    Ok(())
}

impl Default for AthleteThresholds {
    fn default() -> Self {
        Self {
            ftp: DEFAULT_FTP,
            max_hr: DEFAULT_MAX_HR,
            resting_hr: DEFAULT_RESTING_HR,
        }
    }
}

/// Default thresholds plus per-athlete overrides.
#[derive(Debug, Clone, Default)]
pub struct ThresholdBook {
    default: AthleteThresholds,
    overrides: HashMap<u64, AthleteThresholds>,
}

impl ThresholdBook {
    pub fn new(default: AthleteThresholds) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    /// Register thresholds for one athlete after validating them.
    pub fn with_athlete(
        mut self,
        athlete_id: u64,
        thresholds: AthleteThresholds,
    ) -> Result<Self, ConfigError> {
        thresholds
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        self.overrides.insert(athlete_id, thresholds);
        Ok(self)
    }

    pub fn default_thresholds(&self) -> AthleteThresholds {
        self.default
    }

    pub fn thresholds_for(&self, athlete_id: u64) -> AthleteThresholds {
        self.overrides
            .get(&athlete_id)
            .copied()
            .unwrap_or(self.default)
    }
}

/// Zone boundary fractions and HR load coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSettings {
    /// Upper bounds of power zones Z1..Z6 as fractions of FTP
    pub power_fractions: [f64; 6],
    /// Upper bounds of HR zones Z1..Z4 as fractions of max HR
    pub hr_fractions: [f64; 4],
    /// TRIMP / hrTSS coefficient per HR zone
    pub hr_coefficients: [f64; 5],
}

impl Default for ZoneSettings {
    fn default() -> Self {
        Self {
            power_fractions: [0.55, 0.75, 0.90, 1.05, 1.20, 1.50],
            hr_fractions: [0.60, 0.70, 0.80, 0.90],
            hr_coefficients: [1.0, 1.1, 1.2, 2.0, 4.5],
        }
    }
}

/// Best-effort extraction settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EffortSettings {
    /// Targets to search, any order
    pub targets: Vec<EffortDistance>,
    /// Activities shorter than this (meters) are skipped
    pub min_activity_distance: f64,
    /// A target is tried when `activity.distance >= target × tolerance`
    pub distance_tolerance: f64,
    /// Case-insensitive name keywords that mark an activity as ineligible
    pub excluded_name_keywords: Vec<String>,
}

impl Default for EffortSettings {
    fn default() -> Self {
        Self {
            targets: EffortDistance::ALL.to_vec(),
            min_activity_distance: 5000.0,
            distance_tolerance: 0.97,
            excluded_name_keywords: vec!["rolka".to_string()],
        }
    }
}

/// A scored effort category and the weight applied to its base points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffortCategory {
    pub distance: EffortDistance,
    pub weight: f64,
}

/// Points tables for the season competition.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Base points by dense rank (index 0 = rank 1); ranks past the end score 0
    pub points_by_rank: Vec<u32>,
    /// Bonus by dense rank for active days and longest ride
    pub bonus_by_rank: Vec<u32>,
    pub effort_categories: Vec<EffortCategory>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let category = |distance, weight| EffortCategory { distance, weight };
        Self {
            points_by_rank: vec![15, 12, 10, 8, 6, 5, 4, 3, 2, 1],
            bonus_by_rank: vec![3, 2, 1],
            effort_categories: vec![
                category(EffortDistance::Km10, 0.1),
                category(EffortDistance::Km20, 0.2),
                category(EffortDistance::Km30, 0.4),
                category(EffortDistance::Km50, 0.6),
                category(EffortDistance::Km80, 0.8),
                category(EffortDistance::Km100, 1.0),
            ],
        }
    }
}

impl ScoringConfig {
    pub fn base_points(&self, position: u32) -> u32 {
        rank_lookup(&self.points_by_rank, position)
    }

    pub fn bonus(&self, position: u32) -> u32 {
        rank_lookup(&self.bonus_by_rank, position)
    }
}

fn rank_lookup(table: &[u32], position: u32) -> u32 {
    position
        .checked_sub(1)
        .and_then(|i| table.get(i as usize))
        .copied()
        .unwrap_or(0)
}

/// The months a season is scored over, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonWindow {
    months: Vec<YearMonth>,
}

impl SeasonWindow {
    /// Sorted and deduplicated.
    pub fn new(mut months: Vec<YearMonth>) -> Self {
        months.sort();
        months.dedup();
        Self { months }
    }

    /// Several months of one year.
    pub fn of_year(year: i32, months: &[u32]) -> Result<Self, ConfigError> {
        let months = months
            .iter()
            .map(|m| {
                YearMonth::new(year, *m).ok_or_else(|| ConfigError::Invalid {
                    name: "SEASON_MONTHS",
                    value: m.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(months))
    }

    pub fn months(&self) -> &[YearMonth] {
        &self.months
    }

    pub fn contains_timestamp(&self, timestamp: &str) -> bool {
        self.months.iter().any(|m| m.contains_timestamp(timestamp))
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON snapshot of athletes, activities and streams
    pub snapshot_path: String,
    pub thresholds: ThresholdBook,
    pub zones: ZoneSettings,
    pub efforts: EffortSettings,
    pub scoring: ScoringConfig,
    pub season: SeasonWindow,
    /// Activities processed at once in a batch
    pub max_concurrent_activities: usize,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            snapshot_path: "tests/fixtures/snapshot_small.json".to_string(),
            thresholds: ThresholdBook::default(),
            zones: ZoneSettings::default(),
            efforts: EffortSettings::default(),
            scoring: ScoringConfig::default(),
            season: SeasonWindow::new((1..=3).filter_map(|m| YearMonth::new(2025, m)).collect()),
            max_concurrent_activities: DEFAULT_MAX_CONCURRENT_ACTIVITIES,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let snapshot_path = lookup("SNAPSHOT_PATH")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("SNAPSHOT_PATH"))?;

        let thresholds = AthleteThresholds {
            ftp: parse_or(&lookup, "FTP", DEFAULT_FTP)?,
            max_hr: parse_or(&lookup, "MAX_HR", DEFAULT_MAX_HR)?,
            resting_hr: parse_or(&lookup, "RESTING_HR", DEFAULT_RESTING_HR)?,
        };
        thresholds
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        let year = parse_or(&lookup, "SEASON_YEAR", chrono::Utc::now().year())?;
        let months: Vec<u32> = parse_list_or(&lookup, "SEASON_MONTHS", vec![1, 2, 3])?;
        let season = SeasonWindow::of_year(year, &months)?;

        let targets = parse_list_or(&lookup, "EFFORT_TARGETS_KM", EffortDistance::ALL.to_vec())?;
        let excluded_name_keywords = match lookup("EXCLUDED_NAME_KEYWORDS") {
            Some(raw) => split_list(&raw).map(str::to_string).collect(),
            None => EffortSettings::default().excluded_name_keywords,
        };

        let max_concurrent_activities = parse_or(
            &lookup,
            "MAX_CONCURRENT_ACTIVITIES",
            DEFAULT_MAX_CONCURRENT_ACTIVITIES,
        )?;
        if max_concurrent_activities == 0 {
            return Err(ConfigError::Invalid {
                name: "MAX_CONCURRENT_ACTIVITIES",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            snapshot_path,
            thresholds: ThresholdBook::new(thresholds),
            zones: ZoneSettings::default(),
            efforts: EffortSettings {
                targets,
                excluded_name_keywords,
                ..EffortSettings::default()
            },
            scoring: ScoringConfig::default(),
            season,
            max_concurrent_activities,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw.clone(),
        }),
        None => Ok(default),
    }
}

fn parse_list_or<F, T>(lookup: &F, name: &'static str, default: Vec<T>) -> Result<Vec<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => split_list(&raw)
            .map(|item| {
                item.parse().map_err(|_| ConfigError::Invalid {
                    name,
                    value: item.to_string(),
                })
            })
            .collect(),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("Invalid thresholds: {0}")]
    Validation(String),
}
