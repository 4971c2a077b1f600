// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use ride_league::config::EffortSettings;
use ride_league::models::{EffortDistance, StreamKind, StreamSet};
use ride_league::services::BestEffortFinder;

mod common;
use common::{ride, steady_streams};

fn finder() -> BestEffortFinder {
    BestEffortFinder::new(EffortSettings::default())
}

#[test]
fn test_one_meter_per_second_ten_km() {
    let activity = ride(1, 7, "2025-01-10T08:00:00Z", 10_000.0);
    let streams = steady_streams(10_000, 1.0);

    let efforts = finder().find_best_efforts(&activity, &streams);
    assert_eq!(efforts.len(), 1);
    assert_eq!(efforts[0].effort, EffortDistance::Km10);
    assert_eq!(efforts[0].moving_time, 10_000);
    assert_eq!(efforts[0].elapsed_time, 10_000);
    assert_eq!(efforts[0].avg_speed, 1.0);
    assert_eq!(efforts[0].athlete_id, 7);
    assert_eq!(efforts[0].activity_date, "2025-01-10T08:00:00Z");
}

#[test]
fn test_trainer_ride_has_no_efforts() {
    let mut activity = ride(1, 7, "2025-01-10T08:00:00Z", 40_000.0);
    activity.trainer = true;
    let streams = steady_streams(4_000, 10.0);
    assert!(finder().find_best_efforts(&activity, &streams).is_empty());
}

#[test]
fn test_stationary_gps_has_no_efforts() {
    let activity = ride(1, 7, "2025-01-10T08:00:00Z", 12_000.0);
    let streams = StreamSet::default()
        .with(StreamKind::Time, (0..600).map(f64::from).collect())
        .with(StreamKind::Distance, vec![0.0; 600]);
    assert!(finder().find_best_efforts(&activity, &streams).is_empty());
}

#[test]
fn test_recorded_distance_short_of_target() {
    // Summary says 10 km but the stream only reaches 9.9 km.
    let activity = ride(1, 7, "2025-01-10T08:00:00Z", 10_000.0);
    let streams = steady_streams(990, 10.0);
    assert!(finder().find_best_efforts(&activity, &streams).is_empty());
}

#[test]
fn test_summary_distance_below_tolerance_skips_target() {
    // Streams cover 25 km but the summary reports 19 km, under 97% of 20 km.
    let activity = ride(1, 7, "2025-01-10T08:00:00Z", 19_000.0);
    let streams = steady_streams(2_500, 10.0);

    let efforts = finder().find_best_efforts(&activity, &streams);
    let targets: Vec<_> = efforts.iter().map(|e| e.effort).collect();
    assert_eq!(targets, vec![EffortDistance::Km10]);
    assert_eq!(efforts[0].moving_time, 1_000);
}

#[test]
fn test_efforts_are_deterministic() {
    let activity = ride(1, 7, "2025-01-10T08:00:00Z", 55_000.0);
    let streams = steady_streams(5_500, 10.0);

    let first = finder().find_best_efforts(&activity, &streams);
    let second = finder().find_best_efforts(&activity, &streams);
    assert_eq!(first, second);

    let targets: Vec<EffortDistance> = first.iter().map(|e| e.effort).collect();
    assert_eq!(
        targets,
        vec![
            EffortDistance::Km10,
            EffortDistance::Km20,
            EffortDistance::Km30,
            EffortDistance::Km40,
            EffortDistance::Km50
        ]
    );
    assert_eq!(first[4].moving_time, 5_000);
}

#[test]
fn test_custom_targets_only() {
    let settings = EffortSettings {
        targets: vec![EffortDistance::Km20],
        ..EffortSettings::default()
    };
    let activity = ride(1, 7, "2025-01-10T08:00:00Z", 30_000.0);
    let efforts =
        BestEffortFinder::new(settings).find_best_efforts(&activity, &steady_streams(3_000, 10.0));
    assert_eq!(efforts.len(), 1);
    assert_eq!(efforts[0].effort, EffortDistance::Km20);
    assert_eq!(efforts[0].moving_time, 2_000);
}
