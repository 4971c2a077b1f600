// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ride-League batch runner
//!
//! Loads a snapshot of athletes, activities and streams, computes metrics
//! and best efforts for every activity, scores the configured season and
//! prints a JSON report to stdout.

use ride_league::{
    config::Config,
    db::MemoryStore,
    models::{PeriodSummary, RideStats, SeasonData},
    services::{
        training_load::daily_tss, ActivityProcessor, BatchReport, CompetitionScorer, DailyLoad,
        Snapshot, TrainingLoadCalculator,
    },
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Serialize)]
struct AthleteReport {
    summary: PeriodSummary,
    /// Most recent day of the training load trend
    load: Option<DailyLoad>,
}

#[derive(Serialize)]
struct Report {
    batch: BatchReport,
    season: SeasonData,
    athlete_stats: BTreeMap<u64, AthleteReport>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(
        path = %config.snapshot_path,
        months = config.season.months().len(),
        "Starting Ride-League run"
    );

    let snapshot = Snapshot::load_from_file(&config.snapshot_path)?;
    let (athletes, activities, source) = snapshot.into_parts();
    tracing::info!(
        athletes = athletes.len(),
        activities = activities.len(),
        "Snapshot loaded"
    );

    let store = MemoryStore::new();
    let processor = ActivityProcessor::new(source, store.clone(), &config);
    let batch = processor.process_batch(&activities).await;
    if batch.is_complete_failure() {
        tracing::error!(failed = batch.failed, "Every activity failed to process");
    }
    processor.prune_ineligible_efforts(&activities).await?;

    let scorer = CompetitionScorer::new(config.scoring.clone(), config.season.clone());
    let season = scorer.score_season(&athletes, &activities, &store.all_best_efforts());

    let metrics = store.all_metrics();
    let calculator = TrainingLoadCalculator::new();
    let athlete_stats = athletes
        .iter()
        .map(|athlete| {
            let own: Vec<_> = activities
                .iter()
                .filter(|a| a.athlete_id() == athlete.athlete_id)
                .cloned()
                .collect();

            let mut stats = RideStats::default();
            for activity in &own {
                stats.update_from_activity(activity, store.metrics(activity.id).as_ref());
            }

            let load = calculator
                .history(&daily_tss(&own, &metrics), None)
                .last()
                .copied();

            (
                athlete.athlete_id,
                AthleteReport {
                    summary: stats.summary(),
                    load,
                },
            )
        })
        .collect();

    let report = Report {
        batch,
        season,
        athlete_stats,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in ["ride_league=debug", "info"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
