// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use ride_league::config::ConfigError;
use ride_league::error::AppError;

#[test]
fn test_is_rate_limited_matches() {
    let err = AppError::Provider("Rate limit exceeded".to_string());
    assert!(err.is_rate_limited());

    let err = AppError::Provider("HTTP 429 Too Many Requests".to_string());
    assert!(err.is_rate_limited());

    let err = AppError::Provider(AppError::PROVIDER_RATE_LIMIT.to_string());
    assert!(err.is_rate_limited());
}

#[test]
fn test_is_rate_limited_no_match() {
    let err = AppError::Provider("Internal Server Error".to_string());
    assert!(!err.is_rate_limited());

    let err = AppError::Storage("Rate limit exceeded".to_string());
    assert!(!err.is_rate_limited());

    let err = AppError::NotFound("Streams for activity 1".to_string());
    assert!(!err.is_rate_limited());
}

#[test]
fn test_config_error_conversion() {
    let err: AppError = ConfigError::Missing("SNAPSHOT_PATH").into();
    assert!(matches!(err, AppError::Config(_)));
    assert!(err.to_string().contains("SNAPSHOT_PATH"));
}

#[test]
fn test_internal_error_from_anyhow() {
    let err: AppError = anyhow::anyhow!("unexpected state").into();
    assert_eq!(err.to_string(), "Internal error: unexpected state");
}
