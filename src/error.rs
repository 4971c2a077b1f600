// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Missing or malformed telemetry is not an error: it degrades to empty
//! metrics and processing notes. These variants cover collaborator
//! failures and bad configuration only.

use crate::config::ConfigError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Telemetry provider error: {0}")]
    Provider(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message used by telemetry sources when the upstream API throttled us.
    pub const PROVIDER_RATE_LIMIT: &'static str = "Rate limit exceeded";

    /// Whether the failure came from upstream throttling and the activity
    /// can simply be retried in a later batch.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            AppError::Provider(msg) => {
                msg.contains(Self::PROVIDER_RATE_LIMIT) || msg.contains("429")
            }
            _ => false,
        }
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, AppError>;
