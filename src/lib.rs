// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Ride-League: training metrics and a monthly points competition for a
//! club of cyclists.
//!
//! This crate turns activity summaries and their telemetry streams into
//! derived training metrics and best efforts, and scores a season of
//! monthly rankings from them.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod numeric;
pub mod services;
pub mod time_utils;
