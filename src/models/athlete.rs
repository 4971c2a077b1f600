// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Competition roster entry.

use serde::{Deserialize, Serialize};

/// An active league member. Reference data only; never mutated by scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    /// Strava athlete ID (stable identity)
    pub athlete_id: u64,
    /// First name
    #[serde(default)]
    pub firstname: Option<String>,
    /// Last name
    #[serde(default)]
    pub lastname: Option<String>,
    /// Profile picture URL
    #[serde(default)]
    pub profile_medium: Option<String>,
}

impl Athlete {
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.firstname.as_deref(), self.lastname.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            format!("Athlete {}", self.athlete_id)
        } else {
            parts.join(" ")
        }
    }
}
