//! Engine configuration: timing windows, scoring rules, and session pacing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::judge::JudgeWindows;
use crate::score::ScoringRules;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub windows: JudgeWindows,
    pub scoring: ScoringRules,
    /// Lead-in between starting a session and the performance clock reaching
    /// the chart's start offset, in seconds.
    pub countdown_secs: f64,
    /// How long past the final note's window the session stays in play
    /// before completing, in seconds.
    pub completion_grace_secs: f64,
}

impl EngineConfig {
    pub fn normal() -> Self {
        Self {
            windows: JudgeWindows::normal(),
            scoring: ScoringRules::normal(),
            countdown_secs: 1.0,
            completion_grace_secs: 2.0,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse engine config")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize engine config")
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::normal()
    }
}
