//! Score ledger: combo tracking, multiplier-scaled awards, and accuracy.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::judge::{JudgmentOutcome, JudgmentTier};

/// Award tables and combo multiplier parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Base score per tier, indexed by [`JudgmentTier::index`].
    pub base_scores: [u64; JudgmentTier::COUNT],
    /// Combo interval at which the multiplier steps up.
    pub combo_step: u32,
    /// Multiplier gain per completed step.
    pub multiplier_step: f64,
    pub multiplier_cap: f64,
    /// Accuracy weight per tier, as a percentage contribution.
    pub accuracy_weights: [f64; JudgmentTier::COUNT],
}

impl ScoringRules {
    pub fn normal() -> Self {
        Self {
            base_scores: [1000, 800, 500, 0],
            combo_step: 10,
            multiplier_step: 0.1,
            multiplier_cap: 2.0,
            accuracy_weights: [100.0, 80.0, 50.0, 0.0],
        }
    }

    /// Multiplier in effect at the given combo: 1.0 plus a step for every
    /// completed combo interval, capped. A zero step disables scaling.
    pub fn multiplier(&self, combo: u32) -> f64 {
        if self.combo_step == 0 {
            return 1.0;
        }
        let steps = (combo / self.combo_step) as f64;
        (1.0 + self.multiplier_step * steps).min(self.multiplier_cap)
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::normal()
    }
}

/// What a single judgment did to the ledger. Emitted per resolved note so a
/// presentation layer can animate score and combo changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerDelta {
    pub outcome: JudgmentOutcome,
    /// Points granted for this note after the multiplier, floored.
    pub awarded: u64,
    /// Running totals after applying this judgment.
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub combo_broken: bool,
    /// Set when this judgment completed a combo interval, carrying the new
    /// combo count.
    pub milestone: Option<u32>,
}

/// Accumulated score state for one run.
#[derive(Debug, Clone)]
pub struct ScoreLedger {
    score: u64,
    combo: u32,
    max_combo: u32,
    tier_counts: [u32; JudgmentTier::COUNT],
    rules: ScoringRules,
}

impl ScoreLedger {
    pub fn new(rules: ScoringRules) -> Self {
        Self {
            score: 0,
            combo: 0,
            max_combo: 0,
            tier_counts: [0; JudgmentTier::COUNT],
            rules,
        }
    }

    /// Apply one judgment. A miss zeroes the combo and awards nothing; any
    /// hit extends the combo first, then scores at the multiplier that
    /// includes the extension.
    pub fn apply(&mut self, outcome: JudgmentOutcome) -> LedgerDelta {
        self.tier_counts[outcome.tier.index()] += 1;

        let (awarded, combo_broken, milestone) = if outcome.tier.breaks_combo() {
            self.combo = 0;
            (0, true, None)
        } else {
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
            let milestone = (self.rules.combo_step != 0 && self.combo % self.rules.combo_step == 0)
                .then_some(self.combo);
            let base = self.rules.base_scores[outcome.tier.index()];
            let awarded = (base as f64 * self.rules.multiplier(self.combo)).floor() as u64;
            (awarded, false, milestone)
        };
        self.score += awarded;

        if let Some(combo) = milestone {
            debug!(combo, "combo milestone reached");
        }

        LedgerDelta {
            outcome,
            awarded,
            score: self.score,
            combo: self.combo,
            max_combo: self.max_combo,
            combo_broken,
            milestone,
        }
    }

    /// Weighted accuracy percentage over judged notes, truncated to one
    /// decimal place. 100.0 before anything has been judged.
    pub fn accuracy(&self) -> f64 {
        let total = self.total_judged();
        if total == 0 {
            return 100.0;
        }
        let weighted: f64 = self
            .tier_counts
            .iter()
            .zip(self.rules.accuracy_weights)
            .map(|(&count, weight)| count as f64 * weight)
            .sum();
        ((weighted / total as f64) * 10.0).floor() / 10.0
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn tier_counts(&self) -> [u32; JudgmentTier::COUNT] {
        self.tier_counts
    }

    pub fn total_judged(&self) -> u32 {
        self.tier_counts.iter().sum()
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Zero every counter, keeping the rules.
    pub fn reset(&mut self) {
        self.score = 0;
        self.combo = 0;
        self.max_combo = 0;
        self.tier_counts = [0; JudgmentTier::COUNT];
    }
}

impl Default for ScoreLedger {
    fn default() -> Self {
        Self::new(ScoringRules::normal())
    }
}
