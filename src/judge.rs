//! Judgment engine: classifies input stamps against scheduled notes and
//! sweeps notes whose hit window has closed.
//!
//! Both entry points are pure over `(&Chart, &mut [NoteState])`, which keeps
//! them replayable: the same chart, windows, and stamp sequence always
//! produce the same resolutions.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::model::{Chart, NoteState};

/// Accuracy tier of a resolved note, best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum JudgmentTier {
    Perfect = 0,
    Great = 1,
    Good = 2,
    Miss = 3,
}

impl JudgmentTier {
    pub const COUNT: usize = 4;

    /// Index into per-tier count/score tables.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn breaks_combo(self) -> bool {
        matches!(self, JudgmentTier::Miss)
    }
}

/// Whether the input landed before, after, or effectively on the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimingSign {
    Early,
    Late,
    Exact,
}

/// Result of judging one input against one note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JudgmentOutcome {
    pub tier: JudgmentTier,
    pub sign: TimingSign,
    /// Signed offset in milliseconds; positive means the input was late.
    pub delta_ms: f64,
}

/// Timing tolerances, widest tier inclusive of its boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JudgeWindows {
    pub perfect_ms: f64,
    pub great_ms: f64,
    pub good_ms: f64,
    /// Offsets within this magnitude read as Exact rather than Early/Late.
    pub exact_epsilon_ms: f64,
}

impl JudgeWindows {
    pub fn normal() -> Self {
        Self {
            perfect_ms: 30.0,
            great_ms: 60.0,
            good_ms: 100.0,
            exact_epsilon_ms: 1.0,
        }
    }

    /// Widest window in seconds; past this a note can no longer be hit.
    pub fn good_window_secs(&self) -> f64 {
        self.good_ms / 1000.0
    }

    /// Tier for an absolute offset, or `None` outside every window.
    /// Boundaries belong to the better tier: |delta| == perfect_ms is Perfect.
    pub fn tier(&self, abs_delta_ms: f64) -> Option<JudgmentTier> {
        if abs_delta_ms <= self.perfect_ms {
            Some(JudgmentTier::Perfect)
        } else if abs_delta_ms <= self.great_ms {
            Some(JudgmentTier::Great)
        } else if abs_delta_ms <= self.good_ms {
            Some(JudgmentTier::Good)
        } else {
            None
        }
    }

    pub fn sign(&self, delta_ms: f64) -> TimingSign {
        if delta_ms.abs() <= self.exact_epsilon_ms {
            TimingSign::Exact
        } else if delta_ms < 0.0 {
            TimingSign::Early
        } else {
            TimingSign::Late
        }
    }

    /// Full classification of a signed offset, or `None` outside the good
    /// window.
    pub fn classify(&self, delta_ms: f64) -> Option<JudgmentOutcome> {
        let tier = self.tier(delta_ms.abs())?;
        Some(JudgmentOutcome {
            tier,
            sign: self.sign(delta_ms),
            delta_ms,
        })
    }
}

impl Default for JudgeWindows {
    fn default() -> Self {
        Self::normal()
    }
}

/// Judge a single input stamp against the chart.
///
/// Picks the unjudged note nearest in time within the good window; on an
/// exact tie the earlier-scheduled note wins. Returns the note index and
/// its outcome, or `None` when the input hits nothing (a whiff). Whiffs
/// leave all note state untouched.
pub fn judge(
    windows: &JudgeWindows,
    input_time: f64,
    chart: &Chart,
    states: &mut [NoteState],
) -> Option<(usize, JudgmentOutcome)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, note) in chart.notes().iter().enumerate() {
        if states[index].is_resolved() {
            continue;
        }
        let delta_ms = (input_time - note.scheduled_time) * 1000.0;
        if delta_ms > windows.good_ms {
            // Window already closed; the miss sweep owns this note.
            continue;
        }
        if delta_ms < -windows.good_ms {
            // Notes are sorted, so everything further is also out of reach.
            break;
        }
        match best {
            Some((_, best_delta)) if delta_ms.abs() >= best_delta.abs() => {}
            _ => best = Some((index, delta_ms)),
        }
    }

    let (index, delta_ms) = best?;
    let outcome = windows.classify(delta_ms)?;
    states[index] = NoteState::Hit(outcome);
    trace!(index, delta_ms, tier = ?outcome.tier, "note judged");
    Some((index, outcome))
}

/// Mark every unjudged note whose good window has fully closed as missed.
///
/// A note expires only when `current_time` is strictly past its scheduled
/// time plus the good window; at exactly the boundary it is still hittable.
/// Returns the indices marked, in chart order.
pub fn sweep_missed(
    windows: &JudgeWindows,
    current_time: f64,
    chart: &Chart,
    states: &mut [NoteState],
) -> Vec<usize> {
    let cutoff = current_time - windows.good_window_secs();
    let mut missed = Vec::new();
    for (index, note) in chart.notes().iter().enumerate() {
        if note.scheduled_time >= cutoff {
            break;
        }
        if states[index].is_unjudged() {
            states[index] = NoteState::Missed;
            missed.push(index);
        }
    }
    if !missed.is_empty() {
        trace!(count = missed.len(), current_time, "notes swept as missed");
    }
    missed
}
