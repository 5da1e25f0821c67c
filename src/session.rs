//! Session controller: drives the phase machine and the per-tick pipeline
//! (advance clock, drain inputs, judge, sweep, apply to ledger, completion).

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::MasterClock;
use crate::config::EngineConfig;
use crate::input::{InputLog, InputQueue};
use crate::judge::{self, JudgmentOutcome, JudgmentTier, TimingSign};
use crate::model::{Chart, NoteState};
use crate::score::{LedgerDelta, ScoreLedger};
use crate::traits::audio::AudioOutput;

/// Phase of a play session.
///
/// ```text
/// Idle -> Countdown -> Running <-> Paused
///                         |
///                         v
///                     Completed
/// ```
/// `stop` returns any phase to Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Idle,
    Countdown,
    Running,
    Paused,
    Completed,
}

/// Final results of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaySummary {
    pub score: u64,
    pub max_combo: u32,
    pub tier_counts: [u32; JudgmentTier::COUNT],
    pub accuracy: f64,
}

/// Owns the clock, chart state, input queue, and ledger for one session.
///
/// The host calls [`trigger`](Self::trigger) on player input and
/// [`tick`](Self::tick) once per frame; everything else is driven from those
/// two entry points.
pub struct SessionController<A: AudioOutput> {
    config: EngineConfig,
    clock: MasterClock<A>,
    chart: Option<Chart>,
    states: Vec<NoteState>,
    queue: InputQueue,
    log: InputLog,
    ledger: ScoreLedger,
    phase: SessionPhase,
    current_time: f64,
    audio_active: bool,
}

impl<A: AudioOutput> SessionController<A> {
    pub fn new(config: EngineConfig, audio: A) -> Self {
        Self {
            config,
            clock: MasterClock::new(audio),
            chart: None,
            states: Vec::new(),
            queue: InputQueue::new(),
            log: InputLog::new(),
            ledger: ScoreLedger::new(config.scoring),
            phase: SessionPhase::Idle,
            current_time: 0.0,
            audio_active: false,
        }
    }

    /// Install a chart. Only allowed while idle.
    pub fn load_chart(&mut self, chart: Chart) -> Result<()> {
        if self.phase != SessionPhase::Idle {
            bail!("cannot load a chart while a session is in progress");
        }
        self.states = vec![NoteState::Unjudged; chart.len()];
        self.ledger = ScoreLedger::new(self.config.scoring);
        info!(title = chart.title(), notes = chart.len(), "chart loaded");
        self.chart = Some(chart);
        Ok(())
    }

    /// Begin the countdown lead-in. The performance clock starts negative
    /// relative to the chart's start offset and counts up through it.
    pub fn start(&mut self) -> Result<()> {
        if self.phase != SessionPhase::Idle {
            bail!("session already started");
        }
        let Some(chart) = self.chart.as_ref() else {
            bail!("no chart loaded");
        };
        let offset = chart.start_offset() - self.config.countdown_secs;
        self.audio_active = self.clock.start(offset);
        self.current_time = offset;
        self.phase = SessionPhase::Countdown;
        info!(
            title = chart.title(),
            audio = self.audio_active,
            "session started"
        );
        Ok(())
    }

    /// Stamp a player input with the current performance time and queue it
    /// for the next tick. Ignored while idle or completed.
    pub fn trigger(&mut self) {
        if matches!(self.phase, SessionPhase::Idle | SessionPhase::Completed) {
            return;
        }
        let stamp = self.clock.now();
        self.queue.push(stamp);
    }

    /// Advance the session one frame. Returns the ledger changes produced
    /// this tick, in resolution order (judged inputs first, then misses).
    pub fn tick(&mut self) -> Vec<LedgerDelta> {
        match self.phase {
            SessionPhase::Countdown => {
                self.current_time = self.clock.now();
                let discarded = self.queue.drain();
                if !discarded.is_empty() {
                    debug!(count = discarded.len(), "inputs during countdown discarded");
                }
                let start_offset = match self.chart.as_ref() {
                    Some(chart) => chart.start_offset(),
                    None => return Vec::new(),
                };
                if self.current_time >= start_offset {
                    self.phase = SessionPhase::Running;
                    info!("countdown finished, session running");
                    self.tick_running()
                } else {
                    Vec::new()
                }
            }
            SessionPhase::Running => self.tick_running(),
            _ => Vec::new(),
        }
    }

    fn tick_running(&mut self) -> Vec<LedgerDelta> {
        self.current_time = self.clock.now();
        let now = self.current_time;

        let Some(chart) = self.chart.as_ref() else {
            return Vec::new();
        };

        let mut outcomes: Vec<JudgmentOutcome> = Vec::new();
        for stamp in self.queue.drain() {
            self.log.record(stamp);
            if let Some((index, outcome)) =
                judge::judge(&self.config.windows, stamp, chart, &mut self.states)
            {
                debug!(index, tier = ?outcome.tier, delta_ms = outcome.delta_ms, "hit");
                outcomes.push(outcome);
            } else {
                debug!(stamp, "input matched no note");
            }
        }

        for index in judge::sweep_missed(&self.config.windows, now, chart, &mut self.states) {
            let scheduled = chart.notes()[index].scheduled_time;
            outcomes.push(JudgmentOutcome {
                tier: JudgmentTier::Miss,
                sign: TimingSign::Late,
                delta_ms: (now - scheduled) * 1000.0,
            });
        }

        let deltas: Vec<LedgerDelta> = outcomes
            .into_iter()
            .map(|outcome| self.ledger.apply(outcome))
            .collect();

        let done = self.states.iter().all(NoteState::is_resolved)
            && chart
                .last_scheduled_time()
                .is_none_or(|last| now > last + self.config.completion_grace_secs);
        if done {
            self.phase = SessionPhase::Completed;
            self.clock.pause();
            info!(
                score = self.ledger.score(),
                max_combo = self.ledger.max_combo(),
                "session completed"
            );
        }

        deltas
    }

    /// Freeze the clock and stop judging. Only meaningful while running.
    pub fn pause(&mut self) {
        if self.phase == SessionPhase::Running {
            self.clock.pause();
            self.phase = SessionPhase::Paused;
            info!(at = self.current_time, "session paused");
        }
    }

    /// Resume from pause with no gap in performance time.
    pub fn resume(&mut self) {
        if self.phase == SessionPhase::Paused {
            self.audio_active = self.clock.resume();
            self.phase = SessionPhase::Running;
            info!(at = self.current_time, "session resumed");
        }
    }

    /// Abandon the current run and return to idle with pristine state:
    /// note states cleared, queue and log discarded, ledger zeroed. The
    /// loaded chart is kept. Safe to call from any phase, repeatedly.
    pub fn stop(&mut self) {
        self.clock.stop();
        self.states.fill(NoteState::Unjudged);
        self.queue.clear();
        self.log.clear();
        self.ledger.reset();
        self.phase = SessionPhase::Idle;
        self.current_time = 0.0;
        self.audio_active = false;
    }

    /// Stop and immediately start a fresh run over the same chart.
    pub fn retry(&mut self) -> Result<()> {
        self.stop();
        self.start()
    }

    /// Results of the run, available once completed. Accuracy reports 0.0
    /// for a completed run in which nothing was judged.
    pub fn final_summary(&self) -> Option<PlaySummary> {
        if self.phase != SessionPhase::Completed {
            return None;
        }
        let accuracy = if self.ledger.total_judged() == 0 {
            0.0
        } else {
            self.ledger.accuracy()
        };
        Some(PlaySummary {
            score: self.ledger.score(),
            max_combo: self.ledger.max_combo(),
            tier_counts: self.ledger.tier_counts(),
            accuracy,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Performance time as of the last tick.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn note_states(&self) -> &[NoteState] {
        &self.states
    }

    pub fn chart(&self) -> Option<&Chart> {
        self.chart.as_ref()
    }

    pub fn input_log(&self) -> &InputLog {
        &self.log
    }

    /// False when the audio backend refused playback and the session is
    /// running silent.
    pub fn audio_active(&self) -> bool {
        self.audio_active
    }
}
