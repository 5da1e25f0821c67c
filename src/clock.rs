//! Master performance clock derived from the audio backend's hardware clock.
//!
//! Performance time is `hardware_time - anchor`. All scheduling and judgment
//! reads go through [`MasterClock::now`]; nothing else in the engine touches
//! hardware time.

use tracing::warn;

use crate::traits::audio::AudioOutput;
use crate::traits::time::TimeSource;

#[derive(Clone, Copy)]
enum ClockState {
    Stopped,
    Running {
        /// Hardware time corresponding to performance time zero.
        anchor: f64,
        /// Last performance time handed out. `now` never returns less.
        last: f64,
    },
    Paused {
        elapsed: f64,
    },
}

/// Anchored performance clock owning the audio backend.
pub struct MasterClock<A: AudioOutput> {
    audio: A,
    state: ClockState,
}

impl<A: AudioOutput> MasterClock<A> {
    pub fn new(audio: A) -> Self {
        Self {
            audio,
            state: ClockState::Stopped,
        }
    }

    /// Start the clock at performance time `offset` (may be negative for a
    /// countdown lead-in) and ask the backend to begin playback.
    ///
    /// Returns `false` when the backend refused playback; the clock still
    /// runs, so the caller can continue in silent mode.
    pub fn start(&mut self, offset: f64) -> bool {
        let playing = self.audio.start_playback(offset.max(0.0));
        if !playing {
            warn!(offset, "audio playback unavailable, running silent");
        }
        let hw = self.audio.hardware_time();
        self.state = ClockState::Running {
            anchor: hw - offset,
            last: offset,
        };
        playing
    }

    /// Current performance time in seconds.
    ///
    /// In the running state this clamps against backward hardware jumps:
    /// if the hardware clock reads earlier than the last value handed out,
    /// the anchor is recomputed so time holds steady and resumes forward.
    pub fn now(&mut self) -> f64 {
        match &mut self.state {
            ClockState::Stopped => 0.0,
            ClockState::Paused { elapsed } => *elapsed,
            ClockState::Running { anchor, last } => {
                let hw = self.audio.hardware_time();
                let mut t = hw - *anchor;
                if t < *last {
                    warn!(
                        observed = t,
                        held = *last,
                        "hardware clock moved backwards, re-anchoring"
                    );
                    *anchor = hw - *last;
                    t = *last;
                }
                *last = t;
                t
            }
        }
    }

    /// Freeze the clock at the current performance time and halt playback.
    /// No-op unless running.
    pub fn pause(&mut self) {
        if matches!(self.state, ClockState::Running { .. }) {
            let elapsed = self.now();
            self.audio.stop_playback();
            self.state = ClockState::Paused { elapsed };
        }
    }

    /// Resume from the paused position, re-anchoring against the hardware
    /// clock so no dead time leaks into performance time.
    ///
    /// Returns `false` when the backend refused playback. No-op (returning
    /// `true`) unless paused.
    pub fn resume(&mut self) -> bool {
        let ClockState::Paused { elapsed } = self.state else {
            return true;
        };
        let playing = self.audio.start_playback(elapsed.max(0.0));
        if !playing {
            warn!(elapsed, "audio playback unavailable on resume");
        }
        let hw = self.audio.hardware_time();
        self.state = ClockState::Running {
            anchor: hw - elapsed,
            last: elapsed,
        };
        playing
    }

    /// Halt playback and return to the stopped state.
    pub fn stop(&mut self) {
        self.audio.stop_playback();
        self.state = ClockState::Stopped;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running { .. })
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, ClockState::Paused { .. })
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }
}
