use super::time::{MockTimeSource, SystemTimeSource, TimeSource};

/// Abstraction over audio output backends.
///
/// The [`MasterClock`](crate::clock::MasterClock) owns the single instance;
/// no other component reads hardware time or touches playback directly.
pub trait AudioOutput: TimeSource {
    /// Begin playback `offset` seconds into the track.
    ///
    /// Returns `false` when the backend cannot play (missing or undecodable
    /// asset). Judgment does not require audible sound, so the engine keeps
    /// running silent on failure.
    fn start_playback(&mut self, offset: f64) -> bool;

    fn stop_playback(&mut self);
}

/// Playback-less backend driven by the host's monotonic clock.
///
/// Serves as the degraded mode when audio assets fail to load, and as the
/// test backend when paired with a [`MockTimeSource`].
pub struct SilentAudio<T: TimeSource> {
    time: T,
}

impl SilentAudio<SystemTimeSource> {
    pub fn new() -> Self {
        Self {
            time: SystemTimeSource::new(),
        }
    }
}

impl Default for SilentAudio<SystemTimeSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> SilentAudio<T> {
    pub fn with_time(time: T) -> Self {
        Self { time }
    }
}

impl<T: TimeSource> TimeSource for SilentAudio<T> {
    fn hardware_time(&self) -> f64 {
        self.time.hardware_time()
    }
}

impl<T: TimeSource> AudioOutput for SilentAudio<T> {
    fn start_playback(&mut self, _offset: f64) -> bool {
        true
    }

    fn stop_playback(&mut self) {}
}

/// Scriptable backend for tests: shared mock clock, optional playback failure.
pub struct MockAudio {
    time: MockTimeSource,
    fail_playback: bool,
    playing: bool,
    last_offset: Option<f64>,
}

impl MockAudio {
    pub fn new(time: MockTimeSource) -> Self {
        Self {
            time,
            fail_playback: false,
            playing: false,
            last_offset: None,
        }
    }

    /// Backend that refuses every start_playback call, simulating a missing
    /// or undecodable audio asset.
    pub fn failing(time: MockTimeSource) -> Self {
        Self {
            time,
            fail_playback: true,
            playing: false,
            last_offset: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Offset passed to the most recent start_playback call.
    pub fn last_offset(&self) -> Option<f64> {
        self.last_offset
    }
}

impl TimeSource for MockAudio {
    fn hardware_time(&self) -> f64 {
        self.time.hardware_time()
    }
}

impl AudioOutput for MockAudio {
    fn start_playback(&mut self, offset: f64) -> bool {
        self.last_offset = Some(offset);
        if self.fail_playback {
            return false;
        }
        self.playing = true;
        true
    }

    fn stop_playback(&mut self) {
        self.playing = false;
    }
}
