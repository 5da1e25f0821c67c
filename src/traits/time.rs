use std::cell::Cell;
use std::rc::Rc;

/// Abstraction over monotonic hardware clocks.
/// Implementations: SystemTimeSource (production), MockTimeSource (testing).
pub trait TimeSource {
    /// Current hardware time in seconds from an arbitrary epoch.
    fn hardware_time(&self) -> f64;
}

/// System time source using std::time::Instant.
pub struct SystemTimeSource {
    start: std::time::Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn hardware_time(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Mock time source for deterministic testing.
///
/// Clones share the same underlying clock, so a test can keep a handle while
/// the clock itself is owned by a [`MasterClock`](crate::clock::MasterClock).
#[derive(Clone)]
pub struct MockTimeSource {
    current: Rc<Cell<f64>>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current: Rc::new(Cell::new(0.0)),
        }
    }

    pub fn set_time(&self, secs: f64) {
        self.current.set(secs);
    }

    pub fn advance(&self, delta_secs: f64) {
        self.current.set(self.current.get() + delta_secs);
    }
}

impl Default for MockTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MockTimeSource {
    fn hardware_time(&self) -> f64 {
        self.current.get()
    }
}
