//! Input capture: a FIFO queue of performance-time stamps awaiting judgment,
//! and an append-only log of every stamp accepted during a run (replay data).

use serde::{Deserialize, Serialize};

/// Pending hit inputs, stamped with performance time at trigger.
///
/// Inputs are judged in arrival order, one tick later at the earliest, so a
/// burst of triggers between ticks resolves deterministically.
#[derive(Debug, Default)]
pub struct InputQueue {
    stamps: Vec<f64>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stamp: f64) {
        self.stamps.push(stamp);
    }

    /// Take every pending stamp, oldest first, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<f64> {
        std::mem::take(&mut self.stamps)
    }

    pub fn clear(&mut self) {
        self.stamps.clear();
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

/// Every input stamp judged during a run, in judgment order.
///
/// Feeding the log back through a fresh session with the same chart and
/// config reproduces the run exactly.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct InputLog {
    stamps: Vec<f64>,
}

impl InputLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stamp: f64) {
        self.stamps.push(stamp);
    }

    pub fn stamps(&self) -> &[f64] {
        &self.stamps
    }

    pub fn clear(&mut self) {
        self.stamps.clear();
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_arrival_order() {
        let mut queue = InputQueue::new();
        queue.push(1.0);
        queue.push(0.5);
        queue.push(2.0);
        assert_eq!(queue.drain(), vec![1.0, 0.5, 2.0]);
        assert!(queue.is_empty());
    }

    #[test]
    fn drain_on_empty_queue_yields_nothing() {
        let mut queue = InputQueue::new();
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn log_round_trips_through_json() {
        let mut log = InputLog::new();
        log.record(1.01);
        log.record(2.07);
        let json = serde_json::to_string(&log).unwrap();
        let restored: InputLog = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.stamps(), log.stamps());
    }
}
