use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::judge::JudgmentOutcome;

/// A single scheduled hit target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Performance time at which the note should be hit, in seconds.
    pub scheduled_time: f64,
}

impl Note {
    pub fn at(scheduled_time: f64) -> Self {
        Self { scheduled_time }
    }
}

/// Per-run resolution of a note. Written at most once per run: a resolved
/// note never changes again until the session is reset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NoteState {
    #[default]
    Unjudged,
    Hit(JudgmentOutcome),
    Missed,
}

impl NoteState {
    pub fn is_unjudged(&self) -> bool {
        matches!(self, NoteState::Unjudged)
    }

    pub fn is_resolved(&self) -> bool {
        !self.is_unjudged()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("tempo must be positive, got {0}")]
    NonPositiveTempo(f64),
    #[error("start offset must be finite and non-negative, got {0}")]
    InvalidStartOffset(f64),
    #[error("note {index} has invalid scheduled time {time}")]
    InvalidNoteTime { index: usize, time: f64 },
    #[error("note {index} at {time} is scheduled before its predecessor at {prev}")]
    NonMonotonic { index: usize, time: f64, prev: f64 },
}

/// An immutable, validated note schedule.
///
/// Construction enforces the invariants the judgment engine relies on:
/// finite non-negative note times in non-decreasing order. Equal times are
/// allowed (chords); the tie-break in judgment favors the earlier index.
#[derive(Debug, Clone)]
pub struct Chart {
    title: String,
    tempo: f64,
    start_offset: f64,
    notes: Vec<Note>,
}

impl Chart {
    pub fn new(
        title: impl Into<String>,
        tempo: f64,
        start_offset: f64,
        notes: Vec<Note>,
    ) -> Result<Self, ChartError> {
        if !tempo.is_finite() || tempo <= 0.0 {
            return Err(ChartError::NonPositiveTempo(tempo));
        }
        if !start_offset.is_finite() || start_offset < 0.0 {
            return Err(ChartError::InvalidStartOffset(start_offset));
        }
        let mut prev = f64::NEG_INFINITY;
        for (index, note) in notes.iter().enumerate() {
            let time = note.scheduled_time;
            if !time.is_finite() || time < 0.0 {
                return Err(ChartError::InvalidNoteTime { index, time });
            }
            if time < prev {
                return Err(ChartError::NonMonotonic { index, time, prev });
            }
            prev = time;
        }
        Ok(Self {
            title: title.into(),
            tempo,
            start_offset,
            notes,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Beats per minute, informational only; notes carry absolute times.
    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    /// Performance time of the first beat, i.e. where playback should begin
    /// once the countdown lead-in has elapsed.
    pub fn start_offset(&self) -> f64 {
        self.start_offset
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Scheduled time of the final note, if any.
    pub fn last_scheduled_time(&self) -> Option<f64> {
        self.notes.last().map(|n| n.scheduled_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(times: &[f64]) -> Vec<Note> {
        times.iter().copied().map(Note::at).collect()
    }

    #[test]
    fn accepts_sorted_notes() {
        let chart = Chart::new("test", 120.0, 0.0, notes(&[0.5, 1.0, 1.0, 2.5])).unwrap();
        assert_eq!(chart.len(), 4);
        assert_eq!(chart.last_scheduled_time(), Some(2.5));
    }

    #[test]
    fn accepts_empty_chart() {
        let chart = Chart::new("empty", 120.0, 0.0, vec![]).unwrap();
        assert!(chart.is_empty());
        assert_eq!(chart.last_scheduled_time(), None);
    }

    #[test]
    fn rejects_unsorted_notes() {
        let err = Chart::new("bad", 120.0, 0.0, notes(&[1.0, 0.5])).unwrap_err();
        assert_eq!(
            err,
            ChartError::NonMonotonic {
                index: 1,
                time: 0.5,
                prev: 1.0
            }
        );
    }

    #[test]
    fn rejects_negative_note_time() {
        let err = Chart::new("bad", 120.0, 0.0, notes(&[-0.1])).unwrap_err();
        assert_eq!(
            err,
            ChartError::InvalidNoteTime {
                index: 0,
                time: -0.1
            }
        );
    }

    #[test]
    fn rejects_nan_note_time() {
        let err = Chart::new("bad", 120.0, 0.0, notes(&[f64::NAN])).unwrap_err();
        assert!(matches!(err, ChartError::InvalidNoteTime { index: 0, .. }));
    }

    #[test]
    fn rejects_non_positive_tempo() {
        assert_eq!(
            Chart::new("bad", 0.0, 0.0, vec![]).unwrap_err(),
            ChartError::NonPositiveTempo(0.0)
        );
        assert_eq!(
            Chart::new("bad", -60.0, 0.0, vec![]).unwrap_err(),
            ChartError::NonPositiveTempo(-60.0)
        );
    }

    #[test]
    fn rejects_negative_start_offset() {
        assert_eq!(
            Chart::new("bad", 120.0, -1.0, vec![]).unwrap_err(),
            ChartError::InvalidStartOffset(-1.0)
        );
    }

    #[test]
    fn note_state_resolution_flags() {
        assert!(NoteState::Unjudged.is_unjudged());
        assert!(!NoteState::Unjudged.is_resolved());
        assert!(NoteState::Missed.is_resolved());
    }
}
