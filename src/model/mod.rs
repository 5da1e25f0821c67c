//! Chart data model: scheduled notes and their per-run judgment state.

mod chart;

pub use chart::{Chart, ChartError, Note, NoteState};
