//! Master clock and judgment core for a rhythm game. Schedules notes against
//! an audio-derived performance clock, classifies player inputs within timing
//! tolerances, and maintains score/combo state.

pub mod clock;
pub mod config;
pub mod input;
pub mod judge;
pub mod model;
pub mod score;
pub mod session;
pub mod traits;
pub mod util;

pub use clock::MasterClock;
pub use config::EngineConfig;
pub use input::{InputLog, InputQueue};
pub use judge::{JudgeWindows, JudgmentOutcome, JudgmentTier, TimingSign};
pub use model::{Chart, ChartError, Note, NoteState};
pub use score::{LedgerDelta, ScoreLedger, ScoringRules};
pub use session::{PlaySummary, SessionController, SessionPhase};
pub use traits::audio::{AudioOutput, MockAudio, SilentAudio};
pub use traits::time::{MockTimeSource, SystemTimeSource, TimeSource};
