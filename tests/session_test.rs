//! End-to-end session tests driving the controller through a full run with
//! a scripted clock.

use rhythm_core::{
    Chart, EngineConfig, JudgmentTier, MockAudio, MockTimeSource, Note, NoteState,
    SessionController, SessionPhase, SilentAudio, TimeSource, TimingSign,
};

fn make_chart(times: &[f64]) -> Chart {
    let notes = times.iter().copied().map(Note::at).collect();
    Chart::new("integration", 120.0, 0.0, notes).unwrap()
}

fn make_session() -> (
    MockTimeSource,
    SessionController<SilentAudio<MockTimeSource>>,
) {
    let ts = MockTimeSource::new();
    let session =
        SessionController::new(EngineConfig::normal(), SilentAudio::with_time(ts.clone()));
    (ts, session)
}

#[test]
fn full_run_scores_and_completes() {
    let (ts, mut session) = make_session();
    session.load_chart(make_chart(&[1.0, 2.0, 3.0])).unwrap();
    session.start().unwrap();

    // Countdown: clock starts at -1.0 and counts up through zero.
    assert_eq!(session.phase(), SessionPhase::Countdown);
    ts.set_time(0.5);
    assert!(session.tick().is_empty());
    ts.set_time(1.0);
    session.tick();
    assert_eq!(session.phase(), SessionPhase::Running);

    // 10 ms late on the first note.
    ts.set_time(2.01);
    session.trigger();
    let deltas = session.tick();
    assert_eq!(deltas.len(), 1);
    assert_eq!(deltas[0].outcome.tier, JudgmentTier::Perfect);
    assert_eq!(deltas[0].outcome.sign, TimingSign::Late);
    assert_eq!(deltas[0].awarded, 1000);
    assert_eq!(deltas[0].combo, 1);

    // 70 ms late on the second note.
    ts.set_time(3.07);
    session.trigger();
    let deltas = session.tick();
    assert_eq!(deltas.len(), 1);
    assert_eq!(deltas[0].outcome.tier, JudgmentTier::Good);
    assert_eq!(deltas[0].combo, 2);

    // A whiff long after the last note; the sweep expires it in the same
    // tick, breaking the combo.
    ts.set_time(5.5);
    session.trigger();
    let deltas = session.tick();
    assert_eq!(deltas.len(), 1);
    assert_eq!(deltas[0].outcome.tier, JudgmentTier::Miss);
    assert!(deltas[0].combo_broken);
    assert_eq!(deltas[0].combo, 0);

    // All notes resolved, but the grace period after the last note has not
    // elapsed yet at performance time 4.5.
    assert_eq!(session.phase(), SessionPhase::Running);

    ts.set_time(6.1);
    session.tick();
    assert_eq!(session.phase(), SessionPhase::Completed);

    let summary = session.final_summary().unwrap();
    assert_eq!(summary.score, 1500);
    assert_eq!(summary.max_combo, 2);
    assert_eq!(summary.tier_counts, [1, 0, 1, 1]);
    assert_eq!(summary.accuracy, 50.0);
}

#[test]
fn summary_reflects_tier_weights() {
    let (ts, mut session) = make_session();
    session.load_chart(make_chart(&[1.0, 2.0])).unwrap();
    session.start().unwrap();
    ts.set_time(1.0);
    session.tick();

    // Exact hit, then 40 ms early.
    ts.set_time(2.0);
    session.trigger();
    session.tick();
    ts.set_time(2.96);
    session.trigger();
    let deltas = session.tick();
    assert_eq!(deltas[0].outcome.tier, JudgmentTier::Great);
    assert_eq!(deltas[0].outcome.sign, TimingSign::Early);

    ts.set_time(5.1);
    session.tick();
    let summary = session.final_summary().unwrap();
    assert_eq!(summary.score, 1800);
    assert_eq!(summary.tier_counts, [1, 1, 0, 0]);
    // (100 + 80) / 2 = 90.0
    assert_eq!(summary.accuracy, 90.0);
}

#[test]
fn inputs_between_ticks_resolve_in_arrival_order() {
    let (ts, mut session) = make_session();
    session.load_chart(make_chart(&[1.0, 1.0])).unwrap();
    session.start().unwrap();
    ts.set_time(1.0);
    session.tick();

    // Two triggers land between ticks; both bind, chord order by index.
    ts.set_time(2.0);
    session.trigger();
    session.trigger();
    let deltas = session.tick();
    assert_eq!(deltas.len(), 2);
    assert_eq!(deltas[0].combo, 1);
    assert_eq!(deltas[1].combo, 2);
    assert!(session.note_states().iter().all(NoteState::is_resolved));
}

#[test]
fn pause_excludes_wall_time_from_judgment() {
    let (ts, mut session) = make_session();
    session.load_chart(make_chart(&[1.0, 3.0])).unwrap();
    session.start().unwrap();
    ts.set_time(1.0);
    session.tick();

    // An input captured just before the pause stays queued with its
    // original stamp, 40 ms early on the first note.
    ts.set_time(1.96);
    session.trigger();
    session.pause();
    assert_eq!(session.phase(), SessionPhase::Paused);
    assert!(session.tick().is_empty());

    // A long wall-clock gap while paused must not expire anything.
    ts.advance(300.0);
    session.resume();
    assert_eq!(session.phase(), SessionPhase::Running);
    let deltas = session.tick();
    // Performance time resumes from the pause moment, not the wall clock.
    assert!((session.current_time() - 0.96).abs() < 1e-9);
    assert_eq!(deltas.len(), 1);
    assert_eq!(deltas[0].outcome.tier, JudgmentTier::Great);
    assert_eq!(deltas[0].outcome.sign, TimingSign::Early);

    // The clock picks up from the frozen value.
    ts.advance(2.04);
    session.trigger();
    let deltas = session.tick();
    assert_eq!(deltas.len(), 1);
    assert_eq!(deltas[0].outcome.tier, JudgmentTier::Perfect);
}

#[test]
fn backward_hardware_jump_does_not_rewind_session() {
    let (ts, mut session) = make_session();
    session.load_chart(make_chart(&[1.0])).unwrap();
    session.start().unwrap();
    ts.set_time(3.0);
    session.tick();
    let before = session.current_time();

    // Hardware clock glitches backwards by half a second.
    ts.set_time(2.5);
    session.tick();
    assert_eq!(session.current_time(), before);

    ts.set_time(2.6);
    session.tick();
    assert!(session.current_time() > before);
}

#[test]
fn failed_audio_runs_session_silent() {
    let ts = MockTimeSource::new();
    let mut session =
        SessionController::new(EngineConfig::normal(), MockAudio::failing(ts.clone()));
    session.load_chart(make_chart(&[1.0])).unwrap();
    session.start().unwrap();
    assert!(!session.audio_active());

    ts.set_time(1.0);
    session.tick();
    ts.set_time(2.0);
    session.trigger();
    let deltas = session.tick();
    assert_eq!(deltas[0].outcome.tier, JudgmentTier::Perfect);
}

#[test]
fn replaying_the_input_log_reproduces_the_run() {
    let (ts, mut session) = make_session();
    session.load_chart(make_chart(&[1.0, 2.0, 3.0])).unwrap();
    session.start().unwrap();
    ts.set_time(1.0);
    session.tick();
    for hw in [2.02, 2.95, 4.08] {
        ts.set_time(hw);
        session.trigger();
        session.tick();
    }
    ts.set_time(6.5);
    session.tick();
    let summary = session.final_summary().unwrap();
    let log = session.input_log().clone();

    // Drive a fresh session to the same performance-time stamps.
    let (ts2, mut replay) = make_session();
    replay.load_chart(make_chart(&[1.0, 2.0, 3.0])).unwrap();
    replay.start().unwrap();
    ts2.set_time(1.0);
    replay.tick();
    for &stamp in log.stamps() {
        ts2.set_time(stamp + 1.0);
        replay.trigger();
        replay.tick();
    }
    ts2.set_time(6.5);
    replay.tick();

    assert_eq!(replay.final_summary().unwrap(), summary);
    assert_eq!(replay.input_log().len(), log.len());
}

#[test]
fn retry_after_completion_starts_pristine() {
    let (ts, mut session) = make_session();
    session.load_chart(make_chart(&[1.0])).unwrap();
    session.start().unwrap();
    ts.set_time(1.0);
    session.tick();
    ts.set_time(2.0);
    session.trigger();
    session.tick();
    ts.set_time(4.1);
    session.tick();
    assert_eq!(session.phase(), SessionPhase::Completed);
    assert!(session.ledger().score() > 0);

    // Retry drops all run state and goes straight back into the countdown.
    session.retry().unwrap();
    assert_eq!(session.phase(), SessionPhase::Countdown);
    assert_eq!(session.ledger().score(), 0);
    assert!(session.note_states().iter().all(NoteState::is_unjudged));
    assert!(session.input_log().is_empty());

    // Second run over the same chart behaves identically.
    let base = ts.hardware_time();
    ts.set_time(base + 1.0);
    session.tick();
    assert_eq!(session.phase(), SessionPhase::Running);
    ts.set_time(base + 2.0);
    session.trigger();
    let deltas = session.tick();
    assert_eq!(deltas.len(), 1);
    assert_eq!(deltas[0].outcome.tier, JudgmentTier::Perfect);
    assert_eq!(deltas[0].awarded, 1000);
}
