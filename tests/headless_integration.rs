use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use empatia::catalog::RoundCatalog;
use empatia::engine::{EngineConfig, Phase, SessionEngine};
use empatia::presentation::{RecordingNavigation, RecordingPresentation, ResultSink};
use empatia::projector::{Projector, ProjectorStyle};
use empatia::runtime::{FixedTicker, KioskEvent, Runner, TestEventSource};
use empatia::scoring::SkillVector;
use empatia::tracker::WordTracker;

// Headless integration using the internal runtime + SessionEngine without a
// TTY. Drives a complete session through Runner/TestEventSource with the same
// key mapping the kiosk loop uses.

#[derive(Default)]
struct CaptureSink {
    submitted: Mutex<Vec<SkillVector>>,
}

impl ResultSink for CaptureSink {
    fn submit(&self, skills: SkillVector) {
        self.submitted.lock().unwrap().push(skills);
    }
}

fn headless_engine() -> (SessionEngine, Arc<CaptureSink>) {
    let sink = Arc::new(CaptureSink::default());
    let engine = SessionEngine::new(
        RoundCatalog::builtin(),
        Arc::new(WordTracker::new()),
        Projector::new(12, ProjectorStyle::default()),
        Box::new(RecordingPresentation::new()),
        Box::new(RecordingNavigation::default()),
        sink.clone(),
        EngineConfig {
            fade_secs: 0.05,
            cloud_anim_secs: 0.05,
            confirm_label: "Confirmar".into(),
            continue_label: "Continuar".into(),
            follow_up_prompt: "Qual sua opinião sobre isso?".into(),
            results_screen: "results".into(),
        },
    );
    (engine, sink)
}

fn key(code: KeyCode) -> KioskEvent {
    KioskEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

/// Runs the kiosk loop headlessly, answering every round by toggling the
/// given digit keys before confirming. Returns when the session completes
/// or the step budget runs out.
fn drive_session(engine: &mut SessionEngine, digits: &[char]) {
    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(1));
    let runner = Runner::new(es, ticker);

    let mut keyed_round = None;
    let mut continued_round = None;

    for _ in 0..2000u32 {
        match runner.step() {
            KioskEvent::Tick => engine.on_tick(0.05),
            KioskEvent::Key(key) => match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                    engine.toggle_selection((c as usize) - ('1' as usize));
                }
                KeyCode::Enter => engine.confirm(),
                _ => {}
            },
            KioskEvent::Card(_) | KioskEvent::Resize => {}
        }

        match engine.phase() {
            Phase::AwaitingSelection if keyed_round != Some(engine.current_round()) => {
                keyed_round = Some(engine.current_round());
                for c in digits {
                    tx.send(key(KeyCode::Char(*c))).unwrap();
                }
                tx.send(key(KeyCode::Enter)).unwrap();
            }
            Phase::ShowingSummary if continued_round != Some(engine.current_round()) => {
                continued_round = Some(engine.current_round());
                tx.send(key(KeyCode::Enter)).unwrap();
            }
            Phase::Completed => break,
            _ => {}
        }
    }
}

#[test]
fn headless_session_with_all_words_reports_top_band() {
    let (mut engine, sink) = headless_engine();
    engine.begin_session();

    // every word selected: all 4 empathic choices per round count
    drive_session(&mut engine, &['1', '2', '3', '4', '5', '6', '7', '8']);

    assert_eq!(engine.phase(), Phase::Completed);
    assert_eq!(engine.cumulative_score(), 12);
    assert_eq!(
        sink.submitted.lock().unwrap().as_slice(),
        &[SkillVector {
            empathy: 9,
            active_listening: 7,
            self_awareness: 5,
        }]
    );
}

#[test]
fn headless_session_with_no_words_reports_bottom_band() {
    let (mut engine, sink) = headless_engine();
    engine.begin_session();

    drive_session(&mut engine, &[]);

    assert_eq!(engine.phase(), Phase::Completed);
    assert_eq!(engine.cumulative_score(), 0);
    assert_eq!(engine.tracker().tracked_count(), 0);
    assert_eq!(
        sink.submitted.lock().unwrap().as_slice(),
        &[SkillVector {
            empathy: 7,
            active_listening: 5,
            self_awareness: 3,
        }]
    );
}

#[test]
fn headless_restart_mid_session_replays_from_round_zero() {
    let (mut engine, sink) = headless_engine();
    engine.begin_session();

    // finish round 0, then an attendant restarts the kiosk
    engine.on_tick(0.1);
    engine.toggle_selection(0);
    engine.confirm();
    engine.begin_session();

    drive_session(&mut engine, &['1', '2', '3', '4', '5', '6', '7', '8']);

    assert_eq!(engine.phase(), Phase::Completed);
    assert_eq!(engine.cumulative_score(), 12);
    // only the full replay reported; the aborted run never completed
    assert_eq!(sink.submitted.lock().unwrap().len(), 1);
    // the aborted round's word is still in the shared tracker
    assert!(engine.tracker().score("Adaptação") >= 1);
}
