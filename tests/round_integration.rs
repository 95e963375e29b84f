//! Integration tests: RoundService / RoundSupervisor → ports.
//!
//! Everything runs against mock adapters; the scenarios mirror how the
//! deployed room behaves (active-low switches, Houdini cue sequence).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use propsense::app::events::AppEvent;
use propsense::app::ports::{EventSink, InputBankPort, InputError, NotifierPort, NotifyError};
use propsense::app::service::RoundService;
use propsense::app::supervisor::RoundSupervisor;
use propsense::config::{CompletionPolicy, SystemConfig};
use propsense::error::Error;
use propsense::fsm::StateId;

// ── Mock implementations ──────────────────────────────────────

/// Raw levels the test mutates between ticks. Active-low wiring:
/// `false` = switch pressed.
struct ScriptedBank {
    raw: [bool; 4],
    released: Option<Arc<AtomicBool>>,
}

impl ScriptedBank {
    fn idle() -> Self {
        Self {
            raw: [true; 4],
            released: None,
        }
    }

    fn all_pressed(released: Arc<AtomicBool>) -> Self {
        Self {
            raw: [false; 4],
            released: Some(released),
        }
    }

    fn press(&mut self, idx: usize) {
        self.raw[idx] = false;
    }

    fn release(&mut self, idx: usize) {
        self.raw[idx] = true;
    }
}

impl InputBankPort for ScriptedBank {
    fn read_line(&mut self, index: usize) -> Result<bool, InputError> {
        self.raw
            .get(index)
            .copied()
            .ok_or(InputError::UnknownLine { index })
    }
}

impl Drop for ScriptedBank {
    fn drop(&mut self) {
        if let Some(flag) = &self.released {
            flag.store(true, Ordering::SeqCst);
        }
    }
}

/// A bank whose reads always fail (wiring fault).
struct BrokenBank {
    released: Arc<AtomicBool>,
}

impl InputBankPort for BrokenBank {
    fn read_line(&mut self, index: usize) -> Result<bool, InputError> {
        Err(InputError::UnknownLine { index })
    }
}

impl Drop for BrokenBank {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

struct RecordingNotifier {
    sent: Vec<String>,
    fail_cue: Option<&'static str>,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self {
            sent: Vec::new(),
            fail_cue: None,
        }
    }

    fn failing_on(cue: &'static str) -> Self {
        Self {
            sent: Vec::new(),
            fail_cue: Some(cue),
        }
    }
}

impl NotifierPort for RecordingNotifier {
    fn notify(&mut self, cue: &str) -> Result<(), NotifyError> {
        self.sent.push(cue.to_owned());
        if self.fail_cue == Some(cue) {
            return Err(NotifyError::Transport);
        }
        Ok(())
    }
}

struct VecSink {
    events: Vec<AppEvent>,
}

impl VecSink {
    fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl EventSink for VecSink {
    fn emit(&mut self, e: &AppEvent) {
        self.events.push(e.clone());
    }
}

// ── Helpers ───────────────────────────────────────────────────

fn test_config(policy: CompletionPolicy, settle_ms: u32) -> SystemConfig {
    SystemConfig {
        completion: policy,
        start_settle_ms: settle_ms,
        poll_interval_ms: 100,
        ..Default::default()
    }
}

fn armed_round(config: SystemConfig, sink: &mut VecSink) -> RoundService {
    let mut round = RoundService::new(config);
    round.start(sink);
    round
}

// ── The deployed-room scenario (terminal policy) ──────────────

#[test]
fn full_round_fires_cues_in_sweep_order_and_completes_on_usine() {
    let mut sink = VecSink::new();
    let mut round = armed_round(test_config(CompletionPolicy::TerminalSensor, 0), &mut sink);
    let mut bank = ScriptedBank::idle();
    let mut notifier = RecordingNotifier::new();

    // Nobody has pressed start yet.
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    assert_eq!(round.state(), StateId::AwaitingStart);
    assert!(notifier.sent.is_empty());

    // Start pressed; settle is zero so intro follows on the next tick.
    bank.press(0);
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    assert_eq!(round.state(), StateId::Running);
    assert_eq!(notifier.sent, ["start", "intro"]);

    // Tick 1 of play: only maya is triggered.
    bank.press(1);
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    assert_eq!(round.state(), StateId::Running);
    assert_eq!(notifier.sent, ["start", "intro", "maya"]);

    // Tick 2: console and usine close in the same sweep — both fire, in
    // sweep order, and usine ends the round.
    bank.press(2);
    bank.press(3);
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    assert_eq!(round.state(), StateId::Complete);
    assert_eq!(
        notifier.sent,
        ["start", "intro", "maya", "console", "usine"],
        "maya must not repeat; console precedes usine"
    );
}

#[test]
fn held_switch_fires_exactly_once() {
    let mut sink = VecSink::new();
    let mut round = armed_round(test_config(CompletionPolicy::TerminalSensor, 0), &mut sink);
    let mut bank = ScriptedBank::idle();
    let mut notifier = RecordingNotifier::new();

    bank.press(0);
    bank.press(1); // maya held down the whole time
    for _ in 0..20 {
        round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    }
    let maya_count = notifier.sent.iter().filter(|c| c.as_str() == "maya").count();
    assert_eq!(maya_count, 1);
}

#[test]
fn released_and_retriggered_switch_does_not_refire() {
    let mut sink = VecSink::new();
    let mut round = armed_round(test_config(CompletionPolicy::TerminalSensor, 0), &mut sink);
    let mut bank = ScriptedBank::idle();
    let mut notifier = RecordingNotifier::new();

    bank.press(0);
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();

    bank.press(1);
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    bank.release(1);
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    bank.press(1);
    for _ in 0..5 {
        round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    }

    let maya_count = notifier.sent.iter().filter(|c| c.as_str() == "maya").count();
    assert_eq!(maya_count, 1, "true/false/true must not produce a second cue");
}

// ── start → settle → intro ordering ───────────────────────────

#[test]
fn intro_follows_start_after_the_settle_window() {
    let mut sink = VecSink::new();
    let mut round = armed_round(test_config(CompletionPolicy::TerminalSensor, 500), &mut sink);
    let mut bank = ScriptedBank::idle();
    let mut notifier = RecordingNotifier::new();

    // Hold a game switch active before the round even starts — it must not
    // fire before RUNNING.
    bank.press(1);
    bank.press(0);
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    assert_eq!(notifier.sent, ["start"]);
    assert_eq!(round.state(), StateId::Intro);

    // 500 ms at 100 ms/tick: four waiting ticks, intro on the fifth.
    let mut intro_ticks = 0;
    while round.state() == StateId::Intro {
        round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
        intro_ticks += 1;
        assert!(intro_ticks < 20, "intro never fired");
    }
    assert_eq!(intro_ticks, 5);
    assert_eq!(notifier.sent, ["start", "intro"]);

    // Only now does the held switch report.
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    assert_eq!(notifier.sent, ["start", "intro", "maya"]);
}

// ── Completion policies ───────────────────────────────────────

#[test]
fn all_sensors_policy_completes_only_when_every_channel_latched() {
    let mut sink = VecSink::new();
    let mut round = armed_round(test_config(CompletionPolicy::AllSensors, 0), &mut sink);
    let mut bank = ScriptedBank::idle();
    let mut notifier = RecordingNotifier::new();

    bank.press(0);
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();

    // usine alone does not end the round under this policy.
    bank.press(3);
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    assert_eq!(round.state(), StateId::Running);

    bank.press(1);
    bank.press(2);
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    assert_eq!(round.state(), StateId::Complete);
}

// ── Notification fault tolerance ──────────────────────────────

#[test]
fn dropped_cue_neither_blocks_nor_retries() {
    let mut sink = VecSink::new();
    let mut round = armed_round(test_config(CompletionPolicy::TerminalSensor, 0), &mut sink);
    let mut bank = ScriptedBank::idle();
    let mut notifier = RecordingNotifier::failing_on("maya");

    bank.press(0);
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    bank.press(1);
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();
    bank.press(3);
    round.tick(&mut bank, &mut notifier, &mut sink).unwrap();

    assert_eq!(round.state(), StateId::Complete, "round survives the fault");
    let maya_attempts = notifier.sent.iter().filter(|c| c.as_str() == "maya").count();
    assert_eq!(maya_attempts, 1, "failed cues are never retried");
    assert!(
        sink.events
            .iter()
            .any(|e| matches!(e, AppEvent::CueDropped { cue, .. } if cue.as_str() == "maya")),
        "the drop is surfaced to the sink"
    );
}

// ── Supervisor: reset, re-claim, release ──────────────────────

fn fast_config() -> SystemConfig {
    SystemConfig {
        completion: CompletionPolicy::TerminalSensor,
        start_settle_ms: 0,
        poll_interval_ms: 1,
        ..Default::default()
    }
}

#[test]
fn each_round_starts_with_fresh_latches_and_a_fresh_claim() {
    let mut supervisor = RoundSupervisor::new(fast_config()).unwrap();
    let mut notifier = RecordingNotifier::new();
    let mut sink = VecSink::new();

    let claims = Arc::new(AtomicBool::new(false));
    let mut claim_count = 0u32;
    let mut claim = || {
        claim_count += 1;
        Ok(ScriptedBank::all_pressed(Arc::clone(&claims)))
    };

    supervisor.run_round(&mut claim, &mut notifier, &mut sink).unwrap();
    supervisor.run_round(&mut claim, &mut notifier, &mut sink).unwrap();

    assert_eq!(claim_count, 2, "one scoped claim per round");
    assert_eq!(supervisor.rounds_completed(), 2);
    let expected = ["start", "intro", "maya", "console", "usine"];
    assert_eq!(notifier.sent.len(), expected.len() * 2);
    assert_eq!(&notifier.sent[..expected.len()], &expected);
    assert_eq!(
        &notifier.sent[expected.len()..],
        &expected,
        "second round repeats the full sequence — no latch leaks across rounds"
    );
}

#[test]
fn lines_are_released_before_a_fatal_fault_propagates() {
    let mut supervisor = RoundSupervisor::new(fast_config()).unwrap();
    let mut notifier = RecordingNotifier::new();
    let mut sink = VecSink::new();

    let released = Arc::new(AtomicBool::new(false));
    let released_probe = Arc::clone(&released);
    let mut claim = || {
        Ok(BrokenBank {
            released: Arc::clone(&released),
        })
    };

    let err = supervisor
        .run_round(&mut claim, &mut notifier, &mut sink)
        .unwrap_err();
    assert!(matches!(err, Error::Input(_)));
    assert!(
        released_probe.load(Ordering::SeqCst),
        "the claim must be released even on the fatal path"
    );
    assert_eq!(supervisor.rounds_completed(), 0);
}

#[test]
fn supervisor_rejects_invalid_configuration() {
    let config = SystemConfig {
        sensors: heapless::Vec::new(),
        ..Default::default()
    };
    assert!(matches!(
        RoundSupervisor::new(config),
        Err(Error::Config(_))
    ));
}
