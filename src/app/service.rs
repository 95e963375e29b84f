//! Round service — the hexagonal core of one game round.
//!
//! [`RoundService`] owns the FSM and its context. It exposes a clean,
//! hardware-agnostic API: sample the lines the current state cares about,
//! tick the pure state logic, then dispatch whatever cues the handlers
//! queued. All I/O flows through port traits injected at call sites, making
//! the whole round testable with mock adapters.
//!
//! ```text
//!  InputBankPort ──▶ ┌──────────────────────────┐ ──▶ NotifierPort
//!                    │       RoundService        │
//!                    │  FSM · latches · cues     │ ──▶ EventSink
//!                    └──────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::SystemConfig;
use crate::error::Error;
use crate::fsm::context::{PENDING_CAP, RoundContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::sensors::CueName;

use super::events::AppEvent;
use super::ports::{EventSink, InputBankPort, NotifierPort};

// ───────────────────────────────────────────────────────────────
// RoundService
// ───────────────────────────────────────────────────────────────

/// One round from armed to complete. Dropped and rebuilt by the supervisor
/// after completion, which is what resets every latch.
pub struct RoundService {
    fsm: Fsm,
    ctx: RoundContext,
    tick_count: u64,
}

impl RoundService {
    /// Construct a fresh round from (validated) configuration.
    ///
    /// Does **not** arm the FSM — call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let ctx = RoundContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::AwaitingStart);
        Self {
            fsm,
            ctx,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Arm the round (runs `on_enter` for `AwaitingStart`).
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("Round armed in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full sweep: sample lines → FSM → dispatch cues.
    ///
    /// Which lines are sampled depends on the state — before the round has
    /// started, nothing but the start switch is polled.
    ///
    /// Cue dispatch is synchronous and blocks the loop for the duration of
    /// the HTTP call; the notify timeout is short relative to the poll
    /// interval, so this is the intended trade.
    pub fn tick(
        &mut self,
        inputs: &mut impl InputBankPort,
        notifier: &mut impl NotifierPort,
        sink: &mut impl EventSink,
    ) -> Result<(), Error> {
        self.tick_count += 1;
        let prev = self.fsm.current_state();

        // 1. Sample the lines this state observes. A read failure is fatal
        //    and propagates untouched.
        match prev {
            StateId::AwaitingStart => {
                let raw = inputs.read_line(0)?;
                self.ctx.bank.record_raw(0, raw);
            }
            StateId::Running => {
                for idx in 1..self.ctx.bank.len() {
                    let raw = inputs.read_line(idx)?;
                    self.ctx.bank.record_raw(idx, raw);
                }
            }
            StateId::Intro | StateId::Complete => {}
        }

        // 2. Pure state logic.
        self.fsm.tick(&mut self.ctx);

        // 3. Dispatch queued cues in queue order. Delivery failures are
        //    logged and dropped — never retried, never escalated.
        let pending: heapless::Vec<CueName, PENDING_CAP> = core::mem::take(&mut self.ctx.pending);
        for cue in &pending {
            sink.emit(&AppEvent::CueFired { cue: cue.clone() });
            if let Err(e) = notifier.notify(cue) {
                warn!("cue '{}' dropped: {}", cue, e);
                sink.emit(&AppEvent::CueDropped {
                    cue: cue.clone(),
                    reason: e,
                });
            }
        }

        // 4. Surface the transition, if any.
        let now = self.fsm.current_state();
        if now != prev {
            sink.emit(&AppEvent::StateChanged {
                from: prev,
                to: now,
            });
        }

        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Whether the round has reached its completion condition.
    pub fn is_complete(&self) -> bool {
        self.fsm.current_state() == StateId::Complete
    }

    /// Total sweeps executed this round.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::{InputError, NotifyError};
    use crate::config::SystemConfig;

    struct ScriptedBank {
        /// Raw levels per channel (active-low: false = pressed).
        raw: [bool; 4],
        /// Channel indices sampled, in call order.
        reads: Vec<usize>,
    }

    impl ScriptedBank {
        fn idle() -> Self {
            Self {
                raw: [true; 4],
                reads: Vec::new(),
            }
        }
    }

    impl InputBankPort for ScriptedBank {
        fn read_line(&mut self, index: usize) -> Result<bool, InputError> {
            self.reads.push(index);
            self.raw
                .get(index)
                .copied()
                .ok_or(InputError::UnknownLine { index })
        }
    }

    struct NullNotifier;
    impl NotifierPort for NullNotifier {
        fn notify(&mut self, _cue: &str) -> Result<(), NotifyError> {
            Ok(())
        }
    }

    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&mut self, _event: &AppEvent) {}
    }

    #[test]
    fn only_start_line_is_polled_before_the_round_starts() {
        let mut round = RoundService::new(SystemConfig::default());
        let mut bank = ScriptedBank::idle();
        round.start(&mut NullSink);

        for _ in 0..5 {
            round.tick(&mut bank, &mut NullNotifier, &mut NullSink).unwrap();
        }
        assert!(bank.reads.iter().all(|&idx| idx == 0));
    }

    #[test]
    fn no_line_is_polled_during_the_settle_window() {
        let config = SystemConfig {
            start_settle_ms: 500,
            ..Default::default()
        };
        let mut round = RoundService::new(config);
        let mut bank = ScriptedBank::idle();
        round.start(&mut NullSink);

        bank.raw[0] = false; // press start
        round.tick(&mut bank, &mut NullNotifier, &mut NullSink).unwrap();
        assert_eq!(round.state(), StateId::Intro);

        bank.reads.clear();
        round.tick(&mut bank, &mut NullNotifier, &mut NullSink).unwrap();
        assert!(bank.reads.is_empty());
    }

    #[test]
    fn read_failure_is_fatal_and_propagates() {
        let config = SystemConfig {
            start_settle_ms: 0,
            ..Default::default()
        };
        let mut round = RoundService::new(config);
        let mut bank = ScriptedBank::idle();
        round.start(&mut NullSink);

        bank.raw[0] = false; // press start
        round.tick(&mut bank, &mut NullNotifier, &mut NullSink).unwrap(); // -> Intro
        round.tick(&mut bank, &mut NullNotifier, &mut NullSink).unwrap(); // -> Running
        assert_eq!(round.state(), StateId::Running);

        struct BrokenBank;
        impl InputBankPort for BrokenBank {
            fn read_line(&mut self, index: usize) -> Result<bool, InputError> {
                Err(InputError::UnknownLine { index })
            }
        }
        let err = round
            .tick(&mut BrokenBank, &mut NullNotifier, &mut NullSink)
            .unwrap_err();
        assert_eq!(err, Error::Input(InputError::UnknownLine { index: 1 }));
    }
}
