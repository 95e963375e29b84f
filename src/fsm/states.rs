//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers — no closures, no dynamic
//! dispatch, no heap. This is the classic embedded C FSM pattern expressed
//! in safe Rust.
//!
//! ```text
//!  AWAITING_START ──[start switch active]──▶ INTRO
//!                                              │
//!                                    [settle elapsed → "intro"]
//!                                              ▼
//!       COMPLETE ◀──[completion policy]──── RUNNING ──┐
//!                                              ▲      │ sweep channels,
//!                                              └──────┘ latch + queue cues
//! ```
//!
//! Handlers only consume levels already sampled into the context by the
//! service; they never touch hardware. Cues are queued on the context and
//! dispatched by the service after the tick, so a transition and its cues
//! always land in the same tick.

use log::info;

use super::context::RoundContext;
use super::{StateDescriptor, StateId};
use crate::config::CompletionPolicy;
use crate::sensors::cue;

/// Cue sent when the settle window closes; masks the room's opening sound.
const INTRO_CUE: &str = "intro";

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table. Called once per round.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — AwaitingStart
        StateDescriptor {
            id: StateId::AwaitingStart,
            name: "AwaitingStart",
            on_enter: Some(awaiting_start_enter),
            on_exit: None,
            on_update: awaiting_start_update,
        },
        // Index 1 — Intro
        StateDescriptor {
            id: StateId::Intro,
            name: "Intro",
            on_enter: Some(intro_enter),
            on_exit: None,
            on_update: intro_update,
        },
        // Index 2 — Running
        StateDescriptor {
            id: StateId::Running,
            name: "Running",
            on_enter: Some(running_enter),
            on_exit: None,
            on_update: running_update,
        },
        // Index 3 — Complete
        StateDescriptor {
            id: StateId::Complete,
            name: "Complete",
            on_enter: Some(complete_enter),
            on_exit: None,
            on_update: complete_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  AWAITING_START — armed, only the start switch is sampled
// ═══════════════════════════════════════════════════════════════════════════

fn awaiting_start_enter(_ctx: &mut RoundContext) {
    info!("AWAITING_START: armed, waiting for the start switch");
}

fn awaiting_start_update(ctx: &mut RoundContext) -> Option<StateId> {
    // The start switch goes through the same one-shot latch as every other
    // channel, so a held button cannot re-trigger later in the round.
    let fired = ctx.bank.start_mut().check_and_fire();
    if let Some(start_cue) = fired {
        info!("Start switch pressed.");
        ctx.queue_cue(start_cue);
        return Some(StateId::Intro);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  INTRO — settle window between the start and intro cues
// ═══════════════════════════════════════════════════════════════════════════

fn intro_enter(ctx: &mut RoundContext) {
    info!(
        "INTRO: settling {} ms before the intro cue",
        ctx.config.start_settle_ms
    );
}

fn intro_update(ctx: &mut RoundContext) -> Option<StateId> {
    if ctx.ms_in_state() >= u64::from(ctx.config.start_settle_ms) {
        ctx.queue_cue(cue(INTRO_CUE));
        return Some(StateId::Running);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING — sweep the game channels, latch and report triggers
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut RoundContext) {
    info!("RUNNING: sweeping {} game channels", ctx.bank.len() - 1);
}

fn running_update(ctx: &mut RoundContext) -> Option<StateId> {
    // Fixed sweep order (insertion order). Two switches closing in the same
    // tick both fire, in this order — no coalescing.
    for idx in 1..ctx.bank.len() {
        let fired = ctx.bank.channel_mut(idx).and_then(|ch| ch.check_and_fire());
        if let Some(trigger_cue) = fired {
            info!("Sensor '{}' triggered.", trigger_cue);
            ctx.queue_cue(trigger_cue);
        }
    }

    let done = match ctx.config.completion {
        CompletionPolicy::AllSensors => ctx.bank.all_activated(),
        CompletionPolicy::TerminalSensor => ctx.bank.terminal_activated(),
    };
    if done {
        return Some(StateId::Complete);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  COMPLETE — terminal; the supervisor releases the hardware
// ═══════════════════════════════════════════════════════════════════════════

fn complete_enter(ctx: &mut RoundContext) {
    info!("COMPLETE: round finished after {} ticks", ctx.total_ticks);
}

fn complete_update(_ctx: &mut RoundContext) -> Option<StateId> {
    None
}
