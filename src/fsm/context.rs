//! Shared mutable context threaded through every FSM handler.
//!
//! `RoundContext` is the single struct that state handlers read from and
//! write to. It contains the sensor bank of the round, the queue of cues
//! waiting for dispatch, timing information, and configuration. Think of it
//! as the "blackboard" in a blackboard architecture.

use log::warn;

use crate::config::SystemConfig;
use crate::sensors::{CueName, MAX_SENSORS, SensorBank};

/// Capacity of the pending cue queue: every channel can fire once per round,
/// plus the `start` and `intro` cues.
pub const PENDING_CAP: usize = MAX_SENSORS + 2;

/// The shared context passed to every state handler function.
pub struct RoundContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic total tick count for this round.
    pub total_ticks: u64,
    /// Duration of one tick in milliseconds (the poll interval).
    pub tick_period_ms: u32,

    // -- Sensors --
    /// The round's channels; latches reset only by building a new context.
    pub bank: SensorBank,

    // -- Outputs --
    /// Cues queued by state handlers, drained by the service after each
    /// tick in queue order.
    pub pending: heapless::Vec<CueName, PENDING_CAP>,

    // -- Configuration --
    pub config: SystemConfig,
}

impl RoundContext {
    /// Create a fresh context (all latches clear) from the configuration.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            ticks_in_state: 0,
            total_ticks: 0,
            tick_period_ms: config.poll_interval_ms,
            bank: SensorBank::from_specs(&config.sensors),
            pending: heapless::Vec::new(),
            config,
        }
    }

    /// Milliseconds elapsed since the current state was entered.
    pub fn ms_in_state(&self) -> u64 {
        self.ticks_in_state * u64::from(self.tick_period_ms)
    }

    /// Queue a cue for dispatch after this tick.
    ///
    /// The queue is sized so overflow cannot happen for a valid
    /// configuration; if it does, the cue is dropped rather than blocking
    /// the loop.
    pub fn queue_cue(&mut self, cue: CueName) {
        if let Err(cue) = self.pending.push(cue) {
            warn!("cue queue full, dropping '{}'", cue);
        }
    }
}
