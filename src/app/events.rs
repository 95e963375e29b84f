//! Outbound application events.
//!
//! The round machinery emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them — today they go to the serial log.

use super::ports::NotifyError;
use crate::fsm::StateId;
use crate::sensors::CueName;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A fresh round was armed (carries initial state).
    Started(StateId),

    /// The round FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// A cue was queued for Houdini (`start`, `intro`, or a sensor name).
    CueFired { cue: CueName },

    /// A cue could not be delivered; it was logged and dropped.
    CueDropped { cue: CueName, reason: NotifyError },

    /// The round reached its completion condition.
    RoundComplete { total_ticks: u64 },
}
