//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A future dashboard or MQTT adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("ROUND | armed, initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::CueFired { cue } => {
                info!("CUE   | {}", cue);
            }
            AppEvent::CueDropped { cue, reason } => {
                warn!("CUE   | '{}' dropped ({})", cue, reason);
            }
            AppEvent::RoundComplete { total_ticks } => {
                info!("ROUND | complete after {} ticks", total_ticks);
            }
        }
    }
}
