//! Sensor channels — polarity correction and the one-shot trigger latch.
//!
//! A [`SensorChannel`] is the logical view of one physical switch: it holds
//! the polarity-corrected level of the line plus the `activated` latch that
//! guarantees a channel reports at most once per round. The [`SensorBank`]
//! aggregates the channels of one round in a fixed order (insertion order =
//! sweep order); channel 0 is the start switch by convention.

use serde::{Deserialize, Serialize};

use crate::config::SensorSpec;

/// Maximum number of channels a board supports (sized for the largest room).
pub const MAX_SENSORS: usize = 8;

/// A cue name as sent to Houdini (`GET {base}{cue}`).
pub type CueName = heapless::String<16>;

/// Build a [`CueName`] from a str, truncating past capacity.
pub fn cue(name: &str) -> CueName {
    let mut s = CueName::new();
    for ch in name.chars() {
        if s.push(ch).is_err() {
            break;
        }
    }
    s
}

/// How a logically-active switch reads at the GPIO level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    /// Closed contact pulls the line HIGH; active reads `true`.
    ActiveHigh,
    /// Closed contact pulls the line to ground (pull-up wiring); active
    /// reads `false` and is inverted here.
    ActiveLow,
}

/// One switch: corrected level plus the per-round one-shot latch.
#[derive(Debug, Clone)]
pub struct SensorChannel {
    name: CueName,
    polarity: Polarity,
    terminal: bool,
    level: bool,
    activated: bool,
}

impl SensorChannel {
    pub fn new(spec: &SensorSpec) -> Self {
        Self {
            name: spec.name.clone(),
            polarity: spec.polarity,
            terminal: spec.terminal,
            level: false,
            activated: false,
        }
    }

    /// Store a raw GPIO sample, applying polarity correction.
    ///
    /// This is the only place the inversion happens; everything downstream
    /// works with logical levels.
    pub fn record_raw(&mut self, raw: bool) {
        self.level = match self.polarity {
            Polarity::ActiveHigh => raw,
            Polarity::ActiveLow => !raw,
        };
    }

    /// Latched one-shot edge detect.
    ///
    /// Returns the channel's cue exactly once: on the first call that sees
    /// an active level. A held switch, or one that bounces back to active
    /// later in the round, never fires again — the latch only resets when
    /// the next round builds a fresh bank.
    pub fn check_and_fire(&mut self) -> Option<CueName> {
        if self.level && !self.activated {
            self.activated = true;
            return Some(self.name.clone());
        }
        None
    }

    /// Corrected level of the last sample.
    pub fn is_active(&self) -> bool {
        self.level
    }

    /// Whether the one-shot latch has fired this round.
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Force the latch (used when the start switch is consumed by the
    /// round state machine rather than the sweep).
    pub fn latch(&mut self) {
        self.activated = true;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

/// The fixed-order channel set of one round.
#[derive(Debug, Clone)]
pub struct SensorBank {
    channels: heapless::Vec<SensorChannel, MAX_SENSORS>,
}

impl SensorBank {
    /// Build a bank from the configured specs.
    ///
    /// The spec list must be non-empty and channel 0 must be the start
    /// switch — [`SystemConfig::validate`](crate::config::SystemConfig::validate)
    /// enforces this before a round is constructed.
    pub fn from_specs(specs: &[SensorSpec]) -> Self {
        debug_assert!(!specs.is_empty(), "sensor table must not be empty");
        let mut channels = heapless::Vec::new();
        for spec in specs {
            let _ = channels.push(SensorChannel::new(spec));
        }
        Self { channels }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel(&self, index: usize) -> Option<&SensorChannel> {
        self.channels.get(index)
    }

    pub fn channel_mut(&mut self, index: usize) -> Option<&mut SensorChannel> {
        self.channels.get_mut(index)
    }

    /// The start switch (channel 0).
    pub fn start(&self) -> &SensorChannel {
        &self.channels[0]
    }

    pub fn start_mut(&mut self) -> &mut SensorChannel {
        &mut self.channels[0]
    }

    /// Store a raw sample for one channel. Out-of-range indices are ignored.
    pub fn record_raw(&mut self, index: usize, raw: bool) {
        if let Some(ch) = self.channels.get_mut(index) {
            ch.record_raw(raw);
        }
    }

    /// Completion test for the [`AllSensors`](crate::config::CompletionPolicy)
    /// policy: every channel, start included, has latched.
    pub fn all_activated(&self) -> bool {
        self.channels.iter().all(SensorChannel::is_activated)
    }

    /// Completion test for the
    /// [`TerminalSensor`](crate::config::CompletionPolicy) policy: the
    /// designated terminal channel has latched.
    pub fn terminal_activated(&self) -> bool {
        self.channels
            .iter()
            .any(|ch| ch.is_terminal() && ch.is_activated())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorChannel> {
        self.channels.iter()
    }
}
