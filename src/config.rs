//! System configuration parameters
//!
//! All tunable parameters for a PropSense board. The defaults describe the
//! deployed installation (four switches reporting to the Houdini
//! orchestrator); a venue-specific build overrides them here.

use serde::{Deserialize, Serialize};

use crate::pins;
use crate::sensors::{CueName, MAX_SENSORS, Polarity, cue};

/// One physical switch: identity, wiring, and its role in the round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorSpec {
    /// Logical name — doubles as the cue path sent to Houdini.
    pub name: CueName,
    /// GPIO the switch contact is wired to (pull-up input).
    pub gpio: i32,
    /// Whether a triggered switch reads HIGH or LOW on the line.
    pub polarity: Polarity,
    /// Terminal channels end the round under [`CompletionPolicy::TerminalSensor`].
    pub terminal: bool,
}

/// When a round counts as finished.
///
/// The two rules observed across deployments of this family. Exactly one is
/// in force per board; mixing them is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionPolicy {
    /// Every channel (start included) has latched.
    AllSensors,
    /// The designated terminal channel has latched; remaining channels
    /// become no-ops for the rest of the round.
    TerminalSensor,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Houdini orchestrator ---
    /// Base URL cues are appended to; must end with '/'.
    pub houdini_base_url: heapless::String<96>,
    /// Outbound GET timeout (milliseconds).
    pub notify_timeout_ms: u32,

    // --- Network ---
    /// Venue Wi-Fi SSID.
    pub wifi_ssid: heapless::String<32>,
    /// Venue Wi-Fi passphrase (empty = open network).
    pub wifi_password: heapless::String<64>,
    /// Port the liveness endpoint listens on.
    pub liveness_port: u16,

    // --- Round timing ---
    /// Sleep between sensor sweeps (milliseconds).
    pub poll_interval_ms: u32,
    /// Delay between the `start` and `intro` cues, masking the room's
    /// opening sound cue (milliseconds).
    pub start_settle_ms: u32,

    // --- Round rules ---
    pub completion: CompletionPolicy,
    /// Channel table; insertion order = sweep order, channel 0 = start.
    pub sensors: heapless::Vec<SensorSpec, MAX_SENSORS>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut sensors = heapless::Vec::new();
        // Four fixed channels always fit in MAX_SENSORS.
        let _ = sensors.push(SensorSpec {
            name: cue("start"),
            gpio: pins::START_GPIO,
            polarity: Polarity::ActiveLow,
            terminal: false,
        });
        let _ = sensors.push(SensorSpec {
            name: cue("maya"),
            gpio: pins::MAYA_GPIO,
            polarity: Polarity::ActiveLow,
            terminal: false,
        });
        let _ = sensors.push(SensorSpec {
            name: cue("console"),
            gpio: pins::CONSOLE_GPIO,
            polarity: Polarity::ActiveLow,
            terminal: false,
        });
        let _ = sensors.push(SensorSpec {
            name: cue("usine"),
            gpio: pins::USINE_GPIO,
            polarity: Polarity::ActiveLow,
            terminal: true,
        });

        Self {
            houdini_base_url: heapless::String::try_from("http://10.0.0.1:14999/")
                .unwrap_or_default(),
            notify_timeout_ms: 1000,

            wifi_ssid: heapless::String::try_from("houdini-ops").unwrap_or_default(),
            wifi_password: heapless::String::try_from("openthedoor").unwrap_or_default(),
            liveness_port: 8080,

            poll_interval_ms: 100, // 10 Hz sweep
            start_settle_ms: 5000, // masks the door-lock sound cue

            completion: CompletionPolicy::TerminalSensor,
            sensors,
        }
    }
}

impl SystemConfig {
    /// Reject configurations a round cannot be built from.
    ///
    /// Runs once at supervisor construction; a failure here is fatal
    /// (configuration faults abort the process, they are not degraded).
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.sensors.len() < 2 {
            return Err("sensor table needs the start switch plus at least one game sensor");
        }
        for (i, spec) in self.sensors.iter().enumerate() {
            if spec.name.is_empty() {
                return Err("sensor name must not be empty");
            }
            if self.sensors[..i].iter().any(|other| other.name == spec.name) {
                return Err("duplicate sensor name");
            }
        }
        if self.sensors[0].terminal {
            return Err("the start switch cannot be the terminal sensor");
        }
        if self.completion == CompletionPolicy::TerminalSensor
            && !self.sensors.iter().any(|s| s.terminal)
        {
            return Err("terminal completion policy requires a terminal sensor");
        }
        if !(self.houdini_base_url.starts_with("http://")
            || self.houdini_base_url.starts_with("https://"))
        {
            return Err("houdini base URL must be http(s)");
        }
        if !self.houdini_base_url.ends_with('/') {
            return Err("houdini base URL must end with '/'");
        }
        if self.poll_interval_ms == 0 {
            return Err("poll interval must be nonzero");
        }
        if self.notify_timeout_ms == 0 {
            return Err("notify timeout must be nonzero");
        }
        Ok(())
    }
}
