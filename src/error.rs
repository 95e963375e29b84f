//! Unified error types for the PropSense firmware.
//!
//! A single `Error` enum that every fatal failure funnels into, keeping the
//! supervisor's propagation uniform. Only three things are allowed to abort
//! a round — hardware claim/read faults, configuration faults, and boot-time
//! comms faults. Everything else (notably notification transport failures)
//! degrades locally and never reaches this type.

use core::fmt;

use crate::app::ports::InputError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every process-fatal condition funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A GPIO line could not be claimed or read.
    Input(InputError),
    /// A communication subsystem failed to come up.
    Comms(CommsError),
    /// Configuration is invalid; no round can be constructed from it.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(e) => write!(f, "input: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl From<InputError> for Error {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    WifiCredentialsInvalid,
    WifiConnectFailed,
    LivenessBindFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WifiCredentialsInvalid => write!(f, "WiFi credentials invalid"),
            Self::WifiConnectFailed => write!(f, "WiFi connect failed"),
            Self::LivenessBindFailed => write!(f, "liveness endpoint bind failed"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
