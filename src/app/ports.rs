//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RoundService (domain)
//! ```
//!
//! Driven adapters (the GPIO bank, the HTTP notifier, event sinks) implement
//! these traits. The [`RoundService`](super::service::RoundService) consumes
//! them via generics, so the domain core never touches hardware directly.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Input bank port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port over the claimed set of input lines.
///
/// `index` addresses the configured channel order (0 = start switch).
/// Implementations return the **raw** electrical level; polarity correction
/// belongs to [`SensorChannel`](crate::sensors::SensorChannel).
///
/// Dropping an implementation releases every claimed line — the supervisor
/// relies on this to guarantee a fresh claim can succeed each round.
pub trait InputBankPort {
    /// Sample one line. A failure here is fatal to the process.
    fn read_line(&mut self, index: usize) -> Result<bool, InputError>;
}

// ───────────────────────────────────────────────────────────────
// Notifier port (driven adapter: domain → Houdini)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget cue delivery to the orchestration service.
///
/// The caller logs and drops any error — a missed cue must never block the
/// sensor loop, so implementations keep the timeout short and do not retry.
pub trait NotifierPort {
    fn notify(&mut self, cue: &str) -> Result<(), NotifyError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log today;
/// an MQTT or dashboard adapter would implement the same trait).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`InputBankPort`] and bank claiming. All fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// GPIO configuration was rejected at claim time (bad line number,
    /// line already owned by another peripheral).
    ClaimFailed { gpio: i32, code: i32 },
    /// A read addressed a channel index the bank does not own.
    UnknownLine { index: usize },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClaimFailed { gpio, code } => {
                write!(f, "GPIO {gpio} claim failed (rc={code})")
            }
            Self::UnknownLine { index } => write!(f, "no line at channel index {index}"),
        }
    }
}

/// Errors from [`NotifierPort`]. Logged and dropped, never escalated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyError {
    /// Base URL plus cue exceeds the URL buffer.
    UrlTooLong,
    /// The HTTP client could not be set up or the host is unreachable.
    Connect,
    /// The request was sent but the exchange failed (timeout, reset).
    Transport,
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UrlTooLong => write!(f, "cue URL too long"),
            Self::Connect => write!(f, "connect failed"),
            Self::Transport => write!(f, "transport failed"),
        }
    }
}
