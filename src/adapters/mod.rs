//! Adapters — concrete implementations of the hexagonal port traits,
//! plus the standalone network services.
//!
//! | Adapter    | Implements      | Connects to                    |
//! |------------|-----------------|--------------------------------|
//! | `hardware` | InputBankPort   | ESP32 GPIO (pull-up inputs)    |
//! | `notifier` | NotifierPort    | Houdini HTTP endpoint          |
//! | `log_sink` | EventSink       | Serial log output              |
//! | `liveness` | —               | Health-check HTTP server       |
//! | `wifi`     | —               | ESP-IDF WiFi STA               |

pub mod hardware;
pub mod liveness;
pub mod log_sink;
pub mod notifier;
pub mod wifi;
