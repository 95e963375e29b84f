//! PropSense Firmware — Main Entry Point
//!
//! Hexagonal architecture around a polling round loop:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  GpioInputBank     HttpNotifier     LogEventSink             │
//! │  (InputBankPort)   (NotifierPort)   (EventSink)              │
//! │  WifiConnection    LivenessServer                            │
//! │  (STA bring-up)    (health endpoint, own tasks)              │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ────────────────       │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │        RoundSupervisor → RoundService (pure)       │      │
//! │  │        FSM · one-shot latches · cue queue          │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The supervisor claims the switch lines fresh for every round and
//! releases them by drop, so a fault can never leak a GPIO claim.
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod error;
mod pins;

pub mod app;
mod adapters;
mod drivers;
pub mod fsm;
mod sensors;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{error, info};

use adapters::hardware::GpioInputBank;
use adapters::liveness::LivenessServer;
use adapters::log_sink::LogEventSink;
use adapters::notifier::HttpNotifier;
use adapters::wifi::WifiConnection;
use app::supervisor::RoundSupervisor;
use config::SystemConfig;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PropSense v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    // Compile-time defaults describe the deployed room; the supervisor
    // validates them before the first round.
    let config = SystemConfig::default();

    // ── 3. Network bring-up (blocks until associated) ─────────
    #[cfg(target_os = "espidf")]
    let _wifi = {
        let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;
        let sysloop = esp_idf_svc::eventloop::EspSystemEventLoop::take()?;
        WifiConnection::establish(peripherals.modem, sysloop, &config)
            .map_err(|e| anyhow::anyhow!("wifi: {e}"))?
    };
    #[cfg(not(target_os = "espidf"))]
    let _wifi =
        WifiConnection::establish_sim(&config).map_err(|e| anyhow::anyhow!("wifi: {e}"))?;

    // ── 4. Liveness endpoint (independent of round state) ─────
    let _liveness = LivenessServer::start(config.liveness_port)
        .map_err(|e| anyhow::anyhow!("liveness: {e}"))?;

    // ── 5. Adapters + supervisor ──────────────────────────────
    let mut notifier = HttpNotifier::new(&config);
    let mut sink = LogEventSink::new();
    let mut supervisor =
        RoundSupervisor::new(config.clone()).map_err(|e| anyhow::anyhow!("{e}"))?;

    info!("System ready. Entering round loop.");

    // ── 6. Round loop ─────────────────────────────────────────
    // Claims the switch lines fresh per round; run_forever only returns
    // with a fatal fault (hardware or configuration), which terminates
    // the process — there is no recovery path for those.
    let sensors = config.sensors.clone();
    let fatal = match supervisor.run_forever(
        move || GpioInputBank::claim(&sensors),
        &mut notifier,
        &mut sink,
    ) {
        Err(e) => e,
        Ok(never) => match never {},
    };

    error!("fatal: {fatal} — shutting down");
    Err(anyhow::anyhow!("fatal: {fatal}"))
}
