//! Round supervisor — chains rounds forever with scoped hardware claims.
//!
//! Each iteration claims a fresh input bank, drives a fresh
//! [`RoundService`] from armed to complete, and releases the bank by drop —
//! on the error path too. This scoped acquisition/release discipline is the
//! one place unwind-safety matters: a leaked GPIO claim would make the next
//! round's claim fail.

use core::convert::Infallible;
use core::time::Duration;

use log::info;

use crate::config::SystemConfig;
use crate::error::Error;

use super::events::AppEvent;
use super::ports::{EventSink, InputBankPort, InputError, NotifierPort};
use super::service::RoundService;

/// Builds and runs one [`RoundService`] after another, forever.
pub struct RoundSupervisor {
    config: SystemConfig,
    rounds_completed: u64,
}

impl RoundSupervisor {
    /// Construct a supervisor, validating the configuration once up front.
    /// A validation failure is fatal — no round can be built from it.
    pub fn new(config: SystemConfig) -> Result<Self, Error> {
        config.validate().map_err(Error::Config)?;
        Ok(Self {
            config,
            rounds_completed: 0,
        })
    }

    /// Rounds driven to completion since boot.
    pub fn rounds_completed(&self) -> u64 {
        self.rounds_completed
    }

    /// Drive one round from armed to complete.
    ///
    /// `claim_inputs` performs the scoped hardware acquisition; the claimed
    /// bank lives exactly as long as this call and is dropped (lines
    /// released) before it returns — whether the round completed or a fatal
    /// fault propagated out.
    ///
    /// The sleep between sweeps is the loop's only yield point and bounds
    /// worst-case edge-detection latency at one poll interval plus one
    /// notify timeout.
    pub fn run_round<B, F, N, S>(
        &mut self,
        claim_inputs: &mut F,
        notifier: &mut N,
        sink: &mut S,
    ) -> Result<(), Error>
    where
        B: InputBankPort,
        F: FnMut() -> Result<B, InputError>,
        N: NotifierPort,
        S: EventSink,
    {
        let mut inputs = claim_inputs()?;
        let mut round = RoundService::new(self.config.clone());
        round.start(sink);

        let poll = Duration::from_millis(u64::from(self.config.poll_interval_ms));
        loop {
            round.tick(&mut inputs, notifier, sink)?;
            if round.is_complete() {
                break;
            }
            // On the device this yields to FreeRTOS; on the host it is a
            // plain thread sleep.
            std::thread::sleep(poll);
        }

        self.rounds_completed += 1;
        sink.emit(&AppEvent::RoundComplete {
            total_ticks: round.tick_count(),
        });
        info!(
            "Round {} complete ({} ticks); releasing lines",
            self.rounds_completed,
            round.tick_count()
        );
        Ok(())
        // `inputs` drops here: every line is released before the next claim.
    }

    /// Run rounds forever. Returns only with a fatal [`Error`].
    pub fn run_forever<B, F, N, S>(
        &mut self,
        mut claim_inputs: F,
        notifier: &mut N,
        sink: &mut S,
    ) -> Result<Infallible, Error>
    where
        B: InputBankPort,
        F: FnMut() -> Result<B, InputError>,
        N: NotifierPort,
        S: EventSink,
    {
        loop {
            self.run_round(&mut claim_inputs, notifier, sink)?;
        }
    }
}
