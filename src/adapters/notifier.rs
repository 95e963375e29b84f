//! HTTP cue notifier — fire-and-forget GETs to the Houdini orchestrator.
//!
//! Implements [`NotifierPort`] with a short-timeout in-process HTTP client.
//! The response status and body are ignored; only transport-level failures
//! surface as [`NotifyError`], and the round service drops those after
//! logging. Nothing here retries.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `EspHttpConnection` per request.
//! - **all other targets**: cues are recorded for host-side tests.

use core::fmt::Write as _;
use core::time::Duration;

use log::debug;

use crate::app::ports::{NotifierPort, NotifyError};
use crate::config::SystemConfig;

/// Largest URL the notifier will build. Sized for LAN base URLs; a base
/// near its own capacity plus a long cue overflows and the cue is rejected
/// rather than truncated into a wrong path.
const URL_CAP: usize = 96;

pub struct HttpNotifier {
    base_url: heapless::String<96>,
    timeout: Duration,
    #[cfg(not(target_os = "espidf"))]
    sim_sent: Vec<String>,
}

impl HttpNotifier {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            base_url: config.houdini_base_url.clone(),
            timeout: Duration::from_millis(u64::from(config.notify_timeout_ms)),
            #[cfg(not(target_os = "espidf"))]
            sim_sent: Vec::new(),
        }
    }

    /// Cues delivered by the simulated transport, in send order.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_sent(&self) -> &[String] {
        &self.sim_sent
    }

    fn build_url(&self, cue: &str) -> Result<heapless::String<URL_CAP>, NotifyError> {
        let mut url = heapless::String::new();
        write!(url, "{}{}", self.base_url, cue).map_err(|_| NotifyError::UrlTooLong)?;
        Ok(url)
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_get(&mut self, url: &str) -> Result<u16, NotifyError> {
        use esp_idf_svc::http::Method;
        use esp_idf_svc::http::client::{Configuration, EspHttpConnection};

        let mut conn = EspHttpConnection::new(&Configuration {
            timeout: Some(self.timeout),
            ..Default::default()
        })
        .map_err(|_| NotifyError::Connect)?;

        conn.initiate_request(Method::Get, url, &[])
            .map_err(|_| NotifyError::Transport)?;
        conn.initiate_response().map_err(|_| NotifyError::Transport)?;
        Ok(conn.status())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_get(&mut self, url: &str) -> Result<u16, NotifyError> {
        debug!("notifier(sim): GET {} (timeout {:?})", url, self.timeout);
        let cue = url.rsplit('/').next().unwrap_or_default();
        self.sim_sent.push(cue.to_owned());
        Ok(200)
    }
}

impl NotifierPort for HttpNotifier {
    fn notify(&mut self, cue: &str) -> Result<(), NotifyError> {
        let url = self.build_url(cue)?;
        debug!("cue '{}': GET {}", cue, url);
        let status = self.platform_get(&url)?;
        // The exchange is the whole contract; Houdini's answer is ignored.
        if !(200..300).contains(&status) {
            debug!("Houdini answered {} for '{}'", status, cue);
        }
        Ok(())
    }
}
