//! WiFi station-mode bring-up.
//!
//! The board is useless off the venue network, so association is blocking
//! at boot with a capped exponential backoff (2 s → 4 s → 8 s … 60 s)
//! between attempts. Credential validation is shared across targets.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF STA driver via
//!   `esp_idf_svc::wifi::{BlockingWifi, EspWifi}`.
//! - **all other targets**: validation plus a log line, for host tests.

use log::info;

use crate::config::SystemConfig;
use crate::error::CommsError;

#[cfg(target_os = "espidf")]
const MAX_BACKOFF_SECS: u32 = 60;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), CommsError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(CommsError::WifiCredentialsInvalid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), CommsError> {
    // Empty means an open network; otherwise WPA2 bounds apply.
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(CommsError::WifiCredentialsInvalid);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Connection handle
// ───────────────────────────────────────────────────────────────

/// A live station association. Holding it keeps the driver up; it is held
/// by `main` for the process lifetime.
#[cfg_attr(not(target_os = "espidf"), derive(Debug))]
pub struct WifiConnection {
    #[cfg(target_os = "espidf")]
    _wifi: esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>,
    #[cfg(not(target_os = "espidf"))]
    ssid: heapless::String<32>,
}

impl WifiConnection {
    /// Bring the station up and block until associated with an address.
    #[cfg(target_os = "espidf")]
    pub fn establish(
        modem: esp_idf_hal::modem::Modem,
        sysloop: esp_idf_svc::eventloop::EspSystemEventLoop,
        config: &SystemConfig,
    ) -> Result<Self, CommsError> {
        use esp_idf_svc::wifi::{
            AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi,
        };
        use log::warn;

        validate_ssid(&config.wifi_ssid)?;
        validate_password(&config.wifi_password)?;

        let mut wifi = BlockingWifi::wrap(
            EspWifi::new(modem, sysloop.clone(), None).map_err(|_| CommsError::WifiConnectFailed)?,
            sysloop,
        )
        .map_err(|_| CommsError::WifiConnectFailed)?;

        let auth_method = if config.wifi_password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: config.wifi_ssid.clone(),
            password: config.wifi_password.clone(),
            auth_method,
            ..Default::default()
        }))
        .map_err(|_| CommsError::WifiConnectFailed)?;

        wifi.start().map_err(|_| CommsError::WifiConnectFailed)?;

        info!("WiFi: connecting to '{}'", config.wifi_ssid);
        let mut backoff_secs = 2u32;
        loop {
            match wifi.connect().and_then(|()| wifi.wait_netif_up()) {
                Ok(()) => break,
                Err(e) => {
                    warn!(
                        "WiFi: connect failed ({}), retrying in {}s",
                        e, backoff_secs
                    );
                    std::thread::sleep(core::time::Duration::from_secs(u64::from(backoff_secs)));
                    backoff_secs = (backoff_secs * 2).min(MAX_BACKOFF_SECS);
                }
            }
        }

        if let Ok(ip_info) = wifi.wifi().sta_netif().get_ip_info() {
            info!("WiFi: connected, ip={}", ip_info.ip);
        }
        Ok(Self { _wifi: wifi })
    }

    /// Host-side stand-in: validates and pretends to associate.
    #[cfg(not(target_os = "espidf"))]
    pub fn establish_sim(config: &SystemConfig) -> Result<Self, CommsError> {
        validate_ssid(&config.wifi_ssid)?;
        validate_password(&config.wifi_password)?;
        info!("WiFi(sim): connected to '{}'", config.wifi_ssid);
        Ok(Self {
            ssid: config.wifi_ssid.clone(),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn ssid(&self) -> &str {
        &self.ssid
    }
}
