//! Per-round claim over the switch input lines.
//!
//! Configures each line as a pull-up input using raw ESP-IDF sys calls and
//! resets every line on drop, so a round can never leak a GPIO claim into
//! the next one.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: real `gpio_config` / `gpio_get_level` / `gpio_reset_pin`.
//! On host/test: a simulated level table (pulled-up HIGH by default) that
//! tests drive via [`sim_set_raw`].

use log::info;

use crate::app::ports::InputError;
use crate::sensors::MAX_SENSORS;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

/// Highest GPIO number the simulation table covers.
#[cfg(not(target_os = "espidf"))]
const SIM_GPIO_COUNT: usize = 64;

/// Simulated raw levels, indexed by GPIO number. Pull-up wiring means an
/// untouched line reads HIGH.
#[cfg(not(target_os = "espidf"))]
static SIM_LEVELS: [AtomicBool; SIM_GPIO_COUNT] = {
    #[allow(clippy::declare_interior_mutable_const)]
    const HIGH: AtomicBool = AtomicBool::new(true);
    [HIGH; SIM_GPIO_COUNT]
};

/// Drive a simulated line level from a test.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_raw(gpio: i32, level: bool) {
    if let Some(cell) = SIM_LEVELS.get(gpio as usize) {
        cell.store(level, Ordering::Relaxed);
    }
}

/// The claimed set of input lines for one round.
#[derive(Debug)]
pub struct InputLines {
    gpios: heapless::Vec<i32, MAX_SENSORS>,
}

impl InputLines {
    /// Claim and configure every line as a pull-up input.
    ///
    /// On failure, lines configured so far are reset before the error is
    /// returned — a half-claimed set is never left behind.
    pub fn claim(gpios: &[i32]) -> Result<Self, InputError> {
        let mut claimed: heapless::Vec<i32, MAX_SENSORS> = heapless::Vec::new();
        for &gpio in gpios {
            if let Err(e) = Self::configure(gpio) {
                for &done in &claimed {
                    Self::release(done);
                }
                return Err(e);
            }
            let _ = claimed.push(gpio);
        }
        info!("input_lines: claimed {:?}", claimed.as_slice());
        Ok(Self { gpios: claimed })
    }

    /// Sample the raw electrical level of one claimed line.
    pub fn read(&self, gpio: i32) -> bool {
        Self::level(gpio)
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn configure(gpio: i32) -> Result<(), InputError> {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << gpio,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        // SAFETY: gpio_config validates the pin mask and is called from the
        // single supervisor thread before any read on this line.
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(InputError::ClaimFailed { gpio, code: ret });
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn configure(gpio: i32) -> Result<(), InputError> {
        if (gpio as usize) >= SIM_GPIO_COUNT {
            return Err(InputError::ClaimFailed { gpio, code: -1 });
        }
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn level(gpio: i32) -> bool {
        // SAFETY: gpio_get_level is a read-only register access on an
        // already-configured input pin; supervisor thread only.
        (unsafe { gpio_get_level(gpio) }) != 0
    }

    #[cfg(not(target_os = "espidf"))]
    fn level(gpio: i32) -> bool {
        SIM_LEVELS
            .get(gpio as usize)
            .map(|cell| cell.load(Ordering::Relaxed))
            .unwrap_or(true)
    }

    #[cfg(target_os = "espidf")]
    fn release(gpio: i32) {
        // SAFETY: gpio_reset_pin restores the line to its default state;
        // called only on lines this set configured.
        unsafe {
            gpio_reset_pin(gpio);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn release(_gpio: i32) {}
}

impl Drop for InputLines {
    fn drop(&mut self) {
        for &gpio in &self.gpios {
            Self::release(gpio);
        }
        info!("input_lines: released {:?}", self.gpios.as_slice());
    }
}
