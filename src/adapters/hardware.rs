//! Hardware adapter — bridges the claimed GPIO lines to [`InputBankPort`].
//!
//! Owns an [`InputLines`] claim and the channel-index → GPIO mapping. This
//! is the only module in the round path that touches actual hardware; on
//! non-espidf targets the underlying driver uses the simulated level table.

use crate::app::ports::{InputBankPort, InputError};
use crate::config::SensorSpec;
use crate::drivers::input_lines::InputLines;
use crate::sensors::MAX_SENSORS;

/// Concrete adapter over one round's claimed input lines.
pub struct GpioInputBank {
    lines: InputLines,
    /// Channel index → GPIO, in configured sweep order.
    map: heapless::Vec<i32, MAX_SENSORS>,
}

impl GpioInputBank {
    /// Claim every configured line. Fails fatally if any claim is rejected;
    /// dropping the bank releases the whole set.
    pub fn claim(specs: &[SensorSpec]) -> Result<Self, InputError> {
        let mut map: heapless::Vec<i32, MAX_SENSORS> = heapless::Vec::new();
        for spec in specs {
            let _ = map.push(spec.gpio);
        }
        let lines = InputLines::claim(&map)?;
        Ok(Self { lines, map })
    }
}

impl InputBankPort for GpioInputBank {
    fn read_line(&mut self, index: usize) -> Result<bool, InputError> {
        let gpio = *self
            .map
            .get(index)
            .ok_or(InputError::UnknownLine { index })?;
        Ok(self.lines.read(gpio))
    }
}
