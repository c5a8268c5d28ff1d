//! GPIO / ADC assignments for the pump node board (classic ESP32).
//!
//! Single source of truth for the default wiring.  The electrodes must sit
//! on ADC1-capable pins because ADC2 is unusable while WiFi is up.

use crate::app::ports::AdcChannel;

// ---------------------------------------------------------------------------
// Conductivity probe
// ---------------------------------------------------------------------------

/// Electrode A.  ADC1 channel 4.
pub const ELECTRODE_A_GPIO: i32 = 32;
/// Electrode B.  ADC1 channel 5.
pub const ELECTRODE_B_GPIO: i32 = 33;

// ---------------------------------------------------------------------------
// Pump (MOSFET / relay driver, active HIGH)
// ---------------------------------------------------------------------------

pub const PUMP_GPIO: i32 = 26;

/// Worker priority handed to FreeRTOS.
pub const WORKER_PRIORITY: u8 = 5;

/// APP_CPU.  Core 0 is left to the IDF system tasks.
pub const WORKER_CORE: i32 = 1;

/// The three pins the node is built around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePins {
    pub electrode_a: i32,
    pub electrode_b: i32,
    pub pump: i32,
}

impl Default for NodePins {
    fn default() -> Self {
        Self {
            electrode_a: ELECTRODE_A_GPIO,
            electrode_b: ELECTRODE_B_GPIO,
            pump: PUMP_GPIO,
        }
    }
}

/// ADC1 channel wired to `gpio` on the classic ESP32, if any.
pub const fn adc1_channel(gpio: i32) -> Option<AdcChannel> {
    let ch = match gpio {
        36 => 0,
        37 => 1,
        38 => 2,
        39 => 3,
        32 => 4,
        33 => 5,
        34 => 6,
        35 => 7,
        _ => return None,
    };
    Some(AdcChannel(ch))
}
