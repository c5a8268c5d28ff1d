//! Port traits: the boundary between the control logic and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LevelSensor / PumpController
//! ```
//!
//! Driven adapters (ESP-IDF GPIO + ADC, the host simulation, test mocks)
//! implement these traits.  The sensor and controller take them as generics
//! at call sites, so neither ever touches a register.  Delays go through
//! [`embedded_hal::delay::DelayNs`] rather than a port of our own.

use embedded_hal::digital::PinState;

use crate::error::{ActuatorError, InitError, SensorError};

/// An ADC1 channel number (`adc_channel_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdcChannel(pub u32);

// ───────────────────────────────────────────────────────────────
// GPIO port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Digital pin control.  Pins are plain GPIO numbers, as in ESP-IDF.
pub trait GpioPort {
    /// Configure `pin` as a push-pull output (no pulls, no interrupt).
    fn configure_output(&mut self, pin: i32) -> Result<(), ActuatorError>;

    /// Switch `pin` to a floating input (high impedance).
    fn release(&mut self, pin: i32) -> Result<(), ActuatorError>;

    /// Switch `pin` to output mode.  Level is set separately.
    fn set_output_mode(&mut self, pin: i32) -> Result<(), ActuatorError>;

    /// Set the output level of an output-mode pin.
    fn set_level(&mut self, pin: i32, level: PinState) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// ADC port (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One-shot ADC access on a single unit.
pub trait AdcPort {
    /// Bring up the unit and configure `channels` for 12-bit reads.
    fn init_channels(&mut self, channels: &[AdcChannel]) -> Result<(), InitError>;

    /// Take one raw sample (0 – full scale).
    fn read_raw(&mut self, channel: AdcChannel) -> Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Pump port (controller → actuator)
// ───────────────────────────────────────────────────────────────

/// The single actuator the controller drives.
pub trait PumpPort {
    fn set_pump(&mut self, on: bool) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond uptime.  Wraps at `u32::MAX`; consumers only ever
/// subtract with `wrapping_sub`.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The controller emits structured [`ControlEvent`](super::events::ControlEvent)s
/// through this port.  The device logs them; tests record them.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ControlEvent);
}
