//! Error types for the PumpNode firmware.
//!
//! Small `Copy` enums, one per subsystem.  The control
//! path never propagates these: a failed sample degrades to an UNKNOWN
//! classification, a failed pump write is logged and the cycle carries on.
//! Only initialisation surfaces errors to the caller.

use core::fmt;

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// `adc_oneshot_read` returned a non-OK code.
    AdcReadFailed(i32),
    /// The channel was never configured on the ADC unit.
    ChannelNotConfigured(u32),
    /// An electrode could not be switched for the measurement.
    ElectrodeDriveFailed(ActuatorError),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed(rc) => write!(f, "ADC read failed (rc={rc})"),
            Self::ChannelNotConfigured(ch) => write!(f, "ADC channel {ch} not configured"),
            Self::ElectrodeDriveFailed(e) => write!(f, "electrode drive failed: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// `gpio_set_direction` / `gpio_config` failed.
    GpioConfigFailed { pin: i32, rc: i32 },
    /// `gpio_set_level` failed.
    GpioWriteFailed { pin: i32, rc: i32 },
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioConfigFailed { pin, rc } => {
                write!(f, "GPIO{pin} config failed (rc={rc})")
            }
            Self::GpioWriteFailed { pin, rc } => {
                write!(f, "GPIO{pin} write failed (rc={rc})")
            }
        }
    }
}

impl From<ActuatorError> for SensorError {
    fn from(e: ActuatorError) -> Self {
        Self::ElectrodeDriveFailed(e)
    }
}

// ---------------------------------------------------------------------------
// Initialisation errors
// ---------------------------------------------------------------------------

/// Errors from [`PumpNode::init`](crate::node::PumpNode::init) and
/// [`PumpNode::start`](crate::node::PumpNode::start).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// Two of the three pins are the same GPIO.
    DuplicatePin(i32),
    /// The electrode pin has no ADC1 channel.
    NotAdcCapable(i32),
    /// Pump or electrode GPIO could not be configured.
    Gpio(ActuatorError),
    /// ADC unit or channel configuration failed.
    AdcInitFailed(i32),
    /// A tunable failed its sanity check.
    InvalidConfig(&'static str),
    /// The worker thread could not be created.
    TaskSpawnFailed,
    /// `start()` was called before a successful `init()`.
    NotInitialized,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePin(pin) => write!(f, "GPIO{pin} assigned twice"),
            Self::NotAdcCapable(pin) => write!(f, "GPIO{pin} has no ADC1 channel"),
            Self::Gpio(e) => write!(f, "{e}"),
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={rc})"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::TaskSpawnFailed => write!(f, "failed to create pump_node task"),
            Self::NotInitialized => write!(f, "node not initialised"),
        }
    }
}

impl std::error::Error for InitError {}

impl From<ActuatorError> for InitError {
    fn from(e: ActuatorError) -> Self {
        Self::Gpio(e)
    }
}
