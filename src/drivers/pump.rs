//! Pump output driver (logic-level MOSFET or relay, active HIGH).
//!
//! ## Safety contract
//!
//! Run-time caps, rest windows and fault inhibition are enforced by the
//! controller; this driver is a dumb actuator.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use log::{info, warn};

use crate::app::ports::{GpioPort, PumpPort};
use crate::error::ActuatorError;

pub struct PumpDriver {
    gpio: i32,
}

impl PumpDriver {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    /// Configure the pin as output and leave the pump off.
    pub fn configure(&self, hw: &mut impl GpioPort) -> Result<(), ActuatorError> {
        hw.configure_output(self.gpio)?;
        hw.set_level(self.gpio, PinState::Low)
    }

    /// Short blink at start-up so the installer can hear the pump is wired.
    ///
    /// On any write error one more LOW write is attempted before the
    /// error is returned, since no worker exists yet to switch it off.
    pub fn self_test_pulse(
        &self,
        hw: &mut impl GpioPort,
        delay: &mut impl DelayNs,
        pulse_ms: u32,
    ) -> Result<(), ActuatorError> {
        info!("pump: self-test pulse {}ms", pulse_ms);
        let result = hw.set_level(self.gpio, PinState::High).and_then(|()| {
            delay.delay_ms(pulse_ms);
            hw.set_level(self.gpio, PinState::Low)
        });
        if let Err(e) = result {
            warn!("pump: self-test failed ({}), forcing GPIO{} LOW", e, self.gpio);
            if hw.set_level(self.gpio, PinState::Low).is_err() {
                warn!("pump: GPIO{} may still be HIGH", self.gpio);
            }
        }
        result
    }

    /// Bind the driver to a GPIO port for one control step.
    pub fn output<'a, G: GpioPort>(&self, hw: &'a mut G) -> PumpOutput<'a, G> {
        PumpOutput { gpio: self.gpio, hw }
    }
}

/// [`PumpPort`] view over a borrowed GPIO port.
pub struct PumpOutput<'a, G: GpioPort> {
    gpio: i32,
    hw: &'a mut G,
}

impl<G: GpioPort> PumpPort for PumpOutput<'_, G> {
    fn set_pump(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.hw.set_level(self.gpio, PinState::from(on))
    }
}
