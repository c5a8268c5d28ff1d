//! Board adapter. Bridges the ESP32 GPIO matrix and ADC1 to the
//! [`GpioPort`] / [`AdcPort`] traits.
//!
//! This is the only module in the system that touches actual hardware.
//! On non-espidf targets it is an in-memory simulation: pin modes and
//! levels are tracked, and the ADC returns whatever raw code was injected
//! for the currently driven electrode through a [`SimProbe`] handle.

use embedded_hal::digital::PinState;

use crate::app::ports::{AdcChannel, AdcPort, GpioPort};
use crate::error::{ActuatorError, InitError, SensorError};
use crate::pins::NodePins;

#[cfg(not(target_os = "espidf"))]
pub use sim::SimProbe;

/// Concrete adapter for the pump node board.
pub struct BoardAdapter {
    #[cfg_attr(target_os = "espidf", allow(dead_code))]
    pins: NodePins,
    #[cfg(not(target_os = "espidf"))]
    sim: sim::SimBoard,
}

impl BoardAdapter {
    pub fn new(pins: NodePins) -> Self {
        Self {
            pins,
            #[cfg(not(target_os = "espidf"))]
            sim: sim::SimBoard::default(),
        }
    }

    /// Handle for injecting probe readings and observing the pump pin.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_probe(&self) -> SimProbe {
        self.sim.probe.clone()
    }
}

// ── GpioPort ──────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
impl GpioPort for BoardAdapter {
    fn configure_output(&mut self, pin: i32) -> Result<(), ActuatorError> {
        crate::drivers::hw_init::gpio_configure_output(pin)
    }

    fn release(&mut self, pin: i32) -> Result<(), ActuatorError> {
        crate::drivers::hw_init::gpio_set_mode(pin, false)
    }

    fn set_output_mode(&mut self, pin: i32) -> Result<(), ActuatorError> {
        crate::drivers::hw_init::gpio_set_mode(pin, true)
    }

    fn set_level(&mut self, pin: i32, level: PinState) -> Result<(), ActuatorError> {
        crate::drivers::hw_init::gpio_write(pin, level == PinState::High)
    }
}

#[cfg(not(target_os = "espidf"))]
impl GpioPort for BoardAdapter {
    fn configure_output(&mut self, pin: i32) -> Result<(), ActuatorError> {
        self.sim.check_pin(pin, false)?;
        self.sim.set_mode(pin, true);
        self.sim.set_level(pin, false);
        self.sync_pump(pin);
        Ok(())
    }

    fn release(&mut self, pin: i32) -> Result<(), ActuatorError> {
        self.sim.check_pin(pin, false)?;
        self.sim.set_mode(pin, false);
        Ok(())
    }

    fn set_output_mode(&mut self, pin: i32) -> Result<(), ActuatorError> {
        self.sim.check_pin(pin, false)?;
        self.sim.set_mode(pin, true);
        Ok(())
    }

    fn set_level(&mut self, pin: i32, level: PinState) -> Result<(), ActuatorError> {
        self.sim.check_pin(pin, true)?;
        self.sim.set_level(pin, level == PinState::High);
        self.sync_pump(pin);
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl BoardAdapter {
    fn sync_pump(&self, pin: i32) {
        if pin == self.pins.pump {
            self.sim.probe.set_pump_level(self.sim.is_driven_high(pin));
        }
    }
}

// ── AdcPort ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
impl AdcPort for BoardAdapter {
    fn init_channels(&mut self, channels: &[AdcChannel]) -> Result<(), InitError> {
        let raw: Vec<u32> = channels.iter().map(|c| c.0).collect();
        crate::drivers::hw_init::adc1_init(&raw)
    }

    fn read_raw(&mut self, channel: AdcChannel) -> Result<u16, SensorError> {
        crate::drivers::hw_init::adc1_read(channel.0)
    }
}

#[cfg(not(target_os = "espidf"))]
impl AdcPort for BoardAdapter {
    fn init_channels(&mut self, channels: &[AdcChannel]) -> Result<(), InitError> {
        self.sim.channels.extend_from_slice(channels);
        log::info!("hw_init: ADC1 configured (sim, channels={:?})", channels);
        Ok(())
    }

    fn read_raw(&mut self, channel: AdcChannel) -> Result<u16, SensorError> {
        if !self.sim.channels.contains(&channel) {
            return Err(SensorError::ChannelNotConfigured(channel.0));
        }
        if self.sim.probe.read_fails() {
            // ESP_ERR_TIMEOUT
            return Err(SensorError::AdcReadFailed(0x107));
        }
        // A floating electrode reads as ground through the probe resistor.
        let a_high = self.sim.is_driven_high(self.pins.electrode_a);
        let b_high = self.sim.is_driven_high(self.pins.electrode_b);
        Ok(match (a_high, b_high) {
            (true, false) => self.sim.probe.raw_a_to_b(),
            (false, true) => self.sim.probe.raw_b_to_a(),
            _ => 0,
        })
    }
}

// ── Host simulation state ─────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};
    use std::sync::Arc;

    use crate::app::ports::AdcChannel;
    use crate::config::{ADC_MAX_RAW, ADC_VREF};
    use crate::error::ActuatorError;
    use crate::sensors::DriveDirection;

    /// ESP_ERR_INVALID_ARG
    const INVALID_ARG: i32 = 0x102;

    #[derive(Debug, Default)]
    pub(super) struct SimBoard {
        /// Bit n set = GPIOn in output mode.
        outputs: u64,
        /// Bit n set = GPIOn latched HIGH.
        levels: u64,
        pub(super) channels: Vec<AdcChannel>,
        pub(super) probe: SimProbe,
    }

    impl SimBoard {
        pub(super) fn check_pin(&self, pin: i32, need_output: bool) -> Result<(), ActuatorError> {
            if !(0..40).contains(&pin) {
                return Err(ActuatorError::GpioConfigFailed { pin, rc: INVALID_ARG });
            }
            if need_output && self.outputs & (1u64 << pin) == 0 {
                return Err(ActuatorError::GpioWriteFailed { pin, rc: INVALID_ARG });
            }
            Ok(())
        }

        pub(super) fn set_mode(&mut self, pin: i32, output: bool) {
            if output {
                self.outputs |= 1u64 << pin;
            } else {
                self.outputs &= !(1u64 << pin);
            }
        }

        pub(super) fn set_level(&mut self, pin: i32, high: bool) {
            if high {
                self.levels |= 1u64 << pin;
            } else {
                self.levels &= !(1u64 << pin);
            }
        }

        pub(super) fn is_driven_high(&self, pin: i32) -> bool {
            (self.outputs & self.levels) & (1u64 << pin) != 0
        }
    }

    #[derive(Debug, Default)]
    struct Shared {
        raw_a_to_b: AtomicU16,
        raw_b_to_a: AtomicU16,
        read_fails: AtomicBool,
        pump_level: AtomicBool,
    }

    /// Shared injection/observation handle for the simulated board.
    /// Safe to use from a thread other than the worker's.
    #[derive(Debug, Clone, Default)]
    pub struct SimProbe {
        inner: Arc<Shared>,
    }

    impl SimProbe {
        /// Raw code the sense electrode reads while `direction` is driven.
        pub fn set_raw(&self, direction: DriveDirection, raw: u16) {
            let slot = match direction {
                DriveDirection::AToB => &self.inner.raw_a_to_b,
                DriveDirection::BToA => &self.inner.raw_b_to_a,
            };
            slot.store(raw.min(ADC_MAX_RAW), Ordering::Relaxed);
        }

        /// Same as [`set_raw`](Self::set_raw) but in volts at the pin.
        pub fn set_volts(&self, direction: DriveDirection, volts: f32) {
            let raw = (volts / ADC_VREF * f32::from(ADC_MAX_RAW)).round();
            self.set_raw(direction, raw.clamp(0.0, f32::from(ADC_MAX_RAW)) as u16);
        }

        /// Make every ADC read fail until cleared.
        pub fn set_read_failure(&self, fail: bool) {
            self.inner.read_fails.store(fail, Ordering::Relaxed);
        }

        /// Current level of the pump output pin.
        pub fn pump_level(&self) -> bool {
            self.inner.pump_level.load(Ordering::Relaxed)
        }

        pub(super) fn raw_a_to_b(&self) -> u16 {
            self.inner.raw_a_to_b.load(Ordering::Relaxed)
        }

        pub(super) fn raw_b_to_a(&self) -> u16 {
            self.inner.raw_b_to_a.load(Ordering::Relaxed)
        }

        pub(super) fn read_fails(&self) -> bool {
            self.inner.read_fails.load(Ordering::Relaxed)
        }

        pub(super) fn set_pump_level(&self, high: bool) {
            self.inner.pump_level.store(high, Ordering::Relaxed);
        }
    }
}
