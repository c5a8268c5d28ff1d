//! Two-electrode conductivity probe.
//!
//! One electrode is driven HIGH while the ADC samples the other.  Water
//! between the electrodes pulls the sensed side up; air leaves it near the
//! floor.  Each cycle measures both directions (A→B then B→A) so neither
//! electrode is always the anode, which keeps electrolytic wear even.
//!
//! Between the DRY and WET thresholds lies a deliberate dead band that
//! classifies as UNKNOWN.  Two directions both sitting at ~0 V is not
//! "very dry": it means the probe is disconnected, shorted low, or the ADC
//! path is dead, and is reported separately as `all_zero`.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use log::{info, warn};

use crate::app::ports::{AdcChannel, AdcPort, GpioPort};
use crate::config::SensorConfig;
use crate::error::SensorError;

/// Which electrode is held HIGH.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveDirection {
    /// Drive A, sense B.
    AToB,
    /// Drive B, sense A.
    BToA,
}

/// Per-direction classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterClass {
    Wet,
    Dry,
    Unknown,
}

impl WaterClass {
    fn tag(self) -> &'static str {
        match self {
            Self::Wet => "WET",
            Self::Dry => "DRY",
            Self::Unknown => "UNK",
        }
    }
}

/// One direction's measurement.  `voltage` is `None` when any sample failed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionReading {
    pub voltage: Option<f32>,
    pub class: WaterClass,
}

/// Aggregated probe state for one control cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterState {
    /// At least one direction reads WET.
    pub any_water: bool,
    /// Both directions read DRY.
    pub all_dry: bool,
    /// Both directions read at or below the zero threshold.
    pub all_zero: bool,
    pub a_to_b: DirectionReading,
    pub b_to_a: DirectionReading,
}

/// Three-way classification against the WET/DRY thresholds.
pub fn classify(voltage: Option<f32>, cfg: &SensorConfig) -> WaterClass {
    match voltage {
        Some(u) if u >= cfg.wet_voltage => WaterClass::Wet,
        Some(u) if u <= cfg.dry_voltage => WaterClass::Dry,
        _ => WaterClass::Unknown,
    }
}

/// Convert an averaged raw code to volts.
pub fn raw_to_volts(avg_raw: f32, cfg: &SensorConfig) -> f32 {
    avg_raw / f32::from(cfg.adc_max_raw) * cfg.adc_vref
}

impl WaterState {
    /// Aggregate two direction voltages.  An unavailable voltage is never
    /// WET, never DRY, and never counts towards `all_zero`.
    pub fn from_voltages(u_ab: Option<f32>, u_ba: Option<f32>, cfg: &SensorConfig) -> Self {
        let a_to_b = DirectionReading { voltage: u_ab, class: classify(u_ab, cfg) };
        let b_to_a = DirectionReading { voltage: u_ba, class: classify(u_ba, cfg) };

        let near_zero = |u: Option<f32>| u.is_some_and(|v| v <= cfg.zero_voltage);

        Self {
            any_water: a_to_b.class == WaterClass::Wet || b_to_a.class == WaterClass::Wet,
            all_dry: a_to_b.class == WaterClass::Dry && b_to_a.class == WaterClass::Dry,
            all_zero: near_zero(u_ab) && near_zero(u_ba),
            a_to_b,
            b_to_a,
        }
    }
}

/// The probe driver.  Owns pin numbers and channel mapping only; the GPIO,
/// ADC and delay are borrowed per call.
pub struct ConductiveLevelSensor {
    electrode_a: i32,
    electrode_b: i32,
    channel_a: AdcChannel,
    channel_b: AdcChannel,
    cfg: SensorConfig,
}

impl ConductiveLevelSensor {
    pub fn new(
        electrode_a: i32,
        electrode_b: i32,
        channel_a: AdcChannel,
        channel_b: AdcChannel,
        cfg: SensorConfig,
    ) -> Self {
        Self {
            electrode_a,
            electrode_b,
            channel_a,
            channel_b,
            cfg,
        }
    }

    /// ADC channels in (A, B) order, for unit initialisation.
    pub fn channels(&self) -> [AdcChannel; 2] {
        [self.channel_a, self.channel_b]
    }

    /// Measure one direction and return the averaged voltage.
    ///
    /// The drive electrode is returned to high impedance on every path,
    /// including a failed sample.
    pub fn measure(
        &self,
        hw: &mut (impl GpioPort + AdcPort),
        delay: &mut impl DelayNs,
        direction: DriveDirection,
    ) -> Result<f32, SensorError> {
        let (drive_pin, sense_ch) = match direction {
            DriveDirection::AToB => (self.electrode_a, self.channel_b),
            DriveDirection::BToA => (self.electrode_b, self.channel_a),
        };

        hw.release(self.electrode_a)?;
        hw.release(self.electrode_b)?;

        let sum = Self::drive(hw, drive_pin).and_then(|()| {
            delay.delay_ms(self.cfg.settle_ms);
            self.sample(hw, delay, sense_ch)
        });

        let released = hw.release(drive_pin);
        let sum = sum?;
        released?;

        let avg_raw = sum as f32 / f32::from(self.cfg.samples);
        Ok(raw_to_volts(avg_raw, &self.cfg))
    }

    /// Measure both directions, classify, aggregate, and log the result.
    pub fn get_water_state(
        &self,
        hw: &mut (impl GpioPort + AdcPort),
        delay: &mut impl DelayNs,
    ) -> WaterState {
        let u_ab = self.measure_logged(hw, delay, DriveDirection::AToB);
        let u_ba = self.measure_logged(hw, delay, DriveDirection::BToA);
        let state = WaterState::from_voltages(u_ab, u_ba, &self.cfg);

        info!(
            "probe: U_AB={}({}) U_BA={}({}) anyWater={} allDry={} allZero={}",
            fmt_volts(state.a_to_b.voltage),
            state.a_to_b.class.tag(),
            fmt_volts(state.b_to_a.voltage),
            state.b_to_a.class.tag(),
            yes_no(state.any_water),
            yes_no(state.all_dry),
            yes_no(state.all_zero),
        );
        state
    }

    // ── Internal ──────────────────────────────────────────────

    fn drive(hw: &mut impl GpioPort, pin: i32) -> Result<(), SensorError> {
        hw.set_output_mode(pin)?;
        hw.set_level(pin, PinState::High)?;
        Ok(())
    }

    fn sample(
        &self,
        hw: &mut impl AdcPort,
        delay: &mut impl DelayNs,
        channel: AdcChannel,
    ) -> Result<u32, SensorError> {
        let mut sum: u32 = 0;
        for _ in 0..self.cfg.samples {
            sum += u32::from(hw.read_raw(channel)?);
            delay.delay_ms(self.cfg.sample_interval_ms);
        }
        Ok(sum)
    }

    fn measure_logged(
        &self,
        hw: &mut (impl GpioPort + AdcPort),
        delay: &mut impl DelayNs,
        direction: DriveDirection,
    ) -> Option<f32> {
        match self.measure(hw, delay, direction) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("probe: {:?} unavailable: {}", direction, e);
                None
            }
        }
    }
}

fn fmt_volts(v: Option<f32>) -> String {
    v.map_or_else(|| "n/a".into(), |u| format!("{u:.3}V"))
}

fn yes_no(b: bool) -> &'static str {
    if b { "YES" } else { "NO" }
}
