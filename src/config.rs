//! Tunable parameters for the pump node.
//!
//! Every value is fixed at build time.  The structs below only exist so the
//! defaults can be passed around as one value and so tests can shorten the
//! timings; the device always runs [`NodeConfig::default()`].

use serde::{Deserialize, Serialize};

// --- Timing ---
/// Control step period.
pub const CHECK_PERIOD_MS: u32 = 1000;
/// Hard cap on a single pump run.
pub const MAX_PUMP_TIME_MS: u32 = 3000;
/// Minimum rest between the pump turning off and turning on again.
pub const MIN_PAUSE_MS: u32 = 60_000;

// --- Probe thresholds ---
/// At or above: the direction reads WET.
pub const WET_VOLTAGE: f32 = 1.90;
/// At or below: the direction reads DRY.
pub const DRY_VOLTAGE: f32 = 1.10;
/// At or below on both directions: the sensing path is dead, not dry.
pub const ZERO_VOLTAGE: f32 = 0.02;

// --- Debounce ---
pub const WET_CONFIRM_CYCLES: u8 = 2;
pub const DRY_CONFIRM_CYCLES: u8 = 3;
pub const ZERO_CONFIRM_CYCLES: u8 = 3;

// --- ADC ---
pub const ADC_VREF: f32 = 3.3;
/// 12-bit full scale.
pub const ADC_MAX_RAW: u16 = 4095;
pub const SAMPLES_PER_MEASUREMENT: u8 = 10;
pub const SAMPLE_INTERVAL_MS: u32 = 2;
pub const DRIVE_SETTLE_MS: u32 = 5;

// --- Node ---
/// Pump blink at start-up.
pub const SELF_TEST_PULSE_MS: u32 = 200;
pub const WORKER_STACK_KB: usize = 4;

/// Probe sampling and classification parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    pub wet_voltage: f32,
    pub dry_voltage: f32,
    pub zero_voltage: f32,
    pub adc_vref: f32,
    pub adc_max_raw: u16,
    pub samples: u8,
    pub sample_interval_ms: u32,
    pub settle_ms: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            wet_voltage: WET_VOLTAGE,
            dry_voltage: DRY_VOLTAGE,
            zero_voltage: ZERO_VOLTAGE,
            adc_vref: ADC_VREF,
            adc_max_raw: ADC_MAX_RAW,
            samples: SAMPLES_PER_MEASUREMENT,
            sample_interval_ms: SAMPLE_INTERVAL_MS,
            settle_ms: DRIVE_SETTLE_MS,
        }
    }
}

/// Pump timing and debounce parameters consumed by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlConfig {
    pub max_pump_time_ms: u32,
    pub min_pause_ms: u32,
    pub wet_confirm_cycles: u8,
    pub dry_confirm_cycles: u8,
    pub zero_confirm_cycles: u8,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            max_pump_time_ms: MAX_PUMP_TIME_MS,
            min_pause_ms: MIN_PAUSE_MS,
            wet_confirm_cycles: WET_CONFIRM_CYCLES,
            dry_confirm_cycles: DRY_CONFIRM_CYCLES,
            zero_confirm_cycles: ZERO_CONFIRM_CYCLES,
        }
    }
}

/// Everything the node needs, grouped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub check_period_ms: u32,
    pub self_test_pulse_ms: u32,
    pub worker_stack_kb: usize,
    pub sensor: SensorConfig,
    pub control: ControlConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            check_period_ms: CHECK_PERIOD_MS,
            self_test_pulse_ms: SELF_TEST_PULSE_MS,
            worker_stack_kb: WORKER_STACK_KB,
            sensor: SensorConfig::default(),
            control: ControlConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Reject combinations that would break the hysteresis or the fault path.
    pub fn validate(&self) -> Result<(), &'static str> {
        let s = &self.sensor;
        if s.wet_voltage <= s.dry_voltage {
            return Err("wet_voltage must be above dry_voltage");
        }
        if s.zero_voltage >= s.dry_voltage {
            return Err("zero_voltage must be below dry_voltage");
        }
        if s.adc_vref <= 0.0 || s.adc_max_raw == 0 {
            return Err("ADC scale must be positive");
        }
        if s.samples == 0 {
            return Err("samples must be nonzero");
        }
        let c = &self.control;
        if c.wet_confirm_cycles == 0 || c.dry_confirm_cycles == 0 || c.zero_confirm_cycles == 0 {
            return Err("confirmation cycle counts must be nonzero");
        }
        if c.max_pump_time_ms == 0 {
            return Err("max_pump_time_ms must be nonzero");
        }
        if self.check_period_ms == 0 {
            return Err("check_period_ms must be nonzero");
        }
        Ok(())
    }
}
