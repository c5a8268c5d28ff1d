//! Fuzz target: `PumpController::step`
//!
//! Decodes the input as a sequence of 5-byte cycles (A→B raw, B→A raw as
//! little-endian 12-bit codes with a "read failed" bit, then a time step)
//! and asserts the run cap, the rest window and fault inhibition after
//! every step.
//!
//! cargo fuzz run fuzz_controller_steps

#![no_main]

use libfuzzer_sys::fuzz_target;
use pumpnode::app::events::ControlEvent;
use pumpnode::app::ports::{EventSink, PumpPort};
use pumpnode::config::{ControlConfig, SensorConfig};
use pumpnode::control::{PumpController, StepOutcome};
use pumpnode::error::ActuatorError;
use pumpnode::sensors::conductive::raw_to_volts;
use pumpnode::sensors::WaterState;

struct Pin(bool);

impl PumpPort for Pin {
    fn set_pump(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.0 = on;
        Ok(())
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &ControlEvent) {}
}

fn voltage(lo: u8, hi: u8, cfg: &SensorConfig) -> Option<f32> {
    // Bit 7 of the high byte marks a failed read.
    if hi & 0x80 != 0 {
        return None;
    }
    let raw = u16::from_le_bytes([lo, hi & 0x0F]).min(cfg.adc_max_raw);
    Some(raw_to_volts(f32::from(raw), cfg))
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let sensor = SensorConfig::default();
    let control = ControlConfig::default();
    let start = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);

    let mut ctl = PumpController::new(control, start);
    let mut pin = Pin(false);
    let mut now = start;

    for chunk in data[4..].chunks_exact(5) {
        let u_ab = voltage(chunk[0], chunk[1], &sensor);
        let u_ba = voltage(chunk[2], chunk[3], &sensor);
        // 0..=255 scaled to 0..=~65s so both windows get crossed.
        now = now.wrapping_add(u32::from(chunk[4]) * 256);

        let water = WaterState::from_voltages(u_ab, u_ba, &sensor);
        assert!(!(water.any_water && water.all_dry));

        let before = ctl.snapshot();
        let outcome = ctl.step(&water, now, &mut pin, &mut Discard);
        let after = ctl.snapshot();

        assert_eq!(pin.0, after.pump_on);
        if after.pump_on {
            assert!(now.wrapping_sub(after.pump_start_ms) <= control.max_pump_time_ms);
        }
        if outcome == StepOutcome::Started {
            assert!(now.wrapping_sub(before.last_water_ms) >= control.min_pause_ms);
        }
        if after.sensor_fault {
            assert!(!after.pump_on);
        }
    }
});
