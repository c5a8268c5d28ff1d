//! End-to-end control scenarios: scripted probe voltages in, pump pin out.
//!
//! Every cycle goes through the real sensor path (drive, settle, sample,
//! classify) and the real controller, with the mock board standing in for
//! GPIO and ADC1.

use pumpnode::app::events::{ControlEvent, StopReason};
use pumpnode::config::{MAX_PUMP_TIME_MS, MIN_PAUSE_MS};
use pumpnode::control::StepOutcome;

use crate::mock_hw::Rig;

const WET: f32 = 2.5;
const DRY: f32 = 0.5;
const ZERO: f32 = 0.0;

/// Two any-water cycles from a ready, not-full node confirm FULL, and the
/// pump is off once FULL is confirmed.  No run ever reaches the timeout.
#[test]
fn scenario_a_two_wet_cycles_confirm_full() {
    let mut rig = Rig::ready();
    assert_eq!(rig.node.level_percent(), 0);

    rig.cycle(1_000, WET);
    assert_eq!(rig.node.level_percent(), 0, "one wet cycle is not enough");

    rig.cycle(1_000, WET);
    assert_eq!(rig.node.level_percent(), 100);
    assert!(!rig.node.is_pump_on());
    assert!(!rig.board.pump_on());
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            ControlEvent::PumpStopped {
                reason: StopReason::Timeout,
                ..
            }
        )),
        0
    );
    assert!(rig.sink.events().contains(&ControlEvent::LevelChanged { full: true }));
}

/// Once FULL is held, further wet cycles keep the pump off.
#[test]
fn scenario_a_full_level_holds_pump_off() {
    let mut rig = Rig::ready();
    rig.cycle(1_000, WET);
    rig.cycle(1_000, WET);
    // Let the rest window from the short run expire.
    let outcome = rig.cycle(MIN_PAUSE_MS + 1_000, WET);
    assert_eq!(outcome, StepOutcome::HoldingFull);
    assert!(!rig.board.pump_on());
}

#[test]
fn scenario_b_run_cap_forces_off_at_first_cycle_past_limit() {
    let mut rig = Rig::ready();
    assert_eq!(rig.cycle(1_000, DRY), StepOutcome::Started);
    assert!(rig.board.pump_on());

    let mut elapsed = 0;
    loop {
        let outcome = rig.cycle(100, DRY);
        elapsed += 100;
        if elapsed <= MAX_PUMP_TIME_MS {
            assert_eq!(outcome, StepOutcome::Running, "still running at {elapsed}ms");
            assert!(rig.board.pump_on());
        } else {
            assert_eq!(outcome, StepOutcome::TimedOut);
            break;
        }
    }
    assert_eq!(elapsed, 3_100);
    assert!(!rig.board.pump_on());
    assert!(rig.sink.events().contains(&ControlEvent::PumpStopped {
        reason: StopReason::Timeout,
        ran_ms: 3_100,
    }));
}

/// A single failed OFF write at the run cap must not leave the pump
/// running through the rest window.
#[test]
fn failed_timeout_off_write_is_retried_until_pin_is_low() {
    let mut rig = Rig::ready();
    assert_eq!(rig.cycle(1_000, DRY), StepOutcome::Started);
    rig.cycle(1_000, DRY);
    rig.cycle(1_000, DRY);
    rig.cycle(1_000, DRY);

    rig.board.state().fail_turn_offs = 1;
    assert_eq!(rig.cycle(1_000, DRY), StepOutcome::TimedOut);
    assert!(!rig.node.is_pump_on());
    assert!(rig.board.pump_on(), "pin stuck HIGH after the failed write");

    let mut high_cycles = 0;
    for _ in 0..59 {
        assert_eq!(rig.cycle(1_000, DRY), StepOutcome::Resting);
        if rig.board.pump_on() {
            high_cycles += 1;
        }
    }
    assert_eq!(high_cycles, 0);
    assert_eq!(
        rig.sink.count(|e| *e == ControlEvent::PumpWriteFailed { on: false }),
        1
    );
}

#[test]
fn scenario_c_rest_lockout_then_restart() {
    let mut rig = Rig::ready();
    rig.cycle(1_000, DRY);
    // Time out the first run so the pump has just turned off.
    assert_eq!(rig.cycle(MAX_PUMP_TIME_MS + 1, DRY), StepOutcome::TimedOut);

    for s in 1..=59 {
        assert_eq!(rig.cycle(1_000, DRY), StepOutcome::Resting, "at {s}s");
        assert!(!rig.board.pump_on());
        assert_eq!(rig.node.level_percent(), 0);
    }

    // 59s → 61s
    assert_eq!(rig.cycle(2_000, DRY), StepOutcome::Started);
    assert!(rig.board.pump_on());
}

#[test]
fn scenario_d_zero_fault_stops_pump_and_stamps_rest() {
    let mut rig = Rig::ready();
    rig.cycle(1_000, DRY);
    assert!(rig.board.pump_on());

    assert_eq!(rig.cycle(1_000, ZERO), StepOutcome::Running);
    assert_eq!(rig.cycle(1_000, ZERO), StepOutcome::Running);
    assert!(!rig.node.sensor_fault());

    assert_eq!(rig.cycle(1_000, ZERO), StepOutcome::Fault);
    assert!(!rig.board.pump_on());
    assert!(rig.node.sensor_fault());
    assert!(rig.sink.events().contains(&ControlEvent::SensorFault { zero_cycles: 3 }));

    // A plain dry reading clears the fault but the rest window now applies.
    assert_eq!(rig.cycle(1_000, DRY), StepOutcome::Resting);
    assert!(!rig.board.pump_on());
    assert!(!rig.node.sensor_fault());
    assert!(rig.sink.events().contains(&ControlEvent::SensorFaultCleared));
}

#[test]
fn fault_inhibits_watering_while_readings_stay_zero() {
    let mut rig = Rig::ready();
    for _ in 0..3 {
        rig.cycle(1_000, ZERO);
    }
    assert!(rig.node.sensor_fault());
    rig.board.clear_calls();

    for _ in 0..100 {
        assert_eq!(rig.cycle(MIN_PAUSE_MS, ZERO), StepOutcome::Fault);
        assert!(!rig.board.pump_on());
    }
    assert_eq!(rig.board.pump_writes(), Vec::<bool>::new());
}

#[test]
fn ambiguous_reading_resets_wet_progress() {
    let mut rig = Rig::ready();
    rig.cycle(1_000, WET);
    rig.cycle(1_000, 1.5);
    rig.cycle(1_000, WET);
    assert_eq!(rig.node.level_percent(), 0);
    rig.cycle(1_000, WET);
    assert_eq!(rig.node.level_percent(), 100);
}

#[test]
fn one_wet_direction_is_enough() {
    let mut rig = Rig::ready();
    for _ in 0..2 {
        rig.clock.advance(1_000);
        rig.board.set_probe(Some(WET), Some(DRY));
        rig.node.step_once().unwrap();
    }
    assert_eq!(rig.node.level_percent(), 100);
}

#[test]
fn failed_direction_is_neither_wet_nor_dry() {
    let mut rig = Rig::ready();
    rig.cycle(1_000, WET);
    rig.cycle(1_000, WET);
    assert_eq!(rig.node.level_percent(), 100);

    // B→A unavailable, A→B dry: not all-dry, so FULL holds.
    for _ in 0..5 {
        rig.clock.advance(1_000);
        rig.board.set_probe(Some(DRY), None);
        rig.node.step_once().unwrap();
    }
    assert_eq!(rig.node.level_percent(), 100);
    assert!(!rig.node.sensor_fault());
}

#[test]
fn survives_clock_wrap() {
    let mut rig = Rig::ready();
    rig.clock.set(u32::MAX - 500);
    assert_eq!(rig.cycle(0, DRY), StepOutcome::Started);
    // 1500ms of run time across the wrap: still within the cap.
    assert_eq!(rig.cycle(1_500, DRY), StepOutcome::Running);
    assert_eq!(rig.cycle(2_000, DRY), StepOutcome::TimedOut);
}
