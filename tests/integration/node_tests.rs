//! Node lifecycle: init ordering, validation, idempotency, start.

use std::time::{Duration, Instant};

use pumpnode::adapters::hardware::BoardAdapter;
use pumpnode::adapters::time::{StdDelay, UptimeClock};
use pumpnode::app::events::ControlEvent;
use pumpnode::app::ports::AdcChannel;
use pumpnode::config::{NodeConfig, SELF_TEST_PULSE_MS};
use pumpnode::error::InitError;
use pumpnode::node::PumpNode;
use pumpnode::pins::{NodePins, PUMP_GPIO, WORKER_PRIORITY};
use pumpnode::sensors::DriveDirection;

use crate::mock_hw::{GpioCall, RecordingSink, Rig};

#[test]
fn init_brings_up_pump_low_then_adc_then_pulses() {
    let mut rig = Rig::new(NodeConfig::default());
    rig.node.init().unwrap();

    let calls = rig.board.state().calls.clone();
    assert_eq!(calls[0], GpioCall::ConfigureOutput(PUMP_GPIO));
    assert_eq!(calls[1], GpioCall::Level(PUMP_GPIO, false));
    assert!(calls.contains(&GpioCall::Release(32)));
    assert!(calls.contains(&GpioCall::Release(33)));
    assert_eq!(rig.board.pump_writes(), vec![false, true, false]);
    assert!(!rig.board.pump_on());

    assert_eq!(rig.board.state().channels, vec![AdcChannel(4), AdcChannel(5)]);
    assert_eq!(rig.delay.delays_ms(), vec![SELF_TEST_PULSE_MS]);
    assert!(rig.node.is_initialized());
}

#[test]
fn init_is_idempotent() {
    let mut rig = Rig::new(NodeConfig::default());
    rig.node.init().unwrap();
    rig.board.clear_calls();
    rig.delay.clear();

    rig.node.init().unwrap();
    assert!(rig.board.state().calls.is_empty());
    assert!(rig.delay.delays_ms().is_empty());
}

#[test]
fn invalid_config_is_rejected_before_touching_hardware() {
    let mut config = NodeConfig::default();
    config.sensor.wet_voltage = 1.0;
    let mut rig = Rig::new(config);

    assert!(matches!(rig.node.init(), Err(InitError::InvalidConfig(_))));
    assert!(rig.board.state().calls.is_empty());
    assert!(!rig.node.is_initialized());
}

#[test]
fn duplicate_pins_are_rejected() {
    let pins = NodePins {
        electrode_a: 32,
        electrode_b: 32,
        pump: 26,
    };
    let mut rig = Rig::with_pins(pins, NodeConfig::default());
    assert_eq!(rig.node.init(), Err(InitError::DuplicatePin(32)));
}

#[test]
fn non_adc_electrode_is_rejected() {
    let pins = NodePins {
        electrode_a: 32,
        electrode_b: 4,
        pump: 26,
    };
    let mut rig = Rig::with_pins(pins, NodeConfig::default());
    assert_eq!(rig.node.init(), Err(InitError::NotAdcCapable(4)));
}

#[test]
fn adc_failure_leaves_node_idle_and_retryable() {
    let mut rig = Rig::new(NodeConfig::default());
    rig.board.state().fail_adc_init = true;
    assert_eq!(rig.node.init(), Err(InitError::AdcInitFailed(-1)));
    assert!(!rig.node.is_initialized());
    assert_eq!(rig.node.step_once(), None);

    rig.board.state().fail_adc_init = false;
    rig.node.init().unwrap();
    assert!(rig.node.is_initialized());
}

#[test]
fn pump_gpio_failure_surfaces_as_init_error() {
    let mut rig = Rig::new(NodeConfig::default());
    rig.board.state().fail_writes_on = Some(PUMP_GPIO);
    assert!(matches!(rig.node.init(), Err(InitError::Gpio(_))));
}

#[test]
fn failed_self_test_leaves_pump_low_and_node_retryable() {
    let mut rig = Rig::new(NodeConfig::default());
    rig.board.state().fail_turn_offs = 1;

    assert!(matches!(rig.node.init(), Err(InitError::Gpio(_))));
    assert_eq!(rig.board.pump_writes(), vec![false, true, false, false]);
    assert!(!rig.board.pump_on());
    assert!(!rig.node.is_initialized());

    rig.node.init().unwrap();
    assert!(rig.node.is_initialized());
}

#[test]
fn start_before_init_is_refused() {
    let mut rig = Rig::new(NodeConfig::default());
    assert_eq!(rig.node.start(WORKER_PRIORITY), Err(InitError::NotInitialized));
    // The node is still usable.
    rig.node.init().unwrap();
}

#[test]
fn status_handle_tracks_cycles() {
    let mut rig = Rig::ready();
    let status = rig.node.status_handle();
    assert!(!status.is_pump_on());

    rig.cycle(1_000, 0.5);
    assert!(status.is_pump_on());
    assert_eq!(status.level_percent(), 0);

    rig.cycle(1_000, 2.5);
    rig.cycle(1_000, 2.5);
    assert_eq!(status.level_percent(), 100);
    assert!(!status.is_pump_on());
}

#[test]
fn pump_write_failure_is_reported_not_fatal() {
    let mut rig = Rig::ready();
    rig.board.state().fail_writes_on = Some(PUMP_GPIO);
    rig.cycle(1_000, 0.5);

    assert!(rig.node.is_pump_on());
    assert!(!rig.board.pump_on());
    assert!(rig.sink.events().contains(&ControlEvent::PumpWriteFailed { on: true }));
}

/// Full threaded run against the host board simulation.
#[test]
fn worker_runs_on_its_own_thread() {
    let mut config = NodeConfig::default();
    config.check_period_ms = 5;
    config.self_test_pulse_ms = 1;
    config.sensor.samples = 2;
    config.sensor.settle_ms = 0;
    config.sensor.sample_interval_ms = 0;

    let pins = NodePins::default();
    let board = BoardAdapter::new(pins);
    let probe = board.sim_probe();
    probe.set_volts(DriveDirection::AToB, 2.5);
    probe.set_volts(DriveDirection::BToA, 2.5);

    let sink = RecordingSink::new();
    let mut node = PumpNode::new(pins, config, board, StdDelay, UptimeClock::new(), sink.clone());
    node.init().unwrap();
    node.start(WORKER_PRIORITY).unwrap();
    assert!(node.is_running());
    assert_eq!(node.step_once(), None);

    // Second start is a no-op.
    node.start(WORKER_PRIORITY).unwrap();

    let status = node.status_handle();
    let deadline = Instant::now() + Duration::from_secs(5);
    while status.level_percent() != 100 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(status.level_percent(), 100);
    assert_eq!(node.level_percent(), 100);
    assert!(matches!(
        sink.events().first(),
        Some(ControlEvent::Started { level_percent: 0 })
    ));
}
