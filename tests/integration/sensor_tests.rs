//! Conductive probe measurement against the mock board.

use pumpnode::app::ports::{AdcChannel, AdcPort};
use pumpnode::config::SensorConfig;
use pumpnode::error::SensorError;
use pumpnode::sensors::{ConductiveLevelSensor, DriveDirection, WaterClass};

use crate::mock_hw::{GpioCall, MockBoard, MockDelay};

fn sensor() -> ConductiveLevelSensor {
    ConductiveLevelSensor::new(32, 33, AdcChannel(4), AdcChannel(5), SensorConfig::default())
}

fn board() -> MockBoard {
    let mut b = MockBoard::new();
    b.init_channels(&sensor().channels()).unwrap();
    b
}

#[test]
fn a_to_b_drives_a_and_samples_b() {
    let mut b = board();
    let mut d = MockDelay::new();
    b.set_probe(Some(2.0), Some(1.0));

    let u = sensor().measure(&mut b, &mut d, DriveDirection::AToB).unwrap();
    assert!((u - 2.0).abs() < 0.005, "u={u}");

    let s = b.state();
    assert_eq!(s.reads, vec![AdcChannel(5); 10]);
    assert_eq!(
        &s.calls[..4],
        &[
            GpioCall::Release(32),
            GpioCall::Release(33),
            GpioCall::OutputMode(32),
            GpioCall::Level(32, true),
        ]
    );
    assert_eq!(s.calls.last(), Some(&GpioCall::Release(32)));
}

#[test]
fn b_to_a_samples_channel_of_a() {
    let mut b = board();
    let mut d = MockDelay::new();
    b.set_probe(Some(2.0), Some(1.0));

    let u = sensor().measure(&mut b, &mut d, DriveDirection::BToA).unwrap();
    assert!((u - 1.0).abs() < 0.005, "u={u}");
    assert!(b.state().reads.iter().all(|&c| c == AdcChannel(4)));
    assert!(!b.is_output(33));
}

#[test]
fn settle_then_delay_after_every_sample() {
    let mut b = board();
    let mut d = MockDelay::new();
    b.set_both(1.5);
    sensor().measure(&mut b, &mut d, DriveDirection::AToB).unwrap();

    let mut expected = vec![5];
    expected.extend([2; 10]);
    assert_eq!(d.delays_ms(), expected);
}

#[test]
fn failed_sample_still_releases_drive_pin() {
    let mut b = board();
    let mut d = MockDelay::new();
    b.set_probe(None, Some(1.0));

    let err = sensor().measure(&mut b, &mut d, DriveDirection::AToB).unwrap_err();
    assert_eq!(err, SensorError::AdcReadFailed(-1));
    assert_eq!(b.state().calls.last(), Some(&GpioCall::Release(32)));
    assert!(!b.is_output(32));
}

#[test]
fn water_state_marks_failed_direction_unknown() {
    let mut b = board();
    let mut d = MockDelay::new();
    b.set_probe(Some(2.5), None);

    let state = sensor().get_water_state(&mut b, &mut d);
    assert_eq!(state.a_to_b.class, WaterClass::Wet);
    assert_eq!(state.b_to_a.class, WaterClass::Unknown);
    assert_eq!(state.b_to_a.voltage, None);
    assert!(state.any_water);
    assert!(!state.all_dry);
    assert!(!state.all_zero);
}

#[test]
fn both_near_zero_is_all_zero_and_all_dry() {
    let mut b = board();
    let mut d = MockDelay::new();
    b.set_both(0.0);

    let state = sensor().get_water_state(&mut b, &mut d);
    assert!(state.all_zero);
    assert!(state.all_dry);
    assert!(!state.any_water);
}

#[test]
fn electrodes_end_high_impedance() {
    let mut b = board();
    let mut d = MockDelay::new();
    b.set_both(2.5);
    sensor().get_water_state(&mut b, &mut d);
    assert!(!b.is_output(32));
    assert!(!b.is_output(33));
}
