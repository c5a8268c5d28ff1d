//! Sensor subsystem.
//!
//! The node has a single probe; [`conductive::ConductiveLevelSensor`]
//! produces one [`conductive::WaterState`] per control cycle which the
//! controller consumes.

pub mod conductive;

pub use conductive::{ConductiveLevelSensor, DriveDirection, WaterClass, WaterState};
