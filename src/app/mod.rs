//! Application boundary: port traits and the events that cross them.
//!
//! The decision logic lives in [`crate::control`] and [`crate::sensors`];
//! everything it needs from the outside world is expressed as a trait in
//! [`ports`], keeping that logic testable without real peripherals.

pub mod events;
pub mod ports;
