//! Pump node firmware library.
//!
//! Conductive-probe level sensing and pump control for a single irrigation
//! reservoir.  Pure logic (sensor classification, debounce, fault
//! supervision, pump decisions) is target-independent; all ESP-IDF-specific
//! code is guarded by `#[cfg(target_os = "espidf")]` within each module, so
//! the whole crate builds and tests on host.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod node;
pub mod pins;
pub mod safety;
pub mod sensors;
pub mod status;

pub mod adapters;
pub mod drivers;
