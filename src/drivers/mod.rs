//! Actuator drivers, raw peripheral helpers, and task spawning.

#[cfg(target_os = "espidf")]
pub mod hw_init;
pub mod pump;
pub mod task_pin;
