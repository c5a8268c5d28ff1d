//! Control core: level hysteresis and the pump decision engine.

pub mod debounce;
pub mod engine;

pub use engine::{ControllerSnapshot, PumpController, PumpPhase, StepOutcome};
