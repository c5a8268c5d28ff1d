//! Outbound controller events.
//!
//! The [`PumpController`](crate::control::engine::PumpController) emits these
//! through the [`EventSink`](super::ports::EventSink) port on state edges
//! only.  Per-cycle diagnostics go straight to the `log` facade.

/// Why the pump was switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Ran longer than the configured cap.
    Timeout,
    /// The debounced level reached FULL.
    LevelFull,
    /// Both probe directions read near-zero for too long.
    SensorFault,
}

/// Structured events emitted by the control core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// The worker came up; carries the initial debounced level.
    Started { level_percent: u8 },

    /// Pump switched on at `at_ms`.
    PumpStarted { at_ms: u32 },

    /// Pump switched off after running `ran_ms`.
    PumpStopped { reason: StopReason, ran_ms: u32 },

    /// Debounced level flipped.
    LevelChanged { full: bool },

    /// Zero-voltage fault confirmed after `zero_cycles` consecutive cycles.
    SensorFault { zero_cycles: u8 },

    /// A non-zero reading cleared the fault.
    SensorFaultCleared,

    /// Writing the pump pin failed; the commanded state was kept.
    PumpWriteFailed { on: bool },
}
