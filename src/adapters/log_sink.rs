//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing controller events to the `log`
//! facade (UART / USB-CDC on the device, stderr on host).

use log::{info, warn};

use crate::app::events::{ControlEvent, StopReason};
use crate::app::ports::EventSink;

/// Adapter that logs every [`ControlEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ControlEvent) {
        match *event {
            ControlEvent::Started { level_percent } => {
                info!("START | level={}%", level_percent);
            }
            ControlEvent::PumpStarted { at_ms } => {
                info!("PUMP | ON at t={}ms", at_ms);
            }
            ControlEvent::PumpStopped { reason, ran_ms } => {
                info!("PUMP | OFF ({}) after {}ms", stop_reason(reason), ran_ms);
            }
            ControlEvent::LevelChanged { full } => {
                info!("LEVEL | {}", if full { "FULL" } else { "NOT FULL" });
            }
            ControlEvent::SensorFault { zero_cycles } => {
                warn!("FAULT | probe reads ~0V both ways for {} cycles", zero_cycles);
            }
            ControlEvent::SensorFaultCleared => {
                info!("FAULT | cleared");
            }
            ControlEvent::PumpWriteFailed { on } => {
                warn!("PUMP | write {} failed", if on { "ON" } else { "OFF" });
            }
        }
    }
}

fn stop_reason(reason: StopReason) -> &'static str {
    match reason {
        StopReason::Timeout => "timeout",
        StopReason::LevelFull => "level full",
        StopReason::SensorFault => "sensor fault",
    }
}
