//! Lock-free status published by the worker.
//!
//! The worker is the only writer; any thread may read through a
//! [`StatusHandle`].  Each field is an independent atomic, so a reader can
//! see the level from one cycle and the pump flag from the next.  That is
//! fine for the two queries this serves.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use crate::control::PumpController;

#[derive(Debug, Default)]
struct NodeStatus {
    level_percent: AtomicU8,
    pump_on: AtomicBool,
    sensor_fault: AtomicBool,
}

/// Write side, held by the worker only.  Not `Clone`.
#[derive(Debug)]
pub struct StatusPublisher {
    inner: Arc<NodeStatus>,
}

/// Read side.  Cheap to clone and hand to other tasks.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    inner: Arc<NodeStatus>,
}

/// Create a linked publisher/handle pair with everything zeroed.
pub fn status_channel() -> (StatusPublisher, StatusHandle) {
    let inner = Arc::new(NodeStatus::default());
    (
        StatusPublisher { inner: Arc::clone(&inner) },
        StatusHandle { inner },
    )
}

impl StatusPublisher {
    /// Copy the controller's externally visible fields.
    pub fn publish(&self, controller: &PumpController) {
        self.inner
            .level_percent
            .store(controller.level_percent(), Ordering::Release);
        self.inner
            .pump_on
            .store(controller.is_pump_on(), Ordering::Release);
        self.inner
            .sensor_fault
            .store(controller.sensor_fault(), Ordering::Release);
    }
}

impl StatusHandle {
    /// Debounced level: 0 (not full) or 100 (full).
    pub fn level_percent(&self) -> u8 {
        self.inner.level_percent.load(Ordering::Acquire)
    }

    pub fn is_pump_on(&self) -> bool {
        self.inner.pump_on.load(Ordering::Acquire)
    }

    pub fn sensor_fault(&self) -> bool {
        self.inner.sensor_fault.load(Ordering::Acquire)
    }
}
