//! Probe fault supervisor.
//!
//! Runs **every cycle before the level debounce**.  Both drive directions
//! reading ~0 V means the sensing path is broken (probe unplugged, shorted
//! low, wrong pin, dead ADC), which would otherwise look like a dry tank
//! and start the pump on an unknown level.
//!
//! ## Fault lifecycle
//!
//! 1. Each all-zero cycle increments the zero streak (saturating).
//! 2. Once the streak reaches the confirmation count the fault is active:
//!    the controller forces the pump off and skips the rest of the cycle.
//! 3. The first cycle that is not all-zero resets the streak and the fault
//!    clears immediately.  There is no latch and no other recovery action.

use log::{info, warn};

use crate::control::debounce::BoundedCounter;

/// Result of feeding one cycle to the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultStatus {
    /// No fault this cycle.
    Clear,
    /// Fault confirmed on this cycle.
    Entered,
    /// Fault still active.
    Active,
    /// Fault was active last cycle and has just cleared.
    Cleared,
}

/// Zero-voltage fault supervisor.
pub struct SensorFaultMonitor {
    zero_streak: BoundedCounter,
    confirm_cycles: u8,
    active: bool,
}

impl SensorFaultMonitor {
    pub fn new(confirm_cycles: u8) -> Self {
        Self {
            zero_streak: BoundedCounter::new(u8::MAX),
            confirm_cycles,
            active: false,
        }
    }

    /// Feed one cycle's `all_zero` flag.
    pub fn evaluate(&mut self, all_zero: bool) -> FaultStatus {
        if all_zero {
            self.zero_streak.increment();
        } else {
            self.zero_streak.reset();
        }

        let was_active = self.active;
        self.active = self.zero_streak.reached(self.confirm_cycles);

        if self.active {
            warn!(
                "SENSOR FAULT: both directions ~0V for {} cycles -> inhibit watering",
                self.zero_streak.count()
            );
        } else if was_active {
            info!("SENSOR FAULT CLEARED");
        }

        match (was_active, self.active) {
            (false, true) => FaultStatus::Entered,
            (true, true) => FaultStatus::Active,
            (true, false) => FaultStatus::Cleared,
            (false, false) => FaultStatus::Clear,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn zero_streak(&self) -> u8 {
        self.zero_streak.count()
    }
}
