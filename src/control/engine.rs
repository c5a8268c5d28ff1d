//! Pump decision engine.
//!
//! [`PumpController`] owns every piece of persistent control state: pump
//! timing, the level hysteresis and the probe fault supervisor.  One call to
//! [`PumpController::step`] is one control cycle.
//!
//! ```text
//!                      rest elapsed && !full
//!   OFF_RESTING ──▶ OFF_READY ─────────────────────▶ ON
//!        ▲                                            │
//!        └──────── timeout │ full │ sensor fault ─────┘
//! ```
//!
//! The sensor fault is an overriding mode rather than a state: while it is
//! active every cycle forces the pump off and nothing else runs.

use log::{info, warn};
use serde::Serialize;

use crate::app::events::{ControlEvent, StopReason};
use crate::app::ports::{EventSink, PumpPort};
use crate::config::ControlConfig;
use crate::safety::{FaultStatus, SensorFaultMonitor};
use crate::sensors::WaterState;

use super::debounce::LevelDebouncer;

/// Derived pump state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpPhase {
    /// Off, inside the minimum rest window.
    OffResting,
    /// Off, allowed to start.
    OffReady,
    On,
}

/// What a single step decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Sensor fault active; pump forced off, level untouched.
    Fault,
    /// Pump stopped by the run-time cap.
    TimedOut,
    /// Pump stopped because the level is FULL.
    StoppedFull,
    /// Pump keeps running.
    Running,
    /// Pump off, rest lockout still running.
    Resting,
    /// Pump switched on.
    Started,
    /// Pump off and level FULL.
    HoldingFull,
}

/// Read-only copy of the controller state for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControllerSnapshot {
    pub pump_on: bool,
    pub is_full: bool,
    pub level_percent: u8,
    pub wet_streak: u8,
    pub dry_streak: u8,
    pub zero_streak: u8,
    pub sensor_fault: bool,
    pub pump_start_ms: u32,
    pub last_water_ms: u32,
    pub off_pending: bool,
}

/// The decision engine.
pub struct PumpController {
    cfg: ControlConfig,
    pump_on: bool,
    pump_start_ms: u32,
    /// Stamped on every OFF transition, whatever the cause.
    last_water_ms: u32,
    /// The last OFF write failed; the pin may still be HIGH.
    off_pending: bool,
    level: LevelDebouncer,
    fault: SensorFaultMonitor,
    last_level_percent: u8,
}

impl PumpController {
    /// Fresh state at `now_ms`: pump off, rest already satisfied, level
    /// confirmed not-full.
    pub fn new(cfg: ControlConfig, now_ms: u32) -> Self {
        Self {
            pump_on: false,
            pump_start_ms: 0,
            last_water_ms: now_ms.wrapping_sub(cfg.min_pause_ms),
            off_pending: false,
            level: LevelDebouncer::new(cfg.wet_confirm_cycles, cfg.dry_confirm_cycles),
            fault: SensorFaultMonitor::new(cfg.zero_confirm_cycles),
            last_level_percent: 0,
            cfg,
        }
    }

    /// Run one control cycle against this cycle's probe reading.
    pub fn step(
        &mut self,
        water: &WaterState,
        now_ms: u32,
        pump: &mut impl PumpPort,
        sink: &mut impl EventSink,
    ) -> StepOutcome {
        if self.off_pending {
            self.retry_off(pump, sink);
        }

        // ── 1. Fault supervisor (pre-empts everything) ────────────
        match self.fault.evaluate(water.all_zero) {
            FaultStatus::Entered => sink.emit(&ControlEvent::SensorFault {
                zero_cycles: self.fault.zero_streak(),
            }),
            FaultStatus::Cleared => sink.emit(&ControlEvent::SensorFaultCleared),
            FaultStatus::Active | FaultStatus::Clear => {}
        }

        if self.fault.is_active() {
            if self.pump_on {
                warn!("Pump OFF due to sensor fault");
                self.switch_off(now_ms, StopReason::SensorFault, pump, sink);
            }
            return StepOutcome::Fault;
        }

        // ── 2. Level hysteresis ───────────────────────────────────
        if let Some(full) = self.level.update(water.any_water, water.all_dry) {
            sink.emit(&ControlEvent::LevelChanged { full });
        }
        let is_full = self.level.is_full();
        self.last_level_percent = if is_full { 100 } else { 0 };

        info!(
            "control: isFull={} pumpOn={} dtSinceLast={} wet={} dry={} zero={}",
            is_full,
            self.pump_on,
            now_ms.wrapping_sub(self.last_water_ms),
            self.level.wet_streak(),
            self.level.dry_streak(),
            self.fault.zero_streak(),
        );

        // ── 3. Pump running: timeout first, then level ────────────
        if self.pump_on {
            if now_ms.wrapping_sub(self.pump_start_ms) > self.cfg.max_pump_time_ms {
                warn!("Pump TIMEOUT -> OFF");
                self.switch_off(now_ms, StopReason::Timeout, pump, sink);
                return StepOutcome::TimedOut;
            }
            if is_full {
                info!("Level FULL -> pump OFF");
                self.switch_off(now_ms, StopReason::LevelFull, pump, sink);
                return StepOutcome::StoppedFull;
            }
            return StepOutcome::Running;
        }

        // ── 4. Pump idle: rest lockout, then level ────────────────
        if self.resting(now_ms) {
            info!("Too soon since last watering, skip");
            return StepOutcome::Resting;
        }
        if is_full {
            info!("Level FULL by hysteresis, no watering");
            return StepOutcome::HoldingFull;
        }

        info!("Level LOW -> pump ON");
        self.switch_on(now_ms, pump, sink);
        StepOutcome::Started
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn is_pump_on(&self) -> bool {
        self.pump_on
    }

    /// Last derived level: 0 (not full) or 100 (full).
    pub fn level_percent(&self) -> u8 {
        self.last_level_percent
    }

    pub fn is_full(&self) -> bool {
        self.level.is_full()
    }

    pub fn sensor_fault(&self) -> bool {
        self.fault.is_active()
    }

    pub fn phase(&self, now_ms: u32) -> PumpPhase {
        if self.pump_on {
            PumpPhase::On
        } else if self.resting(now_ms) {
            PumpPhase::OffResting
        } else {
            PumpPhase::OffReady
        }
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            pump_on: self.pump_on,
            is_full: self.level.is_full(),
            level_percent: self.last_level_percent,
            wet_streak: self.level.wet_streak(),
            dry_streak: self.level.dry_streak(),
            zero_streak: self.fault.zero_streak(),
            sensor_fault: self.fault.is_active(),
            pump_start_ms: self.pump_start_ms,
            last_water_ms: self.last_water_ms,
            off_pending: self.off_pending,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn resting(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.last_water_ms) < self.cfg.min_pause_ms
    }

    fn switch_on(&mut self, now_ms: u32, pump: &mut impl PumpPort, sink: &mut impl EventSink) {
        self.pump_on = true;
        self.pump_start_ms = now_ms;
        self.off_pending = false;
        Self::write_pump(true, pump, sink);
        sink.emit(&ControlEvent::PumpStarted { at_ms: now_ms });
    }

    fn switch_off(
        &mut self,
        now_ms: u32,
        reason: StopReason,
        pump: &mut impl PumpPort,
        sink: &mut impl EventSink,
    ) {
        self.pump_on = false;
        self.last_water_ms = now_ms;
        self.off_pending = !Self::write_pump(false, pump, sink);
        sink.emit(&ControlEvent::PumpStopped {
            reason,
            ran_ms: now_ms.wrapping_sub(self.pump_start_ms),
        });
    }

    /// Re-issue a failed OFF write.  Runs before anything else in the
    /// cycle, fault or not, until the pin accepts LOW.
    fn retry_off(&mut self, pump: &mut impl PumpPort, sink: &mut impl EventSink) {
        if Self::write_pump(false, pump, sink) {
            info!("pump OFF retry succeeded");
            self.off_pending = false;
        }
    }

    /// The commanded state stands even if the pin write fails, so the
    /// timeout and rest windows keep counting from the decision.
    fn write_pump(on: bool, pump: &mut impl PumpPort, sink: &mut impl EventSink) -> bool {
        match pump.set_pump(on) {
            Ok(()) => true,
            Err(e) => {
                warn!("pump write failed: {}", e);
                sink.emit(&ControlEvent::PumpWriteFailed { on });
                false
            }
        }
    }
}
