//! Pump node lifecycle: one-time init, worker start, status queries.
//!
//! ```text
//!   PumpNode::new ──▶ init() ──▶ start(priority)
//!      Idle            Ready        Running
//!                    (Worker)    (pump_node task)
//! ```
//!
//! The node owns the board until `start()`, at which point the [`Worker`]
//! (sensor, controller, pump, board, delay, clock, sink) moves into the
//! `pump_node` thread.  From then on the only way in is the
//! [`StatusHandle`].

use core::mem;
use std::thread::JoinHandle;

use embedded_hal::delay::DelayNs;
use log::{Level, debug, error, info, log_enabled, warn};

use crate::app::events::ControlEvent;
use crate::app::ports::{AdcChannel, AdcPort, ClockPort, EventSink, GpioPort};
use crate::config::NodeConfig;
use crate::control::{PumpController, StepOutcome};
use crate::drivers::pump::PumpDriver;
use crate::drivers::task_pin::spawn_on_core;
use crate::error::InitError;
use crate::pins::{NodePins, WORKER_CORE, adc1_channel};
use crate::sensors::ConductiveLevelSensor;
use crate::status::{StatusHandle, StatusPublisher, status_channel};

const TASK_NAME: &str = "pump_node\0";

/// Everything the worker needs, before `init()` has run.
struct Parts<H, D, C, S> {
    hw: H,
    delay: D,
    clock: C,
    sink: S,
    publisher: StatusPublisher,
}

enum Stage<H, D, C, S> {
    Idle(Parts<H, D, C, S>),
    Ready(Worker<H, D, C, S>),
    Running(JoinHandle<()>),
    /// The worker was handed to a thread that failed to spawn.
    Spent,
}

/// The pump node.  `H` is the board, `D` the blocking delay, `C` the
/// uptime clock, `S` the event sink.
pub struct PumpNode<H, D, C, S> {
    pins: NodePins,
    config: NodeConfig,
    status: StatusHandle,
    stage: Stage<H, D, C, S>,
}

impl<H, D, C, S> PumpNode<H, D, C, S>
where
    H: GpioPort + AdcPort,
    D: DelayNs,
    C: ClockPort,
    S: EventSink,
{
    pub fn new(pins: NodePins, config: NodeConfig, hw: H, delay: D, clock: C, sink: S) -> Self {
        let (publisher, status) = status_channel();
        Self {
            pins,
            config,
            status,
            stage: Stage::Idle(Parts {
                hw,
                delay,
                clock,
                sink,
                publisher,
            }),
        }
    }

    /// Validate pins and tunables, bring up the pump output and ADC1,
    /// and pulse the pump once.  Idempotent after the first success; a
    /// failed call leaves the node idle so it can be retried.
    pub fn init(&mut self) -> Result<(), InitError> {
        let parts = match &mut self.stage {
            Stage::Idle(parts) => parts,
            _ => return Ok(()),
        };

        self.config.validate().map_err(InitError::InvalidConfig)?;
        let [channel_a, channel_b] = resolve_channels(&self.pins)?;

        let pump = PumpDriver::new(self.pins.pump);
        pump.configure(&mut parts.hw)?;
        parts.hw.release(self.pins.electrode_a)?;
        parts.hw.release(self.pins.electrode_b)?;
        let sensor = ConductiveLevelSensor::new(
            self.pins.electrode_a,
            self.pins.electrode_b,
            channel_a,
            channel_b,
            self.config.sensor,
        );
        parts.hw.init_channels(&sensor.channels())?;
        pump.self_test_pulse(&mut parts.hw, &mut parts.delay, self.config.self_test_pulse_ms)?;

        let controller = PumpController::new(self.config.control, parts.clock.now_ms());
        parts.publisher.publish(&controller);

        if let Stage::Idle(parts) = mem::replace(&mut self.stage, Stage::Spent) {
            self.stage = Stage::Ready(Worker {
                parts,
                sensor,
                pump,
                controller,
                period_ms: self.config.check_period_ms,
            });
        }

        info!(
            "init done (A=GPIO{}, B=GPIO{}, pump=GPIO{})",
            self.pins.electrode_a, self.pins.electrode_b, self.pins.pump
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        !matches!(self.stage, Stage::Idle(_))
    }

    /// The worker thread exists and has not exited.
    pub fn is_running(&self) -> bool {
        matches!(&self.stage, Stage::Running(handle) if !handle.is_finished())
    }

    /// Run one control cycle on the calling thread.  Only available
    /// between `init()` and `start()`; returns `None` otherwise.
    pub fn step_once(&mut self) -> Option<StepOutcome> {
        match &mut self.stage {
            Stage::Ready(worker) => Some(worker.run_cycle()),
            _ => None,
        }
    }

    // ── Queries (any thread, via the status record) ───────────

    pub fn level_percent(&self) -> u8 {
        self.status.level_percent()
    }

    pub fn is_pump_on(&self) -> bool {
        self.status.is_pump_on()
    }

    pub fn sensor_fault(&self) -> bool {
        self.status.sensor_fault()
    }

    pub fn status_handle(&self) -> StatusHandle {
        self.status.clone()
    }
}

impl<H, D, C, S> PumpNode<H, D, C, S>
where
    H: GpioPort + AdcPort + Send + 'static,
    D: DelayNs + Send + 'static,
    C: ClockPort + Send + 'static,
    S: EventSink + Send + 'static,
{
    /// Spawn the `pump_node` worker on the application core.  Idempotent
    /// once running.
    pub fn start(&mut self, priority: u8) -> Result<(), InitError> {
        match mem::replace(&mut self.stage, Stage::Spent) {
            Stage::Ready(worker) => {
                let stack_kb = self.config.worker_stack_kb;
                match spawn_on_core(WORKER_CORE, priority, stack_kb, TASK_NAME, move || worker.run()) {
                    Ok(handle) => {
                        info!("pump_node task started (prio={})", priority);
                        self.stage = Stage::Running(handle);
                        Ok(())
                    }
                    Err(e) => {
                        error!("failed to create pump_node task: {}", e);
                        Err(InitError::TaskSpawnFailed)
                    }
                }
            }
            Stage::Running(handle) => {
                self.stage = Stage::Running(handle);
                Ok(())
            }
            Stage::Idle(parts) => {
                self.stage = Stage::Idle(parts);
                Err(InitError::NotInitialized)
            }
            Stage::Spent => Err(InitError::TaskSpawnFailed),
        }
    }
}

/// Map both electrodes to ADC1 channels and reject shared pins.
fn resolve_channels(pins: &NodePins) -> Result<[AdcChannel; 2], InitError> {
    if pins.electrode_a == pins.electrode_b || pins.electrode_a == pins.pump {
        return Err(InitError::DuplicatePin(pins.electrode_a));
    }
    if pins.electrode_b == pins.pump {
        return Err(InitError::DuplicatePin(pins.electrode_b));
    }
    let a = adc1_channel(pins.electrode_a).ok_or(InitError::NotAdcCapable(pins.electrode_a))?;
    let b = adc1_channel(pins.electrode_b).ok_or(InitError::NotAdcCapable(pins.electrode_b))?;
    Ok([a, b])
}

// ───────────────────────────────────────────────────────────────
// Worker
// ───────────────────────────────────────────────────────────────

/// Sole owner of the controller state and the board once running.
pub struct Worker<H, D, C, S> {
    parts: Parts<H, D, C, S>,
    sensor: ConductiveLevelSensor,
    pump: PumpDriver,
    controller: PumpController,
    period_ms: u32,
}

impl<H, D, C, S> Worker<H, D, C, S>
where
    H: GpioPort + AdcPort,
    D: DelayNs,
    C: ClockPort,
    S: EventSink,
{
    /// Measure, decide, actuate, publish.
    pub fn run_cycle(&mut self) -> StepOutcome {
        let p = &mut self.parts;
        let state = self.sensor.get_water_state(&mut p.hw, &mut p.delay);
        let now = p.clock.now_ms();
        let mut output = self.pump.output(&mut p.hw);
        let outcome = self.controller.step(&state, now, &mut output, &mut p.sink);
        p.publisher.publish(&self.controller);
        if log_enabled!(Level::Debug) {
            match serde_json::to_string(&self.controller.snapshot()) {
                Ok(json) => debug!("snapshot {}", json),
                Err(e) => warn!("snapshot not serialisable: {}", e),
            }
        }
        outcome
    }

    fn run(mut self) {
        self.parts.sink.emit(&ControlEvent::Started {
            level_percent: self.controller.level_percent(),
        });
        loop {
            self.run_cycle();
            self.parts.delay.delay_ms(self.period_ms);
        }
    }
}
