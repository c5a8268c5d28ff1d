//! Pump Node Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  BoardAdapter        LogEventSink   UptimeClock   FreeRtos     │
//! │  (GpioPort+AdcPort)  (EventSink)    (ClockPort)   (DelayNs)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │          pump_node worker (pure logic)                 │    │
//! │  │  ConductiveLevelSensor · LevelDebouncer · FaultMonitor │    │
//! │  │  PumpController                                        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  StatusHandle (atomics) ◀── queries from any task              │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use log::{info, warn};

use pumpnode::adapters::hardware::BoardAdapter;
use pumpnode::adapters::log_sink::LogEventSink;
use pumpnode::adapters::time::UptimeClock;
use pumpnode::config::NodeConfig;
use pumpnode::node::PumpNode;
use pumpnode::pins::{self, NodePins};

/// How often the main task reports the published status.
const STATUS_REPORT_SECS: u64 = 30;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Pump node v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (build-time) ─────────────────────────
    let config = NodeConfig::default();
    match serde_json::to_string(&config) {
        Ok(json) => info!("Config: {}", json),
        Err(e) => warn!("Config: not serialisable ({})", e),
    }

    // ── 3. Construct adapters and bring the node up ───────────
    let node_pins = NodePins::default();
    let mut node = PumpNode::new(
        node_pins,
        config,
        BoardAdapter::new(node_pins),
        FreeRtos,
        UptimeClock::new(),
        LogEventSink::new(),
    );
    node.init()?;
    node.start(pins::WORKER_PRIORITY)?;

    // ── 4. Idle: report status ────────────────────────────────
    let status = node.status_handle();
    loop {
        std::thread::sleep(Duration::from_secs(STATUS_REPORT_SECS));
        info!(
            "STATUS | level={}% pump={} fault={}",
            status.level_percent(),
            if status.is_pump_on() { "ON" } else { "OFF" },
            status.sensor_fault(),
        );
    }
}
