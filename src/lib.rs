//! `sensordash` — terminal dashboard for live IoT sensor telemetry.
//!
//! Polls a ThingSpeak-style channel API on a fixed interval, renders three
//! live gauges (temperature, humidity, gas) plus a historical time-series
//! chart, and exports the loaded history as CSV.
//!
//! Module boundaries follow the Explicit Module Boundary Pattern (EMBP):
//! this gateway re-exports the public surface, and sibling modules only talk
//! to each other through it.
//! - `config` — persisted channel credentials (load/save/validate)
//! - `client` — the two read-only HTTP GET endpoints
//! - `models` — raw feed entries, parsed readings, time ranges
//! - `render` — gauge/chart view-model math (no terminal code)
//! - `poller` — 30s fetch schedule with a stale-generation guard
//! - `export` — CSV serialization and file naming
//! - `tui`    — event loop and drawing

mod client;
mod config;
mod error;
mod export;
mod models;
mod poller;
mod render;
mod tui;

pub use client::{TelemetryClient, DEFAULT_BASE_URL};
pub use config::{Config, ConfigStore};
pub use error::DashError;
pub use export::{csv_filename, to_csv, write_csv};
pub use models::{BucketUnit, FeedEntry, FeedResponse, Reading, TimeRange};
pub use poller::{PollEvent, Poller, POLL_INTERVAL};
pub use render::{gauges, Channel, ChartSeries, ChartView, GaugeView, GAUGE_CIRCUMFERENCE};
pub use tui::run;
