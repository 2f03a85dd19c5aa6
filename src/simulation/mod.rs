//! Discrete-event simulation of a single traffic light
//!
//! This module contains the event queue, the event generators, the analysis
//! groups and the driver that ties them together. Everything runs on a
//! virtual clock and is deterministic for a given configuration.

mod analysis;
mod config;
mod driver;
mod event_queue;
mod generators;
mod types;

pub use analysis::{AnalysisGroup, GroupStats, Histogram, Summary, MAX_HISTOGRAM_BUCKETS};
pub use config::{RunConfig, MAX_HORIZON, PRESETS};
pub use driver::{populate_queue, run_simulation, GroupReport, RunReport, SimulationDriver};
pub use event_queue::EventQueue;
pub use generators::{car_arrivals, light_schedule, light_transitions};
pub use types::{Event, EventKind, Phase, SimTime, DEFAULT_HORIZON};
