//! Core types for the traffic light simulation
//!
//! Events are the only thing that flows through the queue; everything else
//! is derived from them by the driver.

use std::fmt;

/// Simulation time in seconds on the virtual clock
pub type SimTime = f64;

/// Kind of occurrence an event represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A car reaches the intersection
    CarArrival,
    /// The light switches from red to green
    LightToGreen,
    /// The light switches from green to red
    LightToRed,
}

impl EventKind {
    pub fn is_transition(&self) -> bool {
        !matches!(self, EventKind::CarArrival)
    }

    /// The phase the light is in after this event, if it is a transition
    pub fn target_phase(&self) -> Option<Phase> {
        match self {
            EventKind::CarArrival => None,
            EventKind::LightToGreen => Some(Phase::Green),
            EventKind::LightToRed => Some(Phase::Red),
        }
    }
}

/// State of the light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Green,
    Red,
}

impl Phase {
    pub fn opposite(&self) -> Phase {
        match self {
            Phase::Green => Phase::Red,
            Phase::Red => Phase::Green,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Green => "green",
            Phase::Red => "red",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A timestamped occurrence in the simulation
///
/// Fields are private so an event cannot change once it has been queued.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    time: SimTime,
    label: String,
    kind: EventKind,
}

impl Event {
    pub fn new(time: SimTime, label: impl Into<String>, kind: EventKind) -> Self {
        debug_assert!(time >= 0.0, "event time must be non-negative");
        Self {
            time,
            label: label.into(),
            kind,
        }
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

/// Default length of a run in seconds
pub const DEFAULT_HORIZON: SimTime = 300.0;
