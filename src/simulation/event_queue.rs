//! Time-ordered event queue
//!
//! Events are kept in a `BTreeMap` keyed by time, with one insertion-ordered
//! bucket per distinct timestamp. Ties are detected with exact float equality.

use ordered_float::OrderedFloat;
use std::collections::BTreeMap;

use super::types::{Event, SimTime};

/// Pending events ordered by time with a stable tie-break
#[derive(Debug, Default)]
pub struct EventQueue {
    name: String,
    pending: BTreeMap<OrderedFloat<SimTime>, Vec<Event>>,
    len: usize,
}

impl EventQueue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pending: BTreeMap::new(),
            len: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert an event; callers may insert in any order
    pub fn add_event(&mut self, event: Event) {
        self.pending
            .entry(OrderedFloat(event.time()))
            .or_default()
            .push(event);
        self.len += 1;
    }

    pub fn add_events(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.add_event(event);
        }
    }

    pub fn has_events(&self) -> bool {
        self.len > 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Time of the earliest pending event
    pub fn peek_time(&self) -> Option<SimTime> {
        self.pending.keys().next().map(|t| t.0)
    }

    /// Remove every event at the earliest time, in insertion order
    ///
    /// # Panics
    /// Panics if the queue is empty. Check `has_events()` first, or use
    /// `try_service()`.
    pub fn service(&mut self) -> Vec<Event> {
        match self.try_service() {
            Some(events) => events,
            None => panic!("service() called on empty event queue '{}'", self.name),
        }
    }

    /// Like `service()`, but returns `None` when nothing is pending
    pub fn try_service(&mut self) -> Option<Vec<Event>> {
        let (_, events) = self.pending.pop_first()?;
        self.len -= events.len();
        Some(events)
    }
}
