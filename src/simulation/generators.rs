//! Event generators for light transitions and car arrivals
//!
//! Both generators are pure: they return the events in increasing time order
//! and leave insertion into the queue to the caller.

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::config::RunConfig;
use super::types::{Event, EventKind, SimTime};

/// Generate one transition of `kind` at every period boundary from `start`
/// up to and including `end`
///
/// Times are computed as `start + k * period` so long schedules do not drift.
/// The last event is the last boundary not past `end`; it is never snapped to
/// `end` itself.
pub fn light_transitions(
    kind: EventKind,
    start: SimTime,
    end: SimTime,
    period: SimTime,
) -> Result<Vec<Event>> {
    if !kind.is_transition() {
        bail!("{:?} is not a light transition", kind);
    }
    if !period.is_finite() || period <= 0.0 {
        bail!("Transition period must be positive, got {}", period);
    }

    let mut events = Vec::new();
    let mut step: u64 = 0;
    loop {
        let time = start + step as f64 * period;
        if time > end {
            break;
        }
        step += 1;
        events.push(Event::new(time, format!("transition{}", step), kind));
    }
    Ok(events)
}

/// Build the whole light schedule for a run
///
/// The light starts green at 0, turns red after `green_length` and back to
/// green after a full cycle.
pub fn light_schedule(config: &RunConfig) -> Result<Vec<Event>> {
    let cycle = config.cycle_length();
    let mut events = light_transitions(
        EventKind::LightToRed,
        config.green_length,
        config.horizon,
        cycle,
    )?;
    events.extend(light_transitions(
        EventKind::LightToGreen,
        cycle,
        config.horizon,
        cycle,
    )?);
    Ok(events)
}

/// Generate car arrivals as a Poisson process with rate `lambda`
///
/// The horizon doubles as the number of draws. An arrival is kept while it
/// lands no more than one gap past the horizon, so the clock before the draw
/// must still be within the horizon.
pub fn car_arrivals(seed: u64, lambda: f64, horizon: SimTime) -> Result<Vec<Event>> {
    if !lambda.is_finite() || lambda <= 0.0 {
        bail!("Arrival rate must be positive, got {}", lambda);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let max_draws = horizon.max(0.0).ceil() as u64;
    let mut clock: SimTime = 0.0;
    let mut events = Vec::new();

    for index in 0..max_draws {
        let u: f64 = rng.random();
        let gap = -(1.0 - u).ln() / lambda;
        clock += gap;
        if clock <= horizon + gap {
            events.push(Event::new(clock, format!("car_{}", index), EventKind::CarArrival));
        }
    }
    Ok(events)
}
