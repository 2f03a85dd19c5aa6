//! Run configuration and the named preset test cases

use anyhow::{bail, Result};

use super::analysis::MAX_HISTOGRAM_BUCKETS;
use super::types::{SimTime, DEFAULT_HORIZON};

/// Longest horizon a run accepts; the horizon is also the car draw count
pub const MAX_HORIZON: SimTime = 1_000_000.0;

/// Parameters of a single simulation run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunConfig {
    /// Seed for the car arrival generator
    pub seed: u64,
    /// Mean arrivals per second
    pub lambda: f64,
    /// Seconds the light stays green
    pub green_length: SimTime,
    /// Seconds the light stays red
    pub red_length: SimTime,
    /// Histogram bucket width in seconds
    pub bucket_size: SimTime,
    /// End of the light schedule, also used as the car draw bound
    pub horizon: SimTime,
}

/// Preset (seed, lambda, green, red, bucket) tuples, selectable as 1..=8
pub const PRESETS: [(u64, f64, f64, f64, f64); 8] = [
    (2, 0.75, 30.0, 30.0, 10.0),
    (2, 0.5, 30.0, 30.0, 10.0),
    (2, 5.0, 30.0, 30.0, 10.0),
    (2, 0.75, 45.0, 30.0, 10.0),
    (2, 0.75, 30.0, 45.0, 10.0),
    (2, 0.75, 10.0, 10.0, 10.0),
    (2, 5.0, 30.0, 30.0, 15.0),
    (2, 5.0, 30.0, 30.0, 5.0),
];

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(2, 0.75, 30.0, 30.0, 10.0)
    }
}

impl RunConfig {
    pub fn new(
        seed: u64,
        lambda: f64,
        green_length: SimTime,
        red_length: SimTime,
        bucket_size: SimTime,
    ) -> Self {
        Self {
            seed,
            lambda,
            green_length,
            red_length,
            bucket_size,
            horizon: DEFAULT_HORIZON,
        }
    }

    /// Look up a preset by its 1-based number
    pub fn preset(number: usize) -> Result<Self> {
        if number == 0 || number > PRESETS.len() {
            bail!(
                "Invalid test case {}: expected a number between 1 and {}",
                number,
                PRESETS.len()
            );
        }
        let (seed, lambda, green, red, bucket) = PRESETS[number - 1];
        Ok(Self::new(seed, lambda, green, red, bucket))
    }

    pub fn with_horizon(mut self, horizon: SimTime) -> Self {
        self.horizon = horizon;
        self
    }

    /// Length of one full green + red cycle
    pub fn cycle_length(&self) -> SimTime {
        self.green_length + self.red_length
    }

    /// Check that every parameter is usable
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("lambda", self.lambda),
            ("green length", self.green_length),
            ("red length", self.red_length),
            ("bucket size", self.bucket_size),
            ("horizon", self.horizon),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                bail!("{} must be a positive finite number, got {}", name, value);
            }
        }
        if self.horizon > MAX_HORIZON {
            bail!("horizon must be at most {}s, got {}s", MAX_HORIZON, self.horizon);
        }

        // Time-to-boundary values stay within one phase plus a cycle of overrun.
        let span = self.green_length.max(self.red_length) + self.cycle_length();
        let buckets = span / self.bucket_size;
        if buckets > MAX_HISTOGRAM_BUCKETS as f64 {
            bail!(
                "bucket size {}s is too small: {}s of phase time would need {} buckets, limit is {}",
                self.bucket_size,
                span,
                buckets.ceil(),
                MAX_HISTOGRAM_BUCKETS
            );
        }
        Ok(())
    }

    pub fn summary(&self) -> String {
        format!(
            "seed={} lambda={} green={}s red={}s bucket={}s horizon={}s",
            self.seed, self.lambda, self.green_length, self.red_length, self.bucket_size, self.horizon
        )
    }
}
