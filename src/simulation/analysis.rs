//! Statistical accumulators for arrival times
//!
//! An `AnalysisGroup` collects arrival timestamps and splits them into
//! sub-intervals at separators. When a sub-interval closes, every arrival in
//! it is resolved to the time that remained until the boundary, and those
//! values feed both the descriptive statistics and the histogram.

use anyhow::{bail, Result};
use log::info;
use ordered_float::OrderedFloat;
use sorted_vec::SortedVec;
use std::fmt;

use super::types::SimTime;

/// Upper bound on the number of buckets a single histogram may hold
pub const MAX_HISTOGRAM_BUCKETS: usize = 100_000;

/// Descriptive statistics over a non-empty set of values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl Summary {
    fn from_sorted(values: &[OrderedFloat<f64>]) -> Option<Self> {
        let n = values.len();
        if n == 0 {
            return None;
        }
        let mean = values.iter().map(|v| v.0).sum::<f64>() / n as f64;
        let variance = values.iter().map(|v| (v.0 - mean).powi(2)).sum::<f64>() / n as f64;
        let median = if n % 2 == 1 {
            values[n / 2].0
        } else {
            (values[n / 2 - 1].0 + values[n / 2].0) / 2.0
        };
        Some(Self {
            min: values[0].0,
            max: values[n - 1].0,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}

/// Statistics emitted when a group is finalized
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub name: String,
    pub opened_at: SimTime,
    pub closed_at: SimTime,
    /// Number of recorded arrivals
    pub count: usize,
    /// Arrivals per sub-interval, in order
    pub interval_counts: Vec<usize>,
    /// Summary of time remaining until each arrival's boundary
    pub summary: Option<Summary>,
}

impl GroupStats {
    /// Arrivals per second over the lifetime of the group
    pub fn arrival_rate(&self) -> f64 {
        let span = self.closed_at - self.opened_at;
        if span > 0.0 {
            self.count as f64 / span
        } else {
            0.0
        }
    }
}

impl fmt::Display for GroupStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {:.2}s..{:.2}s: {} arrivals in {} interval(s), {:.3}/s",
            self.name,
            self.opened_at,
            self.closed_at,
            self.count,
            self.interval_counts.len(),
            self.arrival_rate()
        )?;
        if let Some(s) = &self.summary {
            write!(
                f,
                "; time to boundary min={:.2} max={:.2} mean={:.2} median={:.2} sd={:.2}",
                s.min, s.max, s.mean, s.median, s.std_dev
            )?;
        }
        Ok(())
    }
}

/// Dense fixed-width histogram starting at 0
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub name: String,
    pub bucket_size: f64,
    /// `counts[k]` holds values in `[k * bucket_size, (k + 1) * bucket_size)`
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// (lower bound, count) for every bucket, including empty ones
    pub fn buckets(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(move |(k, count)| (k as f64 * self.bucket_size, *count))
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Histogram [{}] bucket={}s total={}",
            self.name,
            self.bucket_size,
            self.total()
        )?;
        let widest = self.counts.iter().copied().max().unwrap_or(0).max(1);
        for (lower, count) in self.buckets() {
            let bar_len = (count * 40).div_ceil(widest);
            writeln!(
                f,
                "  {:>8.2} - {:<8.2} {:>6} {}",
                lower,
                lower + self.bucket_size,
                count,
                "#".repeat(bar_len)
            )?;
        }
        Ok(())
    }
}

/// Named accumulator of arrival times
#[derive(Debug)]
pub struct AnalysisGroup {
    name: String,
    bucket_size: f64,
    opened_at: SimTime,
    arrivals: Vec<SimTime>,
    separators: Vec<SimTime>,
    /// Index of the first arrival in the open sub-interval
    open_from: usize,
    interval_counts: Vec<usize>,
    /// Resolved time-to-boundary values
    remaining: SortedVec<OrderedFloat<f64>>,
    stats: Option<GroupStats>,
}

impl AnalysisGroup {
    /// # Panics
    /// Panics if `bucket_size` is not positive.
    pub fn new(name: impl Into<String>, bucket_size: f64, opened_at: SimTime) -> Self {
        assert!(bucket_size > 0.0, "bucket size must be positive");
        Self {
            name: name.into(),
            bucket_size,
            opened_at,
            arrivals: Vec::new(),
            separators: Vec::new(),
            open_from: 0,
            interval_counts: Vec::new(),
            remaining: SortedVec::new(),
            stats: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bucket_size(&self) -> f64 {
        self.bucket_size
    }

    pub fn arrivals(&self) -> &[SimTime] {
        &self.arrivals
    }

    pub fn separators(&self) -> &[SimTime] {
        &self.separators
    }

    pub fn count(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_finalized(&self) -> bool {
        self.stats.is_some()
    }

    /// Statistics computed at finalization
    pub fn stats(&self) -> Option<&GroupStats> {
        self.stats.as_ref()
    }

    /// Record an arrival in the open sub-interval
    pub fn add_event_time(&mut self, time: SimTime) {
        self.assert_open("add_event_time");
        self.arrivals.push(time);
    }

    /// Close the open sub-interval at `time` without closing the group
    pub fn add_event_separator(&mut self, time: SimTime) {
        self.assert_open("add_event_separator");
        self.separators.push(time);
        self.close_sub_interval(time);
    }

    /// Close the group at `time` and compute its statistics
    ///
    /// # Panics
    /// Panics if the group was already finalized.
    pub fn finalize_interval(&mut self, time: SimTime) -> GroupStats {
        self.assert_open("finalize_interval");
        self.close_sub_interval(time);

        let stats = GroupStats {
            name: self.name.clone(),
            opened_at: self.opened_at,
            closed_at: time,
            count: self.arrivals.len(),
            interval_counts: self.interval_counts.clone(),
            summary: Summary::from_sorted(&self.remaining),
        };
        info!("{}", stats);
        self.stats = Some(stats.clone());
        stats
    }

    /// Bucket the time-to-boundary values of a finalized group
    ///
    /// Buckets are left-closed, start at 0 and run up to the bucket holding
    /// the largest value, with empty buckets kept. Fails if that would take
    /// more than `MAX_HISTOGRAM_BUCKETS` buckets.
    ///
    /// # Panics
    /// Panics if the group is still open or `bucket_size` is not positive.
    pub fn generate_histogram(&self, bucket_size: f64) -> Result<Histogram> {
        assert!(
            self.is_finalized(),
            "generate_histogram called on open group '{}'",
            self.name
        );
        assert!(bucket_size > 0.0, "bucket size must be positive");

        let bucket_count = match self.remaining.last() {
            Some(max) => (max.0 / bucket_size).floor() + 1.0,
            None => 0.0,
        };
        if !bucket_count.is_finite() || bucket_count > MAX_HISTOGRAM_BUCKETS as f64 {
            bail!(
                "Histogram for '{}' needs {} buckets of {}s, limit is {}",
                self.name,
                bucket_count,
                bucket_size,
                MAX_HISTOGRAM_BUCKETS
            );
        }

        let mut counts = vec![0; bucket_count as usize];
        for value in self.remaining.iter() {
            counts[(value.0 / bucket_size).floor() as usize] += 1;
        }

        let histogram = Histogram {
            name: self.name.clone(),
            bucket_size,
            counts,
        };
        info!("{}", histogram);
        Ok(histogram)
    }

    /// Histogram using the group's own bucket size
    pub fn histogram(&self) -> Result<Histogram> {
        self.generate_histogram(self.bucket_size)
    }

    fn close_sub_interval(&mut self, boundary: SimTime) {
        let pending = &self.arrivals[self.open_from..];
        for &time in pending {
            self.remaining.insert(OrderedFloat((boundary - time).max(0.0)));
        }
        self.interval_counts.push(pending.len());
        self.open_from = self.arrivals.len();
    }

    fn assert_open(&self, operation: &str) {
        assert!(
            !self.is_finalized(),
            "{} called on finalized group '{}'",
            operation,
            self.name
        );
    }
}
