//! Simulation driver
//!
//! Drains the event queue in time order, tracks the light phase and routes
//! each arrival to the analysis groups for that phase.

use anyhow::{Context, Result};
use log::{debug, info, trace};

use super::analysis::{AnalysisGroup, GroupStats, Histogram};
use super::config::RunConfig;
use super::event_queue::EventQueue;
use super::generators::{car_arrivals, light_schedule};
use super::types::{Event, EventKind, Phase, SimTime};

/// Final statistics and histogram of a whole-run group
#[derive(Debug, Clone)]
pub struct GroupReport {
    pub stats: GroupStats,
    pub histogram: Histogram,
}

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct RunReport {
    pub config: RunConfig,
    /// Group (1): every arrival
    pub all: GroupReport,
    /// Group (2): arrivals while green
    pub on_green: GroupReport,
    /// Group (3): arrivals while red
    pub on_red: GroupReport,
    /// Per-interval groups in the order they were closed
    pub intervals: Vec<GroupStats>,
    pub events_processed: usize,
    pub final_time: SimTime,
}

impl RunReport {
    pub fn print_summary(&self, with_intervals: bool) {
        println!("=== Traffic Light Simulation ===");
        println!("{}", self.config.summary());
        println!(
            "Events processed: {}, final time: {:.2}s",
            self.events_processed, self.final_time
        );
        println!();

        if with_intervals {
            println!("--- Intervals ---");
            for stats in &self.intervals {
                println!("  {}", stats);
            }
            println!();
        }

        for report in [&self.on_red, &self.on_green, &self.all] {
            println!("{}", report.stats);
            println!("Total events: {}", report.stats.count);
            print!("{}", report.histogram);
            println!();
        }
    }
}

/// Owns the analysis groups and the light state for one run
#[derive(Debug)]
pub struct SimulationDriver {
    bucket_size: f64,
    phase: Phase,
    /// Number given to the next interval opened by a transition; the
    /// interval the run starts in is number 0
    next_interval: usize,
    all: AnalysisGroup,
    on_green: AnalysisGroup,
    on_red: AnalysisGroup,
    /// The group for the interval in progress; `None` only after `finish`
    current: Option<AnalysisGroup>,
    closed_intervals: Vec<GroupStats>,
    events_processed: usize,
    last_time: SimTime,
}

impl SimulationDriver {
    /// Start a run in the green phase at time 0
    pub fn new(bucket_size: f64) -> Self {
        Self {
            bucket_size,
            phase: Phase::Green,
            next_interval: 1,
            all: AnalysisGroup::new("all", bucket_size, 0.0),
            on_green: AnalysisGroup::new("on_green:all", bucket_size, 0.0),
            on_red: AnalysisGroup::new("on_red:all", bucket_size, 0.0),
            current: Some(AnalysisGroup::new("on_green:0", bucket_size, 0.0)),
            closed_intervals: Vec::new(),
            events_processed: 0,
            last_time: 0.0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Name of the interval group currently collecting arrivals
    pub fn current_interval_name(&self) -> Option<&str> {
        self.current.as_ref().map(|g| g.name())
    }

    /// Stats of the interval groups closed so far
    pub fn closed_intervals(&self) -> &[GroupStats] {
        &self.closed_intervals
    }

    pub fn last_time(&self) -> SimTime {
        self.last_time
    }

    /// Drain the queue and produce the report
    pub fn run(mut self, queue: &mut EventQueue, config: RunConfig) -> Result<RunReport> {
        while queue.has_events() {
            let batch = queue.service();
            self.process_batch(batch);
        }
        self.finish(config)
    }

    /// Handle every event sharing one timestamp
    ///
    /// Arrivals go first so a car arriving exactly at a transition counts
    /// against the phase that is ending. The sort is stable, so each kind
    /// keeps its insertion order.
    pub fn process_batch(&mut self, mut batch: Vec<Event>) {
        batch.sort_by_key(|event| event.kind().is_transition());
        for event in &batch {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: &Event) {
        let time = event.time();
        match event.kind() {
            EventKind::CarArrival => {
                trace!("{} arrives at {:.3}s on {}", event.label(), time, self.phase);
                self.all.add_event_time(time);
                self.whole_phase_group(self.phase).add_event_time(time);
                self.current_group().add_event_time(time);
            }
            kind => {
                if let Some(target) = kind.target_phase() {
                    self.transition(target, time);
                }
            }
        }
        self.events_processed += 1;
        self.last_time = time;
    }

    /// Finalize every open group at the last processed time
    ///
    /// The interval still open at the end is finalized too, so every
    /// interval appears in the report.
    pub fn finish(mut self, config: RunConfig) -> Result<RunReport> {
        let end = self.last_time;
        if let Some(mut group) = self.current.take() {
            self.closed_intervals.push(group.finalize_interval(end));
        }

        let on_red = Self::close_whole_run(&mut self.on_red, end, self.bucket_size)?;
        let on_green = Self::close_whole_run(&mut self.on_green, end, self.bucket_size)?;
        let all = Self::close_whole_run(&mut self.all, end, self.bucket_size)?;

        info!(
            "Run complete: {} events, {} arrivals, final time {:.2}s",
            self.events_processed, all.stats.count, end
        );

        Ok(RunReport {
            config,
            all,
            on_green,
            on_red,
            intervals: self.closed_intervals,
            events_processed: self.events_processed,
            final_time: end,
        })
    }

    fn transition(&mut self, target: Phase, time: SimTime) {
        debug!("Light turns {} at {:.3}s", target, time);
        self.phase = target;

        let ending = target.opposite();
        self.all.add_event_separator(time);
        self.whole_phase_group(ending).add_event_separator(time);

        if let Some(mut group) = self.current.take() {
            self.closed_intervals.push(group.finalize_interval(time));
        }
        self.current = Some(self.open_interval(target, time));
    }

    fn open_interval(&mut self, phase: Phase, time: SimTime) -> AnalysisGroup {
        let name = format!("on_{}:{}", phase.name(), self.next_interval);
        self.next_interval += 1;
        debug!("Opening interval group {} at {:.3}s", name, time);
        AnalysisGroup::new(name, self.bucket_size, time)
    }

    fn whole_phase_group(&mut self, phase: Phase) -> &mut AnalysisGroup {
        match phase {
            Phase::Green => &mut self.on_green,
            Phase::Red => &mut self.on_red,
        }
    }

    fn current_group(&mut self) -> &mut AnalysisGroup {
        match self.current.as_mut() {
            Some(group) => group,
            None => panic!("no interval group open; the run has already finished"),
        }
    }

    fn close_whole_run(
        group: &mut AnalysisGroup,
        end: SimTime,
        bucket_size: f64,
    ) -> Result<GroupReport> {
        let stats = group.finalize_interval(end);
        let histogram = group.generate_histogram(bucket_size)?;
        Ok(GroupReport { stats, histogram })
    }
}

/// Build the event queue for a run: light schedule first, then cars
pub fn populate_queue(config: &RunConfig) -> Result<EventQueue> {
    let mut queue = EventQueue::new("queue");
    queue.add_events(light_schedule(config).context("Failed to build light schedule")?);
    queue.add_events(
        car_arrivals(config.seed, config.lambda, config.horizon)
            .context("Failed to generate car arrivals")?,
    );
    debug!("Queue '{}' populated with {} events", queue.name(), queue.len());
    Ok(queue)
}

/// Validate the configuration and run one simulation to completion
pub fn run_simulation(config: &RunConfig) -> Result<RunReport> {
    config.validate()?;
    info!("Starting run: {}", config.summary());
    let mut queue = populate_queue(config)?;
    SimulationDriver::new(config.bucket_size).run(&mut queue, *config)
}
