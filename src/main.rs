use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};

use traffic_light_sim::simulation::{run_simulation, RunConfig, PRESETS};

#[derive(Parser)]
#[command(name = "traffic_light_sim")]
#[command(about = "Car arrivals at a fixed-cycle traffic light")]
struct Cli {
    /// Test case to run (1-8); prompts on stdin when omitted
    case: Option<usize>,

    /// Run every test case in order
    #[arg(long, conflicts_with = "case")]
    all: bool,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the arrival rate (cars per second)
    #[arg(long)]
    lambda: Option<f64>,

    /// Override the green phase length in seconds
    #[arg(long)]
    green: Option<f64>,

    /// Override the red phase length in seconds
    #[arg(long)]
    red: Option<f64>,

    /// Override the histogram bucket size in seconds
    #[arg(long)]
    bucket: Option<f64>,

    /// Simulated seconds of light schedule
    #[arg(long, default_value = "300")]
    horizon: f64,

    /// Also print the statistics of every single green/red interval
    #[arg(long)]
    intervals: bool,
}

impl Cli {
    fn apply_overrides(&self, mut config: RunConfig) -> RunConfig {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(lambda) = self.lambda {
            config.lambda = lambda;
        }
        if let Some(green) = self.green {
            config.green_length = green;
        }
        if let Some(red) = self.red {
            config.red_length = red;
        }
        if let Some(bucket) = self.bucket {
            config.bucket_size = bucket;
        }
        config.with_horizon(self.horizon)
    }
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,traffic_light_sim=info"),
    )
    .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cases: Vec<usize> = if cli.all {
        (1..=PRESETS.len()).collect()
    } else {
        match cli.case {
            Some(case) => vec![case],
            None => vec![prompt_for_case()?],
        }
    };

    for case in cases {
        let config = cli.apply_overrides(RunConfig::preset(case)?);
        let report = run_simulation(&config).with_context(|| format!("Test case {} failed", case))?;
        println!("##### Test case {} #####", case);
        report.print_summary(cli.intervals);
    }
    Ok(())
}

fn prompt_for_case() -> Result<usize> {
    print!("Select test case to run (1-{}): ", PRESETS.len());
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read test case selection")?;
    let trimmed = line.trim();
    trimmed
        .parse()
        .with_context(|| format!("'{}' is not a valid test case number", trimmed))
}
