//! dining: run the dining-philosophers engine from the command line.
//!
//! Five philosophers (by default) think, get hungry and eat around a ring of
//! chopsticks for a fixed duration.  Every state change is logged; when the
//! run ends the per-philosopher statistics are printed and written to CSV.
//! Press Enter to stop a run early.
//!
//! # Example
//!
//! ```bash
//! # Defaults: 5 philosophers, 30 s, 15 s hunger timeout
//! dining
//!
//! # Quieter, shorter, more philosophers
//! RUST_LOG=warn dining --agents 9 --duration 10 --output stats.csv
//! ```

use std::io::BufRead;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dp_core::{ShutdownSignal, SimConfig, StopReason};
use dp_output::{CsvWriter, STATS_HEADER, write_report};
use dp_sim::{LogObserver, SimBuilder, SimReport};

/// Dining-philosophers simulation
///
/// Values given on the command line override those in `--config`.
#[derive(Parser, Debug)]
#[command(name = "dining")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML file with simulation settings
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Number of philosophers (and chopsticks)
    #[arg(short = 'n', long)]
    agents: Option<usize>,

    /// Simulation duration in seconds
    #[arg(short = 'd', long)]
    duration: Option<f64>,

    /// Seconds a philosopher may go without eating before the run is stopped
    #[arg(long)]
    hunger_timeout: Option<f64>,

    /// Seconds between liveness checks
    #[arg(long)]
    poll: Option<f64>,

    /// Seed for think/eat durations
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the final statistics
    #[arg(short = 'o', long, default_value = "philosophers_stats.csv")]
    output: PathBuf,
}

impl Args {
    fn into_config(self) -> Result<(SimConfig, PathBuf)> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => SimConfig::default(),
        };
        if let Some(n) = self.agents {
            config.agent_count = n;
        }
        if let Some(d) = self.duration {
            config.duration_secs = d;
        }
        if let Some(t) = self.hunger_timeout {
            config.hunger_timeout_secs = t;
        }
        if let Some(p) = self.poll {
            config.poll_interval_secs = p;
        }
        if let Some(s) = self.seed {
            config.seed = s;
        }
        config.validate()?;
        Ok((config, self.output))
    }
}

/// Stop the run on the first line read from stdin.  EOF leaves it running.
fn stop_on_enter(shutdown: ShutdownSignal) {
    let spawned = thread::Builder::new().name("stdin".to_owned()).spawn(move || {
        let mut line = String::new();
        if let Ok(n) = std::io::stdin().lock().read_line(&mut line) {
            if n > 0 && shutdown.trigger(StopReason::Requested) {
                info!("stop requested from the keyboard");
            }
        }
    });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "cannot watch stdin; the run can only stop by itself");
    }
}

fn print_stats(report: &SimReport) {
    println!();
    println!("=== Final statistics ===");
    println!("{}", STATS_HEADER.join(","));
    for r in &report.records {
        println!("{},{:.2},{}", r.id.0, r.max_hungry_secs(), r.eat_count);
    }
    println!();
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (config, output) = Args::parse().into_config()?;

    println!("=== dining philosophers ===");
    println!(
        "Philosophers: {}  |  Duration: {} s  |  Hunger timeout: {} s  |  Seed: {}",
        config.agent_count, config.duration_secs, config.hunger_timeout_secs, config.seed
    );
    println!("(press Enter to stop early)");
    println!();

    // 1. Build.
    let sim = SimBuilder::new(config).build()?;
    stop_on_enter(sim.shutdown_handle());

    // 2. Run.
    let t0 = Instant::now();
    let report = sim.run(&mut LogObserver)?;
    let elapsed = t0.elapsed();

    // 3. Summary.
    println!("Run finished in {:.3} s: {}", elapsed.as_secs_f64(), report.reason);
    print_stats(&report);

    // 4. Persist.
    let mut writer = CsvWriter::create(&output)
        .with_context(|| format!("creating {}", output.display()))?;
    write_report(&mut writer, &report)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Statistics written to {}", output.display());

    if !report.panicked.is_empty() {
        eprintln!("warning: thread(s) panicked: {}", report.panicked.join(", "));
    }
    if report.starved() {
        eprintln!("warning: the run was stopped because a philosopher starved");
    }
    Ok(())
}
