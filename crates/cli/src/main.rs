//! Cache energy accounting CLI.
//!
//! This binary replays recorded cache activity through the energy accountant. It performs:
//! 1. **Replay:** Load a JSON config and a JSON event trace, apply the trace, print every requested summary.
//! 2. **Levels:** Load a JSON config and list the registered operating points with their idle leakage.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, io, process};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cachepower_core::accounting::{EnergyAccountant, EnergySnapshot, ModelCache};
use cachepower_core::dvfs::DvfsLevels;
use cachepower_core::geometry::CacheGeometry;
use cachepower_core::power::ReferenceModelFactory;
use cachepower_core::sim::{EnergyTrace, replay};
use cachepower_core::stats::AccessCounters;
use cachepower_core::{Config, EnergyError};

#[derive(Parser, Debug)]
#[command(
    name = "cachepower",
    version,
    about = "DVFS-aware cache energy accounting",
    long_about = "Replay DVFS transitions and access-counter samples through the cache energy accountant.\n\nLog verbosity follows RUST_LOG (default: warn).\n\nExamples:\n  cachepower run --config l2.json --trace run.json\n  cachepower run --config l2.json --trace run.json --json\n  cachepower levels --config l2.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay an event trace and print each requested summary.
    Run {
        /// Cache/DVFS configuration (JSON).
        #[arg(short, long)]
        config: PathBuf,

        /// Event trace (JSON).
        #[arg(short, long)]
        trace: PathBuf,

        /// Print summaries as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List registered operating points and their idle leakage power.
    Levels {
        /// Cache/DVFS configuration (JSON).
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            trace,
            json,
        } => cmd_run(&config, &trace, json),
        Commands::Levels { config } => cmd_levels(&config),
    }
}

/// Replays `trace_path` against a fresh accountant and prints the summaries.
fn cmd_run(config_path: &Path, trace_path: &Path, json: bool) {
    let (config, levels, models) = load_models(config_path);
    let initial = levels.initial(&config).unwrap_or_else(|e| fatal(&e));

    let text = fs::read_to_string(trace_path).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: Could not read trace '{}': {}", trace_path.display(), e);
        process::exit(1);
    });
    let trace: EnergyTrace = serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: Malformed trace '{}': {}", trace_path.display(), e);
        process::exit(1);
    });

    let mut accountant =
        EnergyAccountant::new(models, initial.voltage).unwrap_or_else(|e| fatal(&e));
    let summaries = replay(&mut accountant, &trace.events).unwrap_or_else(|e| fatal(&e));

    if summaries.is_empty() {
        tracing::warn!("trace contains no summary events");
    }

    if json {
        match serde_json::to_string_pretty(&summaries) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("[!] FATAL: Could not encode summaries: {e}");
                process::exit(1);
            }
        }
    } else {
        for snapshot in &summaries {
            print_summary(snapshot);
        }
    }
}

/// Prints every registered operating point with its idle figures.
fn cmd_levels(config_path: &Path) {
    let (_, _, models) = load_models(config_path);
    let long_channel = models.long_channel();

    println!("{:<12} {:<12} {:<16} {:<12}", "voltage_v", "freq_ghz", "leakage_w", "area_mm2");
    for point in models.points() {
        let Some(entry) = models.get(point.voltage) else {
            continue;
        };
        let idle = entry
            .compute(&AccessCounters::default())
            .unwrap_or_else(|e| fatal(&e));
        println!(
            "{:<12} {:<12} {:<16.6e} {:<12.6}",
            point.voltage.volts(),
            point.frequency.ghz(),
            idle.leakage_power(long_channel).val(),
            idle.area.to_mm2().val()
        );
    }
}

/// Loads the configuration, the DVFS registry and the per-voltage model cache.
fn load_models(config_path: &Path) -> (Config, DvfsLevels, Arc<ModelCache>) {
    let config = Config::from_file(config_path).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: Could not load config '{}': {}", config_path.display(), e);
        process::exit(1);
    });
    let geometry = CacheGeometry::from_config(&config).unwrap_or_else(|e| fatal(&e));
    let levels = DvfsLevels::from_config(&config).unwrap_or_else(|e| fatal(&e));
    let factory = ReferenceModelFactory::new(config.reference_model);
    let models = ModelCache::build(&geometry, &levels, &factory).unwrap_or_else(|e| fatal(&e));
    (config, levels, Arc::new(models))
}

fn print_summary(snapshot: &EnergySnapshot) {
    println!(
        "Cache Summary (t = {} s, {}):",
        snapshot.time.as_secs_f64(),
        snapshot.operating_point
    );
    let mut out = io::stdout().lock();
    if let Err(e) = snapshot.write_summary(&mut out) {
        eprintln!("[!] FATAL: Could not write summary: {e}");
        process::exit(1);
    }
}

fn fatal(err: &EnergyError) -> ! {
    eprintln!("[!] FATAL ({:?}): {}", err.kind(), err);
    process::exit(1);
}
