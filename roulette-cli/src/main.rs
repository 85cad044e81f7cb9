//! Roulette CLI — roll, inspect, and sample from weighted roulettes.
//!
//! Commands:
//! - `roll` — build a roulette from a TOML file and/or `--entry` flags, then
//!   roll it many times and report observed vs expected frequencies
//! - `ranges` — print every value with its cumulative `[min, max)` interval
//! - `random-range` — print uniform samples from `[min, max)`
//!
//! Set `RUST_LOG=debug` (or pass `--verbose`) to see container mutations.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use roulette_core::{random_range, Roulette, RouletteConfig, RngSource, SeedHierarchy};

#[derive(Parser)]
#[command(
    name = "roulette",
    about = "Roulette CLI — weighted random selection"
)]
struct Cli {
    /// Log container mutations at debug level (overrides RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a roulette repeatedly and report how often each value came up.
    Roll {
        #[command(flatten)]
        roulette: RouletteArgs,

        /// Rolls per trial.
        #[arg(long, default_value_t = 10_000)]
        count: usize,

        /// Independent trials. With a seed, each trial gets a derived sub-seed.
        #[arg(long, default_value_t = 1)]
        trials: u64,

        /// Master seed. Overrides the seed in --config.
        #[arg(long)]
        seed: Option<u64>,

        /// Emit a JSON report instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print each value with its cumulative weight interval.
    Ranges {
        #[command(flatten)]
        roulette: RouletteArgs,
    },
    /// Print uniform samples from [min, max).
    RandomRange {
        #[arg(long, allow_hyphen_values = true)]
        min: f64,

        #[arg(long, allow_hyphen_values = true)]
        max: f64,

        /// Number of samples.
        #[arg(long, default_value_t = 1)]
        count: usize,

        #[arg(long)]
        seed: Option<u64>,
    },
}

/// How to build the roulette: file entries first, then flags, then edits.
#[derive(Args)]
struct RouletteArgs {
    /// TOML roulette definition ([[entry]] tables, optional seed).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra entry as VALUE=WEIGHT (repeatable).
    #[arg(long = "entry", value_parser = parse_pair)]
    entries: Vec<(String, f64)>,

    /// Remove VALUE after building (repeatable).
    #[arg(long = "remove")]
    removals: Vec<String>,

    /// Re-weight an entry as VALUE=WEIGHT after building (repeatable).
    #[arg(long = "update", value_parser = parse_pair)]
    updates: Vec<(String, f64)>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Roll {
            roulette,
            count,
            trials,
            seed,
            json,
        } => run_roll(&roulette, count, trials, seed, json),
        Commands::Ranges { roulette } => run_ranges(&roulette),
        Commands::RandomRange {
            min,
            max,
            count,
            seed,
        } => run_random_range(min, max, count, seed),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_pair(s: &str) -> Result<(String, f64), String> {
    let (value, weight) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected VALUE=WEIGHT, got {s:?}"))?;
    if value.is_empty() {
        return Err(format!("missing value in {s:?}"));
    }
    let weight = weight
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad weight in {s:?}: {e}"))?;
    Ok((value.to_string(), weight))
}

/// Load the config (if any) and merge flag entries. Returns the config so the
/// caller can see its seed.
fn load_config(args: &RouletteArgs) -> Result<RouletteConfig> {
    let mut config = match &args.config {
        Some(path) => RouletteConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RouletteConfig::default(),
    };
    config
        .entries
        .extend(args.entries.iter().map(|(value, weight)| roulette_core::EntryConfig {
            value: value.clone(),
            weight: *weight,
        }));
    if config.entries.is_empty() {
        bail!("no entries: pass --config and/or --entry VALUE=WEIGHT");
    }
    Ok(config)
}

fn build_roulette(args: &RouletteArgs, config: &RouletteConfig) -> Result<Roulette<String>> {
    let mut roulette = config.build()?;

    for value in &args.removals {
        if !roulette.remove(value.as_str()) {
            warn!(value = %value, "remove: value not present");
        }
    }
    for (value, weight) in &args.updates {
        if !roulette.update(value.as_str(), *weight)? {
            warn!(value = %value, "update: value not present");
        }
    }
    Ok(roulette)
}

// ── roll ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct RollReport {
    master_seed: Option<u64>,
    total_weight: f64,
    trials: Vec<TrialReport>,
}

#[derive(Debug, Serialize)]
struct TrialReport {
    trial: u64,
    seed: Option<u64>,
    rolls: usize,
    outcomes: Vec<Outcome>,
}

#[derive(Debug, Serialize, PartialEq)]
struct Outcome {
    value: String,
    weight: f64,
    count: usize,
    observed: f64,
    expected: f64,
}

fn run_roll(
    args: &RouletteArgs,
    count: usize,
    trials: u64,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    if trials == 0 {
        bail!("--trials must be at least 1");
    }
    let config = load_config(args)?;
    let base = build_roulette(args, &config)?;
    if base.is_empty() {
        bail!("every entry was removed; nothing to roll");
    }

    let master_seed = seed.or(config.seed);
    let hierarchy = master_seed.map(SeedHierarchy::new);
    info!(?master_seed, trials, count, len = base.len(), "rolling");

    let mut reports = Vec::new();
    for trial in 0..trials {
        let mut roulette = base.clone();
        let trial_seed = hierarchy.map(|h| h.sub_seed("roll", trial));
        *roulette.source_mut() = match trial_seed {
            Some(s) => RngSource::seeded(s),
            None => RngSource::from_entropy(),
        };

        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..count {
            let value = roulette.roll()?;
            *counts.entry(value.clone()).or_insert(0) += 1;
        }

        reports.push(TrialReport {
            trial,
            seed: trial_seed,
            rolls: count,
            outcomes: tally(&roulette, &counts, count),
        });
    }

    let report = RollReport {
        master_seed,
        total_weight: base.total_weight(),
        trials: reports,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_roll_report(&report);
    }
    Ok(())
}

/// One outcome per distinct value, in first-insertion order. Duplicate values
/// pool their weights.
fn tally<S>(
    roulette: &Roulette<String, S>,
    counts: &HashMap<String, usize>,
    rolls: usize,
) -> Vec<Outcome> {
    let total = roulette.total_weight();
    let mut outcomes: Vec<Outcome> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (value, weight) in roulette {
        match index.get(value.as_str()) {
            Some(&i) => outcomes[i].weight += weight,
            None => {
                index.insert(value.as_str(), outcomes.len());
                outcomes.push(Outcome {
                    value: value.clone(),
                    weight,
                    count: counts.get(value).copied().unwrap_or(0),
                    observed: 0.0,
                    expected: 0.0,
                });
            }
        }
    }

    for outcome in &mut outcomes {
        outcome.expected = outcome.weight / total;
        outcome.observed = if rolls == 0 {
            0.0
        } else {
            outcome.count as f64 / rolls as f64
        };
    }
    outcomes
}

fn print_roll_report(report: &RollReport) {
    if let Some(seed) = report.master_seed {
        println!("master seed: {seed}");
    }
    println!("total weight: {}", report.total_weight);
    for trial in &report.trials {
        println!();
        match trial.seed {
            Some(seed) => println!("trial {} (seed {seed}), {} rolls", trial.trial, trial.rolls),
            None => println!("trial {}, {} rolls", trial.trial, trial.rolls),
        }
        for o in &trial.outcomes {
            println!(
                "  value \"{}\" was rolled {} times ({:.2}%, expected {:.2}%)",
                o.value,
                o.count,
                o.observed * 100.0,
                o.expected * 100.0
            );
        }
    }
}

// ── ranges ───────────────────────────────────────────────────────────

fn run_ranges(args: &RouletteArgs) -> Result<()> {
    let config = load_config(args)?;
    let roulette = build_roulette(args, &config)?;

    for range in roulette.ranges() {
        println!(
            "value \"{}\" is between {} and {} (weight {})",
            range.value(),
            range.min(),
            range.max(),
            range.weight()
        );
    }
    println!("total weight: {}", roulette.total_weight());
    Ok(())
}

// ── random-range ─────────────────────────────────────────────────────

fn run_random_range(min: f64, max: f64, count: usize, seed: Option<u64>) -> Result<()> {
    let mut source = match seed {
        Some(s) => RngSource::seeded(s),
        None => RngSource::from_entropy(),
    };
    for i in 0..count {
        let value = random_range(&mut source, min, max)?;
        println!("#{i}: {value}");
    }
    Ok(())
}
