use std::path::PathBuf;

use clap::Parser;

use gaigel_sim::config::{ResolvedOutputs, SimConfig};
use gaigel_sim::logging::init_logging;
use gaigel_sim::runner::SimRunner;

/// Batch simulator for Gaigel matches.
#[derive(Debug, Parser)]
#[command(
    name = "gaigel-sim",
    author,
    version,
    about = "Deterministic Gaigel match simulator"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "sim/sim.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of matches to play.
    #[arg(long, value_name = "COUNT")]
    matches: Option<usize>,

    /// Override the RNG seed matches are derived from.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no match is played).
    #[arg(long)]
    validate_only: bool,

    /// Print the table before every round.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SimConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(matches) = cli.matches {
        config.matches.count = matches;
    }

    if let Some(seed) = cli.seed {
        config.matches.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let seat_count = config.seats.len();
    let run_id = config.run_id.clone();
    let count = config.matches.count;

    println!(
        "Loaded configuration '{run_id}' with {seat_count} seats ({count} match{})",
        if count == 1 { "" } else { "es" }
    );

    let _logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = SimRunner::new(config, outputs)?.with_verbose(cli.verbose);

    if cli.validate_only {
        println!("Validation-only mode: no matches played.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Simulation complete for '{run_id}': {} matches → {} rows at {}",
        summary.matches_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    for standing in &summary.standings {
        println!(
            "  {:<12} {:<13} wins {:>4}  shared {:>4}  avg score {:>6.2}",
            standing.name,
            standing.kind.label(),
            standing.wins,
            standing.shared_wins,
            standing.average_score(summary.matches_played)
        );
    }
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
