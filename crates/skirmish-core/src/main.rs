//! Skirmish: faction inference for attacker/victim logs.
//!
//! Reads an interaction log and seed labels, infers the remaining factions,
//! and writes a per-participant activity report.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use skirmish_core::{
    default_config_toml, run_file, write_records_jsonl, write_report, Result, SkirmishConfig,
    Termination,
};
use skirmish_events::Faction;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Infer two-faction membership from an attacker/victim log")]
struct Args {
    /// Interaction log (JSON Lines)
    #[arg(long, required_unless_present = "print_default_config")]
    input: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the JSON report
    #[arg(long, default_value = "skirmish_report.json")]
    output: PathBuf,

    /// Also write one JSON record per participant to this file
    #[arg(long)]
    records: Option<PathBuf>,

    /// Participant known to be in faction A (repeatable)
    #[arg(long = "seed-a")]
    seed_a: Vec<String>,

    /// Participant known to be in faction B (repeatable)
    #[arg(long = "seed-b")]
    seed_b: Vec<String>,

    /// Flag participants whose name contains this text
    #[arg(long)]
    highlight: Option<String>,

    /// Stop inference after this many passes
    #[arg(long)]
    max_passes: Option<usize>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,

    /// Print a default configuration file and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(args: Args) -> Result<()> {
    if args.print_default_config {
        print!("{}", default_config_toml());
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => SkirmishConfig::from_file(path)?,
        None => SkirmishConfig::default(),
    };

    // Command line values extend or override the file
    config.seeds.a.extend(args.seed_a);
    config.seeds.b.extend(args.seed_b);
    if args.highlight.is_some() {
        config.report.highlight = args.highlight;
    }
    if args.max_passes.is_some() {
        config.inference.max_passes = args.max_passes;
    }

    let Some(input) = args.input else {
        // clap enforces --input unless printing the default config
        return Ok(());
    };

    let analysis = run_file(&input, &config)?;
    let names = &config.factions;

    write_report(&analysis.report, names, &args.output)?;
    if let Some(path) = &args.records {
        write_records_jsonl(&analysis.report, names, path)?;
    }

    let outcome = &analysis.outcome;
    let report = &analysis.report;

    println!("Skirmish Faction Inference");
    println!("==========================");
    println!("Interactions: {}", report.interactions);
    if report.skipped_rows > 0 {
        println!("Skipped rows: {}", report.skipped_rows);
    }
    println!(
        "Passes: {} ({})",
        outcome.pass_count(),
        match outcome.termination {
            Termination::Fixpoint => "fixpoint",
            Termination::PassLimit => "pass limit",
        }
    );
    println!("Inferred labels: {}", outcome.inferred().count());
    for &faction in Faction::all() {
        let summary = report.factions.get(&faction).copied().unwrap_or_default();
        println!(
            "  {}: {} members, {} made, {} received",
            names.name(faction),
            summary.members,
            summary.outgoing,
            summary.incoming
        );
    }
    println!("Unresolved: {}", report.unresolved.len());
    for record in report.records.iter().filter(|r| r.highlighted) {
        println!(
            "  * {} ({}): {} made, {} received",
            record.id,
            names.name(record.faction),
            record.outgoing,
            record.incoming
        );
    }
    println!("Saved: {}", args.output.display());

    Ok(())
}
