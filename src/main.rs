//! HydraNL Result Comparison - command line entry point
//!
//! Produces comparison charts for a batch of hydraulic computation results:
//!
//!   frequency  - one chart per location: water level vs return period for
//!                every simulation type, plus the difference with the
//!                reference simulation type
//!   profile    - one chart per viewer export: value vs river-km for every
//!                series, plus the difference with the reference series
//!
//! Usage:
//!   cargo run --release -- frequency --water-system Rijn --company HKV
//!   cargo run --release -- frequency --water-system Maas --simulation-type 2017-totaal-zon_WS
//!   cargo run --release -- profile exports/B2035_OnMt_WS.csv --map
//!
//! Environment:
//!   HYDRA_COMPARE_CONFIG - configuration file (default: compare.toml, also read from .env)
//!   RUST_LOG             - log filter (default: info, --verbose: debug)

use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use hydra_compare::config::{default_config_path, load_config};
use hydra_compare::flows::frequency::{FrequencyRequest, run_frequency_flow};
use hydra_compare::flows::profile::{ProfileRequest, run_profile_flow};
use hydra_compare::ingest::discovery::ComputationFilter;
use hydra_compare::logging::init_logging;
use hydra_compare::model::LocationType;
use hydra_compare::report::BatchReport;

#[derive(Debug, Parser)]
#[command(name = "hydra_compare", version, about = "Comparison charts for HydraNL results")]
struct Cli {
    /// Configuration file (default: $HYDRA_COMPARE_CONFIG or compare.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Frequency curves per location, interpolated against the reference
    Frequency(FrequencyArgs),
    /// Longitudinal profiles per viewer export, joined on river-km
    Profile(ProfileArgs),
}

#[derive(Debug, Args)]
struct FrequencyArgs {
    /// Water system, e.g. Rijn, Maas, HollandscheIJssel
    #[arg(long)]
    water_system: String,

    /// Company whose folders to use
    #[arg(long, default_value = "HKV")]
    company: String,

    /// Simulation type or settings token to include (repeatable; default all)
    #[arg(long = "simulation-type")]
    simulation_types: Vec<String>,

    /// Location type to include (repeatable; default from the configuration)
    #[arg(long = "location-type", value_parser = parse_location_type)]
    location_types: Vec<LocationType>,

    /// Location id to include (repeatable; default all)
    #[arg(long = "location")]
    locations: Vec<String>,

    /// Parameter key to include, e.g. WS or HBN (default all)
    #[arg(long)]
    parameter: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args)]
struct ProfileArgs {
    /// Viewer export CSV files
    #[arg(required = true)]
    tables: Vec<PathBuf>,

    /// Parameter key (default: first configured key in each file name)
    #[arg(long)]
    parameter: Option<String>,

    /// Also draw a location map when the export has coordinates
    #[arg(long)]
    map: bool,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Load and compare only; write no images
    #[arg(long)]
    dry_run: bool,

    /// Write the batch report as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Output folder (overrides the configured one)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn parse_location_type(token: &str) -> Result<LocationType, String> {
    LocationType::parse(token).ok_or_else(|| format!("unknown location type '{}' (as, oever)", token))
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() { None } else { Some(values) }
}

fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    println!("🌊 HydraNL Result Comparison");
    println!("============================\n");

    if let Err(e) = run(cli) {
        eprintln!("\n❌ {}\n", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config_path = cli.config.unwrap_or_else(default_config_path);
    println!("📋 Loading configuration from {}", config_path.display());
    let config = load_config(&config_path)?;
    println!("✓ {} parameters, {} styled simulation types\n", config.parameters.len(), config.styles.len());

    let (report, output) = match cli.command {
        Command::Frequency(args) => {
            println!("📊 Comparing frequency lines for {} ({})...", args.water_system, args.company);
            let request = FrequencyRequest {
                company: args.company,
                water_system: args.water_system,
                location_types: non_empty(args.location_types),
                filter: ComputationFilter {
                    simulation_types: non_empty(args.simulation_types),
                    locations: non_empty(args.locations),
                    parameter: args.parameter,
                },
                output_dir: args.output.output_dir.clone(),
                dry_run: args.output.dry_run,
            };
            (run_frequency_flow(&config, &request)?, args.output)
        }
        Command::Profile(args) => {
            println!("📊 Comparing {} longitudinal profile(s)...", args.tables.len());
            let request = ProfileRequest {
                tables: args.tables,
                parameter: args.parameter,
                output_dir: args.output.output_dir.clone(),
                map: args.map,
                dry_run: args.output.dry_run,
            };
            (run_profile_flow(&config, &request)?, args.output)
        }
    };

    print_report(&report);

    if let Some(path) = output.report {
        report.write_json(&path)?;
        println!("📝 Report written to {}", path.display());
    }
    Ok(())
}

fn print_report(report: &BatchReport) {
    println!("\n✓ {}", report.summary());

    if report.is_empty_batch() {
        println!("   No inputs matched the filters");
    }
    for skipped in &report.skipped {
        println!("   ✗ {} - {}", skipped.path.display(), skipped.reason);
    }
    for group in &report.groups_without_reference {
        println!("   ⚠ {} - {}", group.group, group.reason);
    }
    if !report.dry_run {
        for path in &report.rendered {
            println!("   ✓ {}", path.display());
        }
    }
    println!();
}
