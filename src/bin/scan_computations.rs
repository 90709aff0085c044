#!/usr/bin/env rust
//! Computation Folder Scan
//!
//! Lists every computation folder found for a water system, how its name
//! was parsed, and whether its hfreq file can be read. Renders nothing;
//! useful to check a new batch of computations before running the
//! frequency comparison.
//!
//! Usage:
//!   cargo run --bin scan_computations -- --water-system Rijn
//!   cargo run --bin scan_computations -- --water-system HollandscheIJssel --company W+B
//!
//! Environment:
//!   HYDRA_COMPARE_CONFIG - configuration file (default: compare.toml)

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;

use hydra_compare::config::{default_config_path, load_config};
use hydra_compare::ingest::discovery::{ComputationFilter, discover_computations};
use hydra_compare::ingest::hfreq::read_hfreq_file;
use hydra_compare::logging::init_logging;

#[derive(Debug, Parser)]
#[command(name = "scan_computations", about = "List discovered HydraNL computations")]
struct Args {
    #[arg(long)]
    water_system: String,

    #[arg(long, default_value = "HKV")]
    company: String,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_logging(args.verbose);

    println!("🔎 HydraNL Computation Scan");
    println!("===========================\n");

    let config = load_config(args.config.unwrap_or_else(default_config_path))?;
    let company = config.company(&args.company)?;

    println!("📋 Input root: {}", company.input_root.display());
    for location_type in &config.frequency.location_types {
        println!(
            "   {}",
            config
                .location_type_dir(&company.input_root, &args.water_system, *location_type)
                .display()
        );
    }
    println!();

    let discovery = discover_computations(
        &config,
        &company.input_root,
        &args.water_system,
        &config.frequency.location_types,
        &ComputationFilter::default(),
    );

    let mut per_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut unreadable = 0;

    for computation in &discovery.computations {
        let id = &computation.id;
        *per_type.entry(id.settings_token()).or_default() += 1;

        match read_hfreq_file(&computation.result_file) {
            Ok(curve) => println!(
                "   ✓ {:<30} {:<6} {:<22} {:>3} points",
                id.location,
                id.location_type,
                id.settings_token(),
                curve.len()
            ),
            Err(e) => {
                unreadable += 1;
                println!(
                    "   ✗ {:<30} {:<6} {:<22} {}",
                    id.location,
                    id.location_type,
                    id.settings_token(),
                    e
                );
            }
        }
    }

    for skipped in &discovery.skipped {
        println!("   ✗ {} - {}", skipped.path.display(), skipped.reason);
    }

    println!("\n📊 Summary:");
    println!("─────────────────────────────────────────");
    for (token, count) in &per_type {
        let simulation_type = token.rsplit_once('_').map(|(t, _)| t).unwrap_or(token);
        let marker = if config.is_styled(simulation_type) { "" } else { "  (no style)" };
        println!("   {:<24} {:>4}{}", token, count, marker);
    }
    println!(
        "\n   {} computations, {} unreadable, {} skipped folders\n",
        discovery.computations.len(),
        unreadable,
        discovery.skipped.len()
    );

    Ok(())
}
