//! Biome distribution over a run of consecutive seeds.
//!
//! Useful when tuning the zone and biome tables: prints the mean share of
//! each biome and how many of the worlds contained it at all.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use world_generator::{build, ClimateTables, WorldError, WorldParams};

#[derive(Parser, Debug)]
#[command(name = "biome_census")]
#[command(about = "Aggregate biome counts over several generated worlds")]
struct Args {
    /// First seed of the run
    #[arg(short, long, default_value = "0")]
    seed: u32,

    /// Number of worlds to generate
    #[arg(short, long, default_value = "8")]
    count: u32,

    #[arg(short = 'W', long, default_value = "128")]
    width: usize,

    #[arg(short = 'H', long, default_value = "64")]
    height: usize,

    #[arg(long)]
    zones: Option<PathBuf>,

    #[arg(long)]
    biomes: Option<PathBuf>,
}

#[derive(Default)]
struct Tally {
    tiles: usize,
    worlds: u32,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), WorldError> {
    let tables = ClimateTables::load(args.zones.as_deref(), args.biomes.as_deref())?;
    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();
    let mut anomalies = 0usize;

    for i in 0..args.count {
        let params = WorldParams {
            name: format!("census_{}", i),
            seed: args.seed.wrapping_add(i),
            width: args.width,
            height: args.height,
            ..Default::default()
        };
        let world = build(&params, &tables)?;
        anomalies += world.report.anomalies.len();

        for (name, count) in world.biome_counts() {
            let tally = tallies.entry(name).or_default();
            tally.tiles += count;
            tally.worlds += 1;
        }
        println!("seed {:>10}: {} landmasses, {} rivers", params.seed, world.report.landmasses, world.report.river_sources);
    }

    let total_tiles = (args.width * args.height * args.count as usize).max(1) as f64;
    let mut rows: Vec<(String, Tally)> = tallies.into_iter().collect();
    rows.sort_by(|a, b| b.1.tiles.cmp(&a.1.tiles).then_with(|| a.0.cmp(&b.0)));

    println!();
    println!("=== BIOME CENSUS ({} worlds, {}x{}) ===", args.count, args.width, args.height);
    println!("{:24} {:>8} {:>8}", "Biome", "Share", "Worlds");
    for (name, tally) in &rows {
        println!(
            "{:24} {:>7.2}% {:>5}/{}",
            name,
            100.0 * tally.tiles as f64 / total_tiles,
            tally.worlds,
            args.count
        );
    }

    let unseen: Vec<&str> = tables
        .biomes
        .biomes
        .iter()
        .map(|b| b.name.as_str())
        .filter(|name| !rows.iter().any(|(n, _)| n == name))
        .collect();
    if !unseen.is_empty() {
        println!("Never generated: {}", unseen.join(", "));
    }
    if anomalies > 0 {
        println!("{} anomalies reported across the run", anomalies);
    }

    Ok(())
}
