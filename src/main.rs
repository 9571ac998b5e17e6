use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use world_generator::ascii::{self, AsciiMode};
use world_generator::export::{self, MapLayer};
use world_generator::{build, ClimateTables, MapStore, WorldError, WorldParams};

#[derive(Parser, Debug)]
#[command(name = "world_generator")]
#[command(about = "Generate procedural world maps with climate and biomes")]
struct Args {
    /// Width of the map in tiles
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the map in tiles
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Base seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u32>,

    /// World parameters JSON file
    #[arg(long)]
    params: Option<PathBuf>,

    /// Climate zone definitions JSON file (replaces the builtin zones)
    #[arg(long)]
    zones: Option<PathBuf>,

    /// Biome catalog JSON file (replaces the builtin catalog)
    #[arg(long)]
    biomes: Option<PathBuf>,

    /// Directory holding saved maps
    #[arg(long, default_value = "saves")]
    saves: PathBuf,

    /// Map name; loads the saved map with this name if one exists
    #[arg(short, long)]
    name: Option<String>,

    /// Save the map parameters after generating
    #[arg(long)]
    save: bool,

    /// List saved maps and exit
    #[arg(long)]
    list: bool,

    /// Print an ASCII preview (biome, height, temperature, rainfall, water, wind)
    #[arg(short, long)]
    ascii: Option<String>,

    /// Export every map layer as PNG into this directory
    #[arg(long)]
    png: Option<PathBuf>,

    /// Export a single PNG with all layers tiled together
    #[arg(long)]
    combined: Option<PathBuf>,

    /// Export a single layer (use with --layer-out)
    #[arg(long, requires = "layer_out")]
    layer: Option<String>,

    #[arg(long)]
    layer_out: Option<PathBuf>,

    /// Write a text report with the biome map and statistics
    #[arg(long)]
    world_file: Option<PathBuf>,

    /// Include per-tile data in the text report
    #[arg(long)]
    verbose: bool,

    /// Print everything known about a tile, as "x,y" (repeatable)
    #[arg(long, value_parser = parse_coords)]
    inspect: Vec<(usize, usize)>,

    /// Worker threads for parallel passes (default: all cores)
    #[arg(short = 'j', long)]
    threads: Option<usize>,
}

fn parse_coords(s: &str) -> Result<(usize, usize), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {:?}", s))?;
    let x = x.trim().parse().map_err(|e| format!("bad x coordinate: {}", e))?;
    let y = y.trim().parse().map_err(|e| format!("bad y coordinate: {}", e))?;
    Ok((x, y))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "world generation failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Resolve parameters from the save store, a params file or defaults, then
/// apply command-line overrides.
fn resolve_params(args: &Args, store: &MapStore) -> Result<WorldParams, WorldError> {
    let base = match &args.params {
        Some(path) => WorldParams::from_file(path)?,
        None => WorldParams::default(),
    };

    let mut params = match &args.name {
        Some(name) => store.load_or_create(name, &base)?,
        None if args.params.is_some() => base,
        None => WorldParams {
            seed: rand::random(),
            ..base
        },
    };

    if let Some(seed) = args.seed {
        params.seed = seed;
    }
    if let Some(width) = args.width {
        params.width = width;
    }
    if let Some(height) = args.height {
        params.height = height;
    }
    Ok(params)
}

fn run(args: Args) -> Result<(), WorldError> {
    if let Some(threads) = args.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
            tracing::warn!(error = %e, "could not configure thread pool, using default");
        }
    }

    let store = MapStore::new(&args.saves);
    if args.list {
        for name in store.list()? {
            println!("{}", name);
        }
        return Ok(());
    }

    let params = resolve_params(&args, &store)?;
    tracing::info!(map = %params.name, seed = params.seed, "using seed {}", params.seed);

    let tables = ClimateTables::load(args.zones.as_deref(), args.biomes.as_deref())?;
    let world = build(&params, &tables)?;

    if args.save {
        let path = store.save(&world.params)?;
        println!("Saved {} to {}", world.params.name, path.display());
    }

    // Summary
    let report = &world.report;
    println!("World '{}' seed {} ({}x{})", world.params.name, world.params.seed, world.width(), world.height());
    println!(
        "  {} ocean, {} lake, {} land tiles in {} landmasses",
        report.ocean_tiles, report.lake_tiles, report.land_tiles, report.landmasses
    );
    println!("  {} rivers, generated in {:.1}ms", report.river_sources, report.total_time().as_secs_f64() * 1000.0);
    for anomaly in &report.anomalies {
        println!("  warning: {}", anomaly);
    }
    println!("Biome census:");
    let total = world.grid.len() as f64;
    for (name, count) in world.biome_counts() {
        println!("  {:24} {:>7} ({:>5.1}%)", name, count, 100.0 * count as f64 / total);
    }

    if let Some(mode) = &args.ascii {
        match AsciiMode::from_name(mode) {
            Some(mode) => {
                println!();
                ascii::print_ascii_map(&world, mode);
                if mode == AsciiMode::Biome {
                    print!("{}", ascii::biome_legend(&world));
                }
            }
            None => {
                let modes: Vec<&str> = AsciiMode::all().iter().map(|m| m.name()).collect();
                eprintln!("Unknown ASCII mode {:?}, expected one of: {}", mode, modes.join(", "));
            }
        }
    }

    if let Some(dir) = &args.png {
        std::fs::create_dir_all(dir).map_err(|source| WorldError::Storage {
            path: dir.clone(),
            source,
        })?;
        let written = export::export_all_layers(&world, dir)?;
        println!("Exported {} layers to {}", written.len(), dir.display());
    }

    if let Some(path) = &args.combined {
        export::export_combined_grid(&world, path)?;
        println!("Exported combined layers to {}", path.display());
    }

    if let (Some(name), Some(path)) = (&args.layer, &args.layer_out) {
        match MapLayer::from_name(name) {
            Some(layer) => {
                export::export_layer(&world, layer, path)?;
                println!("Exported {} layer to {}", layer.name(), path.display());
            }
            None => {
                let layers: Vec<&str> = MapLayer::all().iter().map(|l| l.name()).collect();
                eprintln!("Unknown layer {:?}, expected one of: {}", name, layers.join(", "));
            }
        }
    }

    if let Some(path) = &args.world_file {
        ascii::export_world_file(&world, path, args.verbose).map_err(|source| WorldError::Storage {
            path: path.clone(),
            source,
        })?;
        println!("Wrote world file to {}", path.display());
    }

    for &(x, y) in &args.inspect {
        match world.tile_info(x, y) {
            Some(info) => println!("{}", info),
            None => eprintln!("Tile ({}, {}) is outside the {}x{} map", x, y, world.width(), world.height()),
        }
    }

    Ok(())
}
