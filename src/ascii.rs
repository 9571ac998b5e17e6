//! ASCII rendering and export module for world maps
//!
//! Provides functions to render a [`WorldMap`] as ASCII text and write a
//! plain-text world report.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;

use crate::biomes::BiomeId;
use crate::grid::{Tile, WaterType};
use crate::world::WorldMap;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Show biome characters
    Biome,
    /// Show elevation gradient
    Height,
    /// Show temperature gradient
    Temperature,
    /// Show rainfall gradient
    Rainfall,
    /// Show ocean, lakes, coast and rivers
    Water,
    /// Show wind direction arrows
    Wind,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Biome => "Biome",
            AsciiMode::Height => "Height",
            AsciiMode::Temperature => "Temperature",
            AsciiMode::Rainfall => "Rainfall",
            AsciiMode::Water => "Water",
            AsciiMode::Wind => "Wind",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[
            AsciiMode::Biome,
            AsciiMode::Height,
            AsciiMode::Temperature,
            AsciiMode::Rainfall,
            AsciiMode::Water,
            AsciiMode::Wind,
        ]
    }

    pub fn from_name(name: &str) -> Option<AsciiMode> {
        Self::all()
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }
}

/// Characters handed out to biomes in catalog order.
const BIOME_CHARS: &[char] = &[
    '#', ':', '_', '%', 'B', 'n', '"', 'c', 'd', 'R', 'r', 'S', 't', ',', '.', '~', 'o', 'O', '=',
    'a', 'b', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
];

/// Get ASCII character for a biome
pub fn biome_char(id: BiomeId) -> char {
    BIOME_CHARS[id.index() % BIOME_CHARS.len()]
}

/// Get ASCII character for a normalized value in `[0, 1]` (10-level gradient)
pub fn gradient_char(value: f64) -> char {
    const CHARS: &[char] = &['_', '.', '-', ':', ';', '=', '+', '#', '%', '@'];
    let idx = (value.clamp(0.0, 1.0) * (CHARS.len() - 1) as f64) as usize;
    CHARS[idx.min(CHARS.len() - 1)]
}

/// Get ASCII character for elevation relative to the configured range
pub fn height_char(elevation: f64, min: f64, max: f64, sea_level: f64) -> char {
    const WATER: &[char] = &['~', '.', ','];
    const LAND: &[char] = &['-', '=', '+', '*', '#', '^', 'A', 'M'];
    if elevation < sea_level {
        let t = ((elevation - min) / (sea_level - min).max(f64::EPSILON)).clamp(0.0, 1.0);
        WATER[((t * WATER.len() as f64) as usize).min(WATER.len() - 1)]
    } else {
        let t = ((elevation - sea_level) / (max - sea_level).max(f64::EPSILON)).clamp(0.0, 1.0);
        LAND[((t * LAND.len() as f64) as usize).min(LAND.len() - 1)]
    }
}

pub fn water_char(tile: &Tile) -> char {
    match tile.water {
        WaterType::Ocean => '~',
        WaterType::Lake => 'o',
        WaterType::Unassigned => '?',
        WaterType::Land if tile.is_river_source => '*',
        WaterType::Land if tile.river_volume > 0 => '|',
        WaterType::Land if tile.is_coast => '#',
        WaterType::Land => '.',
    }
}

/// Arrow pointing where the wind blows
pub fn wind_char(bearing: f64) -> char {
    const ARROWS: [char; 8] = ['^', '/', '>', '\\', 'v', '/', '<', '\\'];
    ARROWS[crate::tilemap::Direction::from_bearing(bearing) as usize]
}

pub fn tile_char(world: &WorldMap, tile: &Tile, mode: AsciiMode) -> char {
    let p = &world.params;
    match mode {
        AsciiMode::Biome => tile.biome.map(biome_char).unwrap_or(' '),
        AsciiMode::Height => height_char(tile.elevation, p.min_elevation, p.max_elevation, p.sea_level),
        AsciiMode::Temperature => gradient_char(tile.temperature),
        AsciiMode::Rainfall => gradient_char(tile.rainfall),
        AsciiMode::Water => water_char(tile),
        AsciiMode::Wind => wind_char(tile.wind_direction),
    }
}

/// Render a map to ASCII string
pub fn render_ascii_map(world: &WorldMap, mode: AsciiMode) -> String {
    let width = world.width();
    let height = world.height();
    let mut result = String::with_capacity((width + 1) * height);

    for row in world.grid.tiles().chunks(width) {
        for tile in row {
            result.push(tile_char(world, tile, mode));
        }
        result.push('\n');
    }

    result
}

/// Generate legend for biome characters
pub fn biome_legend(world: &WorldMap) -> String {
    let mut legend = String::new();
    legend.push_str("=== BIOME LEGEND ===\n");
    for (i, biome) in world.catalog().biomes.iter().enumerate() {
        legend.push_str(&format!("  {} {:<24}", biome_char(BiomeId(i as u16)), biome.name));
        if i % 3 == 2 {
            legend.push('\n');
        }
    }
    if !legend.ends_with('\n') {
        legend.push('\n');
    }
    legend
}

/// Print ASCII map to stdout
pub fn print_ascii_map(world: &WorldMap, mode: AsciiMode) {
    print!("{}", render_ascii_map(world, mode));
}

/// Write a text report: header, biome map, legend and statistics.
/// With `verbose`, one CSV line per tile is appended.
pub fn export_world_file(world: &WorldMap, path: &Path, verbose: bool) -> io::Result<()> {
    let mut file = File::create(path)?;
    let total = world.grid.len();
    let report = &world.report;

    // Header
    writeln!(file, "=== WORLD GENERATOR MAP FILE ===")?;
    writeln!(file, "Name: {}", world.params.name)?;
    writeln!(file, "Seed: {}", world.params.seed)?;
    writeln!(file, "Size: {}x{}", world.width(), world.height())?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    writeln!(file, "=== MAP (Biome View) ===")?;
    write!(file, "{}", render_ascii_map(world, AsciiMode::Biome))?;
    writeln!(file)?;
    write!(file, "{}", biome_legend(world))?;
    writeln!(file)?;

    // Statistics
    writeln!(file, "=== STATISTICS ===")?;
    writeln!(file, "Total tiles: {}", total)?;
    let pct = |n: usize| 100.0 * n as f64 / total as f64;
    writeln!(file, "Ocean: {} ({:.1}%)", report.ocean_tiles, pct(report.ocean_tiles))?;
    writeln!(file, "Land: {} ({:.1}%)", report.land_tiles, pct(report.land_tiles))?;
    writeln!(file, "Lake: {} ({:.1}%)", report.lake_tiles, pct(report.lake_tiles))?;
    writeln!(file, "Landmasses: {}", report.landmasses)?;
    writeln!(file, "Rivers: {}", report.river_sources)?;
    writeln!(file)?;

    writeln!(file, "Biome Distribution:")?;
    for (name, count) in world.biome_counts() {
        writeln!(file, "  {:24} {:>6} ({:>5.1}%)", name, count, pct(count))?;
    }
    writeln!(file)?;

    if !report.anomalies.is_empty() {
        writeln!(file, "Anomalies:")?;
        for anomaly in &report.anomalies {
            writeln!(file, "  {}", anomaly)?;
        }
        writeln!(file)?;
    }

    // Verbose tile data
    if verbose {
        writeln!(file, "=== TILE DATA ===")?;
        writeln!(file, "[x,y,elevation,water,temperature,rainfall,biome]")?;
        for tile in world.grid.tiles() {
            writeln!(
                file,
                "{},{},{:.4},{},{:.3},{:.3},{}",
                tile.x,
                tile.y,
                tile.elevation,
                tile.water.display_name(),
                tile.temperature,
                tile.rainfall,
                world.biome_name(tile).unwrap_or("-")
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldParams;

    #[test]
    fn test_gradient_char_bounds() {
        assert_eq!(gradient_char(0.0), '_');
        assert_eq!(gradient_char(1.0), '@');
        assert_eq!(gradient_char(7.0), '@');
    }

    #[test]
    fn test_height_char_splits_at_sea_level() {
        assert_eq!(height_char(0.0, 0.0, 1.0, 0.2), '~');
        assert_eq!(height_char(0.19, 0.0, 1.0, 0.2), ',');
        assert_eq!(height_char(0.2, 0.0, 1.0, 0.2), '-');
        assert_eq!(height_char(1.0, 0.0, 1.0, 0.2), 'M');
    }

    #[test]
    fn test_mode_names_round_trip() {
        for mode in AsciiMode::all() {
            assert_eq!(AsciiMode::from_name(mode.name()), Some(*mode));
        }
        assert_eq!(AsciiMode::from_name("biome"), Some(AsciiMode::Biome));
    }

    #[test]
    fn test_render_dimensions() {
        let params = WorldParams {
            width: 20,
            height: 10,
            seed: 3,
            ..Default::default()
        };
        let world = WorldMap::generate(&params).unwrap();
        let map = render_ascii_map(&world, AsciiMode::Water);
        let lines: Vec<&str> = map.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|l| l.chars().count() == 20));
    }

    #[test]
    fn test_export_world_file() {
        let params = WorldParams {
            width: 16,
            height: 8,
            seed: 9,
            ..Default::default()
        };
        let world = WorldMap::generate(&params).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.txt");
        export_world_file(&world, &path, true).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Seed: 9"));
        assert!(text.contains("=== TILE DATA ==="));
    }
}
