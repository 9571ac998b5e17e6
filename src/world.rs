//! World map container and the generation pipeline
//!
//! [`build`] runs every pass over a fresh [`TileGrid`] in dependency order and
//! bundles the result with the parameters, seeds and tables that made it.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::biomes::{self, BiomeCatalog};
use crate::climate::{rainfall, temperature, wind};
use crate::config::{ClimateTables, WorldParams};
use crate::distance_field::Seam;
use crate::error::WorldError;
use crate::grid::{Tile, TileGrid, WaterType};
use crate::heightmap;
use crate::rivers;
use crate::seeds::WorldSeeds;
use crate::tilemap::Direction;
use crate::water_bodies::{self, Landmass, LandmassId};
use crate::zones::{self, ZoneId, ZoneKind, ZoneRegistry};

// =============================================================================
// GENERATION REPORT
// =============================================================================

/// Non-fatal data-quality findings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Anomaly {
    /// Land tiles whose downslope chain ends on a land sink
    DrainlessBasins { tiles: usize },
    /// Downslope chains that failed to terminate within the tile count
    DownslopeCycles { tiles: usize },
    /// Rivers that stopped on a sink before reaching water
    StalledRivers { rivers: usize },
    /// No land tile was high enough and drained to the sea
    NoRiverSources,
    /// The map has no coast, so every coast distance is the threshold
    NoCoastline,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::DrainlessBasins { tiles } => {
                write!(f, "{} tiles drain into land sinks", tiles)
            }
            Anomaly::DownslopeCycles { tiles } => {
                write!(f, "{} downslope chains did not terminate", tiles)
            }
            Anomaly::StalledRivers { rivers } => {
                write!(f, "{} rivers stalled before reaching water", rivers)
            }
            Anomaly::NoRiverSources => write!(f, "no river source candidates"),
            Anomaly::NoCoastline => write!(f, "no coastline"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PassTiming {
    pub pass: &'static str,
    pub elapsed: Duration,
}

/// Summary of one build.
#[derive(Clone, Debug, Default)]
pub struct GenerationReport {
    pub anomalies: Vec<Anomaly>,
    pub timings: Vec<PassTiming>,
    pub ocean_tiles: usize,
    pub lake_tiles: usize,
    pub land_tiles: usize,
    pub landmasses: usize,
    pub sinks: usize,
    pub river_sources: usize,
    /// Tiles further than the wind distance threshold from any coast
    pub tiles_beyond_coast_range: usize,
}

impl GenerationReport {
    fn record(&mut self, anomaly: Anomaly) {
        tracing::warn!(target: "worldgen", %anomaly, "generation anomaly");
        self.anomalies.push(anomaly);
    }

    pub fn total_time(&self) -> Duration {
        self.timings.iter().map(|t| t.elapsed).sum()
    }
}

/// Run one pass, logging and recording its duration.
fn timed<T>(report: &mut GenerationReport, pass: &'static str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    let elapsed = start.elapsed();
    tracing::info!(
        target: "worldgen",
        pass,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "pass complete"
    );
    report.timings.push(PassTiming { pass, elapsed });
    out
}

// =============================================================================
// WORLD MAP
// =============================================================================

/// A generated world.
pub struct WorldMap {
    pub params: WorldParams,
    pub seeds: WorldSeeds,
    pub grid: TileGrid,
    pub landmasses: Vec<Landmass>,
    pub seams: Vec<Seam>,
    pub tables: Arc<ClimateTables>,
    pub report: GenerationReport,
}

/// Generate a world from `params`.
///
/// Parameters and tables are validated before any pass runs; a configuration
/// error never yields a partial world.
pub fn build(params: &WorldParams, tables: &Arc<ClimateTables>) -> Result<WorldMap, WorldError> {
    params.validate()?;
    tables.validate()?;

    let seeds = WorldSeeds::from_base(params.seed);
    let mut report = GenerationReport::default();
    let started = Instant::now();
    tracing::info!(
        target: "worldgen",
        map = %params.name,
        seed = params.seed,
        width = params.width,
        height = params.height,
        "generating world"
    );
    tracing::debug!(target: "worldgen", %seeds, "derived seeds");

    let mut grid = timed(&mut report, "tiles", || TileGrid::new(params.width, params.height));

    // Elevation
    let seams = timed(&mut report, "elevation", || {
        heightmap::generate_elevation(&mut grid, params, &seeds)
    });

    // Hydrology
    let landmasses = timed(&mut report, "water bodies", || {
        water_bodies::assign_ocean(&mut grid, params.sea_level);
        let landmasses = water_bodies::assign_landmasses(&mut grid, params.sea_level);
        water_bodies::assign_coast(&mut grid, &landmasses);
        landmasses
    });
    report.ocean_tiles = grid.count_water(WaterType::Ocean);
    report.lake_tiles = grid.count_water(WaterType::Lake);
    report.land_tiles = grid.count_water(WaterType::Land);
    report.landmasses = landmasses.len();
    tracing::info!(
        target: "worldgen",
        ocean = report.ocean_tiles,
        lake = report.lake_tiles,
        land = report.land_tiles,
        landmasses = report.landmasses,
        "water classified"
    );
    if !grid.tiles().iter().any(|t| t.is_coast) {
        report.record(Anomaly::NoCoastline);
    }

    timed(&mut report, "elevation zones", || {
        zones::assign_elevation_zones(&mut grid, &tables.zones, params)
    });

    let (sinks, drainage) = timed(&mut report, "downslope", || {
        let sinks = rivers::assign_downslopes(&mut grid);
        (sinks, rivers::assign_flows_to_sea(&mut grid))
    });
    report.sinks = sinks;
    if drainage.land_sinks > 0 {
        report.record(Anomaly::DrainlessBasins {
            tiles: drainage.land_sinks,
        });
    }
    if drainage.cycles > 0 {
        report.record(Anomaly::DownslopeCycles {
            tiles: drainage.cycles,
        });
    }

    // Climate
    timed(&mut report, "wind direction", || {
        wind::assign_wind_direction(&mut grid, seeds.wind_direction)
    });
    let beyond_coast_range = timed(&mut report, "wind strength", || {
        wind::assign_wind_strength(
            &mut grid,
            &landmasses,
            params.wind_distance_threshold,
            seeds.wind_strength,
        )
    });
    report.tiles_beyond_coast_range = beyond_coast_range;
    timed(&mut report, "temperature", || {
        temperature::assign_temperature(&mut grid, params, seeds.temperature);
        zones::assign_temperature_zones(&mut grid, &tables.zones);
    });

    let river_summary = timed(&mut report, "rivers", || {
        rivers::create_rivers(&mut grid, params.mountain_threshold, seeds.rivers)
    });
    report.river_sources = river_summary.sources;
    if river_summary.candidates == 0 {
        report.record(Anomaly::NoRiverSources);
    }
    if river_summary.stalled > 0 {
        report.record(Anomaly::StalledRivers {
            rivers: river_summary.stalled,
        });
    }

    timed(&mut report, "rain shadow", || {
        rainfall::assign_rain_shadow(&mut grid, params)
    });
    timed(&mut report, "rainfall", || {
        rainfall::assign_rainfall(&mut grid, seeds.rainfall);
        zones::assign_humidity_zones(&mut grid, &tables.zones);
    });

    timed(&mut report, "biomes", || {
        biomes::assign_biomes(&mut grid, &tables.zones, &tables.biomes)
    })?;

    tracing::info!(
        target: "worldgen",
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        anomalies = report.anomalies.len(),
        "world generated"
    );

    let world = WorldMap {
        params: params.clone(),
        seeds,
        grid,
        landmasses,
        seams,
        tables: Arc::clone(tables),
        report,
    };
    for (name, count) in world.biome_counts() {
        tracing::debug!(target: "worldgen", biome = %name, tiles = count, "biome census");
    }
    Ok(world)
}

impl WorldMap {
    /// Build with the embedded zone and biome tables.
    pub fn generate(params: &WorldParams) -> Result<Self, WorldError> {
        let tables = Arc::new(ClimateTables::builtin()?);
        build(params, &tables)
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn zones(&self) -> &ZoneRegistry {
        &self.tables.zones
    }

    pub fn catalog(&self) -> &BiomeCatalog {
        &self.tables.biomes
    }

    pub fn tile(&self, x: usize, y: usize) -> Option<&Tile> {
        self.grid.get(x as i64, y as i64)
    }

    pub fn landmass(&self, id: LandmassId) -> Option<&Landmass> {
        self.landmasses.get(id.0 as usize)
    }

    pub fn biome_name(&self, tile: &Tile) -> Option<&str> {
        tile.biome.map(|id| self.catalog().biome(id).name.as_str())
    }

    pub fn biome_color(&self, tile: &Tile) -> [u8; 3] {
        tile.biome
            .map(|id| self.catalog().biome(id).color)
            .unwrap_or([0, 0, 0])
    }

    pub fn zone_name(&self, kind: ZoneKind, zone: Option<ZoneId>) -> Option<&str> {
        zone.map(|id| self.zones().zone(kind, id).name.as_str())
    }

    /// Tile count per biome, most common first.
    pub fn biome_counts(&self) -> Vec<(String, usize)> {
        biomes::biome_counts(&self.grid, self.catalog())
    }

    /// Everything known about one tile, `None` outside the map.
    pub fn tile_info(&self, x: usize, y: usize) -> Option<TileInfo> {
        let tile = self.tile(x, y)?;
        let landmass_size = tile
            .landmass
            .and_then(|id| self.landmass(id))
            .map(Landmass::len);

        Some(TileInfo {
            x,
            y,
            elevation: tile.elevation,
            noise: tile.noise,
            distance_modifier: tile.distance_modifier,
            water: tile.water,
            is_coast: tile.is_coast,
            landmass: tile.landmass,
            landmass_size,
            downslope: tile.downslope,
            flows_to_sea: tile.flows_to_sea,
            river_volume: tile.river_volume,
            is_river_source: tile.is_river_source,
            wind_direction: tile.wind_direction,
            wind_strength: tile.wind_strength,
            distance_to_coast: tile.distance_to_coast,
            temperature: tile.temperature,
            rain_shadow: tile.rain_shadow,
            rainfall: tile.rainfall,
            elevation_zone: self.zone_name(ZoneKind::Elevation, tile.elevation_zone).map(str::to_string),
            temperature_zone: self.zone_name(ZoneKind::Temperature, tile.temperature_zone).map(str::to_string),
            humidity_zone: self.zone_name(ZoneKind::Humidity, tile.humidity_zone).map(str::to_string),
            biome: self.biome_name(tile).map(str::to_string),
        })
    }
}

/// Information about a single tile
#[derive(Clone, Debug)]
pub struct TileInfo {
    pub x: usize,
    pub y: usize,
    pub elevation: f64,
    pub noise: f64,
    pub distance_modifier: f64,
    pub water: WaterType,
    pub is_coast: bool,
    pub landmass: Option<LandmassId>,
    pub landmass_size: Option<usize>,
    pub downslope: Option<Direction>,
    pub flows_to_sea: bool,
    pub river_volume: u32,
    pub is_river_source: bool,
    pub wind_direction: f64,
    pub wind_strength: f64,
    pub distance_to_coast: u32,
    pub temperature: f64,
    pub rain_shadow: f64,
    pub rainfall: f64,
    pub elevation_zone: Option<String>,
    pub temperature_zone: Option<String>,
    pub humidity_zone: Option<String>,
    pub biome: Option<String>,
}

impl TileInfo {
    pub fn water_str(&self) -> String {
        match (self.water, self.landmass, self.landmass_size) {
            (WaterType::Ocean, _, _) => "Ocean".to_string(),
            (water, Some(id), Some(size)) => {
                format!("{} (landmass {}, {} tiles)", water.display_name(), id.0, size)
            }
            (water, _, _) => water.display_name().to_string(),
        }
    }

    pub fn wind_str(&self) -> String {
        format!(
            "{} {:.0}° strength {:.2}",
            Direction::from_bearing(self.wind_direction).short_name(),
            self.wind_direction.to_degrees(),
            self.wind_strength
        )
    }

    pub fn river_str(&self) -> String {
        let flow = self.downslope.map(|d| d.short_name()).unwrap_or("sink");
        let sea = if self.flows_to_sea { "drains to sea" } else { "no outlet" };
        if self.is_river_source {
            format!("source, volume {}, flows {} ({})", self.river_volume, flow, sea)
        } else if self.river_volume > 0 {
            format!("volume {}, flows {} ({})", self.river_volume, flow, sea)
        } else {
            format!("flows {} ({})", flow, sea)
        }
    }
}

impl fmt::Display for TileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let or_dash = |s: &Option<String>| s.clone().unwrap_or_else(|| "-".to_string());
        writeln!(f, "Tile ({}, {})", self.x, self.y)?;
        writeln!(f, "  biome:       {}", or_dash(&self.biome))?;
        writeln!(f, "  water:       {}{}", self.water_str(), if self.is_coast { ", coast" } else { "" })?;
        writeln!(
            f,
            "  elevation:   {:.3} ({}) noise {:.3} x modifier {:.3}",
            self.elevation,
            or_dash(&self.elevation_zone),
            self.noise,
            self.distance_modifier
        )?;
        writeln!(f, "  temperature: {:.3} ({})", self.temperature, or_dash(&self.temperature_zone))?;
        writeln!(
            f,
            "  rainfall:    {:.3} ({}) shadow {:.3}",
            self.rainfall,
            or_dash(&self.humidity_zone),
            self.rain_shadow
        )?;
        writeln!(f, "  wind:        {}", self.wind_str())?;
        writeln!(f, "  coast dist:  {}", self.distance_to_coast)?;
        write!(f, "  drainage:    {}", self.river_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(seed: u32) -> WorldParams {
        WorldParams {
            name: "test".to_string(),
            seed,
            width: 64,
            height: 32,
            ..Default::default()
        }
    }

    #[test]
    fn test_every_tile_is_classified() {
        let world = WorldMap::generate(&small(1)).unwrap();
        for tile in world.grid.tiles() {
            assert_ne!(tile.water, WaterType::Unassigned);
            assert!(tile.biome.is_some());
            assert!(tile.elevation_zone.is_some());
            assert!(tile.temperature_zone.is_some());
            assert!(tile.humidity_zone.is_some());
        }
        let r = &world.report;
        assert_eq!(r.ocean_tiles + r.lake_tiles + r.land_tiles, world.grid.len());
    }

    #[test]
    fn test_pass_timings_recorded_in_order() {
        let world = WorldMap::generate(&small(2)).unwrap();
        let passes: Vec<&str> = world.report.timings.iter().map(|t| t.pass).collect();
        assert_eq!(passes.first(), Some(&"tiles"));
        assert_eq!(passes.last(), Some(&"biomes"));
        let pos = |name| passes.iter().position(|p| *p == name).unwrap();
        assert!(pos("elevation") < pos("water bodies"));
        assert!(pos("downslope") < pos("wind direction"));
        assert!(pos("temperature") < pos("rivers"));
        assert!(pos("rivers") < pos("rain shadow"));
        assert!(pos("rain shadow") < pos("rainfall"));
    }

    #[test]
    fn test_invalid_params_fail_before_generation() {
        let mut params = small(3);
        params.height = 0;
        assert!(matches!(
            WorldMap::generate(&params),
            Err(WorldError::Config(_))
        ));
    }

    #[test]
    fn test_tile_info() {
        let world = WorldMap::generate(&small(4)).unwrap();
        let info = world.tile_info(10, 5).unwrap();
        assert_eq!((info.x, info.y), (10, 5));
        assert!(info.biome.is_some());
        assert!(info.to_string().contains("Tile (10, 5)"));
        assert!(world.tile_info(64, 0).is_none());
    }

    #[test]
    fn test_biome_counts_cover_grid() {
        let world = WorldMap::generate(&small(5)).unwrap();
        let total: usize = world.biome_counts().iter().map(|(_, n)| n).sum();
        assert_eq!(total, world.grid.len());
    }
}
