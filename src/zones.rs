//! Climate zones and the zone classifier.
//!
//! Zones discretize continuous elevation, temperature and humidity values into
//! named buckets. The three ordered zone lists are loaded once and shared by
//! every tile through [`ZoneId`] handles.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::WorldParams;
use crate::error::ConfigError;
use crate::grid::{TileGrid, WaterType};
use crate::math::rescale;

pub const BUILTIN_CLIMATE_ZONES: &str = include_str!("data/climate_zones.json");

/// Number of leading elevation zones reserved for ocean tiles
/// (depths, open ocean, shallows).
pub const OCEAN_ZONE_COUNT: usize = 3;

/// Handle to a zone within one of the registry's lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneId(pub u16);

impl ZoneId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which of the three zone lists a zone belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneKind {
    Elevation,
    Temperature,
    Humidity,
}

impl ZoneKind {
    pub fn name(self) -> &'static str {
        match self {
            ZoneKind::Elevation => "elevation",
            ZoneKind::Temperature => "temperature",
            ZoneKind::Humidity => "humidity",
        }
    }
}

/// One named bucket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClimateZone {
    pub name: String,
    pub index: usize,
    #[serde(default)]
    pub color: [u8; 3],
    /// Only meaningful for temperature zones: ocean tiles in a freezing zone
    /// resolve to the ice biome.
    #[serde(default)]
    pub freezing: bool,
}

/// The three ordered zone lists.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZoneRegistry {
    pub elevation: Vec<ClimateZone>,
    pub temperature: Vec<ClimateZone>,
    pub humidity: Vec<ClimateZone>,
}

impl ZoneRegistry {
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json_str(BUILTIN_CLIMATE_ZONES)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let registry: ZoneRegistry = serde_json::from_str(json)?;
        registry.validate()?;
        Ok(registry)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in [ZoneKind::Elevation, ZoneKind::Temperature, ZoneKind::Humidity] {
            let zones = self.list(kind);
            if zones.is_empty() {
                return Err(ConfigError::EmptyZones { kind: kind.name() });
            }
            let mut seen = HashSet::new();
            for (position, zone) in zones.iter().enumerate() {
                if !seen.insert(zone.name.as_str()) {
                    return Err(ConfigError::DuplicateZone {
                        kind: kind.name(),
                        name: zone.name.clone(),
                    });
                }
                if zone.index != position {
                    return Err(ConfigError::ZoneIndexMismatch {
                        kind: kind.name(),
                        name: zone.name.clone(),
                        found: zone.index,
                        expected: position,
                    });
                }
            }
        }
        if self.elevation.len() <= OCEAN_ZONE_COUNT {
            return Err(ConfigError::TooFewElevationZones {
                count: self.elevation.len(),
            });
        }
        Ok(())
    }

    pub fn list(&self, kind: ZoneKind) -> &[ClimateZone] {
        match kind {
            ZoneKind::Elevation => &self.elevation,
            ZoneKind::Temperature => &self.temperature,
            ZoneKind::Humidity => &self.humidity,
        }
    }

    pub fn zone(&self, kind: ZoneKind, id: ZoneId) -> &ClimateZone {
        &self.list(kind)[id.index()]
    }

    /// Look a zone up by name.
    pub fn find(&self, kind: ZoneKind, name: &str) -> Option<ZoneId> {
        self.list(kind)
            .iter()
            .position(|z| z.name == name)
            .map(|i| ZoneId(i as u16))
    }
}

// =============================================================================
// CLASSIFIER
// =============================================================================

/// Bucket a value in `[0, 1]` into one of `count` equal-width zones.
/// A value of exactly 1 lands in the last zone.
pub fn bucket_index(count: usize, value: f64) -> usize {
    debug_assert!(count > 0);
    let z = (count as f64 * value).floor();
    if z <= 0.0 {
        0
    } else {
        (z as usize).min(count - 1)
    }
}

/// Elevation zone index for a tile.
///
/// Ocean tiles use the three ocean zones, picked by how deep they sit within
/// the range between minimum elevation and sea level. Everything else maps
/// linearly from sea level to maximum elevation onto the remaining zones.
pub fn elevation_zone_index(
    water: WaterType,
    elevation: f64,
    params: &WorldParams,
    count: usize,
) -> usize {
    if water == WaterType::Ocean {
        let depth = rescale(params.min_elevation, params.sea_level, 0.0, 1.0, elevation);
        if depth < 0.25 {
            0
        } else if depth > 0.75 {
            2
        } else {
            1
        }
    } else {
        let e = rescale(
            params.sea_level,
            params.max_elevation,
            OCEAN_ZONE_COUNT as f64,
            count as f64 - 0.001,
            elevation,
        )
        .floor();
        if e <= OCEAN_ZONE_COUNT as f64 {
            OCEAN_ZONE_COUNT
        } else {
            (e as usize).min(count - 1)
        }
    }
}

pub fn assign_elevation_zones(grid: &mut TileGrid, zones: &ZoneRegistry, params: &WorldParams) {
    let count = zones.elevation.len();
    for tile in grid.tiles_mut() {
        let idx = elevation_zone_index(tile.water, tile.elevation, params, count);
        tile.elevation_zone = Some(ZoneId(idx as u16));
    }
}

pub fn assign_temperature_zones(grid: &mut TileGrid, zones: &ZoneRegistry) {
    let count = zones.temperature.len();
    for tile in grid.tiles_mut() {
        tile.temperature_zone = Some(ZoneId(bucket_index(count, tile.temperature) as u16));
    }
}

pub fn assign_humidity_zones(grid: &mut TileGrid, zones: &ZoneRegistry) {
    let count = zones.humidity.len();
    for tile in grid.tiles_mut() {
        tile.humidity_zone = Some(ZoneId(bucket_index(count, tile.rainfall) as u16));
    }
}
