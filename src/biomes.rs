//! Biome catalog and per-tile biome resolution
//!
//! Land and lake tiles look their biome up in a humidity × temperature table.
//! Ocean tiles bypass the table: freezing temperature zones give the ice biome,
//! everything else maps through the ocean elevation zone.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::{Tile, TileGrid};
use crate::zones::{ZoneKind, ZoneRegistry, OCEAN_ZONE_COUNT};

pub const BUILTIN_BIOMES: &str = include_str!("data/biomes.json");

/// Handle to a biome: its position in [`BiomeCatalog::biomes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BiomeId(pub u16);

impl BiomeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Biome {
    pub name: String,
    #[serde(default)]
    pub color: [u8; 3],
}

/// Named biomes plus the lookup rules that pick one per tile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BiomeCatalog {
    pub biomes: Vec<Biome>,
    /// Rows keyed by humidity zone name; each row holds one entry per
    /// temperature zone, in temperature zone order. `null` marks an
    /// unconfigured cell.
    pub table: BTreeMap<String, Vec<Option<String>>>,
    /// Ocean elevation zone name to biome name.
    pub water_biomes: BTreeMap<String, String>,
    pub ice_biome: String,
}

impl BiomeCatalog {
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json_str(BUILTIN_BIOMES)
    }

    /// Parse and check that every name the rules mention is a known biome.
    /// Shape checks against a zone registry happen in [`validate_against`].
    ///
    /// [`validate_against`]: BiomeCatalog::validate_against
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let catalog: BiomeCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for biome in &self.biomes {
            if !seen.insert(biome.name.as_str()) {
                return Err(ConfigError::DuplicateBiome {
                    name: biome.name.clone(),
                });
            }
        }

        let referenced = self
            .table
            .values()
            .flatten()
            .flatten()
            .chain(self.water_biomes.values())
            .chain(std::iter::once(&self.ice_biome));
        for name in referenced {
            if !seen.contains(name.as_str()) {
                return Err(ConfigError::UnknownBiome { name: name.clone() });
            }
        }
        Ok(())
    }

    /// Check the table and water mapping cover every zone in `zones`.
    pub fn validate_against(&self, zones: &ZoneRegistry) -> Result<(), ConfigError> {
        let humidity = zones.humidity.len();
        let temperature = zones.temperature.len();
        let shape_error = || ConfigError::TableShape {
            rows: self.table.len(),
            columns: self.table.values().map(Vec::len).max().unwrap_or(0),
            humidity,
            temperature,
        };

        if self.table.len() != humidity {
            return Err(shape_error());
        }
        for h in &zones.humidity {
            let row = self.table.get(&h.name).ok_or_else(shape_error)?;
            if row.len() != temperature {
                return Err(shape_error());
            }
            for (t, cell) in zones.temperature.iter().zip(row) {
                if cell.is_none() {
                    return Err(ConfigError::MissingBiomeCell {
                        humidity: h.name.clone(),
                        temperature: t.name.clone(),
                    });
                }
            }
        }

        for zone in zones.elevation.iter().take(OCEAN_ZONE_COUNT) {
            if !self.water_biomes.contains_key(&zone.name) {
                return Err(ConfigError::MissingWaterBiome {
                    zone: zone.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }

    pub fn biome(&self, id: BiomeId) -> &Biome {
        &self.biomes[id.index()]
    }

    pub fn find(&self, name: &str) -> Option<BiomeId> {
        self.biomes
            .iter()
            .position(|b| b.name == name)
            .map(|i| BiomeId(i as u16))
    }

    fn require(&self, name: &str) -> Result<BiomeId, ConfigError> {
        self.find(name).ok_or_else(|| ConfigError::UnknownBiome {
            name: name.to_string(),
        })
    }

    /// Biome name configured for a humidity/temperature zone pair.
    pub fn lookup(&self, humidity: &str, temperature_index: usize) -> Option<&str> {
        self.table
            .get(humidity)?
            .get(temperature_index)?
            .as_deref()
    }

    /// Resolve one tile. The tile must already carry all three zones.
    pub fn resolve(&self, tile: &Tile, zones: &ZoneRegistry) -> Result<BiomeId, ConfigError> {
        let unclassified = |field| ConfigError::UnclassifiedTile {
            x: tile.x,
            y: tile.y,
            field,
        };
        let temperature = tile
            .temperature_zone
            .ok_or_else(|| unclassified("temperature zone"))?;

        if tile.is_ocean() {
            if zones.zone(ZoneKind::Temperature, temperature).freezing {
                return self.require(&self.ice_biome);
            }
            let elevation = tile
                .elevation_zone
                .ok_or_else(|| unclassified("elevation zone"))?;
            let zone = &zones.zone(ZoneKind::Elevation, elevation).name;
            let name = self
                .water_biomes
                .get(zone)
                .ok_or_else(|| ConfigError::MissingWaterBiome { zone: zone.clone() })?;
            return self.require(name);
        }

        let humidity = tile
            .humidity_zone
            .ok_or_else(|| unclassified("humidity zone"))?;
        let humidity_name = &zones.zone(ZoneKind::Humidity, humidity).name;
        match self.lookup(humidity_name, temperature.index()) {
            Some(name) => self.require(name),
            None => Err(ConfigError::MissingBiomeCell {
                humidity: humidity_name.clone(),
                temperature: zones.zone(ZoneKind::Temperature, temperature).name.clone(),
            }),
        }
    }
}

/// Final pass: write a biome onto every tile.
pub fn assign_biomes(
    grid: &mut TileGrid,
    zones: &ZoneRegistry,
    catalog: &BiomeCatalog,
) -> Result<(), ConfigError> {
    for tile in grid.tiles_mut() {
        let biome = catalog.resolve(tile, zones)?;
        tile.biome = Some(biome);
    }
    Ok(())
}

/// Tile count per biome, sorted by descending count then name.
pub fn biome_counts(grid: &TileGrid, catalog: &BiomeCatalog) -> Vec<(String, usize)> {
    let mut counts: HashMap<BiomeId, usize> = HashMap::new();
    for tile in grid.tiles() {
        if let Some(id) = tile.biome {
            *counts.entry(id).or_insert(0) += 1;
        }
    }
    let mut sorted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(id, n)| (catalog.biome(id).name.clone(), n))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WaterType;
    use crate::zones::ZoneId;

    fn land_tile(zones: &ZoneRegistry, humidity: &str, temperature: &str) -> Tile {
        let mut tile = Tile::new(3, 4);
        tile.water = WaterType::Land;
        tile.elevation_zone = Some(ZoneId(OCEAN_ZONE_COUNT as u16));
        tile.humidity_zone = zones.find(ZoneKind::Humidity, humidity);
        tile.temperature_zone = zones.find(ZoneKind::Temperature, temperature);
        tile
    }

    #[test]
    fn test_builtin_catalog_covers_builtin_zones() {
        let zones = ZoneRegistry::builtin().unwrap();
        let catalog = BiomeCatalog::builtin().unwrap();
        catalog.validate_against(&zones).unwrap();
    }

    #[test]
    fn test_arid_hot_returns_configured_name() {
        let zones = ZoneRegistry::builtin().unwrap();
        let catalog = BiomeCatalog::builtin().unwrap();
        let tile = land_tile(&zones, "Arid", "Hot");
        let id = catalog.resolve(&tile, &zones).unwrap();
        let hot = zones.find(ZoneKind::Temperature, "Hot").unwrap().index();
        assert_eq!(
            Some(catalog.biome(id).name.as_str()),
            catalog.lookup("Arid", hot)
        );
        assert_eq!(catalog.biome(id).name, "Scorched");
    }

    #[test]
    fn test_unconfigured_cell_is_an_error() {
        let zones = ZoneRegistry::builtin().unwrap();
        let mut catalog = BiomeCatalog::builtin().unwrap();
        let hot = zones.find(ZoneKind::Temperature, "Hot").unwrap().index();
        catalog.table.get_mut("Arid").unwrap()[hot] = None;

        let tile = land_tile(&zones, "Arid", "Hot");
        assert!(matches!(
            catalog.resolve(&tile, &zones),
            Err(ConfigError::MissingBiomeCell { .. })
        ));
        assert!(matches!(
            catalog.validate_against(&zones),
            Err(ConfigError::MissingBiomeCell { .. })
        ));
    }

    #[test]
    fn test_freezing_ocean_is_ice() {
        let zones = ZoneRegistry::builtin().unwrap();
        let catalog = BiomeCatalog::builtin().unwrap();
        let mut tile = Tile::new(0, 0);
        tile.water = WaterType::Ocean;
        tile.elevation_zone = Some(ZoneId(1));
        tile.temperature_zone = zones.find(ZoneKind::Temperature, "Polar");
        tile.humidity_zone = Some(ZoneId(0));
        let id = catalog.resolve(&tile, &zones).unwrap();
        assert_eq!(catalog.biome(id).name, catalog.ice_biome);

        tile.temperature_zone = zones.find(ZoneKind::Temperature, "Warm");
        tile.elevation_zone = Some(ZoneId(0));
        let id = catalog.resolve(&tile, &zones).unwrap();
        assert_eq!(catalog.biome(id).name, "Depths");
    }

    #[test]
    fn test_missing_zone_is_reported() {
        let zones = ZoneRegistry::builtin().unwrap();
        let catalog = BiomeCatalog::builtin().unwrap();
        let tile = Tile::new(1, 1);
        assert!(matches!(
            catalog.resolve(&tile, &zones),
            Err(ConfigError::UnclassifiedTile { x: 1, y: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_and_duplicate_names() {
        let unknown = r#"{
            "biomes": [{"name": "Ocean"}],
            "table": {"Dry": ["Ocean", "Jungle"]},
            "water_biomes": {},
            "ice_biome": "Ocean"
        }"#;
        assert!(matches!(
            BiomeCatalog::from_json_str(unknown),
            Err(ConfigError::UnknownBiome { name }) if name == "Jungle"
        ));

        let duplicate = r#"{
            "biomes": [{"name": "Ocean"}, {"name": "Ocean"}],
            "table": {},
            "water_biomes": {},
            "ice_biome": "Ocean"
        }"#;
        assert!(matches!(
            BiomeCatalog::from_json_str(duplicate),
            Err(ConfigError::DuplicateBiome { .. })
        ));
    }

    #[test]
    fn test_table_shape_must_match_zones() {
        let zones = ZoneRegistry::builtin().unwrap();
        let mut catalog = BiomeCatalog::builtin().unwrap();
        catalog.table.remove("Wet");
        assert!(matches!(
            catalog.validate_against(&zones),
            Err(ConfigError::TableShape { .. })
        ));
    }
}
