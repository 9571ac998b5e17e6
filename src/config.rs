//! World parameters and the static climate tables.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::biomes::BiomeCatalog;
use crate::error::ConfigError;
use crate::zones::ZoneRegistry;

/// Seam layout for the distance field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomWalkParams {
    /// Seams running down the left and right map edges
    pub sides: bool,
    /// Seams running along the top and bottom map edges
    pub top_bottom: bool,
    /// Walks starting on a random map edge
    pub edge_walks: usize,
    /// Walks starting inside the central 80% of the map
    pub mid_walks: usize,
    /// Vertices added per walk after the start point
    pub steps: usize,
    /// Longest single step as a fraction of map height
    pub max_step_fraction: f64,
}

impl Default for RandomWalkParams {
    fn default() -> Self {
        Self {
            sides: true,
            top_bottom: false,
            edge_walks: 8,
            mid_walks: 8,
            steps: 10,
            max_step_fraction: 1.0 / 32.0,
        }
    }
}

/// Everything needed to regenerate a world exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    pub name: String,
    pub seed: u32,
    pub width: usize,
    pub height: usize,
    /// World units per tile, used by the seam geometry
    pub tile_size: f64,
    pub min_elevation: f64,
    pub max_elevation: f64,
    pub sea_level: f64,
    pub mountain_threshold: f64,
    /// Coast distance (tiles) beyond which wind strength stops changing
    pub wind_distance_threshold: u32,
    /// Peak distance (tiles) beyond which a mountain casts no rain shadow
    pub rain_shadow_distance_threshold: u32,
    pub random_walk: RandomWalkParams,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            name: "world".to_string(),
            seed: 0,
            width: 256,
            height: 128,
            tile_size: 32.0,
            min_elevation: 0.0,
            max_elevation: 1.0,
            sea_level: 0.2,
            mountain_threshold: 0.45,
            wind_distance_threshold: 30,
            rain_shadow_distance_threshold: 50,
            random_walk: RandomWalkParams::default(),
        }
    }
}

impl WorldParams {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let params: WorldParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid =
            |msg: String| -> Result<(), ConfigError> { Err(ConfigError::InvalidParams(msg)) };

        if self.width == 0 || self.height == 0 {
            return invalid(format!("map size {}x{} is empty", self.width, self.height));
        }
        if !(self.tile_size > 0.0) {
            return invalid(format!("tile size {} must be positive", self.tile_size));
        }
        if !(self.min_elevation < self.max_elevation) {
            return invalid(format!(
                "elevation range [{}, {}] is empty",
                self.min_elevation, self.max_elevation
            ));
        }
        let in_range = |v: f64| v >= self.min_elevation && v <= self.max_elevation;
        if !in_range(self.sea_level) {
            return invalid(format!("sea level {} outside elevation range", self.sea_level));
        }
        if !in_range(self.mountain_threshold) {
            return invalid(format!(
                "mountain threshold {} outside elevation range",
                self.mountain_threshold
            ));
        }
        if self.mountain_threshold <= self.sea_level {
            return invalid(format!(
                "mountain threshold {} must be above sea level {}",
                self.mountain_threshold, self.sea_level
            ));
        }
        if self.wind_distance_threshold == 0 || self.rain_shadow_distance_threshold == 0 {
            return invalid("distance thresholds must be at least one tile".to_string());
        }
        if self.random_walk.steps == 0 {
            return invalid("random walks need at least one step".to_string());
        }
        if !(self.random_walk.max_step_fraction > 0.0) {
            return invalid(format!(
                "max step fraction {} must be positive",
                self.random_walk.max_step_fraction
            ));
        }
        Ok(())
    }

    pub fn tile_count(&self) -> usize {
        self.width * self.height
    }
}

/// Zone registry and biome catalog, checked against each other once and then
/// shared read-only by every build.
#[derive(Clone, Debug)]
pub struct ClimateTables {
    pub zones: ZoneRegistry,
    pub biomes: BiomeCatalog,
}

impl ClimateTables {
    pub fn new(zones: ZoneRegistry, biomes: BiomeCatalog) -> Result<Self, ConfigError> {
        let tables = Self { zones, biomes };
        tables.validate()?;
        Ok(tables)
    }

    pub fn builtin() -> Result<Self, ConfigError> {
        Self::new(ZoneRegistry::builtin()?, BiomeCatalog::builtin()?)
    }

    /// Load tables, replacing either builtin file when a path is given.
    pub fn load(zones: Option<&Path>, biomes: Option<&Path>) -> Result<Arc<Self>, ConfigError> {
        let zones = match zones {
            Some(path) => ZoneRegistry::from_file(path)?,
            None => ZoneRegistry::builtin()?,
        };
        let biomes = match biomes {
            Some(path) => BiomeCatalog::from_file(path)?,
            None => BiomeCatalog::builtin()?,
        };
        Ok(Arc::new(Self::new(zones, biomes)?))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.zones.validate()?;
        self.biomes.validate()?;
        self.biomes.validate_against(&self.zones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        WorldParams::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_bad_params() {
        let mut params = WorldParams::default();
        params.width = 0;
        assert!(params.validate().is_err());

        let mut params = WorldParams::default();
        params.mountain_threshold = params.sea_level;
        assert!(params.validate().is_err());

        let mut params = WorldParams::default();
        params.sea_level = 2.0;
        assert!(params.validate().is_err());

        let mut params = WorldParams::default();
        params.random_walk.steps = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params = WorldParams::from_json_str(r#"{"name": "tiny", "width": 16, "height": 8}"#).unwrap();
        assert_eq!(params.name, "tiny");
        assert_eq!(params.width, 16);
        assert_eq!(params.sea_level, WorldParams::default().sea_level);
        assert_eq!(params.random_walk, RandomWalkParams::default());
    }

    #[test]
    fn test_builtin_tables() {
        let tables = ClimateTables::load(None, None).unwrap();
        assert_eq!(tables.zones.humidity.len(), tables.biomes.table.len());
    }

    #[test]
    fn test_missing_table_file() {
        let err = ClimateTables::load(Some(Path::new("/nonexistent/zones.json")), None).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
