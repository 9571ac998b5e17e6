//! Error types for configuration loading and world building.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Structural configuration problems. Always fatal to a build.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{kind} zone list is empty")]
    EmptyZones { kind: &'static str },
    #[error("duplicate {kind} zone {name}")]
    DuplicateZone { kind: &'static str, name: String },
    #[error("{kind} zone {name} has index {found}, expected {expected}")]
    ZoneIndexMismatch {
        kind: &'static str,
        name: String,
        found: usize,
        expected: usize,
    },
    #[error("elevation zones need three ocean zones and at least one land zone, found {count}")]
    TooFewElevationZones { count: usize },
    #[error("duplicate biome {name}")]
    DuplicateBiome { name: String },
    #[error("unknown biome {name}")]
    UnknownBiome { name: String },
    #[error("biome table is {rows}x{columns}, zones require {humidity}x{temperature}")]
    TableShape {
        rows: usize,
        columns: usize,
        humidity: usize,
        temperature: usize,
    },
    #[error("no biome configured for humidity zone {humidity} and temperature zone {temperature}")]
    MissingBiomeCell { humidity: String, temperature: String },
    #[error("no water biome configured for elevation zone {zone}")]
    MissingWaterBiome { zone: String },
    #[error("tile at ({x}, {y}) reached biome resolution without {field}")]
    UnclassifiedTile { x: usize, y: usize, field: &'static str },
    #[error("invalid world parameters: {0}")]
    InvalidParams(String),
}

/// Anything that can stop a world from being built or stored.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to access saved map at {path:?}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("saved map version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("failed to encode or decode saved map: {0}")]
    Format(#[from] serde_json::Error),
    #[error("failed to export image: {0}")]
    Image(#[from] image::ImageError),
}
