//! World map generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod biomes;
pub mod climate;
pub mod config;
pub mod distance_field;
pub mod error;
pub mod export;
pub mod grid;
pub mod heightmap;
pub mod math;
pub mod noise_field;
pub mod persistence;
pub mod rivers;
pub mod seeds;
pub mod tilemap;
pub mod water_bodies;
pub mod world;
pub mod zones;

pub use config::{ClimateTables, RandomWalkParams, WorldParams};
pub use error::{ConfigError, WorldError};
pub use persistence::MapStore;
pub use world::{build, WorldMap};
