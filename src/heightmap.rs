//! Elevation synthesis
//!
//! Elevation is the product of two normalized fields:
//! 1. Octave Perlin noise for local relief, normalized to [0, 1]
//! 2. The seam distance modifier for continent-scale shape, normalized to
//!    [MODIFIER_MIN, MODIFIER_MAX]
//!
//! The product is then stretched onto the configured elevation range using
//! the observed minimum and maximum, so the lowest tile sits exactly at
//! `min_elevation` and the highest exactly at `max_elevation`.

use rayon::prelude::*;

use crate::config::WorldParams;
use crate::distance_field::{compute_distance_field, generate_seams, Seam};
use crate::grid::TileGrid;
use crate::math::normalize_field;
use crate::noise_field::{NoiseField, ELEVATION_OCTAVES, PERSISTENCE};
use crate::seeds::WorldSeeds;

// =============================================================================
// ELEVATION CONSTANTS
// =============================================================================

/// Noise feature scale is map height divided by this.
const FEATURE_DIVISOR: usize = 8;

/// Tiles sitting on a seam keep this fraction of their noise height
pub const MODIFIER_MIN: f64 = 0.1;
/// Tiles furthest from every seam get this multiplier
pub const MODIFIER_MAX: f64 = 1.5;

// =============================================================================
// MAIN ELEVATION GENERATION
// =============================================================================

/// Write `noise`, `distance_modifier` and `elevation` on every tile.
/// Returns the seams the distance field was built from.
pub fn generate_elevation(grid: &mut TileGrid, params: &WorldParams, seeds: &WorldSeeds) -> Vec<Seam> {
    sample_noise(grid, seeds.elevation);

    let seams = generate_seams(params, seeds.seams);
    let distances = compute_distance_field(grid.width(), grid.height(), params.tile_size, &seams);
    for (tile, distance) in grid.tiles_mut().iter_mut().zip(distances) {
        tile.distance_modifier = distance;
    }
    normalize_field(
        grid.tiles_mut(),
        |t| t.distance_modifier,
        |t, v| t.distance_modifier = v,
        MODIFIER_MIN,
        MODIFIER_MAX,
    );

    combine(grid, params);
    seams
}

/// Octave noise per tile, normalized to [0, 1].
fn sample_noise(grid: &mut TileGrid, seed: u32) {
    let field = NoiseField::new(seed);
    let scale = grid.feature_scale(FEATURE_DIVISOR);

    let values: Vec<f64> = grid
        .tiles()
        .par_iter()
        .map(|t| field.octave(t.x as f64 / scale, t.y as f64 / scale, ELEVATION_OCTAVES, PERSISTENCE))
        .collect();
    for (tile, value) in grid.tiles_mut().iter_mut().zip(values) {
        tile.noise = value;
    }
    normalize_field(grid.tiles_mut(), |t| t.noise, |t, v| t.noise = v, 0.0, 1.0);
}

/// Multiply the two fields and stretch the result onto the elevation range.
pub fn combine(grid: &mut TileGrid, params: &WorldParams) {
    for tile in grid.tiles_mut() {
        tile.elevation = tile.noise * tile.distance_modifier;
    }
    normalize_field(
        grid.tiles_mut(),
        |t| t.elevation,
        |t, v| t.elevation = v,
        params.min_elevation,
        params.max_elevation,
    );
}
