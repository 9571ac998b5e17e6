//! Rain shadow and rainfall
//!
//! A mountain upwind of a tile blocks part of its rain. The shadow is found
//! by walking from each land or lake tile against its own wind, one compass
//! step at a time, until the walk reaches the ocean or leaves the map.

use rayon::prelude::*;

use crate::config::WorldParams;
use crate::grid::TileGrid;
use crate::math::{normalize_field, rescale, smoothstep, taxicab};
use crate::tilemap::Direction;

use super::normalized_noise;

/// Rainfall noise feature scale is map height divided by this.
const FEATURE_DIVISOR: usize = 2;

/// Index of the highest tile met walking upwind from `idx`. The start tile
/// is included; the first of several equal maxima wins.
pub fn upwind_peak(grid: &TileGrid, idx: usize) -> usize {
    let upwind = Direction::from_bearing(grid.tile(idx).wind_direction).opposite();
    let mut peak = idx;
    let mut current = idx;
    loop {
        let tile = grid.tile(current);
        if tile.is_ocean() {
            break;
        }
        if tile.elevation > grid.tile(peak).elevation {
            peak = current;
        }
        match grid.step(current, upwind) {
            Some(next) => current = next,
            None => break,
        }
    }
    peak
}

/// Raw shadow intensity cast by `peak` on `idx`, before normalization.
pub fn shadow_intensity(grid: &TileGrid, idx: usize, peak: usize, params: &WorldParams) -> f64 {
    let peak_elevation = grid.tile(peak).elevation;
    if peak_elevation < params.mountain_threshold {
        return 0.0;
    }
    let threshold = params.rain_shadow_distance_threshold;
    let distance = taxicab(grid.tile(idx).coords(), grid.tile(peak).coords()).min(threshold as usize);
    let closeness = 1.0 - distance as f64 / threshold as f64;
    let height = rescale(params.mountain_threshold, params.max_elevation, 0.0, 1.0, peak_elevation);
    smoothstep((closeness * height).clamp(0.0, 1.0))
}

/// Write `rain_shadow` on every tile, normalized to `[0, 1]`. Ocean tiles
/// cast and receive no shadow before normalization.
pub fn assign_rain_shadow(grid: &mut TileGrid, params: &WorldParams) {
    let shadow: Vec<f64> = (0..grid.len())
        .into_par_iter()
        .map(|idx| {
            if grid.tile(idx).is_ocean() {
                0.0
            } else {
                shadow_intensity(grid, idx, upwind_peak(grid, idx), params)
            }
        })
        .collect();

    for (tile, value) in grid.tiles_mut().iter_mut().zip(shadow) {
        tile.rain_shadow = value;
    }
    normalize_field(
        grid.tiles_mut(),
        |t| t.rain_shadow,
        |t, v| t.rain_shadow = v,
        0.0,
        1.0,
    );
}

/// Write `rainfall` on every tile: normalized noise dimmed by the shadow.
pub fn assign_rainfall(grid: &mut TileGrid, seed: u32) {
    let scale = grid.feature_scale(FEATURE_DIVISOR);
    let noise = normalized_noise(grid, seed, scale, 0.0, 1.0);
    for (tile, n) in grid.tiles_mut().iter_mut().zip(noise) {
        tile.rainfall = n * (1.0 - tile.rain_shadow);
    }
}
