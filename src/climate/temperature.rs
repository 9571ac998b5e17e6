//! Temperature from latitude, noise and altitude.

use crate::config::WorldParams;
use crate::grid::TileGrid;
use crate::math::{normalize_field, rescale};

use super::normalized_noise;

/// Weight of the distortion noise against the latitude gradient.
const NOISE_WEIGHT: f64 = 0.5;
const FEATURE_DIVISOR: usize = 8;

/// Triangular latitude profile: 0 at either pole, 1 at the equator.
pub fn latitude_temperature(latitude: f64) -> f64 {
    if latitude < 0.5 {
        2.0 * latitude
    } else {
        2.0 * (1.0 - latitude)
    }
}

/// Scale factor applied above the mountain threshold, falling from 1 at the
/// threshold to 0 at maximum elevation.
pub fn altitude_factor(elevation: f64, params: &WorldParams) -> f64 {
    if elevation > params.mountain_threshold {
        1.0 - rescale(params.mountain_threshold, params.max_elevation, 0.0, 1.0, elevation)
    } else {
        1.0
    }
}

/// Write `temperature` on every tile, in `[0, 1]`.
pub fn assign_temperature(grid: &mut TileGrid, params: &WorldParams, seed: u32) {
    let scale = grid.feature_scale(FEATURE_DIVISOR);
    let noise = normalized_noise(grid, seed, scale, -1.0, 1.0);

    for idx in 0..grid.len() {
        let base = latitude_temperature(grid.latitude(idx));
        grid.tile_mut(idx).temperature = base + NOISE_WEIGHT * noise[idx];
    }
    normalize_field(
        grid.tiles_mut(),
        |t| t.temperature,
        |t, v| t.temperature = v,
        0.0,
        1.0,
    );

    for tile in grid.tiles_mut() {
        tile.temperature *= altitude_factor(tile.elevation, params).clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_profile() {
        assert_eq!(latitude_temperature(0.0), 0.0);
        assert_eq!(latitude_temperature(0.5), 1.0);
        assert!((latitude_temperature(0.25) - 0.5).abs() < 1e-12);
        assert!((latitude_temperature(0.75) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_altitude_cools_only_mountains() {
        let params = WorldParams::default();
        assert_eq!(altitude_factor(params.sea_level, &params), 1.0);
        assert_eq!(altitude_factor(params.mountain_threshold, &params), 1.0);
        assert_eq!(altitude_factor(params.max_elevation, &params), 0.0);
        let mid = (params.mountain_threshold + params.max_elevation) / 2.0;
        assert!((altitude_factor(mid, &params) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_temperature_range_and_peaks() {
        let params = WorldParams::default();
        let mut grid = TileGrid::new(32, 32);
        let peak = grid.index_of(10, 16).unwrap();
        grid.tile_mut(peak).elevation = params.max_elevation;
        assign_temperature(&mut grid, &params, 12);

        for tile in grid.tiles() {
            assert!(tile.temperature >= 0.0 && tile.temperature <= 1.0);
        }
        assert_eq!(grid.tile(peak).temperature, 0.0);
    }

    #[test]
    fn test_equator_warmer_than_poles_on_average() {
        let params = WorldParams::default();
        let mut grid = TileGrid::new(64, 64);
        assign_temperature(&mut grid, &params, 4);
        let row_mean = |y: usize| {
            (0..64).map(|x| grid.get(x, y as i64).unwrap().temperature).sum::<f64>() / 64.0
        };
        assert!(row_mean(32) > row_mean(0));
        assert!(row_mean(32) > row_mean(63));
    }
}
