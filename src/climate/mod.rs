//! Climate simulation
//!
//! Runs after hydrology, in order: wind direction, wind strength,
//! temperature, then rain shadow and rainfall (which need rivers and
//! mountains to be settled). Each noise-driven pass draws from its own seed.

pub mod rainfall;
pub mod temperature;
pub mod wind;

use rayon::prelude::*;

use crate::grid::TileGrid;
use crate::math::{rescale, value_range};
use crate::noise_field::{NoiseField, CLIMATE_OCTAVES, PERSISTENCE};

/// Climate noise sampled per tile at `feature_scale` tiles per unit,
/// stretched onto `[new_min, new_max]`. Row-major tile order.
pub(crate) fn normalized_noise(
    grid: &TileGrid,
    seed: u32,
    feature_scale: f64,
    new_min: f64,
    new_max: f64,
) -> Vec<f64> {
    let field = NoiseField::new(seed);
    let mut values: Vec<f64> = grid
        .tiles()
        .par_iter()
        .map(|t| {
            field.octave(
                t.x as f64 / feature_scale,
                t.y as f64 / feature_scale,
                CLIMATE_OCTAVES,
                PERSISTENCE,
            )
        })
        .collect();

    if let Some((min, max)) = value_range(values.iter().copied()) {
        for v in values.iter_mut() {
            *v = rescale(min, max, new_min, new_max, *v);
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_noise_hits_both_ends() {
        let grid = TileGrid::new(20, 10);
        let values = normalized_noise(&grid, 17, 2.0, -1.0, 1.0);
        let (lo, hi) = value_range(values.iter().copied()).unwrap();
        assert!((lo + 1.0).abs() < 1e-12);
        assert!((hi - 1.0).abs() < 1e-12);
    }
}
