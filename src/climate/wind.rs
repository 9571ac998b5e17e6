//! Prevailing wind, wind direction and wind strength
//!
//! Bearings are radians clockwise from north (−y), so `π/2` blows east.
//! The map is split into seven latitude bands from the north pole (top row)
//! to the south pole (bottom row); each band pins a prevailing bearing and a
//! base strength at its latitude, and tiles between two bands interpolate.

use std::collections::VecDeque;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::grid::TileGrid;
use crate::math::{lerp, normalize_field, rescale, smoothstep};
use crate::water_bodies::{coast_tiles, Landmass};

use super::normalized_noise;

/// How far the noise term may turn the wind away from the prevailing bearing.
pub const DIRECTION_DEVIATION: f64 = 0.2;
/// Wind noise feature scale is map height divided by this.
const FEATURE_DIVISOR: usize = 8;

/// A latitude band anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindBand {
    pub name: &'static str,
    /// Prevailing bearing at this latitude
    pub direction: f64,
    /// Base wind strength at this latitude
    pub strength: f64,
    /// Fractional latitude (0 = top row, 1 = bottom row)
    pub position: f64,
}

pub const WIND_BANDS: [WindBand; 7] = [
    WindBand { name: "NorthPole", direction: PI, strength: 0.8, position: 0.0 },
    WindBand { name: "NorthCircle", direction: 0.0, strength: 1.0, position: 0.1 },
    WindBand { name: "NorthTropic", direction: FRAC_PI_2, strength: 0.6, position: 0.35 },
    WindBand { name: "Equator", direction: 1.5 * PI, strength: 0.4, position: 0.5 },
    WindBand { name: "SouthTropic", direction: FRAC_PI_2, strength: 0.6, position: 0.65 },
    WindBand { name: "SouthCircle", direction: PI, strength: 1.0, position: 0.9 },
    WindBand { name: "SouthPole", direction: 0.0, strength: 0.8, position: 1.0 },
];

/// Prevailing `(bearing, strength)` at a fractional latitude, interpolated
/// linearly between the two enclosing bands.
pub fn prevailing_wind(latitude: f64) -> (f64, f64) {
    let latitude = latitude.clamp(0.0, 1.0);
    for pair in WIND_BANDS.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if latitude <= b.position {
            let t = rescale(a.position, b.position, 0.0, 1.0, latitude);
            return (lerp(a.direction, b.direction, t), lerp(a.strength, b.strength, t));
        }
    }
    let last = &WIND_BANDS[WIND_BANDS.len() - 1];
    (last.direction, last.strength)
}

// =============================================================================
// DIRECTION
// =============================================================================

/// Write `prevailing_wind_direction`, `wind_noise` and `wind_direction`.
///
/// The noise is stretched onto `[-π, π]`, scaled by [`DIRECTION_DEVIATION`]
/// and added to the prevailing bearing. The sum is stretched onto `[0, 2π]`
/// and wrapped into `[0, 2π)`.
pub fn assign_wind_direction(grid: &mut TileGrid, seed: u32) {
    let scale = grid.feature_scale(FEATURE_DIVISOR);
    let noise = normalized_noise(grid, seed, scale, -PI, PI);

    for idx in 0..grid.len() {
        let (prevailing, _) = prevailing_wind(grid.latitude(idx));
        let tile = grid.tile_mut(idx);
        tile.prevailing_wind_direction = prevailing;
        tile.wind_noise = noise[idx];
        tile.wind_direction = prevailing + noise[idx] * DIRECTION_DEVIATION;
    }

    normalize_field(
        grid.tiles_mut(),
        |t| t.wind_direction,
        |t, v| t.wind_direction = v.rem_euclid(TAU),
        0.0,
        TAU,
    );
}

// =============================================================================
// STRENGTH
// =============================================================================

/// Multi-source breadth-first search outward from every coast tile, over
/// all tiles, stopping at `threshold` steps. Tiles not reached get
/// `threshold`. Returns the number of unreached tiles.
pub fn assign_distance_to_coast(grid: &mut TileGrid, landmasses: &[Landmass], threshold: u32) -> usize {
    let mut distance = vec![threshold; grid.len()];
    let mut queue = VecDeque::new();

    for landmass in landmasses {
        for idx in coast_tiles(grid, landmass) {
            distance[idx] = 0;
            queue.push_back(idx);
        }
    }

    while let Some(idx) = queue.pop_front() {
        let next = distance[idx] + 1;
        if next >= threshold {
            continue;
        }
        for n in grid.orthogonal(idx) {
            if next < distance[n] {
                distance[n] = next;
                queue.push_back(n);
            }
        }
    }

    let mut unreached = 0;
    for (tile, d) in grid.tiles_mut().iter_mut().zip(distance) {
        if d >= threshold {
            unreached += 1;
        }
        tile.distance_to_coast = d;
    }
    unreached
}

/// Continent term for one tile: 0 deep inland, 0.5 on the coast, 1 far out
/// at sea.
pub fn continent_strength(is_ocean: bool, distance: u32, threshold: u32) -> f64 {
    let x = (distance as f64 / threshold as f64).clamp(0.0, 1.0);
    if is_ocean {
        smoothstep((1.0 + x) / 2.0)
    } else {
        smoothstep((1.0 - x) / 2.0)
    }
}

/// Write `base_wind_strength`, `distance_to_coast`,
/// `continent_wind_strength` and `wind_strength`. Returns the number of
/// tiles further than `threshold` from any coast.
pub fn assign_wind_strength(
    grid: &mut TileGrid,
    landmasses: &[Landmass],
    threshold: u32,
    seed: u32,
) -> usize {
    let scale = grid.feature_scale(FEATURE_DIVISOR);
    let noise = normalized_noise(grid, seed, scale, 0.0, 1.0);

    for idx in 0..grid.len() {
        let (_, band_strength) = prevailing_wind(grid.latitude(idx));
        grid.tile_mut(idx).base_wind_strength = noise[idx] + band_strength;
    }
    normalize_field(
        grid.tiles_mut(),
        |t| t.base_wind_strength,
        |t, v| t.base_wind_strength = v,
        0.0,
        1.0,
    );

    let unreached = assign_distance_to_coast(grid, landmasses, threshold);

    for tile in grid.tiles_mut() {
        tile.continent_wind_strength = continent_strength(tile.is_ocean(), tile.distance_to_coast, threshold);
        tile.wind_strength = tile.base_wind_strength + tile.continent_wind_strength;
    }
    normalize_field(
        grid.tiles_mut(),
        |t| t.wind_strength,
        |t, v| t.wind_strength = v,
        0.0,
        1.0,
    );

    unreached
}
