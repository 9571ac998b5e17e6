//! Downslope graph and river tracing
//!
//! Each tile points at its lowest strictly-lower orthogonal neighbor (or at
//! nothing, on a sink). Following those links from any tile ends at the ocean
//! or at a sink. Rivers start on high land that drains to the sea and are
//! traced down the same links until they leave the land.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::grid::{TileGrid, WaterType};
use crate::tilemap::Direction;

/// Where a downslope walk ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Drainage {
    /// Reached an ocean tile
    Sea,
    /// Stopped on a local minimum (storage index of the sink)
    Sink(usize),
    /// Exceeded the step bound without terminating
    Cycle,
}

/// Counts gathered by the flow pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainageSummary {
    pub to_sea: usize,
    /// Walks ending on a land sink with no water body to drain into
    pub land_sinks: usize,
    pub cycles: usize,
}

/// Counts gathered by the river pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RiverSummary {
    pub candidates: usize,
    pub sources: usize,
    /// Rivers that stopped on a land sink before reaching water
    pub stalled: usize,
}

// =============================================================================
// DOWNSLOPE GRAPH
// =============================================================================

/// Lowest strictly-lower orthogonal neighbor of `idx`. Ties keep the first
/// neighbor in N, E, S, W order.
pub fn downslope_direction(grid: &TileGrid, idx: usize) -> Option<Direction> {
    let mut lowest = grid.tile(idx).elevation;
    let mut best = None;
    for dir in Direction::CARDINAL {
        if let Some(n) = grid.step(idx, dir) {
            let e = grid.tile(n).elevation;
            if e < lowest {
                lowest = e;
                best = Some(dir);
            }
        }
    }
    best
}

/// Write `downslope` on every tile. Returns the number of sinks.
pub fn assign_downslopes(grid: &mut TileGrid) -> usize {
    let directions: Vec<Option<Direction>> = (0..grid.len())
        .into_par_iter()
        .map(|idx| downslope_direction(grid, idx))
        .collect();

    let mut sinks = 0;
    for (tile, dir) in grid.tiles_mut().iter_mut().zip(directions) {
        if dir.is_none() {
            sinks += 1;
        }
        tile.downslope = dir;
    }
    sinks
}

/// Follow downslope links from `start`, bounded by the tile count.
pub fn trace_drainage(grid: &TileGrid, start: usize) -> Drainage {
    let mut current = start;
    for _ in 0..=grid.len() {
        let tile = grid.tile(current);
        if tile.is_ocean() {
            return Drainage::Sea;
        }
        match tile.downslope.and_then(|dir| grid.step(current, dir)) {
            Some(next) => current = next,
            None => return Drainage::Sink(current),
        }
    }
    Drainage::Cycle
}

/// Write `flows_to_sea` on every tile.
pub fn assign_flows_to_sea(grid: &mut TileGrid) -> DrainageSummary {
    let outcomes: Vec<Drainage> = (0..grid.len())
        .into_par_iter()
        .map(|idx| trace_drainage(grid, idx))
        .collect();

    let mut summary = DrainageSummary::default();
    for idx in 0..grid.len() {
        let flows = match outcomes[idx] {
            Drainage::Sea => {
                summary.to_sea += 1;
                true
            }
            Drainage::Sink(sink) => {
                if grid.tile(sink).water == WaterType::Land {
                    summary.land_sinks += 1;
                }
                false
            }
            Drainage::Cycle => {
                summary.cycles += 1;
                false
            }
        };
        grid.tile_mut(idx).flows_to_sea = flows;
    }
    summary
}

// =============================================================================
// RIVERS
// =============================================================================

/// Number of rivers for a map of the given height: `2 × ⌊√height⌋`.
pub fn river_count(height: usize) -> usize {
    2 * (height as f64).sqrt().floor() as usize
}

/// Pick sources among high land draining to the sea and trace each down to
/// the first non-land tile, adding one to `river_volume` on every land tile
/// passed.
pub fn create_rivers(grid: &mut TileGrid, mountain_threshold: f64, seed: u64) -> RiverSummary {
    let mut candidates: Vec<usize> = grid
        .tiles()
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_land() && t.flows_to_sea && t.elevation >= mountain_threshold)
        .map(|(idx, _)| idx)
        .collect();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    candidates.shuffle(&mut rng);

    let mut summary = RiverSummary {
        candidates: candidates.len(),
        ..Default::default()
    };

    for &source in candidates.iter().take(river_count(grid.height())) {
        grid.tile_mut(source).is_river_source = true;
        summary.sources += 1;

        let mut current = source;
        let mut length = 0;
        for _ in 0..grid.len() {
            if grid.tile(current).water != WaterType::Land {
                break;
            }
            let downslope = {
                let tile = grid.tile_mut(current);
                tile.river_volume += 1;
                tile.downslope
            };
            length += 1;
            match downslope.and_then(|dir| grid.step(current, dir)) {
                Some(next) => current = next,
                None => {
                    summary.stalled += 1;
                    break;
                }
            }
        }

        let (x, y) = grid.tile(source).coords();
        tracing::debug!(target: "hydrology", x, y, length, "river traced");
    }

    summary
}
