//! Ocean, lake and landmass classification
//!
//! Every tile starts `Unassigned`. The ocean fill claims all below-sea-level
//! tiles connected to the map border; the landmass fill then groups what is
//! left into orthogonally connected components, each one a [`Landmass`] made
//! of land tiles and the lakes enclosed by them.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::grid::{TileGrid, WaterType};

/// Landmass identifier, assigned in fill order starting at 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LandmassId(pub u32);

/// One orthogonally connected group of land and lake tiles.
#[derive(Clone, Debug)]
pub struct Landmass {
    pub id: LandmassId,
    /// Storage indices in fill (BFS) order
    pub tiles: Vec<usize>,
    pub land_tiles: usize,
    pub lake_tiles: usize,
    pub min_elevation: f64,
    pub max_elevation: f64,
    /// Bounding box (min_x, min_y, max_x, max_y)
    pub bounds: (usize, usize, usize, usize),
}

impl Landmass {
    fn new(id: LandmassId) -> Self {
        Self {
            id,
            tiles: Vec::new(),
            land_tiles: 0,
            lake_tiles: 0,
            min_elevation: f64::MAX,
            max_elevation: f64::MIN,
            bounds: (usize::MAX, usize::MAX, 0, 0),
        }
    }

    fn add_tile(&mut self, index: usize, x: usize, y: usize, water: WaterType, elevation: f64) {
        self.tiles.push(index);
        match water {
            WaterType::Lake => self.lake_tiles += 1,
            _ => self.land_tiles += 1,
        }
        self.min_elevation = self.min_elevation.min(elevation);
        self.max_elevation = self.max_elevation.max(elevation);

        self.bounds.0 = self.bounds.0.min(x);
        self.bounds.1 = self.bounds.1.min(y);
        self.bounds.2 = self.bounds.2.max(x);
        self.bounds.3 = self.bounds.3.max(y);
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

// =============================================================================
// OCEAN FILL
// =============================================================================

/// Flood the ocean in from the map border.
///
/// Seeds are border tiles below sea level; the fill spreads orthogonally
/// through `Unassigned` tiles below sea level. Returns the number of tiles
/// newly marked `Ocean`. Running it again on the same grid changes nothing.
pub fn assign_ocean(grid: &mut TileGrid, sea_level: f64) -> usize {
    let mut queue = VecDeque::new();
    let mut marked = 0;

    for idx in 0..grid.len() {
        let tile = grid.tile(idx);
        if grid.is_border(idx) && tile.water == WaterType::Unassigned && tile.elevation < sea_level {
            grid.tile_mut(idx).water = WaterType::Ocean;
            marked += 1;
            queue.push_back(idx);
        }
    }

    while let Some(idx) = queue.pop_front() {
        for n in 0..4 {
            let Some(neighbor) = grid.neighbors(idx).orthogonal[n] else {
                continue;
            };
            let tile = grid.tile_mut(neighbor);
            if tile.water == WaterType::Unassigned && tile.elevation < sea_level {
                tile.water = WaterType::Ocean;
                marked += 1;
                queue.push_back(neighbor);
            }
        }
    }

    marked
}

// =============================================================================
// LANDMASS FILL
// =============================================================================

/// Group every remaining `Unassigned` tile into landmasses.
///
/// Tiles above sea level become `Land`, the rest `Lake`. Components are
/// discovered in storage order and filled breadth first.
pub fn assign_landmasses(grid: &mut TileGrid, sea_level: f64) -> Vec<Landmass> {
    let mut landmasses = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..grid.len() {
        if grid.tile(start).water != WaterType::Unassigned {
            continue;
        }

        let mut landmass = Landmass::new(LandmassId(landmasses.len() as u32));
        claim(grid, start, &mut landmass, sea_level);
        queue.push_back(start);

        while let Some(idx) = queue.pop_front() {
            for n in 0..4 {
                let Some(neighbor) = grid.neighbors(idx).orthogonal[n] else {
                    continue;
                };
                if grid.tile(neighbor).water == WaterType::Unassigned {
                    claim(grid, neighbor, &mut landmass, sea_level);
                    queue.push_back(neighbor);
                }
            }
        }

        tracing::debug!(
            target: "hydrology",
            landmass = landmass.id.0,
            tiles = landmass.len(),
            lakes = landmass.lake_tiles,
            "landmass filled"
        );
        landmasses.push(landmass);
    }

    landmasses
}

fn claim(grid: &mut TileGrid, idx: usize, landmass: &mut Landmass, sea_level: f64) {
    let tile = grid.tile_mut(idx);
    tile.water = if tile.elevation > sea_level {
        WaterType::Land
    } else {
        WaterType::Lake
    };
    tile.landmass = Some(landmass.id);
    landmass.add_tile(idx, tile.x, tile.y, tile.water, tile.elevation);
}

// =============================================================================
// COASTLINE
// =============================================================================

/// Land tile with at least one orthogonal ocean neighbor and at least one
/// orthogonal land neighbor.
pub fn is_coast(grid: &TileGrid, idx: usize) -> bool {
    if grid.tile(idx).water != WaterType::Land {
        return false;
    }
    let mut ocean = false;
    let mut land = false;
    for n in grid.orthogonal(idx) {
        match grid.tile(n).water {
            WaterType::Ocean => ocean = true,
            WaterType::Land => land = true,
            _ => {}
        }
    }
    ocean && land
}

pub fn assign_coast(grid: &mut TileGrid, landmasses: &[Landmass]) {
    for landmass in landmasses {
        for &idx in &landmass.tiles {
            let coast = is_coast(grid, idx);
            grid.tile_mut(idx).is_coast = coast;
        }
    }
}

/// Coast tiles of one landmass.
pub fn coast_tiles<'a>(grid: &'a TileGrid, landmass: &'a Landmass) -> impl Iterator<Item = usize> + 'a {
    landmass.tiles.iter().copied().filter(|&idx| grid.tile(idx).is_coast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const SEA: f64 = 0.5;

    /// Grid with elevations from a character map: '#' land, '.' below sea.
    fn grid_from(rows: &[&str]) -> TileGrid {
        let mut grid = TileGrid::new(rows[0].len(), rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                let idx = grid.index_of(x as i64, y as i64).unwrap();
                grid.tile_mut(idx).elevation = if c == '#' { 0.9 } else { 0.1 };
            }
        }
        grid
    }

    fn classify(grid: &mut TileGrid) -> Vec<Landmass> {
        assign_ocean(grid, SEA);
        let landmasses = assign_landmasses(grid, SEA);
        assign_coast(grid, &landmasses);
        landmasses
    }

    #[test]
    fn test_single_tile_island() {
        let mut grid = TileGrid::new(10, 10);
        for tile in grid.tiles_mut() {
            tile.elevation = 0.1;
        }
        let centre = grid.index_of(5, 5).unwrap();
        grid.tile_mut(centre).elevation = 0.9;

        let landmasses = classify(&mut grid);
        assert_eq!(landmasses.len(), 1);
        assert_eq!(landmasses[0].tiles, vec![centre]);
        assert_eq!(grid.count_water(WaterType::Ocean), 99);
        assert_eq!(grid.tile(centre).water, WaterType::Land);
        // No land neighbor, so not coast
        assert!(!grid.tile(centre).is_coast);
    }

    #[test]
    fn test_enclosed_basin_becomes_lake() {
        let mut grid = grid_from(&[
            ".......",
            ".#####.",
            ".#...#.",
            ".#####.",
            ".......",
        ]);
        let landmasses = classify(&mut grid);
        assert_eq!(landmasses.len(), 1);
        assert_eq!(landmasses[0].lake_tiles, 3);
        assert_eq!(landmasses[0].land_tiles, 12);
        let lake = grid.index_of(3, 2).unwrap();
        assert_eq!(grid.tile(lake).water, WaterType::Lake);
        assert_eq!(grid.tile(lake).landmass, Some(LandmassId(0)));
    }

    #[test]
    fn test_ocean_fill_is_idempotent() {
        let mut grid = grid_from(&[
            "..##....",
            ".####...",
            "..#..#..",
            "........",
        ]);
        assign_ocean(&mut grid, SEA);
        let first: Vec<WaterType> = grid.tiles().iter().map(|t| t.water).collect();
        assert_eq!(assign_ocean(&mut grid, SEA), 0);
        let second: Vec<WaterType> = grid.tiles().iter().map(|t| t.water).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_landmasses_partition_non_ocean_tiles() {
        let mut grid = grid_from(&[
            "##....##",
            "#..##..#",
            "...##...",
            "#......#",
        ]);
        let landmasses = classify(&mut grid);
        assert_eq!(landmasses.len(), 5);

        let mut seen = HashSet::new();
        for landmass in &landmasses {
            for &idx in &landmass.tiles {
                assert!(seen.insert(idx), "tile {} in two landmasses", idx);
                assert_eq!(grid.tile(idx).landmass, Some(landmass.id));
            }
        }
        let ocean = grid.count_water(WaterType::Ocean);
        assert_eq!(seen.len() + ocean, grid.len());
    }

    #[test]
    fn test_coast_needs_ocean_and_land_neighbors() {
        let mut grid = grid_from(&[
            "......",
            ".###..",
            ".###..",
            ".###..",
            "......",
        ]);
        classify(&mut grid);
        let coast = |x, y| grid.get(x, y).unwrap().is_coast;
        assert!(coast(1, 1));
        assert!(coast(2, 1));
        assert!(coast(3, 2));
        // Interior tile touches no ocean
        assert!(!coast(2, 2));
        // Ocean tiles are never coast
        assert!(!coast(0, 0));
    }
}
