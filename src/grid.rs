//! Tile arena and fixed neighbor linkage.
//!
//! Every generation pass reads and writes fields on [`Tile`]s owned by a
//! [`TileGrid`]. Neighbor links are storage indices computed once when the
//! grid is built.

use rayon::prelude::*;

use crate::biomes::BiomeId;
use crate::tilemap::{Direction, Tilemap};
use crate::water_bodies::LandmassId;
use crate::zones::ZoneId;

/// Water classification. Moves from `Unassigned` to one of the others once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum WaterType {
    #[default]
    Unassigned,
    Ocean,
    Lake,
    Land,
}

impl WaterType {
    pub fn display_name(&self) -> &'static str {
        match self {
            WaterType::Unassigned => "Unassigned",
            WaterType::Ocean => "Ocean",
            WaterType::Lake => "Lake",
            WaterType::Land => "Land",
        }
    }
}

/// All per-location generated attributes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tile {
    pub x: usize,
    pub y: usize,

    // Elevation
    /// Octave noise normalized to [0, 1]
    pub noise: f64,
    /// Seam distance modifier normalized to the modifier range
    pub distance_modifier: f64,
    pub elevation: f64,

    // Hydrology
    pub water: WaterType,
    pub is_coast: bool,
    pub landmass: Option<LandmassId>,
    /// Orthogonal step towards the lowest strictly-lower neighbor; `None` on a sink
    pub downslope: Option<Direction>,
    pub flows_to_sea: bool,
    pub river_volume: u32,
    pub is_river_source: bool,

    // Wind (bearings in radians clockwise from north)
    pub prevailing_wind_direction: f64,
    pub wind_noise: f64,
    pub wind_direction: f64,
    pub base_wind_strength: f64,
    pub continent_wind_strength: f64,
    pub wind_strength: f64,
    pub distance_to_coast: u32,

    // Climate
    pub temperature: f64,
    pub rain_shadow: f64,
    pub rainfall: f64,

    // Classification
    pub elevation_zone: Option<ZoneId>,
    pub temperature_zone: Option<ZoneId>,
    pub humidity_zone: Option<ZoneId>,
    pub biome: Option<BiomeId>,
}

impl Tile {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y, ..Default::default() }
    }

    pub fn coords(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn is_ocean(&self) -> bool {
        self.water == WaterType::Ocean
    }

    pub fn is_land(&self) -> bool {
        self.water == WaterType::Land
    }
}

/// Neighbor storage indices. Orthogonal slots follow [`Direction::CARDINAL`],
/// diagonal slots follow [`Direction::ORDINAL`]; off-map slots are `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub orthogonal: [Option<usize>; 4],
    pub diagonal: [Option<usize>; 4],
}

/// Owns every tile of the world map.
#[derive(Clone, Debug)]
pub struct TileGrid {
    tiles: Tilemap<Tile>,
    neighbors: Vec<Neighbors>,
}

impl TileGrid {
    /// Allocate `width × height` tiles and link their neighbors.
    pub fn new(width: usize, height: usize) -> Self {
        let tiles = Tilemap::from_fn(width, height, Tile::new);

        let neighbors = (0..tiles.len())
            .into_par_iter()
            .map(|idx| Neighbors {
                orthogonal: Direction::CARDINAL.map(|dir| tiles.step(idx, dir)),
                diagonal: Direction::ORDINAL.map(|dir| tiles.step(idx, dir)),
            })
            .collect();

        Self { tiles, neighbors }
    }

    pub fn width(&self) -> usize {
        self.tiles.width
    }

    pub fn height(&self) -> usize {
        self.tiles.height
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Storage index of `(x, y)`, `None` if outside the grid.
    pub fn index_of(&self, x: i64, y: i64) -> Option<usize> {
        self.tiles.checked_index(x, y)
    }

    /// Tile at `(x, y)`, `None` if outside the grid.
    pub fn get(&self, x: i64, y: i64) -> Option<&Tile> {
        self.tiles.get_checked(x, y)
    }

    pub fn get_mut(&mut self, x: i64, y: i64) -> Option<&mut Tile> {
        let idx = self.index_of(x, y)?;
        Some(&mut self.tiles.as_mut_slice()[idx])
    }

    pub fn tile(&self, index: usize) -> &Tile {
        &self.tiles.as_slice()[index]
    }

    pub fn tile_mut(&mut self, index: usize) -> &mut Tile {
        &mut self.tiles.as_mut_slice()[index]
    }

    pub fn tiles(&self) -> &[Tile] {
        self.tiles.as_slice()
    }

    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        self.tiles.as_mut_slice()
    }

    pub fn neighbors(&self, index: usize) -> &Neighbors {
        &self.neighbors[index]
    }

    /// In-grid orthogonal neighbors in N, E, S, W order.
    pub fn orthogonal(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbors[index].orthogonal.iter().flatten().copied()
    }

    /// In-grid diagonal neighbors in NE, SE, SW, NW order.
    pub fn diagonal(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbors[index].diagonal.iter().flatten().copied()
    }

    /// One step from `index` in `dir`, using the precomputed links.
    pub fn step(&self, index: usize, dir: Direction) -> Option<usize> {
        let links = &self.neighbors[index];
        match dir {
            Direction::North => links.orthogonal[0],
            Direction::East => links.orthogonal[1],
            Direction::South => links.orthogonal[2],
            Direction::West => links.orthogonal[3],
            Direction::NorthEast => links.diagonal[0],
            Direction::SouthEast => links.diagonal[1],
            Direction::SouthWest => links.diagonal[2],
            Direction::NorthWest => links.diagonal[3],
        }
    }

    pub fn is_border(&self, index: usize) -> bool {
        self.tiles.is_border(index)
    }

    /// Fractional latitude: 0 at the top row, approaching 1 at the bottom.
    pub fn latitude(&self, index: usize) -> f64 {
        self.tile(index).y as f64 / self.height() as f64
    }

    /// Base noise feature scale in tiles, derived from map height.
    pub fn feature_scale(&self, divisor: usize) -> f64 {
        (self.height() / divisor).max(1) as f64
    }

    pub fn count_water(&self, water: WaterType) -> usize {
        self.tiles().iter().filter(|t| t.water == water).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_and_interior_neighbor_counts() {
        let grid = TileGrid::new(6, 4);
        let corner = grid.index_of(0, 0).unwrap();
        assert_eq!(grid.orthogonal(corner).count(), 2);
        assert_eq!(grid.diagonal(corner).count(), 1);

        let edge = grid.index_of(3, 0).unwrap();
        assert_eq!(grid.orthogonal(edge).count(), 3);
        assert_eq!(grid.diagonal(edge).count(), 2);

        let interior = grid.index_of(2, 2).unwrap();
        assert_eq!(grid.orthogonal(interior).count(), 4);
        assert_eq!(grid.diagonal(interior).count(), 4);
    }

    #[test]
    fn test_neighbor_links_are_symmetric() {
        let grid = TileGrid::new(5, 7);
        for idx in 0..grid.len() {
            for n in grid.orthogonal(idx) {
                assert!(grid.orthogonal(n).any(|back| back == idx));
            }
            for n in grid.diagonal(idx) {
                assert!(grid.diagonal(n).any(|back| back == idx));
            }
        }
    }

    #[test]
    fn test_step_matches_coordinates() {
        let grid = TileGrid::new(4, 4);
        let idx = grid.index_of(1, 2).unwrap();
        let north = grid.step(idx, Direction::North).unwrap();
        assert_eq!(grid.tile(north).coords(), (1, 1));
        let sw = grid.step(idx, Direction::SouthWest).unwrap();
        assert_eq!(grid.tile(sw).coords(), (0, 3));
    }

    #[test]
    fn test_lookup_out_of_range_returns_none() {
        let grid = TileGrid::new(3, 3);
        assert!(grid.get(-1, 1).is_none());
        assert!(grid.get(3, 1).is_none());
        assert!(grid.get(1, 3).is_none());
        assert_eq!(grid.get(2, 1).map(|t| t.coords()), Some((2, 1)));
    }

    #[test]
    fn test_new_tiles_are_unassigned() {
        let grid = TileGrid::new(3, 2);
        assert!(grid.tiles().iter().all(|t| t.water == WaterType::Unassigned));
        assert!(grid.tiles().iter().all(|t| t.landmass.is_none()));
    }
}
