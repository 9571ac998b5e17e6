/// A 2D tilemap grid stored row-major. Edges do not wrap.
#[derive(Clone, Debug)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T> Tilemap<T> {
    /// Build a tilemap by calling `f(x, y)` for every cell in storage order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { width, height, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Storage index for an in-range coordinate.
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    /// Storage index for a signed coordinate, `None` when outside the map.
    pub fn checked_index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Coordinate of a storage index.
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Lookup that rejects out-of-range coordinates instead of panicking.
    pub fn get_checked(&self, x: i64, y: i64) -> Option<&T> {
        self.checked_index(x, y).map(|idx| &self.data[idx])
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Step from `index` one tile in `dir`, `None` across the map edge.
    pub fn step(&self, index: usize, dir: Direction) -> Option<usize> {
        let (x, y) = self.coords(index);
        let (dx, dy) = dir.offset();
        self.checked_index(x as i64 + dx as i64, y as i64 + dy as i64)
    }

    /// True for cells on the outermost row or column.
    pub fn is_border(&self, index: usize) -> bool {
        let (x, y) = self.coords(index);
        x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            (idx % width, idx / width, val)
        })
    }
}

// =============================================================================
// COMPASS DIRECTIONS
// =============================================================================

/// The eight compass directions. North is towards `y = 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// N, E, S, W. Orthogonal neighbor order everywhere in the crate.
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// NE, SE, SW, NW.
    pub const ORDINAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// Clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Grid offset (dx, dy).
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    pub fn opposite(self) -> Direction {
        Direction::ALL[(self as usize + 4) % 8]
    }

    /// Snap a bearing (radians clockwise from north) to the nearest of the
    /// eight principal directions.
    pub fn from_bearing(bearing: f64) -> Direction {
        let segment = std::f64::consts::TAU / 8.0;
        let angle = bearing.rem_euclid(std::f64::consts::TAU);
        Direction::ALL[((angle + segment / 2.0) / segment) as usize % 8]
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::South => "S",
            Direction::SouthWest => "SW",
            Direction::West => "W",
            Direction::NorthWest => "NW",
        }
    }
}
