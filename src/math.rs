//! Scalar helpers shared by the generation passes.

use crate::grid::Tile;

/// Map `x` from `[old_min, old_max]` onto `[new_min, new_max]`.
///
/// A zero-width source range is treated as an identity scale, so every value
/// lands on `new_min` shifted by its offset from `old_min` (which is zero).
pub fn rescale(old_min: f64, old_max: f64, new_min: f64, new_max: f64, x: f64) -> f64 {
    let span = old_max - old_min;
    if span.abs() <= f64::EPSILON {
        return new_min + (x - old_min);
    }
    (new_max - new_min) * (x - old_min) / span + new_min
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Quintic smoothstep on an already-normalized input.
pub fn smoothstep(n: f64) -> f64 {
    n * n * n * (n * (n * 6.0 - 15.0) + 10.0)
}

pub fn taxicab(a: (usize, usize), b: (usize, usize)) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// Smallest and largest value of an iterator, `None` when empty.
pub fn value_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Rescale one tile field onto `[new_min, new_max]` using the observed
/// min/max of that field across all tiles.
pub fn normalize_field(
    tiles: &mut [Tile],
    get: impl Fn(&Tile) -> f64,
    mut set: impl FnMut(&mut Tile, f64),
    new_min: f64,
    new_max: f64,
) {
    let Some((min, max)) = value_range(tiles.iter().map(&get)) else {
        return;
    };
    for tile in tiles.iter_mut() {
        let value = rescale(min, max, new_min, new_max, get(tile));
        set(tile, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rescale_endpoints() {
        assert_eq!(rescale(2.0, 4.0, 0.0, 1.0, 2.0), 0.0);
        assert_eq!(rescale(2.0, 4.0, 0.0, 1.0, 4.0), 1.0);
        assert!((rescale(2.0, 4.0, 0.1, 1.5, 3.0) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_rescale_zero_range_is_identity() {
        let v = rescale(0.3, 0.3, 5.0, 9.0, 0.3);
        assert_eq!(v, 5.0);
        assert!(v.is_finite());
    }

    #[test]
    fn test_smoothstep_fixed_points() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_taxicab() {
        assert_eq!(taxicab((0, 0), (3, 4)), 7);
        assert_eq!(taxicab((5, 1), (2, 3)), 5);
    }

    #[test]
    fn test_value_range() {
        assert_eq!(value_range(Vec::<f64>::new()), None);
        assert_eq!(value_range([3.0, -1.0, 2.0]), Some((-1.0, 3.0)));
    }
}
