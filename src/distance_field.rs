//! Seam placement and the seam distance field
//!
//! Seams are open polylines laid across the map by bounded random walks. The
//! squared distance from each tile to the nearest seam vertex becomes a
//! large-scale elevation modifier: tiles far from every seam rise, tiles on a
//! seam sink, which carves the noise into continent-like shapes.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{RandomWalkParams, WorldParams};

/// Attempts at drawing an in-bounds step before clamping the last candidate.
const MAX_STEP_ATTEMPTS: usize = 64;
/// Edge seams place roughly this many vertices along each edge.
const EDGE_SEAM_VERTICES: usize = 20;
/// Clamped vertices stay this far inside the far map edges.
const CLAMP_MARGIN: f64 = 1e-6;

/// One open polyline in world units (tile coordinate × tile size).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Seam {
    pub points: Vec<[f64; 2]>,
}

impl Seam {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// World-space bounds of the map: `[0, width) × [0, height)` in world units.
#[derive(Clone, Copy, Debug)]
struct Bounds {
    width: f64,
    height: f64,
}

impl Bounds {
    fn contains(&self, p: [f64; 2]) -> bool {
        p[0] >= 0.0 && p[0] < self.width && p[1] >= 0.0 && p[1] < self.height
    }

    fn clamp(&self, p: [f64; 2]) -> [f64; 2] {
        let max_x = (self.width - CLAMP_MARGIN).max(0.0);
        let max_y = (self.height - CLAMP_MARGIN).max(0.0);
        [p[0].clamp(0.0, max_x), p[1].clamp(0.0, max_y)]
    }
}

// =============================================================================
// SEAM GENERATION
// =============================================================================

/// Lay out all seams for a world.
pub fn generate_seams(params: &WorldParams, seed: u64) -> Vec<Seam> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let walk = &params.random_walk;
    let ts = params.tile_size;
    let bounds = Bounds {
        width: params.width as f64 * ts,
        height: params.height as f64 * ts,
    };
    let max_step = walk.max_step_fraction * params.height as f64 * ts;

    let mut seams = Vec::new();

    if walk.sides {
        let stride = (params.height / EDGE_SEAM_VERTICES).max(1);
        let rows: Vec<f64> = (0..params.height).step_by(stride).map(|y| y as f64 * ts).collect();
        seams.push(Seam {
            points: rows.iter().map(|&y| [0.0, y]).collect(),
        });
        seams.push(Seam {
            points: rows.iter().map(|&y| [bounds.width, y]).collect(),
        });
    }

    if walk.top_bottom {
        let stride = (params.width / EDGE_SEAM_VERTICES).max(1);
        let cols: Vec<f64> = (0..params.width).step_by(stride).map(|x| x as f64 * ts).collect();
        seams.push(Seam {
            points: cols.iter().map(|&x| [x, 0.0]).collect(),
        });
        seams.push(Seam {
            points: cols.iter().map(|&x| [x, bounds.height]).collect(),
        });
    }

    for _ in 0..walk.mid_walks {
        let x = central_coordinate(&mut rng, params.width) as f64 * ts;
        let y = central_coordinate(&mut rng, params.height) as f64 * ts;
        seams.push(random_walk(&mut rng, [x, y], walk, max_step, bounds));
    }

    for _ in 0..walk.edge_walks {
        let start = edge_point(&mut rng, params, bounds);
        seams.push(random_walk(&mut rng, start, walk, max_step, bounds));
    }

    seams
}

/// Random tile coordinate within the central 80% of `extent` tiles.
fn central_coordinate(rng: &mut ChaCha8Rng, extent: usize) -> usize {
    let span = (extent as f64 * 0.8).round() as usize;
    let margin = (extent as f64 * 0.1).round() as usize;
    let offset = if span > 0 { rng.gen_range(0..span) } else { 0 };
    offset + margin
}

/// Random point on one of the four map edges.
fn edge_point(rng: &mut ChaCha8Rng, params: &WorldParams, bounds: Bounds) -> [f64; 2] {
    let ts = params.tile_size;
    let side = rng.gen_range(0..4);
    let x = rng.gen_range(0..params.width) as f64 * ts;
    let y = rng.gen_range(0..params.height) as f64 * ts;
    match side {
        0 => [x, 0.0],
        1 => [bounds.width, y],
        2 => [x, bounds.height],
        _ => [0.0, y],
    }
}

fn random_walk(
    rng: &mut ChaCha8Rng,
    start: [f64; 2],
    walk: &RandomWalkParams,
    max_step: f64,
    bounds: Bounds,
) -> Seam {
    let mut points = Vec::with_capacity(walk.steps + 1);
    points.push(start);
    let mut current = start;

    for _ in 0..walk.steps {
        let mut candidate = current;
        for _ in 0..MAX_STEP_ATTEMPTS {
            let length = rng.gen::<f64>() * max_step;
            let angle = rng.gen_range(0.0..TAU);
            candidate = [
                current[0] + angle.cos() * length,
                current[1] + angle.sin() * length,
            ];
            if bounds.contains(candidate) {
                break;
            }
        }
        if !bounds.contains(candidate) {
            candidate = bounds.clamp(candidate);
        }
        points.push(candidate);
        current = candidate;
    }

    Seam { points }
}

// =============================================================================
// DISTANCE FIELD
// =============================================================================

/// Squared world-space distance from every tile to its nearest seam vertex,
/// in row-major tile order. All zeros when there are no seam vertices.
pub fn compute_distance_field(
    width: usize,
    height: usize,
    tile_size: f64,
    seams: &[Seam],
) -> Vec<f64> {
    let vertices: Vec<[f64; 2]> = seams.iter().flat_map(|s| s.points.iter().copied()).collect();
    if vertices.is_empty() {
        return vec![0.0; width * height];
    }

    (0..width * height)
        .into_par_iter()
        .map(|idx| {
            let px = (idx % width) as f64 * tile_size;
            let py = (idx / width) as f64 * tile_size;
            vertices
                .iter()
                .map(|v| {
                    let dx = v[0] - px;
                    let dy = v[1] - py;
                    dx * dx + dy * dy
                })
                .fold(f64::INFINITY, f64::min)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> WorldParams {
        WorldParams {
            width: 40,
            height: 20,
            ..Default::default()
        }
    }

    #[test]
    fn test_seam_counts() {
        let params = small_params();
        let seams = generate_seams(&params, 9);
        let walk = &params.random_walk;
        assert_eq!(seams.len(), 2 + walk.mid_walks + walk.edge_walks);
        for seam in &seams[2..] {
            assert_eq!(seam.len(), walk.steps + 1);
        }
    }

    #[test]
    fn test_walk_vertices_stay_in_bounds() {
        let params = small_params();
        let w = params.width as f64 * params.tile_size;
        let h = params.height as f64 * params.tile_size;
        for seam in &generate_seams(&params, 3)[2..] {
            // Edge walks may start exactly on the far edge; steps never leave the map
            for p in &seam.points[1..] {
                assert!(p[0] >= 0.0 && p[0] < w, "x out of bounds: {:?}", p);
                assert!(p[1] >= 0.0 && p[1] < h, "y out of bounds: {:?}", p);
            }
        }
    }

    #[test]
    fn test_seams_are_deterministic() {
        let params = small_params();
        assert_eq!(generate_seams(&params, 77), generate_seams(&params, 77));
        assert_ne!(generate_seams(&params, 77), generate_seams(&params, 78));
    }

    #[test]
    fn test_side_seams_touch_left_and_right_edges() {
        let mut params = small_params();
        params.random_walk.mid_walks = 0;
        params.random_walk.edge_walks = 0;
        let seams = generate_seams(&params, 0);
        assert_eq!(seams.len(), 2);
        assert!(seams[0].points.iter().all(|p| p[0] == 0.0));
        let right = params.width as f64 * params.tile_size;
        assert!(seams[1].points.iter().all(|p| p[0] == right));

        let field = compute_distance_field(params.width, params.height, params.tile_size, &seams);
        assert_eq!(field[0], 0.0);
        let centre = (params.height / 2) * params.width + params.width / 2;
        assert!(field[centre] > field[params.width * 2 + 1]);
    }

    #[test]
    fn test_no_seams_gives_flat_field() {
        let field = compute_distance_field(4, 3, 32.0, &[]);
        assert_eq!(field, vec![0.0; 12]);
    }

    #[test]
    fn test_distance_is_squared_to_nearest_vertex() {
        let seams = vec![Seam {
            points: vec![[0.0, 0.0], [64.0, 0.0]],
        }];
        let field = compute_distance_field(3, 2, 32.0, &seams);
        // tile (1, 1) sits at (32, 32): nearest vertex is either, 32² + 32²
        assert_eq!(field[4], 2048.0);
        assert_eq!(field[2], 0.0);
    }
}
