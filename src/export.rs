use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::grid::{Tile, WaterType};
use crate::world::WorldMap;
use crate::zones::ZoneKind;

/// Layers that can be rendered to an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapLayer {
    Biome,
    Elevation,
    Shaded,
    ElevationZone,
    Water,
    Temperature,
    Rainfall,
    RainShadow,
    WindStrength,
}

impl MapLayer {
    pub fn name(&self) -> &'static str {
        match self {
            MapLayer::Biome => "biome",
            MapLayer::Elevation => "elevation",
            MapLayer::Shaded => "shaded",
            MapLayer::ElevationZone => "elevation_zone",
            MapLayer::Water => "water",
            MapLayer::Temperature => "temperature",
            MapLayer::Rainfall => "rainfall",
            MapLayer::RainShadow => "rain_shadow",
            MapLayer::WindStrength => "wind_strength",
        }
    }

    pub fn all() -> &'static [MapLayer] {
        &[
            MapLayer::Biome,
            MapLayer::Elevation,
            MapLayer::Shaded,
            MapLayer::ElevationZone,
            MapLayer::Water,
            MapLayer::Temperature,
            MapLayer::Rainfall,
            MapLayer::RainShadow,
            MapLayer::WindStrength,
        ]
    }

    pub fn from_name(name: &str) -> Option<MapLayer> {
        Self::all()
            .iter()
            .copied()
            .find(|l| l.name().eq_ignore_ascii_case(name))
    }
}

/// Spectral colormap (matplotlib style): dark blue -> cyan -> green -> yellow -> orange -> red
fn spectral_colormap(t: f64) -> [u8; 3] {
    let colors: [[f64; 3]; 11] = [
        [0.37, 0.31, 0.64],  // Dark blue/purple (low)
        [0.20, 0.53, 0.74],  // Blue
        [0.40, 0.76, 0.65],  // Teal
        [0.67, 0.87, 0.64],  // Light green
        [0.90, 0.96, 0.60],  // Yellow-green
        [1.00, 1.00, 0.75],  // Light yellow / white
        [1.00, 0.88, 0.55],  // Yellow
        [0.99, 0.68, 0.38],  // Light orange
        [0.96, 0.43, 0.26],  // Orange
        [0.84, 0.24, 0.31],  // Red
        [0.62, 0.00, 0.26],  // Dark red (high)
    ];

    let t_scaled = t.clamp(0.0, 1.0) * 10.0;
    let idx = (t_scaled as usize).min(9);
    let frac = t_scaled - idx as f64;

    let c1 = colors[idx];
    let c2 = colors[idx + 1];

    [
        ((c1[0] + (c2[0] - c1[0]) * frac) * 255.0) as u8,
        ((c1[1] + (c2[1] - c1[1]) * frac) * 255.0) as u8,
        ((c1[2] + (c2[2] - c1[2]) * frac) * 255.0) as u8,
    ]
}

fn lerp_color(a: [u8; 3], b: [u8; 3], t: f64) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    [
        (a[0] as f64 + (b[0] as f64 - a[0] as f64) * t) as u8,
        (a[1] as f64 + (b[1] as f64 - a[1] as f64) * t) as u8,
        (a[2] as f64 + (b[2] as f64 - a[2] as f64) * t) as u8,
    ]
}

fn gray(t: f64) -> [u8; 3] {
    let v = (t.clamp(0.0, 1.0) * 255.0) as u8;
    [v, v, v]
}

fn water_color(tile: &Tile) -> [u8; 3] {
    match tile.water {
        WaterType::Ocean => [30, 60, 140],
        WaterType::Lake => [70, 130, 200],
        WaterType::Unassigned => [255, 0, 255],
        WaterType::Land if tile.river_volume > 0 => {
            lerp_color([120, 180, 230], [20, 80, 200], (tile.river_volume as f64 / 8.0).min(1.0))
        }
        WaterType::Land if tile.is_coast => [220, 200, 140],
        WaterType::Land => [90, 140, 70],
    }
}

/// Lambert-shaded elevation, lit from the northwest.
fn shaded_color(world: &WorldMap, tile: &Tile) -> [u8; 3] {
    let at = |x: i64, y: i64| {
        world
            .grid
            .get(x, y)
            .map(|t| t.elevation)
            .unwrap_or(tile.elevation)
    };
    let (x, y) = (tile.x as i64, tile.y as i64);
    // Exaggerate relief so single-tile slopes show
    let dx = (at(x + 1, y) - at(x - 1, y)) * 8.0;
    let dy = (at(x, y + 1) - at(x, y - 1)) * 8.0;

    let len = (dx * dx + dy * dy + 1.0).sqrt();
    let normal = [-dx / len, -dy / len, 1.0 / len];
    let light = {
        let l = (1.0f64 + 1.0 + 4.0).sqrt();
        [-1.0 / l, -1.0 / l, 2.0 / l]
    };
    let diffuse = (normal[0] * light[0] + normal[1] * light[1] + normal[2] * light[2]).max(0.0);
    let ambient = 0.4;
    let shade = ambient + (1.0 - ambient) * diffuse;

    let base = world.biome_color(tile);
    [
        (base[0] as f64 * shade).clamp(0.0, 255.0) as u8,
        (base[1] as f64 * shade).clamp(0.0, 255.0) as u8,
        (base[2] as f64 * shade).clamp(0.0, 255.0) as u8,
    ]
}

/// Color of one tile in `layer`.
pub fn layer_color(world: &WorldMap, tile: &Tile, layer: MapLayer) -> [u8; 3] {
    let p = &world.params;
    match layer {
        MapLayer::Biome => world.biome_color(tile),
        MapLayer::Elevation => {
            let range = (p.max_elevation - p.min_elevation).max(f64::EPSILON);
            spectral_colormap((tile.elevation - p.min_elevation) / range)
        }
        MapLayer::Shaded => shaded_color(world, tile),
        MapLayer::ElevationZone => tile
            .elevation_zone
            .map(|id| world.zones().zone(ZoneKind::Elevation, id).color)
            .unwrap_or([0, 0, 0]),
        MapLayer::Water => water_color(tile),
        MapLayer::Temperature => lerp_color([40, 70, 200], [220, 50, 30], tile.temperature),
        MapLayer::Rainfall => lerp_color([210, 190, 140], [20, 90, 60], tile.rainfall),
        MapLayer::RainShadow => gray(1.0 - tile.rain_shadow),
        MapLayer::WindStrength => gray(tile.wind_strength),
    }
}

/// Render one layer at one pixel per tile.
pub fn render_layer(world: &WorldMap, layer: MapLayer) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(world.width() as u32, world.height() as u32);

    for tile in world.grid.tiles() {
        img.put_pixel(tile.x as u32, tile.y as u32, Rgb(layer_color(world, tile, layer)));
    }

    img
}

/// Export one layer as a PNG.
pub fn export_layer(world: &WorldMap, layer: MapLayer, path: &Path) -> Result<(), image::ImageError> {
    render_layer(world, layer).save(path)
}

/// Export every layer to `<dir>/<map name>_<layer>.png`.
pub fn export_all_layers(world: &WorldMap, dir: &Path) -> Result<Vec<std::path::PathBuf>, image::ImageError> {
    let mut written = Vec::with_capacity(MapLayer::all().len());
    for &layer in MapLayer::all() {
        let path = dir.join(format!("{}_{}.png", world.params.name, layer.name()));
        export_layer(world, layer, &path)?;
        tracing::debug!(target: "export", layer = layer.name(), path = %path.display(), "layer exported");
        written.push(path);
    }
    Ok(written)
}

/// All layers tiled into one image, 3 columns wide, separated by a 4px gutter.
pub fn render_combined_grid(world: &WorldMap) -> RgbImage {
    let tile_w = world.width() as u32;
    let tile_h = world.height() as u32;
    let gutter = 4u32;
    let cols = 3u32;
    let rows = (MapLayer::all().len() as u32).div_ceil(cols);

    let grid_w = tile_w * cols + gutter * (cols - 1);
    let grid_h = tile_h * rows + gutter * (rows - 1);
    let mut grid: RgbImage = ImageBuffer::from_pixel(grid_w, grid_h, Rgb([30, 30, 30]));

    for (idx, &layer) in MapLayer::all().iter().enumerate() {
        let col = (idx as u32) % cols;
        let row = (idx as u32) / cols;
        let offset_x = col * (tile_w + gutter);
        let offset_y = row * (tile_h + gutter);

        let tile = render_layer(world, layer);
        for (tx, ty, pixel) in tile.enumerate_pixels() {
            grid.put_pixel(offset_x + tx, offset_y + ty, *pixel);
        }
    }

    grid
}

pub fn export_combined_grid(world: &WorldMap, path: &Path) -> Result<(), image::ImageError> {
    render_combined_grid(world).save(path)
}
