//! Spatial layouts for combining images.
//!
//! Each layout takes the ordered source images and produces one canvas:
//!
//! - grid: cells in row-major order, separated by background-coloured gaps
//! - layered: sources stacked with a blend mode
//! - split: the canvas partitioned into regions, one source per region
//! - mosaic: fixed-size tiles, each showing part of one source

use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;

use crate::error::{AbstraktError, Result};
use crate::render::{blend, BlendMode, Canvas, Rect};
use crate::synth::{SeedStream, MAX_SIZE};
use crate::types::Colour;

/// Default gap between grid cells, in pixels.
pub const DEFAULT_SPACING: u32 = 10;

/// How source images are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompositionType {
    #[default]
    Grid,
    Layered,
    Split,
    Mosaic,
}

impl CompositionType {
    pub const ALL: [CompositionType; 4] = [
        CompositionType::Grid,
        CompositionType::Layered,
        CompositionType::Split,
        CompositionType::Mosaic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CompositionType::Grid => "grid",
            CompositionType::Layered => "layered",
            CompositionType::Split => "split",
            CompositionType::Mosaic => "mosaic",
        }
    }

    /// Fewest source images this layout accepts.
    pub fn min_inputs(self) -> usize {
        match self {
            CompositionType::Mosaic => 1,
            _ => 2,
        }
    }
}

impl FromStr for CompositionType {
    type Err = AbstraktError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(CompositionType::Grid),
            "layered" => Ok(CompositionType::Layered),
            "split" => Ok(CompositionType::Split),
            "mosaic" => Ok(CompositionType::Mosaic),
            _ => Err(AbstraktError::InvalidCompositionType {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CompositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the canvas is partitioned for a split composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SplitMode {
    /// Horizontal strips, stacked top to bottom.
    Horizontal,
    /// Vertical strips, left to right.
    #[default]
    Vertical,
    /// Bands parallel to the top-left to bottom-right diagonal.
    Diagonal,
    /// Equal pie slices around the centre, counter-clockwise in image
    /// coordinates from the +x axis.
    Radial,
}

impl SplitMode {
    pub const ALL: [SplitMode; 4] = [
        SplitMode::Horizontal,
        SplitMode::Vertical,
        SplitMode::Diagonal,
        SplitMode::Radial,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SplitMode::Horizontal => "horizontal",
            SplitMode::Vertical => "vertical",
            SplitMode::Diagonal => "diagonal",
            SplitMode::Radial => "radial",
        }
    }

    /// Region count when none is configured.
    pub fn default_regions(self, sources: usize) -> u32 {
        match self {
            SplitMode::Diagonal => 2,
            _ => sources.max(1) as u32,
        }
    }

    /// Region index in `[0, regions)` of pixel `(x, y)` on a
    /// `width × height` canvas. Pixels are classified by their centres.
    pub fn region_of(self, x: u32, y: u32, width: u32, height: u32, regions: u32) -> u32 {
        let n = regions.max(1);
        let px = (x as f32 + 0.5) / width as f32;
        let py = (y as f32 + 0.5) / height as f32;
        let fraction = match self {
            SplitMode::Horizontal => py,
            SplitMode::Vertical => px,
            SplitMode::Diagonal => (px - py + 1.0) / 2.0,
            SplitMode::Radial => {
                let dx = x as f32 + 0.5 - width as f32 / 2.0;
                let dy = y as f32 + 0.5 - height as f32 / 2.0;
                dy.atan2(dx).rem_euclid(TAU) / TAU
            }
        };
        ((fraction * n as f32) as u32).min(n - 1)
    }
}

impl FromStr for SplitMode {
    type Err = AbstraktError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(SplitMode::Horizontal),
            "vertical" => Ok(SplitMode::Vertical),
            "diagonal" => Ok(SplitMode::Diagonal),
            "radial" => Ok(SplitMode::Radial),
            _ => Err(AbstraktError::InvalidSplitMode {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which source fills each mosaic tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TilePolicy {
    /// Tile `i` uses source `i mod N`.
    #[default]
    Sequential,
    /// Each tile draws a source from the seeded stream.
    Random,
}

impl TilePolicy {
    pub fn name(self) -> &'static str {
        match self {
            TilePolicy::Sequential => "sequential",
            TilePolicy::Random => "random",
        }
    }
}

impl FromStr for TilePolicy {
    type Err = AbstraktError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(TilePolicy::Sequential),
            "random" => Ok(TilePolicy::Random),
            _ => Err(AbstraktError::InvalidTilePolicy {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Computed geometry of a grid composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPlan {
    pub columns: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub spacing: u32,
    pub width: u32,
    pub height: u32,

    /// One rectangle per source, row-major.
    pub cells: Vec<Rect>,
}

/// Plan a grid for sources of the given sizes.
///
/// Columns default to `ceil(sqrt(N))`; the cell size defaults to the
/// smallest source width and height.
pub fn grid_plan(
    sizes: &[(u32, u32)],
    columns: Option<u32>,
    spacing: u32,
    cell: Option<(u32, u32)>,
) -> Result<GridPlan> {
    let count = sizes.len() as u32;
    if count == 0 {
        return Err(AbstraktError::InsufficientInputs {
            kind: CompositionType::Grid.name().to_string(),
            required: CompositionType::Grid.min_inputs(),
            found: 0,
        });
    }

    let columns = match columns {
        Some(0) => {
            return Err(AbstraktError::config("grid columns must be positive", None));
        }
        Some(c) => c.min(count),
        None => (count as f64).sqrt().ceil() as u32,
    };
    let rows = count.div_ceil(columns);

    let (cell_width, cell_height) = match cell {
        Some(size) => size,
        None => (
            sizes.iter().map(|s| s.0).min().unwrap_or(0),
            sizes.iter().map(|s| s.1).min().unwrap_or(0),
        ),
    };
    if cell_width == 0 || cell_height == 0 {
        return Err(AbstraktError::InvalidDimensions {
            width: cell_width,
            height: cell_height,
        });
    }

    if cell_width > MAX_SIZE || cell_height > MAX_SIZE {
        return Err(AbstraktError::InvalidDimensions {
            width: cell_width,
            height: cell_height,
        });
    }

    // Computed in u64 so oversized plans are rejected instead of wrapping.
    let span = |cells: u32, cell: u32| {
        u64::from(cells) * u64::from(cell) + u64::from(spacing) * (u64::from(cells) + 1)
    };
    let (wide, high) = (span(columns, cell_width), span(rows, cell_height));
    if wide > u64::from(MAX_SIZE) || high > u64::from(MAX_SIZE) {
        return Err(AbstraktError::InvalidDimensions {
            width: u32::try_from(wide).unwrap_or(u32::MAX),
            height: u32::try_from(high).unwrap_or(u32::MAX),
        });
    }
    let (width, height) = (wide as u32, high as u32);

    let cells = (0..count)
        .map(|i| {
            let (col, row) = (i % columns, i / columns);
            Rect::new(
                spacing + col * (cell_width + spacing),
                spacing + row * (cell_height + spacing),
                cell_width,
                cell_height,
            )
        })
        .collect();

    Ok(GridPlan {
        columns,
        rows,
        cell_width,
        cell_height,
        spacing,
        width,
        height,
        cells,
    })
}

/// Place every source in its grid cell over a background fill.
pub fn grid(images: &[Canvas], plan: &GridPlan, background: Colour) -> Result<Canvas> {
    let mut canvas = Canvas::filled(plan.width, plan.height, background)?;
    for (image, cell) in images.iter().zip(&plan.cells) {
        let fitted = image.cover(cell.w, cell.h)?;
        canvas.paste(&fitted, *cell);
    }
    Ok(canvas)
}

/// Stack sources in order, blending each onto the result so far.
///
/// With `size`, every source is resized to it first; without, all sources
/// must already share one size.
pub fn layered(
    images: &[Canvas],
    size: Option<(u32, u32)>,
    mode: BlendMode,
    opacity: f32,
) -> Result<Canvas> {
    let Some(first) = images.first() else {
        return Err(AbstraktError::InsufficientInputs {
            kind: CompositionType::Layered.name().to_string(),
            required: CompositionType::Layered.min_inputs(),
            found: 0,
        });
    };

    let target = size.unwrap_or(first.size());
    if size.is_none() {
        if let Some(odd) = images.iter().find(|img| img.size() != target) {
            return Err(AbstraktError::DimensionMismatch {
                expected: target,
                found: odd.size(),
                help: Some("Pass --width and --height to resize all inputs".to_string()),
            });
        }
    }

    let mut canvas = first.resized(target.0, target.1)?;
    for image in &images[1..] {
        let layer = image.resized(target.0, target.1)?;
        blend(&mut canvas, &layer, mode, opacity)?;
    }
    Ok(canvas)
}

/// Fill each split region from one source, cycling through the sources.
pub fn split(images: &[Canvas], size: (u32, u32), mode: SplitMode, regions: u32) -> Result<Canvas> {
    if images.is_empty() {
        return Err(AbstraktError::InsufficientInputs {
            kind: CompositionType::Split.name().to_string(),
            required: CompositionType::Split.min_inputs(),
            found: 0,
        });
    }
    let (width, height) = size;
    let used = images.len().min(regions.max(1) as usize);
    let sources = images[..used]
        .iter()
        .map(|img| img.resized(width, height))
        .collect::<Result<Vec<_>>>()?;

    let mut canvas = Canvas::new(width, height)?;
    canvas
        .pixels_mut()
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            for (x, px) in row.iter_mut().enumerate() {
                let x = x as u32;
                let region = mode.region_of(x, y, width, height, regions) as usize;
                if let Some(c) = sources[region % used].get(x, y) {
                    *px = c;
                }
            }
        });
    Ok(canvas)
}

/// Row-major tiles covering `width × height`; the last row and column are
/// clipped to the canvas.
pub fn mosaic_tiles(width: u32, height: u32, tile: u32) -> Result<Vec<Rect>> {
    if tile == 0 || tile > width.min(height) {
        return Err(AbstraktError::InvalidTileSize {
            tile_size: tile,
            width,
            height,
        });
    }
    let mut tiles = Vec::with_capacity((width.div_ceil(tile) * height.div_ceil(tile)) as usize);
    for y in (0..height).step_by(tile as usize) {
        for x in (0..width).step_by(tile as usize) {
            tiles.push(Rect::new(x, y, tile.min(width - x), tile.min(height - y)));
        }
    }
    Ok(tiles)
}

/// Fill each tile with the matching part of one source, scaled to the tile.
pub fn mosaic(
    images: &[Canvas],
    size: (u32, u32),
    tile: u32,
    policy: TilePolicy,
    rng: &mut SeedStream,
) -> Result<Canvas> {
    if images.is_empty() {
        return Err(AbstraktError::InsufficientInputs {
            kind: CompositionType::Mosaic.name().to_string(),
            required: CompositionType::Mosaic.min_inputs(),
            found: 0,
        });
    }
    let (width, height) = size;
    let tiles = mosaic_tiles(width, height, tile)?;
    let mut canvas = Canvas::new(width, height)?;

    for (i, rect) in tiles.iter().enumerate() {
        let source = match policy {
            TilePolicy::Sequential => &images[i % images.len()],
            TilePolicy::Random => &images[rng.index(images.len())],
        };
        let region = source_region(*rect, size, source.size());
        let patch = source.cropped(region)?.resized(rect.w, rect.h)?;
        canvas.paste(&patch, *rect);
    }
    Ok(canvas)
}

/// The part of a `source`-sized image that corresponds to `rect` on a
/// `canvas`-sized output. Never empty.
fn source_region(rect: Rect, canvas: (u32, u32), source: (u32, u32)) -> Rect {
    let map = |v: u32, from: u32, to: u32| (v as u64 * to as u64 / from as u64) as u32;
    let x = map(rect.x, canvas.0, source.0).min(source.0 - 1);
    let y = map(rect.y, canvas.1, source.1).min(source.1 - 1);
    let right = map(rect.right(), canvas.0, source.0).clamp(x + 1, source.0);
    let bottom = map(rect.bottom(), canvas.1, source.1).clamp(y + 1, source.1);
    Rect::new(x, y, right - x, bottom - y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn solid(w: u32, h: u32, v: f32) -> Canvas {
        Canvas::filled(w, h, Colour::rgb(v, v, v)).unwrap()
    }

    #[test]
    fn test_grid_four_images_is_two_by_two() {
        let sizes = vec![(100, 80); 4];
        let plan = grid_plan(&sizes, None, DEFAULT_SPACING, None).unwrap();
        assert_eq!((plan.columns, plan.rows), (2, 2));
        assert_eq!(plan.width, 2 * 100 + 3 * DEFAULT_SPACING);
        assert_eq!(plan.height, 2 * 80 + 3 * DEFAULT_SPACING);
        for (i, a) in plan.cells.iter().enumerate() {
            for b in &plan.cells[i + 1..] {
                assert!(!a.intersects(b));
            }
        }
    }

    #[test]
    fn test_grid_defaults_and_overrides() {
        let sizes = [(120, 90), (100, 100), (300, 50)];
        let plan = grid_plan(&sizes, None, 4, None).unwrap();
        assert_eq!((plan.cell_width, plan.cell_height), (100, 50));
        assert_eq!((plan.columns, plan.rows), (2, 2));

        let plan = grid_plan(&sizes, Some(3), 0, Some((10, 20))).unwrap();
        assert_eq!((plan.width, plan.height), (30, 20));
        assert_eq!(plan.cells[2], Rect::new(20, 0, 10, 20));

        assert!(grid_plan(&sizes, Some(0), 4, None).is_err());
        assert!(grid_plan(&sizes, None, 4, Some((0, 5))).is_err());
    }

    #[test]
    fn test_grid_rejects_oversized_plans() {
        let sizes = [(10, 10); 4];
        assert!(matches!(
            grid_plan(&sizes, None, 2_000_000_000, None),
            Err(AbstraktError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            grid_plan(&sizes, None, 0, Some((MAX_SIZE + 1, 10))),
            Err(AbstraktError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            grid_plan(&sizes, Some(4), 0, Some((MAX_SIZE / 2, 10))),
            Err(AbstraktError::InvalidDimensions { .. })
        ));

        let plan = grid_plan(&sizes, Some(4), 0, Some((MAX_SIZE / 4, 10))).unwrap();
        assert_eq!(plan.width, MAX_SIZE);
    }

    #[test]
    fn test_grid_places_every_image_once() {
        let images: Vec<Canvas> = (0..4).map(|i| solid(20, 20, i as f32 / 4.0)).collect();
        let sizes: Vec<_> = images.iter().map(|i| i.size()).collect();
        let plan = grid_plan(&sizes, None, 2, None).unwrap();
        let out = grid(&images, &plan, Colour::WHITE).unwrap();

        assert_eq!(out.size(), (46, 46));
        assert_eq!(out.get(0, 0), Some(Colour::WHITE));
        for (i, cell) in plan.cells.iter().enumerate() {
            let c = out.get(cell.x + 5, cell.y + 5).unwrap();
            assert!((c.r - i as f32 / 4.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_layered_mismatch_without_size() {
        let images = vec![solid(10, 10, 0.2), solid(12, 10, 0.8)];
        assert!(matches!(
            layered(&images, None, BlendMode::Normal, 0.5),
            Err(AbstraktError::DimensionMismatch { .. })
        ));

        let out = layered(&images, Some((8, 8)), BlendMode::Normal, 0.5).unwrap();
        assert_eq!(out.size(), (8, 8));
    }

    #[test]
    fn test_layered_blends_in_order() {
        let images = vec![solid(4, 4, 0.0), solid(4, 4, 1.0)];
        let out = layered(&images, None, BlendMode::Normal, 0.5).unwrap();
        assert!((out.get(0, 0).unwrap().r - 0.5).abs() < 1e-6);

        let out = layered(&images, None, BlendMode::Screen, 1.0).unwrap();
        assert_eq!(out.get(1, 1).unwrap().r, 1.0);
    }

    #[test]
    fn test_radial_sectors_are_equal() {
        let (w, h) = (100, 100);
        let mut counts = [0usize; 4];
        for y in 0..h {
            for x in 0..w {
                counts[SplitMode::Radial.region_of(x, y, w, h, 4) as usize] += 1;
            }
        }
        assert_eq!(counts, [2500; 4]);
    }

    #[test]
    fn test_radial_sector_matches_angle() {
        let (w, h) = (90, 60);
        let mut counts = [0usize; 3];
        for y in 0..h {
            for x in 0..w {
                let dx = x as f32 + 0.5 - 45.0;
                let dy = y as f32 + 0.5 - 30.0;
                let angle = dy.atan2(dx).rem_euclid(TAU);
                let region = SplitMode::Radial.region_of(x, y, w, h, 3);
                assert_eq!(region, ((angle / TAU * 3.0) as u32).min(2));
                counts[region as usize] += 1;
            }
        }
        assert_eq!(counts.iter().sum::<usize>(), (w * h) as usize);
    }

    #[test]
    fn test_strip_and_diagonal_regions() {
        assert_eq!(SplitMode::Vertical.region_of(0, 5, 10, 10, 2), 0);
        assert_eq!(SplitMode::Vertical.region_of(9, 5, 10, 10, 2), 1);
        assert_eq!(SplitMode::Horizontal.region_of(5, 0, 10, 10, 2), 0);
        assert_eq!(SplitMode::Horizontal.region_of(5, 9, 10, 10, 2), 1);
        // Bottom-left below the diagonal, top-right above it.
        assert_eq!(SplitMode::Diagonal.region_of(0, 9, 10, 10, 2), 0);
        assert_eq!(SplitMode::Diagonal.region_of(9, 0, 10, 10, 2), 1);
        assert_eq!(SplitMode::Diagonal.default_regions(5), 2);
        assert_eq!(SplitMode::Radial.default_regions(5), 5);
    }

    #[test]
    fn test_split_cycles_sources() {
        let images = vec![solid(10, 10, 0.0), solid(10, 10, 1.0)];
        let out = split(&images, (30, 10), SplitMode::Vertical, 3).unwrap();
        assert!(out.get(5, 5).unwrap().r < 1e-4);
        assert!(out.get(15, 5).unwrap().r > 0.9999);
        assert!(out.get(25, 5).unwrap().r < 1e-4);
    }

    #[test]
    fn test_mosaic_tiles_cover_canvas() {
        let tiles = mosaic_tiles(1000, 1000, 100).unwrap();
        assert_eq!(tiles.len(), 100);
        let area: u64 = tiles.iter().map(|t| t.area()).sum();
        assert_eq!(area, 1_000_000);
        for (i, a) in tiles.iter().enumerate() {
            for b in &tiles[i + 1..] {
                assert!(!a.intersects(b));
            }
        }
    }

    #[test]
    fn test_mosaic_edge_tiles_are_clipped() {
        let tiles = mosaic_tiles(25, 10, 10).unwrap();
        assert_eq!(tiles.len(), 3);
        assert_eq!(tiles[2], Rect::new(20, 0, 5, 10));
        let area: u64 = tiles.iter().map(|t| t.area()).sum();
        assert_eq!(area, 250);
    }

    #[test]
    fn test_invalid_tile_sizes() {
        assert!(matches!(
            mosaic_tiles(100, 100, 0),
            Err(AbstraktError::InvalidTileSize { tile_size: 0, .. })
        ));
        assert!(matches!(
            mosaic_tiles(100, 50, 51),
            Err(AbstraktError::InvalidTileSize { tile_size: 51, .. })
        ));
        assert!(mosaic_tiles(100, 50, 50).is_ok());
    }

    #[test]
    fn test_mosaic_sequential_policy() {
        let images = vec![solid(8, 8, 0.0), solid(8, 8, 1.0)];
        let mut rng = SeedStream::new(Some(1));
        let out = mosaic(&images, (8, 4), 4, TilePolicy::Sequential, &mut rng).unwrap();
        assert!(out.get(1, 1).unwrap().r < 1e-4);
        assert!(out.get(6, 1).unwrap().r > 0.9999);
        assert!(out.pixels().iter().all(|c| c.a > 0.9999));
    }

    #[test]
    fn test_mosaic_random_policy_is_seeded() {
        let images = vec![solid(8, 8, 0.0), solid(8, 8, 0.5), solid(8, 8, 1.0)];
        let run = |seed| {
            let mut rng = SeedStream::new(Some(seed));
            mosaic(&images, (40, 40), 5, TilePolicy::Random, &mut rng).unwrap()
        };
        assert_eq!(run(3), run(3));
    }

    #[test]
    fn test_source_region_is_proportional() {
        let r = source_region(Rect::new(50, 0, 50, 25), (100, 50), (200, 100));
        assert_eq!(r, Rect::new(100, 0, 100, 50));
        // A tiny source still yields a non-empty region.
        let r = source_region(Rect::new(90, 40, 10, 10), (100, 50), (3, 2));
        assert!(r.w >= 1 && r.h >= 1);
        assert!(r.right() <= 3 && r.bottom() <= 2);
    }

    #[test]
    fn test_enum_parsing() {
        for kind in CompositionType::ALL {
            assert_eq!(kind.name().parse::<CompositionType>().unwrap(), kind);
        }
        for mode in SplitMode::ALL {
            assert_eq!(mode.to_string().parse::<SplitMode>().unwrap(), mode);
        }
        assert_eq!("Random".parse::<TilePolicy>().unwrap(), TilePolicy::Random);
        assert!(matches!(
            "spiral".parse::<SplitMode>(),
            Err(AbstraktError::InvalidSplitMode { .. })
        ));
        assert!(matches!(
            "collage".parse::<CompositionType>(),
            Err(AbstraktError::InvalidCompositionType { .. })
        ));
        assert!("shuffle".parse::<TilePolicy>().is_err());
    }
}
