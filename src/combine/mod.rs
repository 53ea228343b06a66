//! Combining finished images into composites.
//!
//! A [`CompositionSpec`] is validated once by [`Combiner::new`]; after that
//! [`Combiner::combine`] only checks the inputs it is handed and dispatches
//! to the layout.

pub mod layout;

use crate::error::{AbstraktError, Result};
use crate::render::{gaussian_smooth, BlendMode, Canvas};
use crate::synth::{SeedStream, MAX_SIZE};
use crate::types::Colour;

pub use layout::{
    grid_plan, mosaic_tiles, CompositionType, GridPlan, SplitMode, TilePolicy, DEFAULT_SPACING,
};

/// Default mosaic tile side, in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 50;

/// Default layered opacity.
pub const DEFAULT_OPACITY: f32 = 0.5;

/// Parameters of one combine run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionSpec {
    pub kind: CompositionType,
    pub blend: BlendMode,
    pub opacity: f32,

    pub split: SplitMode,
    /// Split region count; defaults per split mode.
    pub regions: Option<u32>,

    pub columns: Option<u32>,
    pub spacing: u32,
    /// Grid cell size; defaults to the smallest input dimensions.
    pub cell_size: Option<(u32, u32)>,

    pub tile_size: u32,
    pub tile_policy: TilePolicy,

    /// Output size for layered, split and mosaic; defaults to the first input.
    pub size: Option<(u32, u32)>,

    /// Fill behind grid cells.
    pub background: Colour,

    /// Gaussian radius applied to the finished composite; 0 disables.
    pub smooth: f32,

    pub seed: Option<u64>,
}

impl CompositionSpec {
    pub fn new(kind: CompositionType) -> Self {
        Self {
            kind,
            blend: BlendMode::Normal,
            opacity: DEFAULT_OPACITY,
            split: SplitMode::default(),
            regions: None,
            columns: None,
            spacing: DEFAULT_SPACING,
            cell_size: None,
            tile_size: DEFAULT_TILE_SIZE,
            tile_policy: TilePolicy::Sequential,
            size: None,
            background: Colour::WHITE,
            smooth: 0.0,
            seed: None,
        }
    }

    /// Reject parameters that can never produce an image.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(AbstraktError::config(
                format!("opacity must be between 0 and 1, got {}", self.opacity),
                None,
            ));
        }

        if !self.smooth.is_finite() || self.smooth < 0.0 {
            return Err(AbstraktError::config(
                format!("smoothing radius must be non-negative, got {}", self.smooth),
                None,
            ));
        }

        for (width, height) in [self.size, self.cell_size].into_iter().flatten() {
            if width == 0 || height == 0 || width > MAX_SIZE || height > MAX_SIZE {
                return Err(AbstraktError::InvalidDimensions { width, height });
            }
        }

        if self.columns == Some(0) {
            return Err(AbstraktError::config("grid columns must be positive", None));
        }
        if self.regions == Some(0) {
            return Err(AbstraktError::config("split regions must be positive", None));
        }

        if self.kind == CompositionType::Mosaic {
            let (width, height) = self.size.unwrap_or((0, 0));
            let too_big = self.size.is_some() && self.tile_size > width.min(height);
            if self.tile_size == 0 || too_big {
                return Err(AbstraktError::InvalidTileSize {
                    tile_size: self.tile_size,
                    width,
                    height,
                });
            }
        }

        Ok(())
    }
}

/// Validated combiner, ready to run.
#[derive(Debug, Clone)]
pub struct Combiner {
    spec: CompositionSpec,
    seed: u64,
}

impl Combiner {
    /// Validate `spec` and resolve its seed.
    pub fn new(spec: CompositionSpec) -> Result<Self> {
        spec.validate()?;
        let seed = SeedStream::new(spec.seed).seed();
        Ok(Self { spec, seed })
    }

    pub fn spec(&self) -> &CompositionSpec {
        &self.spec
    }

    /// Seed used by the random tile policy.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Combine `images` in order.
    pub fn combine(&self, images: &[Canvas]) -> Result<Canvas> {
        let spec = &self.spec;
        let required = spec.kind.min_inputs();
        if images.len() < required {
            return Err(AbstraktError::InsufficientInputs {
                kind: spec.kind.name().to_string(),
                required,
                found: images.len(),
            });
        }

        let size = spec.size.unwrap_or_else(|| images[0].size());
        let mut canvas = match spec.kind {
            CompositionType::Grid => {
                let sizes: Vec<_> = images.iter().map(Canvas::size).collect();
                let plan = grid_plan(&sizes, spec.columns, spec.spacing, spec.cell_size)?;
                layout::grid(images, &plan, spec.background)?
            }
            CompositionType::Layered => {
                layout::layered(images, spec.size, spec.blend, spec.opacity)?
            }
            CompositionType::Split => {
                let regions = spec
                    .regions
                    .unwrap_or_else(|| spec.split.default_regions(images.len()));
                layout::split(images, size, spec.split, regions)?
            }
            CompositionType::Mosaic => {
                let mut rng = SeedStream::new(Some(self.seed));
                layout::mosaic(images, size, spec.tile_size, spec.tile_policy, &mut rng)?
            }
        };

        gaussian_smooth(&mut canvas, spec.smooth);
        Ok(canvas)
    }
}
