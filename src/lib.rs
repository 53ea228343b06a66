//! abstrakt - Procedural abstract art generator and image combiner
//!
//! Generates expressionist (flow-guided brush strokes) and surrealist
//! (warped biomorphic shapes) images from a seed, and combines finished
//! images into grid, layered, split and mosaic composites.

pub mod cli;
pub mod combine;
pub mod config;
pub mod error;
pub mod output;
pub mod render;
pub mod synth;
pub mod types;

pub use combine::{Combiner, CompositionSpec, CompositionType, SplitMode, TilePolicy};
pub use config::{ProjectConfig, RunMetadata};
pub use error::{AbstraktError, Result};
pub use render::{read_image, write_png, BlendMode, Canvas, Rect};
pub use synth::{generate, Artwork, GenerateConfig, SeedStream};
pub use types::{Colour, Palette, Style};
