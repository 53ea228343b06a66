//! Procedural image synthesis.
//!
//! Noise, flow and the two shape families (strokes and biomorphs) are
//! building blocks; [`generate`] sequences them into a finished image for
//! each [`Style`](crate::types::Style).

pub mod biomorph;
pub mod effects;
pub mod flow;
pub mod fluid;
mod generate;
pub mod noise;
mod rng;
pub mod stroke;

pub use biomorph::{Biomorph, BiomorphRenderer, Fill};
pub use effects::Effect;
pub use flow::FlowField;
pub use generate::{generate, style_palette, Artwork, GenerateConfig, DEFAULT_SIZE, MAX_SIZE};
pub use noise::{NoiseField, NoiseParams};
pub use rng::SeedStream;
pub use stroke::{Stroke, StrokeRenderer};
