//! Core domain types for abstrakt.
//!
//! - `Colour` - straight-alpha RGBA colour values
//! - `Palette` - ordered colour collections, one per `Style`

mod colour;
mod palette;

pub use colour::Colour;
pub(crate) use colour::clamp_unit;
pub use palette::{Palette, Style};
