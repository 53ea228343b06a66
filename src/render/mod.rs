//! Raster buffer and compositing for abstrakt.
//!
//! Everything the generators and the combiner draw ends up in a
//! [`Canvas`]; blending, smoothing and shape rasterization all operate on it.

mod blend;
mod blur;
mod canvas;
mod png;
mod raster;

pub use blend::{
    blend, blend_multiply, blend_over, blend_overlay, blend_screen, over, BlendMode,
};
pub use blur::gaussian_smooth;
pub use canvas::{Canvas, Rect};
pub use png::{read_image, write_png};
pub use raster::{fill_circle, fill_polygon};
