//! Fluid overlay for the expressionist style.
//!
//! Three interfering sine/cosine waves over `[0, 4π]²` plus a little noise
//! turbulence. The field is min–max normalized and each pixel takes the
//! nearest palette entry, giving banded, marbled colour.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, PI};

use rayon::prelude::*;

use crate::error::Result;
use crate::render::Canvas;
use crate::types::Palette;

use super::biomorph::min_max;
use super::noise::{NoiseField, NoiseParams};

/// Opacity the overlay is composited with.
pub const FLUID_OPACITY: f32 = 0.3;

/// Weight of the noise turbulence added to the waves.
const TURBULENCE: f32 = 0.3;

/// Wave interference at `(x, y)` in wave space.
pub fn waves(x: f32, y: f32) -> f32 {
    x.sin() * y.cos()
        + 0.5 * (2.0 * x + FRAC_PI_3).sin() * (1.5 * y).cos()
        + 0.3 * (0.5 * x).sin() * (3.0 * y + FRAC_PI_2).cos()
}

/// Raw fluid field, row-major, before normalization.
pub fn fluid_field(noise: &NoiseField, width: u32, height: u32) -> Vec<f32> {
    let w = width as usize;
    if w == 0 {
        return Vec::new();
    }
    let span = |n: u32| if n > 1 { 4.0 * PI / (n - 1) as f32 } else { 0.0 };
    let (sx, sy) = (span(width), span(height));
    let params = NoiseParams::new(50.0, 6, 0.5);

    let mut field = vec![0.0f32; w * height as usize];
    field.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        let wy = y as f32 * sy;
        for (x, v) in row.iter_mut().enumerate() {
            let turbulence = noise.sample_pixel(x as f32, y as f32, &params);
            *v = waves(x as f32 * sx, wy) + TURBULENCE * turbulence;
        }
    });
    field
}

/// Opaque overlay canvas: the normalized fluid field through
/// `palette.nearest`.
pub fn fluid_overlay(noise: &NoiseField, palette: &Palette, width: u32, height: u32) -> Result<Canvas> {
    let mut canvas = Canvas::new(width, height)?;
    let field = fluid_field(noise, width, height);
    let (lo, hi) = min_max(&field);
    let span = hi - lo;

    canvas
        .pixels_mut()
        .par_iter_mut()
        .zip(field.par_iter())
        .for_each(|(px, v)| {
            let t = if span > 0.0 { (v - lo) / span } else { 0.0 };
            *px = palette.nearest(t);
        });
    Ok(canvas)
}
