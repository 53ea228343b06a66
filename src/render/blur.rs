//! Separable Gaussian smoothing.
//!
//! Two 1D passes (horizontal then vertical) with an edge-clamped kernel of
//! half-width `ceil(3σ)`. Colour channels are weighted by alpha during the
//! passes so transparent pixels do not bleed black into soft edges.
//! Rows are independent within a pass and run on the rayon pool.

use rayon::prelude::*;

use crate::types::Colour;

use super::Canvas;

/// Smooth `canvas` in place with a Gaussian of standard deviation `radius`.
///
/// A non-positive or non-finite radius leaves the canvas untouched.
pub fn gaussian_smooth(canvas: &mut Canvas, radius: f32) {
    if !radius.is_finite() || radius <= 0.0 {
        return;
    }
    let kernel = gaussian_kernel(radius);
    let width = canvas.width() as usize;
    let height = canvas.height() as usize;

    let premul: Vec<[f32; 4]> = canvas.pixels().iter().map(|c| premultiply(*c)).collect();

    let mut tmp = vec![[0.0f32; 4]; premul.len()];
    tmp.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| horizontal_row(&premul, row, y, width, &kernel));

    canvas
        .pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| vertical_row(&tmp, row, y, width, height, &kernel));
}

/// Normalized Gaussian weights for offsets `-r..=r`.
fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let r = (3.0 * sigma).ceil().max(1.0) as i32;
    let denom = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (-r..=r)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

fn horizontal_row(src: &[[f32; 4]], out: &mut [[f32; 4]], y: usize, width: usize, k: &[f32]) {
    let radius = (k.len() / 2) as i64;
    let row = &src[y * width..(y + 1) * width];
    for (x, slot) in out.iter_mut().enumerate() {
        let mut acc = [0.0f32; 4];
        for (ki, &kw) in k.iter().enumerate() {
            let sx = (x as i64 + ki as i64 - radius).clamp(0, width as i64 - 1) as usize;
            for c in 0..4 {
                acc[c] += kw * row[sx][c];
            }
        }
        *slot = acc;
    }
}

fn vertical_row(
    src: &[[f32; 4]],
    out: &mut [Colour],
    y: usize,
    width: usize,
    height: usize,
    k: &[f32],
) {
    let radius = (k.len() / 2) as i64;
    for (x, slot) in out.iter_mut().enumerate() {
        let mut acc = [0.0f32; 4];
        for (ki, &kw) in k.iter().enumerate() {
            let sy = (y as i64 + ki as i64 - radius).clamp(0, height as i64 - 1) as usize;
            let px = src[sy * width + x];
            for c in 0..4 {
                acc[c] += kw * px[c];
            }
        }
        *slot = unpremultiply(acc);
    }
}

fn premultiply(c: Colour) -> [f32; 4] {
    [c.r * c.a, c.g * c.a, c.b * c.a, c.a]
}

fn unpremultiply(p: [f32; 4]) -> Colour {
    if p[3] <= 1e-6 {
        return Colour::TRANSPARENT;
    }
    Colour::new(p[0] / p[3], p[1] / p[3], p[2] / p[3], p[3])
}
