//! Surrealist organic shapes and the textured background beneath them.
//!
//! A biomorph is a closed contour whose radius is modulated by noise sampled
//! around a circle, which gives smooth, blob-like outlines that always
//! close on themselves. Shapes are filled with a solid colour or a linear
//! two-colour gradient and optionally softened before compositing.

use std::f32::consts::TAU;

use rayon::prelude::*;

use crate::error::Result;
use crate::render::{fill_polygon, gaussian_smooth, Canvas};
use crate::types::{Colour, Palette};

use super::flow::FlowField;
use super::noise::{NoiseField, NoiseParams};
use super::SeedStream;

/// Contour samples per shape.
pub const CONTOUR_SAMPLES: usize = 64;

/// Shapes drawn when no count is given.
pub const DEFAULT_SHAPES: usize = 8;

/// Smallest radius as a fraction of the base radius.
const MIN_RADIUS_FRACTION: f32 = 0.1;

/// How a biomorph is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Colour),
    /// Linear blend from `from` to `to` along `angle` (radians from +x).
    Gradient { from: Colour, to: Colour, angle: f32 },
}

/// One organic shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Biomorph {
    pub centre: (f32, f32),
    pub base_radius: f32,

    /// Radius at each of the evenly spaced angles on `[0, 2π)`.
    pub radii: Vec<f32>,

    pub fill: Fill,
    pub opacity: f32,
}

impl Biomorph {
    /// Contour vertices in pixel coordinates.
    pub fn contour(&self) -> Vec<(f32, f32)> {
        let n = self.radii.len() as f32;
        self.radii
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let theta = TAU * i as f32 / n;
                (
                    self.centre.0 + r * theta.cos(),
                    self.centre.1 + r * theta.sin(),
                )
            })
            .collect()
    }

    /// Largest contour radius.
    pub fn bounding_radius(&self) -> f32 {
        self.radii.iter().copied().fold(0.0, f32::max)
    }

    /// Fill colour at pixel position `(x, y)`.
    pub fn paint_at(&self, x: f32, y: f32) -> Colour {
        match self.fill {
            Fill::Solid(colour) => colour,
            Fill::Gradient { from, to, angle } => {
                let reach = self.bounding_radius().max(1.0);
                let along = (x - self.centre.0) * angle.cos() + (y - self.centre.1) * angle.sin();
                from.lerp(to, along / (2.0 * reach) + 0.5)
            }
        }
    }
}

/// Generates and draws biomorphs.
pub struct BiomorphRenderer<'a> {
    palette: &'a Palette,
    noise: &'a NoiseField,
    soften: f32,
}

impl<'a> BiomorphRenderer<'a> {
    pub fn new(palette: &'a Palette, noise: &'a NoiseField) -> Self {
        Self {
            palette,
            noise,
            soften: 0.0,
        }
    }

    /// Gaussian radius applied to each shape before compositing; 0 disables.
    pub fn soften(mut self, radius: f32) -> Self {
        self.soften = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        self
    }

    /// Draw a new shape for a `width × height` canvas.
    pub fn generate(&self, rng: &mut SeedStream, width: u32, height: u32) -> Biomorph {
        let (w, h) = (width as f32, height as f32);
        let cx = rng.range_f32(w / 4.0, 3.0 * w / 4.0);
        let cy = rng.range_f32(h / 4.0, 3.0 * h / 4.0);
        let base_radius = rng.range_f32(0.05, 0.2) * w.min(h);
        let amplitude = rng.range_f32(0.15, 0.45);
        let ox = rng.range_f32(0.0, 256.0);
        let oy = rng.range_f32(0.0, 256.0);
        let frequency = rng.range_f32(0.8, 2.0);

        let colour = self.palette.pick(rng);
        let fill = if rng.chance(0.5) {
            Fill::Gradient {
                from: colour,
                to: self.palette.pick(rng),
                angle: rng.angle(),
            }
        } else {
            Fill::Solid(colour)
        };
        let opacity = rng.range_f32(0.4, 0.78);

        let radii = (0..CONTOUR_SAMPLES)
            .map(|i| {
                let theta = TAU * i as f32 / CONTOUR_SAMPLES as f32;
                let n = self.noise.sample(
                    ox + frequency * theta.cos(),
                    oy + frequency * theta.sin(),
                    3,
                    0.5,
                );
                (base_radius * (1.0 + amplitude * n)).max(base_radius * MIN_RADIUS_FRACTION)
            })
            .collect();

        Biomorph {
            centre: (cx, cy),
            base_radius,
            radii,
            fill,
            opacity,
        }
    }

    /// Composite one shape over the canvas.
    pub fn render(&self, canvas: &mut Canvas, shape: &Biomorph) -> Result<()> {
        let contour = shape.contour();
        if self.soften <= 0.0 {
            fill_polygon(canvas, &contour, |x, y| shape.paint_at(x, y), shape.opacity);
            return Ok(());
        }

        // Soft shapes go through a padded layer so the blur has room to fade.
        let margin = (3.0 * self.soften).ceil() + 1.0;
        let reach = shape.bounding_radius() + margin;
        let x0 = (shape.centre.0 - reach).floor();
        let y0 = (shape.centre.1 - reach).floor();
        let side = (2.0 * reach).ceil().max(1.0) as u32 + 1;

        let mut layer = Canvas::new(side, side)?;
        let local: Vec<(f32, f32)> = contour.iter().map(|(x, y)| (x - x0, y - y0)).collect();
        fill_polygon(&mut layer, &local, |x, y| shape.paint_at(x + x0, y + y0), 1.0);
        gaussian_smooth(&mut layer, self.soften);
        canvas.composite_at(&layer, x0 as i64, y0 as i64, shape.opacity);
        Ok(())
    }

    /// Generate and draw `count` shapes in order.
    pub fn paint(&self, canvas: &mut Canvas, rng: &mut SeedStream, count: usize) -> Result<()> {
        let (width, height) = canvas.size();
        for _ in 0..count {
            let shape = self.generate(rng, width, height);
            self.render(canvas, &shape)?;
        }
        Ok(())
    }
}

/// Opaque background: noise min–max normalized over the canvas and mapped
/// through `palette.sample`.
pub fn noise_background(
    noise: &NoiseField,
    palette: &Palette,
    width: u32,
    height: u32,
    params: &NoiseParams,
) -> Result<Canvas> {
    let mut canvas = Canvas::new(width, height)?;
    let values = noise_values(noise, width, height, params);
    let (lo, hi) = min_max(&values);
    let span = hi - lo;

    canvas
        .pixels_mut()
        .par_iter_mut()
        .zip(values.par_iter())
        .for_each(|(px, v)| {
            let t = if span > 0.0 { (v - lo) / span } else { 0.0 };
            *px = palette.sample(t);
        });
    Ok(canvas)
}

/// Displace every pixel's lookup by `distortion · flow(x, y)`.
///
/// Samples bilinearly from the original, so the result never reads pixels
/// it has already moved. A zero distortion returns an identical copy.
pub fn flow_warp(canvas: &Canvas, flow: &FlowField<'_>, distortion: f32) -> Canvas {
    if !distortion.is_finite() || distortion == 0.0 {
        return canvas.clone();
    }
    let width = canvas.width() as usize;
    let mut out = canvas.clone();
    out.pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.iter_mut().enumerate() {
                let (dx, dy) = flow.sample(x as f32, y as f32);
                *px = canvas.sample_bilinear(x as f32 + distortion * dx, y as f32 + distortion * dy);
            }
        });
    out
}

/// Raw noise per pixel, row-major.
pub(crate) fn noise_values(
    noise: &NoiseField,
    width: u32,
    height: u32,
    params: &NoiseParams,
) -> Vec<f32> {
    let w = width as usize;
    if w == 0 {
        return Vec::new();
    }
    let mut values = vec![0.0f32; w * height as usize];
    values.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (x, v) in row.iter_mut().enumerate() {
            *v = noise.sample_pixel(x as f32, y as f32, params);
        }
    });
    values
}

pub(crate) fn min_max(values: &[f32]) -> (f32, f32) {
    values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
