//! Gestural brush strokes.
//!
//! A stroke is a random walk whose heading drifts by a fixed curvature plus
//! jitter and is pulled towards the local [`FlowField`] direction. The path
//! is drawn as a chain of overlapping discs whose radius swells towards a
//! random peak and tapers at both ends.
//!
//! Draws per stroke, in order: start x, start y, heading, curvature,
//! length, step size, then one jitter and one step scale per step, then
//! base width, peak position, colour and opacity.

use std::f32::consts::PI;

use crate::render::{fill_circle, Canvas};
use crate::types::{Colour, Palette};

use super::flow::FlowField;
use super::SeedStream;

/// Fraction of each step's heading taken from the flow field.
pub const DEFAULT_FLOW_BLEND: f32 = 0.3;

/// Width of the Gaussian swell in the radius profile.
const PROFILE_SIGMA: f32 = 0.25;

/// Smallest distance between stamped discs, in pixels.
const MIN_SPACING: f32 = 0.75;

/// One brush stroke, ready to rasterize.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Path vertices in pixel coordinates, start first.
    pub points: Vec<(f32, f32)>,

    /// Disc radius at each vertex.
    pub radii: Vec<f32>,

    pub colour: Colour,
    pub opacity: f32,
}

impl Stroke {
    /// Total path length in pixels.
    pub fn length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|w| (w[1].0 - w[0].0).hypot(w[1].1 - w[0].1))
            .sum()
    }
}

/// Size factor for stroke geometry: `min(w, h) / 1024`, floored at 0.25.
///
/// The stroke ranges were tuned for a 1024px canvas.
pub fn size_factor(width: u32, height: u32) -> f32 {
    (width.min(height) as f32 / 1024.0).max(0.25)
}

/// Generates and draws strokes for one canvas.
pub struct StrokeRenderer<'a> {
    palette: &'a Palette,
    flow: &'a FlowField<'a>,
    flow_blend: f32,
}

impl<'a> StrokeRenderer<'a> {
    pub fn new(palette: &'a Palette, flow: &'a FlowField<'a>) -> Self {
        Self {
            palette,
            flow,
            flow_blend: DEFAULT_FLOW_BLEND,
        }
    }

    /// How strongly the flow field steers the walk, in `[0, 1]`.
    pub fn flow_blend(mut self, blend: f32) -> Self {
        if blend.is_finite() {
            self.flow_blend = blend.clamp(0.0, 1.0);
        }
        self
    }

    /// Draw a new stroke for a `width × height` canvas.
    pub fn generate(&self, rng: &mut SeedStream, width: u32, height: u32) -> Stroke {
        let (w, h) = (width as f32, height as f32);
        let k = size_factor(width, height);

        let mut x = rng.range_f32(0.0, w);
        let mut y = rng.range_f32(0.0, h);
        let mut heading = rng.angle();
        let curvature = rng.range_f32(-0.1, 0.1);
        let length = rng.range_f32(100.0, 400.0) * k;
        let step = rng.range_f32(5.0, 15.0) * k;

        let steps = (length / step).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(steps + 1);
        points.push((x, y));

        for _ in 0..steps {
            heading += curvature + rng.range_f32(-0.2, 0.2);
            let scale = rng.range_f32(0.75, 1.25);

            let (fx, fy) = self.flow.sample(x, y);
            let dx = (1.0 - self.flow_blend) * heading.cos() + self.flow_blend * fx;
            let dy = (1.0 - self.flow_blend) * heading.sin() + self.flow_blend * fy;
            if dx.hypot(dy) > 1e-6 {
                heading = dy.atan2(dx);
            }

            x = (x + heading.cos() * step * scale).clamp(0.0, w);
            y = (y + heading.sin() * step * scale).clamp(0.0, h);
            points.push((x, y));
        }

        let base_width = rng.range_f32(3.0, 20.0) * k;
        let peak = rng.range_f32(0.2, 0.8);
        let colour = self.palette.pick(rng);
        let opacity = rng.range_f32(0.6, 0.95);

        let last = (points.len() - 1) as f32;
        let radii = (0..points.len())
            .map(|i| radius_at(base_width, peak, i as f32 / last))
            .collect();

        Stroke {
            points,
            radii,
            colour,
            opacity,
        }
    }

    /// Generate and draw `count` strokes in order.
    pub fn paint(&self, canvas: &mut Canvas, rng: &mut SeedStream, count: usize) {
        let (width, height) = canvas.size();
        for _ in 0..count {
            let stroke = self.generate(rng, width, height);
            render_stroke(canvas, &stroke);
        }
    }
}

/// Radius at position `t ∈ [0, 1]` along a stroke.
///
/// A Gaussian swell centred on `peak`, tapered towards both ends by
/// `sin(πt)` (never below 20% of the swell).
pub fn radius_at(base_width: f32, peak: f32, t: f32) -> f32 {
    let d = t - peak;
    let swell = 0.3 + 0.7 * (-(d * d) / (2.0 * PROFILE_SIGMA * PROFILE_SIGMA)).exp();
    let taper = (PI * t).sin().max(0.2);
    0.5 * base_width * swell * taper
}

/// Rasterize a stroke by stamping discs along every segment.
///
/// Discs are spaced at half the local radius and composited over the canvas
/// in path order. Anything off the canvas is clipped.
pub fn render_stroke(canvas: &mut Canvas, stroke: &Stroke) {
    let n = stroke.points.len().min(stroke.radii.len());
    if n == 0 {
        return;
    }

    for i in 0..n.saturating_sub(1) {
        let (ax, ay) = stroke.points[i];
        let (bx, by) = stroke.points[i + 1];
        let (ra, rb) = (stroke.radii[i], stroke.radii[i + 1]);
        let seg = (bx - ax).hypot(by - ay);

        let mut d = 0.0;
        while d < seg {
            let t = d / seg;
            let r = ra + (rb - ra) * t;
            fill_circle(
                canvas,
                ax + (bx - ax) * t,
                ay + (by - ay) * t,
                r,
                stroke.colour,
                stroke.opacity,
            );
            d += (r * 0.5).max(MIN_SPACING);
        }
    }

    let (ex, ey) = stroke.points[n - 1];
    fill_circle(canvas, ex, ey, stroke.radii[n - 1], stroke.colour, stroke.opacity);
}
