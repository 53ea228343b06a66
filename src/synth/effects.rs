//! Post-processing effects for the surrealist style.
//!
//! A run picks one to three effects (repeats allowed) and applies them in
//! order. Selection draws the count, then an effect index and its
//! parameter per effect.

use std::fmt;

use rayon::prelude::*;

use crate::render::{gaussian_smooth, Canvas};
use crate::types::{clamp_unit, Colour};

use super::SeedStream;

/// A single image effect with its drawn parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Gaussian blur with σ in `[1, 3]`.
    Blur { radius: f32 },
    /// HSL saturation scaled by a factor in `[0.5, 2]`.
    Saturation { factor: f32 },
    /// Distance from the mean luma scaled by a factor in `[0.7, 1.5]`.
    Contrast { factor: f32 },
    /// 3×3 sharpening of edges.
    EdgeEnhance,
}

impl Effect {
    /// Draw one effect and its parameter.
    pub fn choose(rng: &mut SeedStream) -> Effect {
        match rng.index(4) {
            0 => Effect::Blur {
                radius: rng.range_f32(1.0, 3.0),
            },
            1 => Effect::Saturation {
                factor: rng.range_f32(0.5, 2.0),
            },
            2 => Effect::Contrast {
                factor: rng.range_f32(0.7, 1.5),
            },
            _ => Effect::EdgeEnhance,
        }
    }

    pub fn apply(&self, canvas: &mut Canvas) {
        match *self {
            Effect::Blur { radius } => gaussian_smooth(canvas, radius),
            Effect::Saturation { factor } => saturate(canvas, factor),
            Effect::Contrast { factor } => contrast(canvas, factor),
            Effect::EdgeEnhance => edge_enhance(canvas),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Blur { radius } => write!(f, "blur({:.2})", radius),
            Effect::Saturation { factor } => write!(f, "saturation({:.2})", factor),
            Effect::Contrast { factor } => write!(f, "contrast({:.2})", factor),
            Effect::EdgeEnhance => f.write_str("edge-enhance"),
        }
    }
}

/// Draw the effect list for one run: 1–3 effects.
pub fn choose_effects(rng: &mut SeedStream) -> Vec<Effect> {
    let count = rng.range_usize(1, 3);
    (0..count).map(|_| Effect::choose(rng)).collect()
}

/// Scale HSL saturation of every pixel.
pub fn saturate(canvas: &mut Canvas, factor: f32) {
    canvas
        .pixels_mut()
        .par_iter_mut()
        .for_each(|c| *c = c.saturate(factor));
}

/// Push colour channels away from (or towards) the mean luma.
pub fn contrast(canvas: &mut Canvas, factor: f32) {
    let pixels = canvas.pixels();
    let mean = pixels.iter().map(|c| c.luma()).sum::<f32>() / pixels.len() as f32;
    canvas.pixels_mut().par_iter_mut().for_each(|c| {
        let stretch = |v: f32| clamp_unit(mean + (v - mean) * factor);
        *c = Colour::new(stretch(c.r), stretch(c.g), stretch(c.b), c.a);
    });
}

/// Sharpen with the kernel `[-1 -1 -1; -1 10 -1; -1 -1 -1] / 2`.
///
/// Edges are clamped; alpha is left as is.
pub fn edge_enhance(canvas: &mut Canvas) {
    let src = canvas.clone();
    let (w, h) = (src.width() as i64, src.height() as i64);
    let at = |x: i64, y: i64| {
        src.pixels()[(y.clamp(0, h - 1) * w + x.clamp(0, w - 1)) as usize]
    };

    canvas
        .pixels_mut()
        .par_chunks_mut(w as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as i64;
            for (x, px) in row.iter_mut().enumerate() {
                let x = x as i64;
                let mut acc = [0.0f32; 3];
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        let weight = if dx == 0 && dy == 0 { 10.0 } else { -1.0 };
                        let c = at(x + dx, y + dy);
                        acc[0] += weight * c.r;
                        acc[1] += weight * c.g;
                        acc[2] += weight * c.b;
                    }
                }
                *px = Colour::new(acc[0] / 2.0, acc[1] / 2.0, acc[2] / 2.0, px.a);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Canvas {
        Canvas::from_fn(8, 8, |x, y| {
            if (x / 2 + y / 2) % 2 == 0 {
                Colour::rgb(0.3, 0.4, 0.5)
            } else {
                Colour::rgb(0.6, 0.5, 0.4)
            }
        })
        .unwrap()
    }

    #[test]
    fn test_choose_effects_count_and_params() {
        let mut rng = SeedStream::new(Some(99));
        for _ in 0..100 {
            let effects = choose_effects(&mut rng);
            assert!((1..=3).contains(&effects.len()));
            for effect in effects {
                match effect {
                    Effect::Blur { radius } => assert!((1.0..3.0).contains(&radius)),
                    Effect::Saturation { factor } => assert!((0.5..2.0).contains(&factor)),
                    Effect::Contrast { factor } => assert!((0.7..1.5).contains(&factor)),
                    Effect::EdgeEnhance => {}
                }
            }
        }
    }

    #[test]
    fn test_edge_enhance_keeps_flat_regions() {
        let colour = Colour::rgb(0.4, 0.5, 0.6);
        let mut canvas = Canvas::filled(5, 5, colour).unwrap();
        edge_enhance(&mut canvas);
        for c in canvas.pixels() {
            assert!((c.r - 0.4).abs() < 1e-5);
            assert!((c.b - 0.6).abs() < 1e-5);
        }
    }

    #[test]
    fn test_edge_enhance_sharpens_edges() {
        let original = checker();
        let mut canvas = original.clone();
        edge_enhance(&mut canvas);
        // (1, 1) is a dark pixel bordering light ones; it gets darker.
        assert!(canvas.get(1, 1).unwrap().r < original.get(1, 1).unwrap().r);
        assert!(canvas.is_normalized());
    }

    #[test]
    fn test_contrast_identity_and_stretch() {
        let original = checker();
        let mut same = original.clone();
        contrast(&mut same, 1.0);
        for (a, b) in same.pixels().iter().zip(original.pixels()) {
            assert!((a.r - b.r).abs() < 1e-5);
        }

        let mut stretched = original.clone();
        contrast(&mut stretched, 1.5);
        let spread = |c: &Canvas| c.get(2, 0).unwrap().r - c.get(0, 0).unwrap().r;
        assert!(spread(&stretched) > spread(&original));
    }

    #[test]
    fn test_saturation_zero_is_grey() {
        let mut canvas = checker();
        saturate(&mut canvas, 0.0);
        for c in canvas.pixels() {
            assert!((c.r - c.g).abs() < 1e-4 && (c.g - c.b).abs() < 1e-4);
        }
    }

    #[test]
    fn test_effect_display() {
        assert_eq!(Effect::Blur { radius: 1.5 }.to_string(), "blur(1.50)");
        assert_eq!(Effect::EdgeEnhance.to_string(), "edge-enhance");
    }

    #[test]
    fn test_apply_keeps_alpha() {
        let mut canvas = Canvas::filled(4, 4, Colour::new(0.2, 0.7, 0.1, 0.5)).unwrap();
        for effect in [
            Effect::Saturation { factor: 1.5 },
            Effect::Contrast { factor: 1.2 },
            Effect::EdgeEnhance,
        ] {
            effect.apply(&mut canvas);
        }
        assert!(canvas.pixels().iter().all(|c| (c.a - 0.5).abs() < 1e-6));
    }
}
