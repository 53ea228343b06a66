//! Blend-mode algebra for straight-alpha RGBA samples.
//!
//! `over` is source-over compositing with an extra opacity factor:
//!
//! ```text
//! a     = src.a * opacity
//! out.a = a + dst.a * (1 - a)
//! out.c = (src.c * a + dst.c * dst.a * (1 - a)) / out.a
//! ```
//!
//! Multiply, screen and overlay act on all four channels independently.
//! [`blend`] computes a mode's result and composites it over the
//! destination with the given opacity; the generator and the combiner both
//! go through it, so layering agrees everywhere.

use std::fmt;
use std::str::FromStr;

use crate::error::{AbstraktError, Result};
use crate::types::Colour;

use super::Canvas;

/// How two buffers are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Source-over alpha compositing.
    #[default]
    Normal,
    /// Per-channel product; darkens.
    Multiply,
    /// Inverted product of inverses; lightens.
    Screen,
    /// Multiply in the darks, screen in the lights; adds contrast.
    Overlay,
}

impl BlendMode {
    pub const ALL: [BlendMode; 4] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
        }
    }

    /// Per-pixel result of this mode, before opacity is applied.
    pub fn apply(self, dst: Colour, src: Colour) -> Colour {
        match self {
            BlendMode::Normal => src,
            BlendMode::Multiply => multiply(dst, src),
            BlendMode::Screen => screen(dst, src),
            BlendMode::Overlay => overlay(dst, src),
        }
    }
}

impl FromStr for BlendMode {
    type Err = AbstraktError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(BlendMode::Normal),
            "multiply" => Ok(BlendMode::Multiply),
            "screen" => Ok(BlendMode::Screen),
            "overlay" => Ok(BlendMode::Overlay),
            _ => Err(AbstraktError::InvalidBlendMode {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source-over: composite `src` over `dst` scaled by `opacity`.
pub fn over(dst: Colour, src: Colour, opacity: f32) -> Colour {
    let opacity = if opacity.is_nan() { 0.0 } else { opacity.clamp(0.0, 1.0) };
    let a = src.a * opacity;
    if a <= 0.0 {
        return dst;
    }
    if a >= 1.0 {
        return src;
    }

    let keep = dst.a * (1.0 - a);
    let out_a = a + keep;
    if out_a <= 0.0 {
        return Colour::TRANSPARENT;
    }
    let mix = |s: f32, d: f32| (s * a + d * keep) / out_a;
    Colour::new(
        mix(src.r, dst.r),
        mix(src.g, dst.g),
        mix(src.b, dst.b),
        out_a,
    )
}

/// `d * s` per channel.
pub fn multiply(dst: Colour, src: Colour) -> Colour {
    dst.zip(src, |d, s| d * s)
}

/// `1 - (1 - d)(1 - s)` per channel.
pub fn screen(dst: Colour, src: Colour) -> Colour {
    dst.zip(src, |d, s| 1.0 - (1.0 - d) * (1.0 - s))
}

/// `2ds` where `d < 0.5`, else `1 - 2(1 - d)(1 - s)`, per channel.
pub fn overlay(dst: Colour, src: Colour) -> Colour {
    dst.zip(src, |d, s| {
        if d < 0.5 {
            2.0 * d * s
        } else {
            1.0 - 2.0 * (1.0 - d) * (1.0 - s)
        }
    })
}

/// Composite `src` over `dst` in place with `opacity`.
pub fn blend_over(dst: &mut Canvas, src: &Canvas, opacity: f32) -> Result<()> {
    blend(dst, src, BlendMode::Normal, opacity)
}

/// Replace `dst` with the per-channel product of `dst` and `src`.
pub fn blend_multiply(dst: &mut Canvas, src: &Canvas) -> Result<()> {
    zip_in_place(dst, src, multiply)
}

/// Replace `dst` with the screen of `dst` and `src`.
pub fn blend_screen(dst: &mut Canvas, src: &Canvas) -> Result<()> {
    zip_in_place(dst, src, screen)
}

/// Replace `dst` with the overlay of `src` onto `dst`.
pub fn blend_overlay(dst: &mut Canvas, src: &Canvas) -> Result<()> {
    zip_in_place(dst, src, overlay)
}

/// Blend `src` onto `dst` with `mode`, then composite the result over
/// `dst` with `opacity`.
pub fn blend(dst: &mut Canvas, src: &Canvas, mode: BlendMode, opacity: f32) -> Result<()> {
    dst.ensure_same_size(src)?;
    for (d, s) in dst.pixels_mut().iter_mut().zip(src.pixels()) {
        let blended = mode.apply(*d, *s);
        *d = over(*d, blended, opacity);
    }
    Ok(())
}

fn zip_in_place(dst: &mut Canvas, src: &Canvas, f: fn(Colour, Colour) -> Colour) -> Result<()> {
    dst.ensure_same_size(src)?;
    for (d, s) in dst.pixels_mut().iter_mut().zip(src.pixels()) {
        *d = f(*d, *s);
    }
    Ok(())
}
