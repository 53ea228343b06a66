//! Floating-point RGBA raster buffer.
//!
//! A [`Canvas`] is a row-major grid of straight-alpha [`Colour`] samples.
//! Every write goes through `Colour::new` or the blend primitives, which
//! clamp channels to `[0, 1]`.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba, Rgba32FImage};

use crate::error::{AbstraktError, Result};
use crate::types::Colour;

use super::blend;

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// A width × height RGBA buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,

    /// Pixel samples (row-major: pixels[y * width + x]).
    pixels: Vec<Colour>,
}

impl Canvas {
    /// Create a transparent canvas.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, Colour::TRANSPARENT)
    }

    /// Create a canvas filled with one colour.
    pub fn filled(width: u32, height: u32, colour: Colour) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(AbstraktError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![colour; width as usize * height as usize],
        })
    }

    /// Build a canvas by evaluating `f(x, y)` at every pixel.
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> Colour) -> Result<Self> {
        let mut canvas = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                canvas.pixels[(y * width + x) as usize] = f(x, y);
            }
        }
        Ok(canvas)
    }

    /// Get the width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the dimensions as (width, height).
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get a pixel at the given position.
    pub fn get(&self, x: u32, y: u32) -> Option<Colour> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    /// Overwrite a pixel. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, colour: Colour) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.pixels[i] = Colour::from_array(colour.to_array());
        }
    }

    /// Composite `colour` over the pixel at signed coordinates, clipping
    /// anything outside the buffer.
    pub fn blend_pixel(&mut self, x: i64, y: i64, colour: Colour, opacity: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = self.index(x as u32, y as u32);
        self.pixels[i] = blend::over(self.pixels[i], colour, opacity);
    }

    /// Get a reference to the pixel samples.
    pub fn pixels(&self) -> &[Colour] {
        &self.pixels
    }

    /// Mutable pixel samples, row-major.
    pub fn pixels_mut(&mut self) -> &mut [Colour] {
        &mut self.pixels
    }

    /// Fail with `DimensionMismatch` unless `other` has the same size.
    pub fn ensure_same_size(&self, other: &Canvas) -> Result<()> {
        if self.size() != other.size() {
            return Err(AbstraktError::mismatch(self.size(), other.size()));
        }
        Ok(())
    }

    /// Composite `layer` over this canvas with its top-left at `(x0, y0)`.
    ///
    /// Parts of the layer outside the canvas are clipped.
    pub fn composite_at(&mut self, layer: &Canvas, x0: i64, y0: i64, opacity: f32) {
        for ly in 0..layer.height {
            let y = y0 + ly as i64;
            if y < 0 || y >= self.height as i64 {
                continue;
            }
            for lx in 0..layer.width {
                let src = layer.pixels[layer.index(lx, ly)];
                if src.a <= 0.0 {
                    continue;
                }
                self.blend_pixel(x0 + lx as i64, y, src, opacity);
            }
        }
    }

    /// Copy `source` pixels into the rectangle `dest`, replacing what is there.
    ///
    /// `source` must be exactly `dest.w × dest.h`; clipped at the canvas edge.
    pub fn paste(&mut self, source: &Canvas, dest: Rect) {
        let w = dest.w.min(source.width);
        let h = dest.h.min(source.height);
        for sy in 0..h {
            let y = dest.y + sy;
            if y >= self.height {
                break;
            }
            for sx in 0..w {
                let x = dest.x + sx;
                if x >= self.width {
                    break;
                }
                let i = self.index(x, y);
                self.pixels[i] = source.pixels[source.index(sx, sy)];
            }
        }
    }

    /// Copy of the sub-rectangle `rect`, clipped to the canvas.
    pub fn cropped(&self, rect: Rect) -> Result<Canvas> {
        let x = rect.x.min(self.width);
        let y = rect.y.min(self.height);
        let w = rect.w.min(self.width - x);
        let h = rect.h.min(self.height - y);
        let mut out = Canvas::new(w, h)?;
        for oy in 0..h {
            let start = self.index(x, y + oy);
            let dst = (oy * w) as usize;
            out.pixels[dst..dst + w as usize]
                .copy_from_slice(&self.pixels[start..start + w as usize]);
        }
        Ok(out)
    }

    /// Resample to `width × height` with a triangle (bilinear) filter.
    pub fn resized(&self, width: u32, height: u32) -> Result<Canvas> {
        if width == 0 || height == 0 {
            return Err(AbstraktError::InvalidDimensions { width, height });
        }
        if self.size() == (width, height) {
            return Ok(self.clone());
        }
        let resized = imageops::resize(&self.to_image(), width, height, FilterType::Triangle);
        Ok(Canvas::from_image(&resized))
    }

    /// Scale to cover `width × height` preserving aspect ratio, then crop
    /// the centre.
    pub fn cover(&self, width: u32, height: u32) -> Result<Canvas> {
        if width == 0 || height == 0 {
            return Err(AbstraktError::InvalidDimensions { width, height });
        }
        let scale = f64::max(
            width as f64 / self.width as f64,
            height as f64 / self.height as f64,
        );
        let sw = ((self.width as f64 * scale).ceil() as u32).max(width);
        let sh = ((self.height as f64 * scale).ceil() as u32).max(height);
        let scaled = self.resized(sw, sh)?;
        scaled.cropped(Rect::new((sw - width) / 2, (sh - height) / 2, width, height))
    }

    /// Bilinear sample at continuous pixel coordinates, clamped to the edge.
    ///
    /// Pixel centres sit at integer coordinates.
    pub fn sample_bilinear(&self, x: f32, y: f32) -> Colour {
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;
        let x = if x.is_finite() { x.clamp(0.0, max_x) } else { 0.0 };
        let y = if y.is_finite() { y.clamp(0.0, max_y) } else { 0.0 };

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let top = self.pixels[self.index(x0, y0)].lerp(self.pixels[self.index(x1, y0)], fx);
        let bottom = self.pixels[self.index(x0, y1)].lerp(self.pixels[self.index(x1, y1)], fx);
        top.lerp(bottom, fy)
    }

    /// Convert to an `image` f32 RGBA buffer.
    pub fn to_image(&self) -> Rgba32FImage {
        let raw: Vec<f32> = self.pixels.iter().flat_map(|c| c.to_array()).collect();
        ImageBuffer::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| ImageBuffer::new(self.width, self.height))
    }

    /// Build a canvas from an `image` f32 RGBA buffer, clamping channels.
    pub fn from_image(image: &Rgba32FImage) -> Canvas {
        let pixels = image
            .pixels()
            .map(|Rgba(c)| Colour::from_array(*c))
            .collect();
        Canvas {
            width: image.width(),
            height: image.height(),
            pixels,
        }
    }

    /// Convert to a flat 8-bit RGBA buffer (for image output).
    pub fn to_rgba8_buffer(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.pixels.len() * 4);
        for colour in &self.pixels {
            buffer.extend_from_slice(&colour.to_rgba8());
        }
        buffer
    }

    /// Every channel of every pixel lies in `[0, 1]`.
    pub fn is_normalized(&self) -> bool {
        self.pixels
            .iter()
            .all(|c| c.to_array().iter().all(|v| (0.0..=1.0).contains(v)))
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn red() -> Colour {
        Colour::rgb(1.0, 0.0, 0.0)
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            Canvas::new(0, 10),
            Err(AbstraktError::InvalidDimensions { width: 0, height: 10 })
        ));
        assert!(Canvas::new(10, 0).is_err());
    }

    #[test]
    fn test_get_and_set() {
        let mut canvas = Canvas::new(2, 2).unwrap();
        canvas.set(1, 0, red());
        assert_eq!(canvas.get(1, 0), Some(red()));
        assert_eq!(canvas.get(0, 0), Some(Colour::TRANSPARENT));
        assert_eq!(canvas.get(5, 5), None);
        canvas.set(5, 5, red());
        assert_eq!(canvas.size(), (2, 2));
    }

    #[test]
    fn test_blend_pixel_clips_out_of_bounds() {
        let mut canvas = Canvas::new(2, 2).unwrap();
        canvas.blend_pixel(-1, 0, red(), 1.0);
        canvas.blend_pixel(0, 2, red(), 1.0);
        canvas.blend_pixel(i64::MAX, i64::MIN, red(), 1.0);
        assert!(canvas.pixels().iter().all(|c| c.is_transparent()));
        canvas.blend_pixel(1, 1, red(), 1.0);
        assert_eq!(canvas.get(1, 1), Some(red()));
    }

    #[test]
    fn test_composite_at_offset_and_clip() {
        let mut canvas = Canvas::filled(4, 4, Colour::WHITE).unwrap();
        let layer = Canvas::filled(2, 2, red()).unwrap();
        canvas.composite_at(&layer, 3, -1, 1.0);
        assert_eq!(canvas.get(3, 0), Some(red()));
        assert_eq!(canvas.get(3, 1), Some(Colour::WHITE));
        assert_eq!(canvas.get(2, 0), Some(Colour::WHITE));
    }

    #[test]
    fn test_cropped_and_paste() {
        let canvas = Canvas::from_fn(4, 3, |x, y| {
            Colour::rgb(x as f32 / 3.0, y as f32 / 2.0, 0.0)
        })
        .unwrap();
        let crop = canvas.cropped(Rect::new(1, 1, 2, 5)).unwrap();
        assert_eq!(crop.size(), (2, 2));
        assert_eq!(crop.get(0, 0), canvas.get(1, 1));
        assert_eq!(crop.get(1, 1), canvas.get(2, 2));

        let mut target = Canvas::new(4, 3).unwrap();
        target.paste(&crop, Rect::new(3, 2, 2, 2));
        assert_eq!(target.get(3, 2), canvas.get(1, 1));
        assert_eq!(target.get(2, 2), Some(Colour::TRANSPARENT));
    }

    #[test]
    fn test_resized_constant_stays_constant() {
        let colour = Colour::new(0.25, 0.5, 0.75, 1.0);
        let canvas = Canvas::filled(8, 6, colour).unwrap();
        let resized = canvas.resized(3, 5).unwrap();
        assert_eq!(resized.size(), (3, 5));
        for c in resized.pixels() {
            assert!((c.r - 0.25).abs() < 1e-4);
            assert!((c.b - 0.75).abs() < 1e-4);
        }
        assert!(canvas.resized(0, 5).is_err());
    }

    #[test]
    fn test_cover_has_requested_size() {
        let canvas = Canvas::filled(40, 10, red()).unwrap();
        let fitted = canvas.cover(16, 16).unwrap();
        assert_eq!(fitted.size(), (16, 16));
        let fitted = canvas.cover(7, 3).unwrap();
        assert_eq!(fitted.size(), (7, 3));
    }

    #[test]
    fn test_sample_bilinear() {
        let canvas = Canvas::from_fn(2, 1, |x, _| {
            if x == 0 {
                Colour::BLACK
            } else {
                Colour::WHITE
            }
        })
        .unwrap();
        assert_eq!(canvas.sample_bilinear(0.5, 0.0), Colour::rgb(0.5, 0.5, 0.5));
        assert_eq!(canvas.sample_bilinear(-4.0, 9.0), Colour::BLACK);
        assert_eq!(canvas.sample_bilinear(f32::NAN, 0.0), Colour::BLACK);
    }

    #[test]
    fn test_image_round_trip() {
        let canvas = Canvas::from_fn(3, 2, |x, y| {
            Colour::new(x as f32 / 2.0, y as f32, 0.5, 0.25)
        })
        .unwrap();
        let back = Canvas::from_image(&canvas.to_image());
        assert_eq!(back, canvas);
    }

    #[test]
    fn test_rect_geometry() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 5, 5);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::new(9, 9, 2, 2)));
        assert_eq!(b.area(), 25);
    }

    #[test]
    fn test_ensure_same_size() {
        let a = Canvas::new(2, 2).unwrap();
        let b = Canvas::new(2, 3).unwrap();
        assert!(a.ensure_same_size(&a.clone()).is_ok());
        assert!(matches!(
            a.ensure_same_size(&b),
            Err(AbstraktError::DimensionMismatch { .. })
        ));
    }
}
