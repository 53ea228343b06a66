//! Shape rasterization onto a [`Canvas`].
//!
//! Coordinates are continuous pixel coordinates; pixel `(x, y)` covers
//! `[x, x+1) × [y, y+1)` and is sampled at its centre. Everything outside
//! the canvas is clipped silently.

use crate::types::Colour;

use super::Canvas;

/// Composite a filled disc over the canvas.
///
/// The rim is anti-aliased over one pixel, so discs smaller than a pixel
/// still leave a faint mark.
pub fn fill_circle(canvas: &mut Canvas, cx: f32, cy: f32, radius: f32, colour: Colour, opacity: f32) {
    if !cx.is_finite() || !cy.is_finite() || !radius.is_finite() || radius <= 0.0 {
        return;
    }
    let reach = radius + 0.5;
    let x0 = (cx - reach).floor().max(0.0);
    let y0 = (cy - reach).floor().max(0.0);
    let x1 = (cx + reach).ceil().min(canvas.width() as f32);
    let y1 = (cy + reach).ceil().min(canvas.height() as f32);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for py in y0 as i64..y1 as i64 {
        let dy = py as f32 + 0.5 - cy;
        for px in x0 as i64..x1 as i64 {
            let dx = px as f32 + 0.5 - cx;
            let dist = (dx * dx + dy * dy).sqrt();
            let coverage = (reach - dist).clamp(0.0, 1.0);
            if coverage > 0.0 {
                canvas.blend_pixel(px, py, colour, opacity * coverage);
            }
        }
    }
}

/// Composite a closed polygon over the canvas using the even–odd rule.
///
/// `paint(x, y)` supplies the colour at each covered pixel centre, which
/// allows gradient fills. Polygons with fewer than three points draw
/// nothing. Each covered pixel is composited exactly once.
pub fn fill_polygon(
    canvas: &mut Canvas,
    points: &[(f32, f32)],
    paint: impl Fn(f32, f32) -> Colour,
    opacity: f32,
) {
    if points.len() < 3 || points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return;
    }

    let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
    let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
    let row_start = min_y.floor().max(0.0) as i64;
    let row_end = (max_y.ceil() as i64).min(canvas.height() as i64);
    let width = canvas.width() as i64;

    let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
    for py in row_start..row_end {
        let sy = py as f32 + 0.5;
        crossings.clear();
        for (i, &(ax, ay)) in points.iter().enumerate() {
            let (bx, by) = points[(i + 1) % points.len()];
            // Half-open rule so shared vertices count once.
            if (ay <= sy) != (by <= sy) {
                let t = (sy - ay) / (by - ay);
                crossings.push(ax + t * (bx - ax));
            }
        }
        crossings.sort_by(f32::total_cmp);

        for span in crossings.chunks_exact(2) {
            // Pixel centres in [span[0], span[1]).
            let start = ((span[0] - 0.5).ceil() as i64).max(0);
            let end = ((span[1] - 0.5).ceil() as i64).min(width);
            for px in start..end {
                let colour = paint(px as f32 + 0.5, sy);
                canvas.blend_pixel(px, py, colour, opacity);
            }
        }
    }
}
