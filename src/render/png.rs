//! PNG input and output for canvases.
//!
//! Canvases are written as 8-bit-per-channel RGBA, rounding each channel,
//! and read back into straight-alpha floats.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageBuffer, ImageFormat, Rgba, RgbaImage};

use crate::error::{AbstraktError, Result};
use crate::types::Colour;

use super::Canvas;

/// Write a canvas to a PNG file.
///
/// The parent directory must exist. The image is encoded in memory first,
/// so a failed encode never leaves a partial file behind.
pub fn write_png(canvas: &Canvas, path: &Path) -> Result<()> {
    let bytes = encode_png(canvas).map_err(|message| AbstraktError::WriteFailure {
        path: path.to_path_buf(),
        message,
    })?;

    fs::write(path, bytes).map_err(|e| AbstraktError::WriteFailure {
        path: path.to_path_buf(),
        message: format!("Failed to write PNG: {}", e),
    })
}

/// Encode a canvas as PNG bytes.
fn encode_png(canvas: &Canvas) -> std::result::Result<Vec<u8>, String> {
    let img: RgbaImage =
        ImageBuffer::from_raw(canvas.width(), canvas.height(), canvas.to_rgba8_buffer())
            .ok_or_else(|| "pixel buffer does not match canvas dimensions".to_string())?;

    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| format!("Failed to encode PNG: {}", e))?;
    Ok(bytes.into_inner())
}

/// Read an image file (any format the `image` crate decodes) into a canvas.
pub fn read_image(path: &Path) -> Result<Canvas> {
    let img = image::open(path)
        .map_err(|e| AbstraktError::UnreadableImage {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .to_rgba8();

    let (width, height) = img.dimensions();
    let mut canvas = Canvas::new(width, height).map_err(|_| AbstraktError::UnreadableImage {
        path: path.to_path_buf(),
        message: "image has no pixels".to_string(),
    })?;

    for (dst, Rgba(rgba)) in canvas.pixels_mut().iter_mut().zip(img.pixels()) {
        *dst = Colour::from_rgba8(*rgba);
    }

    Ok(canvas)
}
