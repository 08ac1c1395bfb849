use std::path::Path;

use anyhow::Context;

use crate::foundation::core::Canvas;
use crate::foundation::error::{OverlayError, OverlayResult};

/// Decode an encoded image (PNG, JPEG, ...) into a straight-alpha canvas.
pub fn decode_canvas(bytes: &[u8]) -> OverlayResult<Canvas> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    canvas_from_image(dyn_img.to_rgba8())
}

/// Read and decode the image file at `path`.
pub fn load_canvas(path: &Path) -> OverlayResult<Canvas> {
    let dyn_img = image::open(path).with_context(|| format!("open image '{}'", path.display()))?;
    canvas_from_image(dyn_img.to_rgba8())
}

/// Encode `canvas` to `path`, format chosen by the file extension.
///
/// Formats without alpha (JPEG) get the color channels only.
pub fn save_canvas(canvas: &Canvas, path: &Path) -> OverlayResult<()> {
    let img = image_from_canvas(canvas)?;
    let format = image::ImageFormat::from_path(path)
        .with_context(|| format!("unknown image format for '{}'", path.display()))?;
    let dyn_img = image::DynamicImage::ImageRgba8(img);
    let result = if format == image::ImageFormat::Jpeg {
        image::DynamicImage::ImageRgb8(dyn_img.to_rgb8()).save_with_format(path, format)
    } else {
        dyn_img.save_with_format(path, format)
    };
    result.with_context(|| format!("write image '{}'", path.display()))?;
    Ok(())
}

/// Wrap an `image` buffer as a canvas without copying.
pub fn canvas_from_image(img: image::RgbaImage) -> OverlayResult<Canvas> {
    let (width, height) = img.dimensions();
    Canvas::from_rgba8(width, height, img.into_raw())
}

/// Copy a canvas into an `image` buffer.
pub fn image_from_canvas(canvas: &Canvas) -> OverlayResult<image::RgbaImage> {
    image::RgbaImage::from_raw(canvas.width(), canvas.height(), canvas.as_rgba8().to_vec())
        .ok_or_else(|| OverlayError::validation("canvas buffer does not match its dimensions"))
}

#[cfg(test)]
#[path = "../../tests/unit/io/decode.rs"]
mod tests;
