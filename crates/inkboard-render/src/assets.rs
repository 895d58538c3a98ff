//! Image asset loading.
//!
//! Decodes PNG, JPEG, WebP and other formats into frame buffers.
//! Decoding is CPU-bound, so it runs on tokio's blocking pool; the
//! compositor awaits decodes in z-order.

use base64::Engine;
use inkboard_core::{FrameBuffer, InkboardError, PixelFormat};
use std::path::Path;

/// Load an image asset and convert it to a frame buffer.
///
/// Accepts a filesystem path or a `data:image/...;base64,` URI, which
/// the editor uses for pasted images.
pub async fn load_image(source: &str) -> Result<FrameBuffer, InkboardError> {
    let source = source.to_string();
    tokio::task::spawn_blocking(move || {
        if let Some(encoded) = source
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(_, encoded)| encoded)
        {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| {
                    InkboardError::asset(format!("invalid base64 image data: {}", e), "<data-uri>")
                })?;
            return load_image_from_bytes(&bytes);
        }
        load_image_from_path(Path::new(&source))
    })
    .await
    .map_err(|e| InkboardError::Render(format!("image decode task failed: {}", e)))?
}

fn load_image_from_path(path: &Path) -> Result<FrameBuffer, InkboardError> {
    let img = image::open(path).map_err(|e| {
        InkboardError::asset(
            format!("failed to load image '{}': {}", path.display(), e),
            path,
        )
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut fb = FrameBuffer::new(width, height, PixelFormat::Rgba8);
    fb.data = rgba.into_raw();

    Ok(fb)
}

/// Decode an image from raw bytes.
pub fn load_image_from_bytes(data: &[u8]) -> Result<FrameBuffer, InkboardError> {
    let img = image::load_from_memory(data)
        .map_err(|e| InkboardError::asset(format!("failed to decode image: {}", e), "<memory>"))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut fb = FrameBuffer::new(width, height, PixelFormat::Rgba8);
    fb.data = rgba.into_raw();

    Ok(fb)
}

/// Sample a source rectangle (in fractional source pixels) into a new
/// buffer of the given size. Used to crop a background image to a
/// camera viewport in one pass.
pub fn crop_resize(
    fb: &FrameBuffer,
    src_x: f64,
    src_y: f64,
    src_w: f64,
    src_h: f64,
    dst_w: u32,
    dst_h: u32,
) -> FrameBuffer {
    let dst_w = dst_w.max(1);
    let dst_h = dst_h.max(1);
    let mut out = FrameBuffer::new(dst_w, dst_h, PixelFormat::Rgba8);
    if src_w <= 0.0 || src_h <= 0.0 {
        return out;
    }
    for y in 0..dst_h {
        for x in 0..dst_w {
            let sx = src_x + (x as f64 + 0.5) / dst_w as f64 * src_w;
            let sy = src_y + (y as f64 + 0.5) / dst_h as f64 * src_h;
            if sx < 0.0 || sy < 0.0 {
                continue;
            }
            if let Some(pixel) = fb.get_pixel(sx as u32, sy as u32) {
                out.set_pixel(x, y, pixel);
            }
        }
    }
    out
}

/// Resize a frame buffer to exactly the given dimensions with
/// nearest-neighbor sampling. Determinism over smoothness.
pub fn resize_exact(fb: &FrameBuffer, width: u32, height: u32) -> FrameBuffer {
    let width = width.max(1);
    let height = height.max(1);
    if width == fb.width && height == fb.height {
        return fb.clone();
    }

    let mut resized = FrameBuffer::new(width, height, fb.format);
    let scale_x = fb.width as f64 / width as f64;
    let scale_y = fb.height as f64 / height as f64;
    for y in 0..height {
        for x in 0..width {
            let src_x = ((x as f64 + 0.5) * scale_x) as u32;
            let src_y = ((y as f64 + 0.5) * scale_y) as u32;
            if let Some(pixel) = fb.get_pixel(src_x.min(fb.width - 1), src_y.min(fb.height - 1)) {
                resized.set_pixel(x, y, pixel);
            }
        }
    }

    resized
}
