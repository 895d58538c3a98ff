//! Thumbnail generation.
//!
//! Thumbnails contain-fit the source into the requested box: the whole
//! image stays visible at its original aspect ratio and the leftover
//! margin fills with a neutral letterbox color.

use crate::assets;
use crate::compositor::{composite_camera_view, ExportConfig};
use crate::text::TextRenderer;
use inkboard_core::{Color, FrameBuffer, InkboardResult};
use inkboard_scene::Scene;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailOptions {
    pub width: u32,
    pub height: u32,
    /// Fill color for the letterbox margins.
    pub letterbox: Color,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            width: 160,
            height: 120,
            letterbox: Color::WHITE,
        }
    }
}

/// Contain-fit `src` into a `width` × `height` box.
///
/// A source wider than the target fits the width and letterboxes top
/// and bottom; a taller source fits the height and letterboxes the
/// sides. The scaled image draws centered.
pub fn thumbnail(src: &FrameBuffer, width: u32, height: u32, letterbox: &Color) -> FrameBuffer {
    let width = width.max(1);
    let height = height.max(1);
    let mut out = FrameBuffer::solid(width, height, letterbox);
    if src.width == 0 || src.height == 0 {
        return out;
    }

    let scale = (width as f64 / src.width as f64).min(height as f64 / src.height as f64);
    let fit_w = ((src.width as f64 * scale).round() as u32).clamp(1, width);
    let fit_h = ((src.height as f64 * scale).round() as u32).clamp(1, height);

    let resized = assets::resize_exact(src, fit_w, fit_h);
    let dx = ((width - fit_w) / 2) as i32;
    let dy = ((height - fit_h) / 2) as i32;
    out.composite_over(&resized, dx, dy);
    out
}

/// Render the scene's default-camera view and contain-fit it into the
/// thumbnail box.
pub async fn scene_thumbnail(
    scene: &Scene,
    config: &ExportConfig,
    options: &ThumbnailOptions,
    text: &TextRenderer,
) -> InkboardResult<FrameBuffer> {
    let camera = scene.default_camera()?;
    let view = composite_camera_view(scene, camera, config, text).await?;
    Ok(thumbnail(&view, options.width, options.height, &options.letterbox))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_into_wide_box_letterboxes_sides() {
        // A square source in a 2:1 box fits the height and letterboxes
        // left and right.
        let src = FrameBuffer::solid(100, 100, &Color::RED);
        let thumb = thumbnail(&src, 200, 100, &Color::BLACK);
        assert_eq!((thumb.width, thumb.height), (200, 100));
        assert_eq!(thumb.get_pixel(100, 50), Some([255, 0, 0, 255]));
        // Margins are letterbox-colored.
        assert_eq!(thumb.get_pixel(10, 50), Some([0, 0, 0, 255]));
        assert_eq!(thumb.get_pixel(190, 50), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_wide_into_square_box_letterboxes_top_bottom() {
        let src = FrameBuffer::solid(200, 100, &Color::RED);
        let thumb = thumbnail(&src, 100, 100, &Color::BLACK);
        // Fits the width: 100x50 centered vertically.
        assert_eq!(thumb.get_pixel(50, 50), Some([255, 0, 0, 255]));
        assert_eq!(thumb.get_pixel(50, 10), Some([0, 0, 0, 255]));
        assert_eq!(thumb.get_pixel(50, 90), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_matching_aspect_fills_box() {
        let src = FrameBuffer::solid(320, 240, &Color::BLUE);
        let thumb = thumbnail(&src, 160, 120, &Color::WHITE);
        assert_eq!(thumb.get_pixel(0, 0), Some([0, 0, 255, 255]));
        assert_eq!(thumb.get_pixel(159, 119), Some([0, 0, 255, 255]));
    }

    #[tokio::test]
    async fn test_scene_thumbnail_default_box() {
        let scene = Scene::from_json(
            r#"{"id": "s", "sceneCameras": [{"id": "cam", "isDefault": true}]}"#,
        )
        .unwrap();
        let text = TextRenderer::new();
        let thumb = scene_thumbnail(
            &scene,
            &ExportConfig::default(),
            &ThumbnailOptions::default(),
            &text,
        )
        .await
        .unwrap();
        assert_eq!((thumb.width, thumb.height), (160, 120));
        // The 16:9 camera view letterboxes inside the 4:3 box; the
        // white background and white letterbox meet at the center.
        assert_eq!(thumb.get_pixel(80, 60), Some([255, 255, 255, 255]));
    }

    #[tokio::test]
    async fn test_scene_thumbnail_requires_default_camera() {
        let scene = Scene::from_json(r#"{"id": "s"}"#).unwrap();
        let text = TextRenderer::new();
        let result = scene_thumbnail(
            &scene,
            &ExportConfig::default(),
            &ThumbnailOptions::default(),
            &text,
        )
        .await;
        assert!(result.is_err());
    }
}
