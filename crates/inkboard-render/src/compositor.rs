//! The scene compositor.
//!
//! Renders a camera's viewport (or the full scene canvas) to a frame
//! buffer: background fill, optional background image, then every
//! visible layer in ascending z-order. A layer that fails to render is
//! logged and skipped so one missing asset cannot sink an export.

use crate::assets;
use crate::layers::render_layer;
use crate::text::TextRenderer;
use crate::viewport::{camera_relative, viewport_origin};
use inkboard_core::{Color, FrameBuffer, InkboardResult, PixelFormat, Point2D, Size2D};
use inkboard_scene::{Camera, Scene};
use serde::{Deserialize, Serialize};

/// Export parameters shared by every render entry point.
///
/// The serde aliases accept the editor's knob names (`sceneWidth`,
/// `pixelRatio`, `useFullScene`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Scene canvas width in pixels.
    #[serde(alias = "sceneWidth")]
    pub width: u32,
    /// Scene canvas height in pixels.
    #[serde(alias = "sceneHeight")]
    pub height: u32,
    /// Background fill; `None` keeps the canvas transparent. In JSON
    /// this is a hex color or the string "transparent".
    #[serde(with = "background_fill")]
    pub background: Option<Color>,
    /// Raster oversampling factor. Scales every coordinate and the
    /// output dimensions.
    #[serde(alias = "pixelRatio")]
    pub pixel_ratio: f64,
    /// Render the whole scene canvas instead of a camera viewport.
    #[serde(alias = "useFullScene")]
    pub full_scene: bool,
    /// Overrides the scene's own background image when set.
    #[serde(alias = "sceneBackgroundImage")]
    pub background_image: Option<String>,
}

mod background_fill {
    use inkboard_core::Color;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Color>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(color) => serializer.collect_str(color),
            None => serializer.serialize_str("transparent"),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Color>, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == "transparent" {
            return Ok(None);
        }
        Color::from_hex(&s).map(Some).map_err(serde::de::Error::custom)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            background: Some(Color::WHITE),
            pixel_ratio: 1.0,
            full_scene: false,
            background_image: None,
        }
    }
}

impl ExportConfig {
    pub fn scene_size(&self) -> Size2D {
        Size2D::new(self.width as f64, self.height as f64)
    }

    fn effective_pixel_ratio(&self) -> f64 {
        if self.pixel_ratio > 0.0 {
            self.pixel_ratio
        } else {
            1.0
        }
    }

    fn background_image_for<'a>(&'a self, scene: &'a Scene) -> Option<&'a str> {
        self.background_image
            .as_deref()
            .or(scene.background_image.as_deref())
    }
}

/// Composite the view a camera sees: an output of the camera's
/// viewport size (times pixel ratio), with the background image
/// cropped to exactly the viewport and layers placed camera-relative.
pub async fn composite_camera_view(
    scene: &Scene,
    camera: &Camera,
    config: &ExportConfig,
    text: &TextRenderer,
) -> InkboardResult<FrameBuffer> {
    let pr = config.effective_pixel_ratio();
    let out_w = ((camera.width * pr).round() as u32).max(1);
    let out_h = ((camera.height * pr).round() as u32).max(1);
    let mut fb = new_canvas(out_w, out_h, config.background);

    let origin = viewport_origin(camera, config.scene_size());
    tracing::debug!(
        scene = %scene.id,
        camera = %camera.id,
        origin_x = origin.x,
        origin_y = origin.y,
        "compositing camera view"
    );

    if let Some(source) = config.background_image_for(scene) {
        draw_background_cropped(&mut fb, source, config, origin, camera.viewport_size(), pr)
            .await;
    }

    for layer in scene.visible_layers() {
        let rel = camera_relative(layer.position, origin);
        let draw_pos = Point2D::new(rel.x * pr, rel.y * pr);
        if let Err(e) = render_layer(&mut fb, layer, draw_pos, pr, text).await {
            tracing::warn!(layer = %layer.id, error = %e, "layer failed to render, skipping");
        }
    }

    Ok(fb)
}

/// Composite the entire scene canvas, ignoring cameras: background
/// stretched to the canvas, layers at their raw scene positions.
pub async fn composite_full_scene(
    scene: &Scene,
    config: &ExportConfig,
    text: &TextRenderer,
) -> InkboardResult<FrameBuffer> {
    let pr = config.effective_pixel_ratio();
    let out_w = ((config.width as f64 * pr).round() as u32).max(1);
    let out_h = ((config.height as f64 * pr).round() as u32).max(1);
    let mut fb = new_canvas(out_w, out_h, config.background);

    tracing::debug!(scene = %scene.id, out_w, out_h, "compositing full scene");

    if let Some(source) = config.background_image_for(scene) {
        match assets::load_image(source).await {
            Ok(bg) => {
                let stretched = assets::resize_exact(&bg, out_w, out_h);
                fb.composite_over(&stretched, 0, 0);
            }
            Err(e) => {
                tracing::warn!(error = %e, "background image failed to load, skipping");
            }
        }
    }

    for layer in scene.visible_layers() {
        let draw_pos = Point2D::new(layer.position.x * pr, layer.position.y * pr);
        if let Err(e) = render_layer(&mut fb, layer, draw_pos, pr, text).await {
            tracing::warn!(layer = %layer.id, error = %e, "layer failed to render, skipping");
        }
    }

    Ok(fb)
}

fn new_canvas(width: u32, height: u32, background: Option<Color>) -> FrameBuffer {
    match background {
        Some(color) => FrameBuffer::solid(width, height, &color),
        None => FrameBuffer::new(width, height, PixelFormat::Rgba8),
    }
}

/// Crop the background image to the part of the viewport that overlaps
/// the scene canvas and draw it at the matching output position.
async fn draw_background_cropped(
    fb: &mut FrameBuffer,
    source: &str,
    config: &ExportConfig,
    origin: Point2D,
    viewport: Size2D,
    pr: f64,
) {
    let bg = match assets::load_image(source).await {
        Ok(bg) => bg,
        Err(e) => {
            tracing::warn!(error = %e, "background image failed to load, skipping");
            return;
        }
    };

    // Visible part of the viewport in scene space.
    let vis_x0 = origin.x.max(0.0);
    let vis_y0 = origin.y.max(0.0);
    let vis_x1 = (origin.x + viewport.width).min(config.width as f64);
    let vis_y1 = (origin.y + viewport.height).min(config.height as f64);
    if vis_x0 >= vis_x1 || vis_y0 >= vis_y1 {
        return;
    }

    // The background stretches over the scene canvas; map the visible
    // rect into background pixel space.
    let sx = bg.width as f64 / config.width as f64;
    let sy = bg.height as f64 / config.height as f64;
    let dst_w = ((vis_x1 - vis_x0) * pr).round() as u32;
    let dst_h = ((vis_y1 - vis_y0) * pr).round() as u32;
    let crop = assets::crop_resize(
        &bg,
        vis_x0 * sx,
        vis_y0 * sy,
        (vis_x1 - vis_x0) * sx,
        (vis_y1 - vis_y0) * sy,
        dst_w,
        dst_h,
    );

    let dx = ((vis_x0 - origin.x) * pr).round() as i32;
    let dy = ((vis_y0 - origin.y) * pr).round() as i32;
    fb.composite_over(&crop, dx, dy);
}
