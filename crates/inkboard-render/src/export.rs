//! Export entry points.
//!
//! Each export composites to a frame buffer and returns a PNG data URI
//! (`data:image/png;base64,…`), the form the editor stores. Cameras
//! still at the default position skip rendering entirely: their view
//! is the plain scene export, so only the camera settings ship.

use crate::compositor::{composite_camera_view, composite_full_scene, ExportConfig};
use crate::text::TextRenderer;
use base64::Engine;
use inkboard_core::{FrameBuffer, InkboardError, InkboardResult, PixelFormat};
use inkboard_scene::{Camera, Scene};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinSet;

/// One camera's export outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CameraExport {
    /// The camera sits at the default position; the scene export
    /// already shows this view, so only the settings are carried.
    ConfigOnly { camera_id: String, camera: Camera },
    /// A dedicated render of the camera's viewport.
    Rendered { camera_id: String, data_uri: String },
}

impl CameraExport {
    pub fn camera_id(&self) -> &str {
        match self {
            CameraExport::ConfigOnly { camera_id, .. } => camera_id,
            CameraExport::Rendered { camera_id, .. } => camera_id,
        }
    }
}

/// Encode a frame buffer as a PNG data URI.
pub fn png_data_uri(fb: &FrameBuffer) -> InkboardResult<String> {
    let mut bytes: Vec<u8> = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, fb.width, fb.height);
        encoder.set_color(match fb.format {
            PixelFormat::Rgba8 => png::ColorType::Rgba,
            PixelFormat::Rgb8 => png::ColorType::Rgb,
        });
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| InkboardError::Encode(format!("failed to write PNG header: {}", e)))?;
        writer
            .write_image_data(&fb.data)
            .map_err(|e| InkboardError::Encode(format!("failed to write PNG data: {}", e)))?;
        writer
            .finish()
            .map_err(|e| InkboardError::Encode(format!("failed to finalize PNG: {}", e)))?;
    }
    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(format!("data:image/png;base64,{}", encoded))
}

/// Export the scene as seen by its default camera (or the full canvas
/// when the config asks for it). Requires a default camera otherwise.
pub async fn export_scene_image(
    scene: &Scene,
    config: &ExportConfig,
    text: &TextRenderer,
) -> InkboardResult<String> {
    let fb = if config.full_scene {
        composite_full_scene(scene, config, text).await?
    } else {
        let camera = scene.default_camera()?;
        composite_camera_view(scene, camera, config, text).await?
    };
    tracing::info!(scene = %scene.id, width = fb.width, height = fb.height, "scene exported");
    png_data_uri(&fb)
}

/// Export the view of one explicit camera.
pub async fn export_camera_view(
    scene: &Scene,
    camera: &Camera,
    config: &ExportConfig,
    text: &TextRenderer,
) -> InkboardResult<String> {
    let fb = composite_camera_view(scene, camera, config, text).await?;
    png_data_uri(&fb)
}

/// Export every camera on the scene timeline. Results follow the input
/// camera order; cameras at the default position come back as
/// `ConfigOnly`, the rest render concurrently on their own surfaces.
pub async fn export_all_cameras(
    scene: &Scene,
    config: &ExportConfig,
    text: &Arc<TextRenderer>,
) -> InkboardResult<Vec<CameraExport>> {
    let mut results: Vec<Option<CameraExport>> = vec![None; scene.cameras.len()];
    let mut tasks: JoinSet<InkboardResult<(usize, String)>> = JoinSet::new();

    for (i, camera) in scene.cameras.iter().enumerate() {
        if camera.is_at_default_position() {
            tracing::debug!(camera = %camera.id, "camera at default position, exporting config only");
            results[i] = Some(CameraExport::ConfigOnly {
                camera_id: camera.id.clone(),
                camera: camera.clone(),
            });
            continue;
        }

        let scene = scene.clone();
        let camera = camera.clone();
        let config = config.clone();
        let text = Arc::clone(text);
        tasks.spawn(async move {
            let fb = composite_camera_view(&scene, &camera, &config, &text).await?;
            Ok((i, png_data_uri(&fb)?))
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (i, data_uri) = joined
            .map_err(|e| InkboardError::Render(format!("camera export task failed: {}", e)))??;
        results[i] = Some(CameraExport::Rendered {
            camera_id: scene.cameras[i].id.clone(),
            data_uri,
        });
    }

    results
        .into_iter()
        .enumerate()
        .map(|(i, slot)| {
            slot.ok_or_else(|| {
                InkboardError::Render(format!("camera {} produced no export", scene.cameras[i].id))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkboard_core::Color;

    fn scene(json: &str) -> Scene {
        Scene::from_json(json).unwrap()
    }

    #[test]
    fn test_png_data_uri_prefix() {
        let fb = FrameBuffer::solid(4, 4, &Color::RED);
        let uri = png_data_uri(&fb).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert!(uri.len() > "data:image/png;base64,".len());
    }

    #[tokio::test]
    async fn test_export_scene_requires_default_camera() {
        let scene = scene(r#"{"id": "s", "sceneCameras": [{"id": "cam"}]}"#);
        let text = TextRenderer::new();
        let result = export_scene_image(&scene, &ExportConfig::default(), &text).await;
        assert!(matches!(
            result,
            Err(InkboardError::MissingDefaultCamera(_))
        ));
    }

    #[tokio::test]
    async fn test_full_scene_export_needs_no_camera() {
        let scene = scene(r#"{"id": "s"}"#);
        let config = ExportConfig {
            width: 64,
            height: 36,
            full_scene: true,
            ..Default::default()
        };
        let text = TextRenderer::new();
        let uri = export_scene_image(&scene, &config, &text).await.unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_export_all_cameras_policy_and_order() {
        let scene = scene(
            r#"{
                "id": "s",
                "sceneCameras": [
                    {"id": "default", "isDefault": true},
                    {"id": "detail", "position": {"x": 0.25, "y": 0.25}},
                    {"id": "wide", "position": {"x": 0.75, "y": 0.6}}
                ]
            }"#,
        );
        let config = ExportConfig {
            width: 320,
            height: 180,
            ..Default::default()
        };
        let text = Arc::new(TextRenderer::new());
        let exports = export_all_cameras(&scene, &config, &text).await.unwrap();

        assert_eq!(exports.len(), 3);
        assert_eq!(exports[0].camera_id(), "default");
        assert!(matches!(exports[0], CameraExport::ConfigOnly { .. }));
        assert_eq!(exports[1].camera_id(), "detail");
        assert!(matches!(exports[1], CameraExport::Rendered { .. }));
        assert_eq!(exports[2].camera_id(), "wide");
        assert!(matches!(exports[2], CameraExport::Rendered { .. }));
    }

    #[tokio::test]
    async fn test_moved_default_camera_still_renders() {
        // A default camera pushed away from the center needs a real render.
        let scene = scene(
            r#"{
                "id": "s",
                "sceneCameras": [{"id": "d", "isDefault": true,
                                  "position": {"x": 0.3, "y": 0.5}}]
            }"#,
        );
        let config = ExportConfig {
            width: 320,
            height: 180,
            ..Default::default()
        };
        let text = Arc::new(TextRenderer::new());
        let exports = export_all_cameras(&scene, &config, &text).await.unwrap();
        assert!(matches!(exports[0], CameraExport::Rendered { .. }));
    }
}
