//! End-to-end export pipeline tests: scene JSON in, PNG data URI out.

use base64::Engine;
use inkboard_core::{Color, FrameBuffer};
use inkboard_render::text::TextRenderer;
use inkboard_render::{
    export_all_cameras, export_camera_view, export_scene_image, png_data_uri, scene_thumbnail,
    CameraExport, ExportConfig, ThumbnailOptions,
};
use inkboard_scene::{validate_layer_json, Scene};
use std::sync::Arc;

/// A solid-color PNG as a data URI, usable as a background or image
/// layer source.
fn solid_png_uri(width: u32, height: u32, color: &Color) -> String {
    png_data_uri(&FrameBuffer::solid(width, height, color)).unwrap()
}

fn decode_png(uri: &str) -> (u32, u32, Vec<u8>) {
    let encoded = uri.strip_prefix("data:image/png;base64,").unwrap();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .unwrap();
    let decoder = png::Decoder::new(bytes.as_slice());
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());
    (info.width, info.height, buf)
}

fn pixel(data: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * width + x) * 4) as usize;
    [data[i], data[i + 1], data[i + 2], data[i + 3]]
}

#[tokio::test]
async fn default_camera_export_round_trips_through_png() {
    let scene = Scene::from_json(
        r##"{
            "id": "pipeline",
            "layers": [{
                "id": "sq", "type": "shape",
                "position": {"x": 960.0, "y": 540.0},
                "shape_config": {
                    "shape_type": "rectangle", "width": 100, "height": 100,
                    "fill_color": "#FF0000", "fill_mode": "fill"
                }
            }],
            "sceneCameras": [{"id": "cam", "isDefault": true}]
        }"##,
    )
    .unwrap();

    let text = TextRenderer::new();
    let uri = export_scene_image(&scene, &ExportConfig::default(), &text)
        .await
        .unwrap();

    let (width, height, data) = decode_png(&uri);
    assert_eq!((width, height), (800, 450));
    // Scene-centered square lands at the viewport center.
    assert_eq!(pixel(&data, width, 400, 225), [255, 0, 0, 255]);
    assert_eq!(pixel(&data, width, 10, 10), [255, 255, 255, 255]);
}

#[tokio::test]
async fn background_image_is_cropped_to_the_viewport() {
    // A solid blue background stretched over the scene canvas fills the
    // whole camera view.
    let bg = solid_png_uri(192, 108, &Color::BLUE);
    let scene = Scene::from_json(&format!(
        r#"{{
            "id": "bg-crop",
            "backgroundImage": "{}",
            "sceneCameras": [{{"id": "cam", "isDefault": true}}]
        }}"#,
        bg
    ))
    .unwrap();

    let text = TextRenderer::new();
    let camera = scene.default_camera().unwrap();
    let uri = export_camera_view(&scene, camera, &ExportConfig::default(), &text)
        .await
        .unwrap();
    let (width, _, data) = decode_png(&uri);
    assert_eq!(pixel(&data, width, 0, 0), [0, 0, 255, 255]);
    assert_eq!(pixel(&data, width, 799, 449), [0, 0, 255, 255]);
    assert_eq!(pixel(&data, width, 400, 225), [0, 0, 255, 255]);
}

#[tokio::test]
async fn image_layer_anchors_top_left() {
    // An 8x8 green image placed at the scene center: its top-left
    // corner maps to the viewport center.
    let img = solid_png_uri(8, 8, &Color::GREEN);
    let scene = Scene::from_json(&format!(
        r#"{{
            "id": "anchor",
            "layers": [{{
                "id": "img", "type": "image", "image_path": "{}",
                "position": {{"x": 960.0, "y": 540.0}}
            }}],
            "sceneCameras": [{{"id": "cam", "isDefault": true}}]
        }}"#,
        img
    ))
    .unwrap();

    let text = TextRenderer::new();
    let uri = export_scene_image(&scene, &ExportConfig::default(), &text)
        .await
        .unwrap();
    let (width, _, data) = decode_png(&uri);
    assert_eq!(pixel(&data, width, 400, 225), [0, 255, 0, 255]);
    assert_eq!(pixel(&data, width, 407, 232), [0, 255, 0, 255]);
    // One pixel above and left of the anchor is background.
    assert_eq!(pixel(&data, width, 399, 224), [255, 255, 255, 255]);
    assert_eq!(pixel(&data, width, 408, 233), [255, 255, 255, 255]);
}

#[tokio::test]
async fn image_at_viewport_origin_anchors_at_output_top_left() {
    // The default camera's viewport origin on a 1920x1080 canvas is
    // (560, 315); an opaque, unrotated image placed exactly there must
    // come out anchored at the top-left corner of the export.
    let img = solid_png_uri(6, 6, &Color::RED);
    let scene = Scene::from_json(&format!(
        r#"{{
            "id": "origin-anchor",
            "layers": [{{
                "id": "img", "type": "image", "image_path": "{}",
                "position": {{"x": 560.0, "y": 315.0}}
            }}],
            "sceneCameras": [{{"id": "cam", "isDefault": true}}]
        }}"#,
        img
    ))
    .unwrap();

    let text = TextRenderer::new();
    let uri = export_scene_image(&scene, &ExportConfig::default(), &text)
        .await
        .unwrap();
    let (width, _, data) = decode_png(&uri);
    assert_eq!(pixel(&data, width, 0, 0), [255, 0, 0, 255]);
    assert_eq!(pixel(&data, width, 5, 5), [255, 0, 0, 255]);
    assert_eq!(pixel(&data, width, 6, 6), [255, 255, 255, 255]);
}

#[tokio::test]
async fn export_all_cameras_mixes_rendered_and_config_only() {
    let scene = Scene::from_json(
        r##"{
            "id": "multi",
            "layers": [{
                "id": "sq", "type": "shape",
                "position": {"x": 480.0, "y": 270.0},
                "shape_config": {
                    "shape_type": "circle", "width": 60, "height": 60,
                    "fill_color": "#0000FF", "fill_mode": "fill"
                }
            }],
            "sceneCameras": [
                {"id": "default", "isDefault": true},
                {"id": "detail", "position": {"x": 0.25, "y": 0.25}}
            ]
        }"##,
    )
    .unwrap();

    let config = ExportConfig::default();
    let text = Arc::new(TextRenderer::new());
    let exports = export_all_cameras(&scene, &config, &text).await.unwrap();

    assert_eq!(exports.len(), 2);
    assert!(matches!(exports[0], CameraExport::ConfigOnly { .. }));

    let CameraExport::Rendered { data_uri, .. } = &exports[1] else {
        panic!("detail camera should render");
    };
    let (width, height, data) = decode_png(data_uri);
    assert_eq!((width, height), (800, 450));
    // The detail camera centers on (480, 270), where the circle sits.
    assert_eq!(pixel(&data, width, 400, 225), [0, 0, 255, 255]);
}

#[tokio::test]
async fn thumbnail_letterboxes_the_wide_view() {
    let bg = solid_png_uri(64, 36, &Color::RED);
    let scene = Scene::from_json(&format!(
        r#"{{
            "id": "thumb",
            "backgroundImage": "{}",
            "sceneCameras": [{{"id": "cam", "isDefault": true}}]
        }}"#,
        bg
    ))
    .unwrap();

    let text = TextRenderer::new();
    let options = ThumbnailOptions {
        letterbox: Color::BLACK,
        ..Default::default()
    };
    let thumb = scene_thumbnail(&scene, &ExportConfig::default(), &options, &text)
        .await
        .unwrap();

    assert_eq!((thumb.width, thumb.height), (160, 120));
    // 800x450 contain-fits to 160x90, leaving 15-pixel bands top and bottom.
    assert_eq!(thumb.get_pixel(80, 5), Some([0, 0, 0, 255]));
    assert_eq!(thumb.get_pixel(80, 115), Some([0, 0, 0, 255]));
    assert_eq!(thumb.get_pixel(80, 60), Some([255, 0, 0, 255]));
}

#[test]
fn layer_validation_gates_malformed_documents() {
    let good = serde_json::json!({
        "id": "ok", "type": "text", "text_config": {"text": "hi"}
    });
    assert!(validate_layer_json(&good).valid);

    let bad = serde_json::json!({"type": "shape"});
    let report = validate_layer_json(&bad);
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 2);
}
