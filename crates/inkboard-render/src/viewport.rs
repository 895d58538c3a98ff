//! The canonical camera viewport transform.
//!
//! Every export path goes through these two functions, so a camera's
//! view is the same no matter which entry point rendered it.

use inkboard_core::{Point2D, Size2D};
use inkboard_scene::Camera;

/// Top-left corner of the camera's viewport in scene pixels.
///
/// The camera's normalized focus position maps to the viewport center:
/// originX = x·W − w/2, originY = y·H − h/2. The origin is deliberately
/// never clamped; a camera focused near an edge sees past the canvas
/// and those areas composite as background.
pub fn viewport_origin(camera: &Camera, scene_size: Size2D) -> Point2D {
    Point2D {
        x: camera.position.x * scene_size.width - camera.width / 2.0,
        y: camera.position.y * scene_size.height - camera.height / 2.0,
    }
}

/// Translate a scene-space position into camera-relative (viewport)
/// space.
pub fn camera_relative(position: Point2D, origin: Point2D) -> Point2D {
    Point2D {
        x: position.x - origin.x,
        y: position.y - origin.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_camera_origin() {
        let camera = Camera::default();
        let origin = viewport_origin(&camera, Size2D::new(1920.0, 1080.0));
        // 0.5 * 1920 - 400 = 560, 0.5 * 1080 - 225 = 315
        assert!((origin.x - 560.0).abs() < 1e-9);
        assert!((origin.y - 315.0).abs() < 1e-9);
    }

    #[test]
    fn test_origin_is_not_clamped() {
        let mut camera = Camera::default();
        camera.position = Point2D::new(0.0, 0.0);
        let origin = viewport_origin(&camera, Size2D::new(1920.0, 1080.0));
        assert!((origin.x - -400.0).abs() < 1e-9);
        assert!((origin.y - -225.0).abs() < 1e-9);
    }

    #[test]
    fn test_origin_linear_in_position() {
        // Moving the focus by Δx shifts the origin by Δx·W.
        let scene = Size2D::new(1920.0, 1080.0);
        let mut a = Camera::default();
        a.position = Point2D::new(0.25, 0.5);
        let mut b = Camera::default();
        b.position = Point2D::new(0.75, 0.5);
        let origin_a = viewport_origin(&a, scene);
        let origin_b = viewport_origin(&b, scene);
        assert!((origin_b.x - origin_a.x - 0.5 * 1920.0).abs() < 1e-9);
        assert!((origin_b.y - origin_a.y).abs() < 1e-9);
    }

    #[test]
    fn test_origin_linear_in_scene_width() {
        // The focus term x·W scales linearly with the canvas size.
        let camera = Camera::default();
        let origin_1x = viewport_origin(&camera, Size2D::new(1920.0, 1080.0));
        let origin_2x = viewport_origin(&camera, Size2D::new(3840.0, 1080.0));
        let half_w = camera.width / 2.0;
        assert!((origin_2x.x + half_w - 2.0 * (origin_1x.x + half_w)).abs() < 1e-9);
    }

    #[test]
    fn test_camera_relative_round_trip() {
        let origin = Point2D::new(560.0, 315.0);
        let scene_pos = Point2D::new(960.0, 540.0);
        let rel = camera_relative(scene_pos, origin);
        assert!((rel.x - 400.0).abs() < 1e-9);
        assert!((rel.y - 225.0).abs() < 1e-9);
    }

    #[test]
    fn test_centered_layer_lands_at_viewport_center() {
        // Camera 800x450 at (0.5, 0.5) on a 1920x1080 scene: a layer at
        // the scene center must land at the viewport center.
        let camera = Camera::default();
        let origin = viewport_origin(&camera, Size2D::new(1920.0, 1080.0));
        let rel = camera_relative(Point2D::new(960.0, 540.0), origin);
        assert!((rel.x - camera.width / 2.0).abs() < 1e-9);
        assert!((rel.y - camera.height / 2.0).abs() < 1e-9);
    }
}
