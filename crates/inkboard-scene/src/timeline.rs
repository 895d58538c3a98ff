//! Resolves the camera timeline to a concrete camera state at any
//! point in time.
//!
//! The timeline is the camera list in order: each camera first
//! transitions in from the previous camera's settled state over its
//! `transition_duration`, then holds for its `duration`.

use crate::camera::Camera;
use inkboard_core::{interpolate, interpolate_position, Point2D};
use serde::{Deserialize, Serialize};

/// The resolved camera state at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub zoom: f64,
    pub position: Point2D,
    /// Index of the active camera in the input list, or -1 when the
    /// list was empty and the default camera applies.
    pub camera_index: i32,
    /// True while inside a transition segment.
    pub transitioning: bool,
}

impl CameraState {
    fn settled(camera: &Camera, index: i32) -> CameraState {
        CameraState {
            zoom: camera.zoom,
            position: camera.position,
            camera_index: index,
            transitioning: false,
        }
    }
}

/// Total timeline length in seconds: the sum of every camera's
/// transition and hold durations.
pub fn total_duration(cameras: &[Camera]) -> f64 {
    cameras
        .iter()
        .map(|c| c.transition_duration.max(0.0) + c.duration.max(0.0))
        .sum()
}

/// Resolve the camera state at `time` seconds into the timeline.
///
/// Times past the end clamp to the last camera's settled state; an
/// empty camera list resolves to the default camera with index -1.
pub fn camera_at_time(cameras: &[Camera], time: f64) -> CameraState {
    if cameras.is_empty() {
        return CameraState::settled(&Camera::default(), -1);
    }

    let mut elapsed = 0.0;
    for (i, camera) in cameras.iter().enumerate() {
        let transition = camera.transition_duration.max(0.0);
        // A zero-length transition cuts straight to the hold segment.
        if transition > 0.0 && time < elapsed + transition {
            let prev = if i > 0 { &cameras[i - 1] } else { camera };
            let t = (time - elapsed) / transition;
            return CameraState {
                zoom: interpolate(prev.zoom, camera.zoom, t, camera.easing),
                position: interpolate_position(prev.position, camera.position, t, camera.easing),
                camera_index: i as i32,
                transitioning: true,
            };
        }
        elapsed += transition;

        let hold = camera.duration.max(0.0);
        if time < elapsed + hold {
            return CameraState::settled(camera, i as i32);
        }
        elapsed += hold;
    }

    // Past the end of the timeline.
    let last = cameras.len() - 1;
    CameraState::settled(&cameras[last], last as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkboard_core::Easing;

    fn cam(id: &str, zoom: f64, x: f64, duration: f64, transition: f64) -> Camera {
        Camera {
            id: id.to_string(),
            zoom,
            position: Point2D::new(x, 0.5),
            duration,
            transition_duration: transition,
            easing: Easing::Linear,
            ..Camera::default()
        }
    }

    #[test]
    fn test_empty_list_resolves_to_default() {
        let state = camera_at_time(&[], 3.0);
        assert_eq!(state.camera_index, -1);
        assert!((state.zoom - 0.8).abs() < 1e-9);
        assert_eq!(state.position, Point2D::new(0.5, 0.5));
        assert!(!state.transitioning);
    }

    #[test]
    fn test_time_zero_is_first_camera() {
        let cameras = vec![cam("a", 1.0, 0.2, 2.0, 0.0), cam("b", 2.0, 0.8, 2.0, 1.0)];
        let state = camera_at_time(&cameras, 0.0);
        assert_eq!(state.camera_index, 0);
        assert!((state.zoom - 1.0).abs() < 1e-9);
        assert!(!state.transitioning);
    }

    #[test]
    fn test_hold_then_transition() {
        let cameras = vec![cam("a", 1.0, 0.2, 2.0, 0.0), cam("b", 2.0, 0.8, 2.0, 1.0)];

        // Inside a's hold.
        let state = camera_at_time(&cameras, 1.0);
        assert_eq!(state.camera_index, 0);
        assert!(!state.transitioning);

        // Halfway through b's transition: linear easing, so midpoint values.
        let state = camera_at_time(&cameras, 2.5);
        assert_eq!(state.camera_index, 1);
        assert!(state.transitioning);
        assert!((state.zoom - 1.5).abs() < 1e-9);
        assert!((state.position.x - 0.5).abs() < 1e-9);

        // Settled in b's hold.
        let state = camera_at_time(&cameras, 3.5);
        assert_eq!(state.camera_index, 1);
        assert!(!state.transitioning);
        assert!((state.zoom - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_transition_uses_target_easing() {
        let mut target = cam("b", 2.0, 0.8, 2.0, 1.0);
        target.easing = Easing::EaseIn;
        let cameras = vec![cam("a", 1.0, 0.2, 1.0, 0.0), target];

        // t = 0.5 into the transition, ease_in gives 0.25.
        let state = camera_at_time(&cameras, 1.5);
        assert!(state.transitioning);
        assert!((state.zoom - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_past_end_clamps_to_last_settled() {
        let cameras = vec![cam("a", 1.0, 0.2, 2.0, 0.0), cam("b", 2.0, 0.8, 2.0, 1.0)];
        let state = camera_at_time(&cameras, 100.0);
        assert_eq!(state.camera_index, 1);
        assert!((state.zoom - 2.0).abs() < 1e-9);
        assert!((state.position.x - 0.8).abs() < 1e-9);
        assert!(!state.transitioning);
    }

    #[test]
    fn test_exact_boundary_belongs_to_next_segment() {
        let cameras = vec![cam("a", 1.0, 0.2, 2.0, 0.0), cam("b", 2.0, 0.8, 2.0, 1.0)];
        // t = 2.0 is the start of b's transition, at b's transition t=0,
        // which equals a's settled state but reports camera b.
        let state = camera_at_time(&cameras, 2.0);
        assert_eq!(state.camera_index, 1);
        assert!(state.transitioning);
        assert!((state.zoom - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_camera_transition_is_identity() {
        // With no previous camera the first transition interpolates
        // from the camera's own state, so values stay constant.
        let cameras = vec![cam("a", 1.5, 0.3, 2.0, 1.0)];
        let state = camera_at_time(&cameras, 0.5);
        assert!(state.transitioning);
        assert!((state.zoom - 1.5).abs() < 1e-9);
        assert!((state.position.x - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_query_at_exact_total_is_last_settled() {
        let cameras = vec![cam("a", 1.0, 0.2, 2.0, 0.0), cam("b", 2.0, 0.8, 2.0, 1.0)];
        let total = total_duration(&cameras);
        let at_total = camera_at_time(&cameras, total);
        let beyond = camera_at_time(&cameras, total + 5.0);
        assert_eq!(at_total, beyond);
        assert_eq!(at_total.camera_index, 1);
        assert!(!at_total.transitioning);
    }

    #[test]
    fn test_total_duration_sums_segments() {
        let cameras = vec![cam("a", 1.0, 0.2, 2.0, 0.5), cam("b", 2.0, 0.8, 3.0, 1.0)];
        assert!((total_duration(&cameras) - 6.5).abs() < 1e-9);
        assert_eq!(total_duration(&[]), 0.0);
    }
}
