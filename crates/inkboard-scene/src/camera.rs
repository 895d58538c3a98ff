use inkboard_core::{Easing, Point2D, Size2D};
use serde::{Deserialize, Serialize};

/// Tolerance for deciding whether a camera sits at the default focus
/// position (0.5, 0.5).
pub const POSITION_TOLERANCE: f64 = 1e-3;

fn default_zoom() -> f64 {
    0.8
}

fn default_position() -> Point2D {
    Point2D::new(0.5, 0.5)
}

fn default_hold() -> f64 {
    2.0
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    450.0
}

/// A camera on the scene timeline.
///
/// `position` is the camera's focus point in normalized scene
/// coordinates ([0,1]²); `width`/`height` give the viewport size in
/// scene pixels. Each camera transitions in from the previous camera's
/// settled state over `transition_duration` seconds, then holds for
/// `duration` seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub id: String,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(default = "default_position")]
    pub position: Point2D,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    /// Hold time in seconds after any transition completes.
    #[serde(default = "default_hold")]
    pub duration: f64,
    /// Transition time in seconds from the previous camera's state.
    /// Zero means the camera cuts in with no animation.
    #[serde(default, alias = "transition", alias = "transitionDuration")]
    pub transition_duration: f64,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default, alias = "isDefault")]
    pub is_default: bool,
    #[serde(default)]
    pub locked: bool,
}

impl Camera {
    /// The editor's default camera for a given scene aspect ratio.
    /// Unrecognized ratios get the 16:9 viewport.
    pub fn default_for_aspect(aspect_ratio: f64) -> Camera {
        let (width, height) = if (aspect_ratio - 4.0 / 3.0).abs() < 0.01 {
            (800.0, 600.0)
        } else if (aspect_ratio - 1.0).abs() < 0.01 {
            (600.0, 600.0)
        } else {
            (800.0, 450.0)
        };
        Camera {
            id: "default-camera".to_string(),
            zoom: default_zoom(),
            position: default_position(),
            width,
            height,
            duration: default_hold(),
            transition_duration: 0.0,
            easing: Easing::EaseOut,
            is_default: true,
            locked: true,
        }
    }

    /// Viewport size in scene pixels.
    pub fn viewport_size(&self) -> Size2D {
        Size2D::new(self.width, self.height)
    }

    /// Check the camera's fields against the editor's bounds. Returns
    /// one message per violated constraint; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(0.1..=10.0).contains(&self.zoom) {
            errors.push(format!(
                "camera '{}': zoom {} out of range [0.1, 10]",
                self.id, self.zoom
            ));
        }
        if !(0.0..=1.0).contains(&self.position.x) || !(0.0..=1.0).contains(&self.position.y) {
            errors.push(format!(
                "camera '{}': position ({}, {}) outside normalized [0, 1] range",
                self.id, self.position.x, self.position.y
            ));
        }
        if self.duration < 0.0 {
            errors.push(format!(
                "camera '{}': duration {} must be non-negative",
                self.id, self.duration
            ));
        }
        if self.transition_duration < 0.0 {
            errors.push(format!(
                "camera '{}': transition duration {} must be non-negative",
                self.id, self.transition_duration
            ));
        }
        errors
    }

    /// True if this is a default camera still sitting at the centered
    /// focus position. Such cameras need no dedicated render: their
    /// view is the plain scene export.
    pub fn is_at_default_position(&self) -> bool {
        self.is_default
            && (self.position.x - 0.5).abs() < POSITION_TOLERANCE
            && (self.position.y - 0.5).abs() < POSITION_TOLERANCE
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::default_for_aspect(16.0 / 9.0)
    }
}
