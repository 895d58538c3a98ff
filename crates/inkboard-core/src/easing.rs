use crate::math::Point2D;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Easing functions for camera transitions and animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    EaseIn,
    /// The default curve for camera transitions.
    #[default]
    EaseOut,
    EaseInOut,
    EaseInCubic,
    EaseOutCubic,
}

impl Easing {
    /// Apply the easing function to a normalized progress value.
    /// Input is clamped to [0, 1], so t=0 always maps to 0 and t=1 to 1.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => {
                let t1 = t - 1.0;
                1.0 + t1 * t1 * t1
            }
        }
    }

    /// Resolve an easing from its serialized name. Unknown names fall
    /// back to `EaseOut` so a scene authored with a newer editor still
    /// renders rather than failing the whole export.
    pub fn from_name(name: &str) -> Easing {
        match name {
            "linear" => Easing::Linear,
            "ease_in" => Easing::EaseIn,
            "ease_out" => Easing::EaseOut,
            "ease_in_out" => Easing::EaseInOut,
            "ease_in_cubic" => Easing::EaseInCubic,
            "ease_out_cubic" => Easing::EaseOutCubic,
            _ => Easing::EaseOut,
        }
    }

    /// The serialized name of this easing.
    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease_in",
            Easing::EaseOut => "ease_out",
            Easing::EaseInOut => "ease_in_out",
            Easing::EaseInCubic => "ease_in_cubic",
            Easing::EaseOutCubic => "ease_out_cubic",
        }
    }
}

impl Serialize for Easing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Easing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Easing::from_name(&s))
    }
}

/// Interpolate a scalar between `start` and `end` with the given easing.
pub fn interpolate(start: f64, end: f64, t: f64, easing: Easing) -> f64 {
    start + (end - start) * easing.apply(t)
}

/// Interpolate a 2D position with the given easing applied to both axes.
pub fn interpolate_position(start: Point2D, end: Point2D, t: f64, easing: Easing) -> Point2D {
    let eased = easing.apply(t);
    Point2D {
        x: start.x + (end.x - start.x) * eased,
        y: start.y + (end.y - start.y) * eased,
    }
}
