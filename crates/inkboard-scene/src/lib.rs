//! # inkboard-scene
//!
//! The declarative scene model consumed read-only by the rendering
//! engine: scenes, layers, cameras, the camera timeline resolver, and
//! the layer JSON validation contract.

pub mod camera;
pub mod layer;
pub mod scene;
pub mod timeline;
pub mod validate;

pub use camera::Camera;
pub use layer::{
    FillMode, FontStyle, Layer, LayerContent, ShapeConfig, ShapeType, Stroke, TextAlign,
    TextConfig,
};
pub use scene::Scene;
pub use timeline::{camera_at_time, total_duration, CameraState};
pub use validate::{validate_layer_json, ValidationReport};
