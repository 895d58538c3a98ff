use crate::camera::Camera;
use crate::layer::Layer;
use inkboard_core::{InkboardError, InkboardResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A complete scene as authored in the editor: an optional background
/// image, the layer stack, and the camera timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "backgroundImage")]
    pub background_image: Option<String>,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default, alias = "sceneCameras")]
    pub cameras: Vec<Camera>,
}

impl Scene {
    /// Parse a scene from its editor JSON form.
    pub fn from_json(json: &str) -> InkboardResult<Scene> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a scene from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> InkboardResult<Scene> {
        let json = std::fs::read_to_string(path)?;
        Scene::from_json(&json)
    }

    /// The camera flagged as the scene's default. Exports that take no
    /// explicit camera require one.
    pub fn default_camera(&self) -> InkboardResult<&Camera> {
        self.cameras
            .iter()
            .find(|c| c.is_default)
            .ok_or_else(|| InkboardError::MissingDefaultCamera(self.id.clone()))
    }

    /// Visible layers in paint order (ascending z-index, ties keep
    /// their authored order).
    pub fn visible_layers(&self) -> Vec<&Layer> {
        let mut layers: Vec<&Layer> = self.layers.iter().filter(|l| l.visible).collect();
        layers.sort_by_key(|l| l.z_index);
        layers
    }
}
