//! # inkboard-render
//!
//! The deterministic scene compositor: resolves a camera viewport over
//! the scene canvas, renders each layer kind onto a CPU frame buffer,
//! and encodes exports as PNG data URIs. Identical inputs produce
//! byte-identical rasters.

pub mod assets;
pub mod compositor;
pub mod export;
pub mod layers;
pub mod raster;
pub mod text;
pub mod thumbnail;
pub mod viewport;

pub use compositor::{composite_camera_view, composite_full_scene, ExportConfig};
pub use export::{
    export_all_cameras, export_camera_view, export_scene_image, png_data_uri, CameraExport,
};
pub use thumbnail::{scene_thumbnail, thumbnail, ThumbnailOptions};
pub use viewport::{camera_relative, viewport_origin};
