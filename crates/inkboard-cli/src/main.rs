use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use base64::Engine;
use clap::{Parser, Subcommand};
use inkboard_core::Color;
use inkboard_render::text::TextRenderer;
use inkboard_render::{
    export_all_cameras, export_scene_image, scene_thumbnail, CameraExport, ExportConfig,
    ThumbnailOptions,
};
use inkboard_scene::Scene;

#[derive(Parser)]
#[command(
    name = "inkboard",
    version,
    about = "Inkboard — deterministic scene exports for whiteboard animations"
)]
struct Cli {
    /// Font files to register, as name=path pairs (repeatable).
    /// Style variants use name:style (e.g. Inter:bold=/fonts/Inter-Bold.ttf).
    #[arg(long = "font", global = true, value_name = "NAME=PATH")]
    fonts: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the scene as seen by its default camera
    ExportScene {
        /// Path to the scene JSON file
        #[arg()]
        scene: PathBuf,

        /// Output PNG path (default: <scene>.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render the whole scene canvas instead of the camera viewport
        #[arg(long)]
        full_scene: bool,

        /// Raster oversampling factor
        #[arg(long, default_value_t = 1.0)]
        pixel_ratio: f64,

        /// Background fill as a hex color (e.g. #FFFFFF); 'none' for transparent
        #[arg(long)]
        background: Option<String>,

        /// Scene canvas width in pixels
        #[arg(long, default_value_t = 1920)]
        width: u32,

        /// Scene canvas height in pixels
        #[arg(long, default_value_t = 1080)]
        height: u32,
    },

    /// Export every camera on the scene timeline
    ExportCameras {
        /// Path to the scene JSON file
        #[arg()]
        scene: PathBuf,

        /// Directory for the output PNGs (one per rendered camera)
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Raster oversampling factor
        #[arg(long, default_value_t = 1.0)]
        pixel_ratio: f64,

        /// Scene canvas width in pixels
        #[arg(long, default_value_t = 1920)]
        width: u32,

        /// Scene canvas height in pixels
        #[arg(long, default_value_t = 1080)]
        height: u32,
    },

    /// Render a contain-fit thumbnail of the default camera view
    Thumbnail {
        /// Path to the scene JSON file
        #[arg()]
        scene: PathBuf,

        /// Output PNG path (default: <scene>_thumb.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Thumbnail width in pixels
        #[arg(long, default_value_t = 160)]
        width: u32,

        /// Thumbnail height in pixels
        #[arg(long, default_value_t = 120)]
        height: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut text = TextRenderer::new();
    for spec in &cli.fonts {
        let (name, path) = spec
            .split_once('=')
            .with_context(|| format!("invalid --font '{}', expected NAME=PATH", spec))?;
        text.load_font(name, Path::new(path))
            .map_err(|e| anyhow::anyhow!(e))?;
    }

    match cli.command {
        Commands::ExportScene {
            scene,
            output,
            full_scene,
            pixel_ratio,
            background,
            width,
            height,
        } => {
            let config = ExportConfig {
                width,
                height,
                pixel_ratio,
                full_scene,
                background: parse_background(background.as_deref())?,
                ..Default::default()
            };
            run_async(cmd_export_scene(scene, output, config, text))
        }
        Commands::ExportCameras {
            scene,
            out_dir,
            pixel_ratio,
            width,
            height,
        } => {
            let config = ExportConfig {
                width,
                height,
                pixel_ratio,
                ..Default::default()
            };
            run_async(cmd_export_cameras(scene, out_dir, config, text))
        }
        Commands::Thumbnail {
            scene,
            output,
            width,
            height,
        } => {
            let options = ThumbnailOptions {
                width,
                height,
                ..Default::default()
            };
            run_async(cmd_thumbnail(scene, output, options, text))
        }
    }
}

fn run_async<F>(future: F) -> Result<()>
where
    F: std::future::Future<Output = Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to initialize async runtime")?;
    runtime.block_on(future)
}

fn parse_background(value: Option<&str>) -> Result<Option<Color>> {
    match value {
        None => Ok(Some(Color::WHITE)),
        Some("none") => Ok(None),
        Some(hex) => Ok(Some(
            Color::from_hex(hex).with_context(|| format!("invalid background color '{}'", hex))?,
        )),
    }
}

async fn cmd_export_scene(
    scene_path: PathBuf,
    output: Option<PathBuf>,
    config: ExportConfig,
    text: TextRenderer,
) -> Result<()> {
    let scene = Scene::from_file(&scene_path)
        .with_context(|| format!("failed to load scene {}", scene_path.display()))?;
    let uri = export_scene_image(&scene, &config, &text).await?;

    let output = output.unwrap_or_else(|| scene_path.with_extension("png"));
    write_data_uri_png(&uri, &output)?;
    println!("exported scene '{}' to {}", scene.id, output.display());
    Ok(())
}

async fn cmd_export_cameras(
    scene_path: PathBuf,
    out_dir: PathBuf,
    config: ExportConfig,
    text: TextRenderer,
) -> Result<()> {
    let scene = Scene::from_file(&scene_path)
        .with_context(|| format!("failed to load scene {}", scene_path.display()))?;
    let text = Arc::new(text);
    let exports = export_all_cameras(&scene, &config, &text).await?;

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut rendered = 0usize;
    let mut config_only = 0usize;
    for export in &exports {
        match export {
            CameraExport::Rendered { camera_id, data_uri } => {
                let path = out_dir.join(format!("{}.png", camera_id));
                write_data_uri_png(data_uri, &path)?;
                rendered += 1;
            }
            CameraExport::ConfigOnly { .. } => {
                config_only += 1;
            }
        }
    }
    println!(
        "exported {} of {} cameras from scene '{}' ({} config-only) to {}",
        rendered,
        exports.len(),
        scene.id,
        config_only,
        out_dir.display()
    );
    Ok(())
}

async fn cmd_thumbnail(
    scene_path: PathBuf,
    output: Option<PathBuf>,
    options: ThumbnailOptions,
    text: TextRenderer,
) -> Result<()> {
    let scene = Scene::from_file(&scene_path)
        .with_context(|| format!("failed to load scene {}", scene_path.display()))?;
    let thumb = scene_thumbnail(&scene, &ExportConfig::default(), &options, &text).await?;
    let uri = inkboard_render::png_data_uri(&thumb)?;

    let output = output.unwrap_or_else(|| {
        let stem = scene_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "scene".to_string());
        scene_path.with_file_name(format!("{}_thumb.png", stem))
    });
    write_data_uri_png(&uri, &output)?;
    println!(
        "wrote {}x{} thumbnail for scene '{}' to {}",
        thumb.width,
        thumb.height,
        scene.id,
        output.display()
    );
    Ok(())
}

/// Decode a `data:image/png;base64,` URI and write the PNG bytes.
fn write_data_uri_png(uri: &str, path: &Path) -> Result<()> {
    let encoded = uri
        .strip_prefix("data:image/png;base64,")
        .context("export did not return a PNG data URI")?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .context("export returned malformed base64 data")?;
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_background_default_is_white() {
        assert_eq!(parse_background(None).unwrap(), Some(Color::WHITE));
    }

    #[test]
    fn test_parse_background_none_is_transparent() {
        assert_eq!(parse_background(Some("none")).unwrap(), None);
    }

    #[test]
    fn test_parse_background_hex() {
        assert_eq!(parse_background(Some("#FF0000")).unwrap(), Some(Color::RED));
        assert!(parse_background(Some("not-a-color")).is_err());
    }

    #[test]
    fn test_write_data_uri_rejects_non_png() {
        let result = write_data_uri_png("data:text/plain;base64,aGk=", Path::new("/tmp/x.png"));
        assert!(result.is_err());
    }
}
