//! Text rasterization with fontdue.
//!
//! Fonts load from registered file paths; when a family is missing the
//! renderer falls back to a common system font, and if none is found
//! the text layer renders empty with a warning rather than failing the
//! export.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use fontdue::{Font, FontSettings};
use inkboard_core::{Color, FrameBuffer, PixelFormat};
use inkboard_scene::{FontStyle, TextAlign, TextConfig};

/// Candidate paths for a system fallback font.
const FALLBACK_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FALLBACK_FONT: OnceLock<Option<Font>> = OnceLock::new();

fn fallback_font() -> Option<&'static Font> {
    FALLBACK_FONT
        .get_or_init(|| {
            for path in FALLBACK_FONT_PATHS {
                if let Ok(data) = std::fs::read(path) {
                    if let Ok(font) = Font::from_bytes(data, FontSettings::default()) {
                        tracing::debug!(path, "loaded system fallback font");
                        return Some(font);
                    }
                }
            }
            None
        })
        .as_ref()
}

/// Rasterizes text layers to frame buffers.
pub struct TextRenderer {
    font_cache: HashMap<String, Font>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            font_cache: HashMap::new(),
        }
    }

    /// Load a font from a file path under the given family name. Style
    /// variants register as `family:style` (e.g. `Inter:bold`).
    pub fn load_font(&mut self, name: &str, path: &Path) -> Result<(), String> {
        let data = std::fs::read(path)
            .map_err(|e| format!("failed to read font file {}: {}", path.display(), e))?;
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| format!("failed to parse font {}: {}", name, e))?;
        self.font_cache.insert(name.to_string(), font);
        Ok(())
    }

    /// Resolve a font for a family and style: the styled variant first,
    /// then the plain family, then the system fallback.
    fn get_font(&self, family: &str, style: FontStyle) -> Option<&Font> {
        let style_key = match style {
            FontStyle::Normal => None,
            FontStyle::Bold => Some(format!("{}:bold", family)),
            FontStyle::Italic => Some(format!("{}:italic", family)),
            FontStyle::BoldItalic => Some(format!("{}:bold_italic", family)),
        };
        style_key
            .and_then(|key| self.font_cache.get(&key))
            .or_else(|| self.font_cache.get(family))
            .or_else(|| fallback_font())
    }

    /// Render a text block to a buffer sized to fit it.
    ///
    /// Splits on `\n`; lines advance by `line_height × size × scale`
    /// and justify within the block per the config. The caller places
    /// the returned block on the layer anchor per the alignment.
    pub fn render_block(&self, config: &TextConfig, scale: f64) -> FrameBuffer {
        let Some(font) = self.get_font(&config.font, config.style) else {
            tracing::warn!(
                font = %config.font,
                "no font available for text layer, rendering empty"
            );
            return FrameBuffer::new(1, 1, PixelFormat::Rgba8);
        };

        if config.text.is_empty() {
            return FrameBuffer::new(1, 1, PixelFormat::Rgba8);
        }

        let font_size = config.size * scale as f32;
        let line_spacing = (config.line_height * font_size).round() as i32;
        let lines: Vec<&str> = config.text.split('\n').collect();

        // First pass: measure each line.
        let mut line_metrics: Vec<LineMeasure> = Vec::with_capacity(lines.len());
        let mut max_width: i32 = 0;
        for &line_text in &lines {
            let measure = measure_line(font, line_text, font_size);
            max_width = max_width.max(measure.width);
            line_metrics.push(measure);
        }

        let canvas_width = max_width.max(1) as u32;
        let canvas_height = (line_spacing * lines.len() as i32).max(1) as u32;
        let mut fb = FrameBuffer::new(canvas_width, canvas_height, PixelFormat::Rgba8);

        // Second pass: render each line, vertically centered inside its
        // line box.
        for (i, &line_text) in lines.iter().enumerate() {
            let measure = &line_metrics[i];
            let x_offset = match config.align {
                TextAlign::Left => 0,
                TextAlign::Center => (max_width - measure.width) / 2,
                TextAlign::Right => max_width - measure.width,
            };
            let box_top = i as i32 * line_spacing;
            let pad = (line_spacing - (measure.ascent + measure.descent)) / 2;
            render_line_into(
                &mut fb,
                font,
                line_text,
                font_size,
                &config.color,
                x_offset,
                box_top + pad,
                measure.ascent,
            );
        }

        fb
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Measurements for a single line of text.
#[derive(Debug, Clone)]
struct LineMeasure {
    /// Total advance width.
    width: i32,
    /// Max ascent (above baseline).
    ascent: i32,
    /// Max descent (below baseline).
    descent: i32,
}

fn measure_line(font: &Font, text: &str, font_size: f32) -> LineMeasure {
    let mut total_width: i32 = 0;
    let mut max_ascent: i32 = 0;
    let mut max_descent: i32 = 0;

    for ch in text.chars() {
        let (metrics, _) = font.rasterize(ch, font_size);
        let ascent = metrics.height as i32 + metrics.ymin;
        let descent = -metrics.ymin;
        max_ascent = max_ascent.max(ascent);
        max_descent = max_descent.max(descent);
        total_width += metrics.advance_width as i32;
    }

    // Empty lines still take vertical space; size them off a space.
    if text.is_empty() {
        let (metrics, _) = font.rasterize(' ', font_size);
        max_ascent = metrics.height as i32 + metrics.ymin;
        max_descent = -metrics.ymin;
    }

    LineMeasure {
        width: total_width,
        ascent: max_ascent,
        descent: max_descent,
    }
}

#[allow(clippy::too_many_arguments)]
fn render_line_into(
    fb: &mut FrameBuffer,
    font: &Font,
    text: &str,
    font_size: f32,
    color: &Color,
    x_offset: i32,
    y_offset: i32,
    line_ascent: i32,
) {
    let [r, g, b, a] = color.to_rgba8();
    let mut cursor_x: i32 = x_offset;

    for ch in text.chars() {
        let (metrics, bitmap) = font.rasterize(ch, font_size);
        let glyph_x = cursor_x + metrics.xmin;
        let glyph_y = y_offset + line_ascent - (metrics.height as i32 + metrics.ymin);

        for gy in 0..metrics.height {
            for gx in 0..metrics.width {
                let coverage = bitmap[gy * metrics.width + gx];
                if coverage == 0 {
                    continue;
                }

                let px = glyph_x + gx as i32;
                let py = glyph_y + gy as i32;

                if px >= 0 && px < fb.width as i32 && py >= 0 && py < fb.height as i32 {
                    // Glyph coverage scales the text alpha.
                    let glyph_alpha = (coverage as f32 / 255.0) * (a as f32 / 255.0);
                    let final_alpha = (glyph_alpha * 255.0) as u8;
                    fb.blend_pixel(px as u32, py as u32, [r, g, b, final_alpha]);
                }
            }
        }

        cursor_x += metrics.advance_width as i32;
    }
}
