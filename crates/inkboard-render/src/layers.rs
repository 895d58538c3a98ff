//! Per-kind layer renderers.
//!
//! Each renderer draws one layer at a precomputed draw position
//! (already camera-relative when a camera view is being composited).
//! Layers never mutate; opacity applies as an alpha multiplier on the
//! layer's rendered pixels, and rotation happens about the rendered
//! content's own center.

use crate::assets;
use crate::raster;
use crate::text::TextRenderer;
use inkboard_core::{FrameBuffer, InkboardResult, PixelFormat, Point2D};
use inkboard_scene::{
    FillMode, Layer, LayerContent, ShapeConfig, ShapeType, Stroke, TextAlign, TextConfig,
};

/// Segments per quadratic arc when flattening smoothed strokes.
const CURVE_SEGMENTS: usize = 12;

/// Render one layer onto the target buffer.
///
/// `draw_pos` is the layer anchor in target pixel space and
/// `pixel_ratio` the raster oversampling factor; the effective content
/// scale is `layer.scale × pixel_ratio`. Asset failures propagate so
/// the compositor can log and skip the layer.
pub async fn render_layer(
    target: &mut FrameBuffer,
    layer: &Layer,
    draw_pos: Point2D,
    pixel_ratio: f64,
    text: &TextRenderer,
) -> InkboardResult<()> {
    match &layer.content {
        LayerContent::Image { image_path } => {
            render_image(target, layer, image_path, draw_pos, pixel_ratio).await
        }
        LayerContent::Text { text_config } => {
            render_text(target, layer, text_config, draw_pos, pixel_ratio, text);
            Ok(())
        }
        LayerContent::Shape { shape_config } => {
            render_shape(target, layer, shape_config, draw_pos, pixel_ratio);
            Ok(())
        }
        LayerContent::Whiteboard { strokes } => {
            render_whiteboard(target, layer, strokes, draw_pos, pixel_ratio);
            Ok(())
        }
    }
}

/// Image layers anchor at their top-left corner and draw at natural
/// size times the layer scale.
async fn render_image(
    target: &mut FrameBuffer,
    layer: &Layer,
    image_path: &str,
    draw_pos: Point2D,
    pixel_ratio: f64,
) -> InkboardResult<()> {
    let img = assets::load_image(image_path).await?;
    let scale = layer.scale * pixel_ratio;
    let width = ((img.width as f64 * scale).round() as u32).max(1);
    let height = ((img.height as f64 * scale).round() as u32).max(1);

    let mut scaled = assets::resize_exact(&img, width, height);
    scaled.scale_alpha(layer.opacity);

    let cx = draw_pos.x + width as f64 / 2.0;
    let cy = draw_pos.y + height as f64 / 2.0;
    target.composite_rotated(&scaled, cx, cy, layer.rotation.to_radians());
    Ok(())
}

/// Text layers center vertically on the anchor; horizontally, `align`
/// positions the block relative to the anchor point, so left-aligned
/// text starts at the anchor and right-aligned text ends there.
fn render_text(
    target: &mut FrameBuffer,
    layer: &Layer,
    config: &TextConfig,
    draw_pos: Point2D,
    pixel_ratio: f64,
    text: &TextRenderer,
) {
    let mut block = text.render_block(config, layer.scale * pixel_ratio);
    block.scale_alpha(layer.opacity);
    let cx = block_anchor_x(draw_pos.x, block.width as f64, config.align);
    target.composite_rotated(&block, cx, draw_pos.y, layer.rotation.to_radians());
}

/// Horizontal center of the text block for a given anchor and
/// alignment.
fn block_anchor_x(anchor_x: f64, block_width: f64, align: TextAlign) -> f64 {
    match align {
        TextAlign::Left => anchor_x + block_width / 2.0,
        TextAlign::Center => anchor_x,
        TextAlign::Right => anchor_x - block_width / 2.0,
    }
}

/// Shape layers anchor at the shape's center.
fn render_shape(
    target: &mut FrameBuffer,
    layer: &Layer,
    config: &ShapeConfig,
    draw_pos: Point2D,
    pixel_ratio: f64,
) {
    if let ShapeType::Other(name) = &config.shape_type {
        tracing::warn!(layer = %layer.id, shape = %name, "unsupported shape type, skipping");
        return;
    }

    let scale = layer.scale * pixel_ratio;
    let w = config.width * scale;
    let h = config.height * scale;
    let sw = config.stroke_width * scale;

    // Circles and stars are sized by width alone; height is ignored.
    let (ew, eh) = match config.shape_type {
        ShapeType::Circle | ShapeType::Star => (w, w),
        _ => (w, h),
    };
    if ew <= 0.0 || eh <= 0.0 {
        return;
    }

    // Draw into a scratch buffer so opacity and rotation apply to the
    // shape as a whole.
    let pad = sw + 1.0;
    let bw = ((ew + 2.0 * pad).ceil() as u32).max(1);
    let bh = ((eh + 2.0 * pad).ceil() as u32).max(1);
    let mut scratch = FrameBuffer::new(bw, bh, PixelFormat::Rgba8);
    let cx = bw as f64 / 2.0;
    let cy = bh as f64 / 2.0;

    let fill = config.fill_color.to_rgba8();
    let stroke = config.stroke_color.to_rgba8();
    let do_fill = matches!(config.fill_mode, FillMode::Fill | FillMode::Both);
    let do_stroke = matches!(config.fill_mode, FillMode::Stroke | FillMode::Both) && sw > 0.0;

    match config.shape_type {
        ShapeType::Rectangle => {
            if do_fill {
                raster::fill_rect(&mut scratch, cx - w / 2.0, cy - h / 2.0, w, h, fill);
            }
            if do_stroke {
                raster::stroke_rect(&mut scratch, cx - w / 2.0, cy - h / 2.0, w, h, sw, stroke);
            }
        }
        ShapeType::Circle => {
            if do_fill {
                raster::fill_circle(&mut scratch, cx, cy, w / 2.0, fill);
            }
            if do_stroke {
                raster::stroke_circle(&mut scratch, cx, cy, w / 2.0, sw, stroke);
            }
        }
        ShapeType::Line => {
            // Corner to corner across the box; always stroked, whatever
            // the fill mode says.
            let points = [
                Point2D::new(cx - w / 2.0, cy - h / 2.0),
                Point2D::new(cx + w / 2.0, cy + h / 2.0),
            ];
            raster::stroke_polyline(&mut scratch, &points, sw.max(1.0), stroke);
        }
        ShapeType::Triangle => {
            let points = [
                Point2D::new(cx, cy - h / 2.0),
                Point2D::new(cx + w / 2.0, cy + h / 2.0),
                Point2D::new(cx - w / 2.0, cy + h / 2.0),
            ];
            if do_fill {
                raster::fill_polygon(&mut scratch, &points, fill);
            }
            if do_stroke {
                raster::stroke_polygon(&mut scratch, &points, sw, stroke);
            }
        }
        ShapeType::Star => {
            let points = star_points(cx, cy, w / 2.0);
            if do_fill {
                raster::fill_polygon(&mut scratch, &points, fill);
            }
            if do_stroke {
                raster::stroke_polygon(&mut scratch, &points, sw, stroke);
            }
        }
        ShapeType::Other(_) => unreachable!("handled above"),
    }

    scratch.scale_alpha(layer.opacity);
    target.composite_rotated(&scratch, draw_pos.x, draw_pos.y, layer.rotation.to_radians());
}

/// Five-pointed star: outer and inner vertices alternate, the inner
/// radius is half the outer, and the first point faces up.
fn star_points(cx: f64, cy: f64, outer_radius: f64) -> Vec<Point2D> {
    let inner_radius = outer_radius * 0.5;
    let mut points = Vec::with_capacity(10);
    for i in 0..10 {
        let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
        let angle = -std::f64::consts::FRAC_PI_2 + i as f64 * std::f64::consts::PI / 5.0;
        points.push(Point2D::new(
            cx + radius * angle.cos(),
            cy + radius * angle.sin(),
        ));
    }
    points
}

/// Whiteboard layers anchor at their top-left: stroke points are in
/// layer-local pixels relative to the layer position.
fn render_whiteboard(
    target: &mut FrameBuffer,
    layer: &Layer,
    strokes: &[Stroke],
    draw_pos: Point2D,
    pixel_ratio: f64,
) {
    let scale = layer.scale * pixel_ratio;
    let drawable: Vec<&Stroke> = strokes.iter().filter(|s| s.points.len() >= 2).collect();
    if drawable.is_empty() {
        return;
    }

    let mut min = Point2D::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point2D::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    let mut max_width: f64 = 0.0;
    for stroke in &drawable {
        max_width = max_width.max(stroke.stroke_width);
        for p in &stroke.points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
    }

    let pad = max_width * scale / 2.0 + 1.0;
    let bw = (((max.x - min.x) * scale + 2.0 * pad).ceil() as u32).max(1);
    let bh = (((max.y - min.y) * scale + 2.0 * pad).ceil() as u32).max(1);
    let mut scratch = FrameBuffer::new(bw, bh, PixelFormat::Rgba8);

    let to_local = |p: &Point2D| Point2D {
        x: (p.x - min.x) * scale + pad,
        y: (p.y - min.y) * scale + pad,
    };

    for stroke in &drawable {
        let path = smooth_stroke_path(&stroke.points);
        let local: Vec<Point2D> = path.iter().map(&to_local).collect();
        raster::stroke_polyline(
            &mut scratch,
            &local,
            (stroke.stroke_width * scale).max(1.0),
            stroke.stroke_color.to_rgba8(),
        );
    }

    scratch.scale_alpha(layer.opacity);
    let content_cx = draw_pos.x + (min.x + (max.x - min.x) / 2.0) * scale;
    let content_cy = draw_pos.y + (min.y + (max.y - min.y) / 2.0) * scale;
    target.composite_rotated(&scratch, content_cx, content_cy, layer.rotation.to_radians());
}

/// Flatten a raw point list into a smoothed polyline.
///
/// Three or more points get quadratic midpoint smoothing: each interior
/// point becomes the control of an arc ending at the midpoint to the
/// next point. Two points draw a straight segment.
fn smooth_stroke_path(points: &[Point2D]) -> Vec<Point2D> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut path = vec![points[0]];
    let mut start = points[0];
    for i in 1..points.len() - 1 {
        let end = points[i].lerp(&points[i + 1], 0.5);
        let arc = raster::flatten_quadratic(start, points[i], end, CURVE_SEGMENTS);
        path.extend_from_slice(&arc[1..]);
        start = end;
    }
    path.push(points[points.len() - 1]);
    path
}
