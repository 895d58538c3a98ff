//! CPU drawing primitives used by the shape and stroke renderers.
//!
//! All functions take f64 coordinates in the target buffer's pixel
//! space and blend with source-over. Coverage is binary (pixel centers
//! inside the figure are painted); determinism matters more here than
//! antialiasing.

use inkboard_core::{FrameBuffer, PixelFormat, Point2D};

/// Fill an axis-aligned rectangle.
pub fn fill_rect(fb: &mut FrameBuffer, x: f64, y: f64, w: f64, h: f64, rgba: [u8; 4]) {
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let x0 = x.floor().max(0.0) as i64;
    let y0 = y.floor().max(0.0) as i64;
    let x1 = ((x + w).ceil() as i64).min(fb.width as i64);
    let y1 = ((y + h).ceil() as i64).min(fb.height as i64);
    for py in y0..y1 {
        for px in x0..x1 {
            let cx = px as f64 + 0.5;
            let cy = py as f64 + 0.5;
            if cx >= x && cx < x + w && cy >= y && cy < y + h {
                fb.blend_pixel(px as u32, py as u32, rgba);
            }
        }
    }
}

/// Stroke an axis-aligned rectangle outline. The stroke straddles the
/// rectangle's edge, half inside and half outside.
pub fn stroke_rect(
    fb: &mut FrameBuffer,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    stroke_width: f64,
    rgba: [u8; 4],
) {
    if w <= 0.0 || h <= 0.0 || stroke_width <= 0.0 {
        return;
    }
    let half = stroke_width / 2.0;
    let (ox0, oy0) = (x - half, y - half);
    let (ox1, oy1) = (x + w + half, y + h + half);
    let (ix0, iy0) = (x + half, y + half);
    let (ix1, iy1) = (x + w - half, y + h - half);

    let px0 = ox0.floor().max(0.0) as i64;
    let py0 = oy0.floor().max(0.0) as i64;
    let px1 = (ox1.ceil() as i64).min(fb.width as i64);
    let py1 = (oy1.ceil() as i64).min(fb.height as i64);
    for py in py0..py1 {
        for px in px0..px1 {
            let cx = px as f64 + 0.5;
            let cy = py as f64 + 0.5;
            let in_outer = cx >= ox0 && cx < ox1 && cy >= oy0 && cy < oy1;
            let in_inner = cx >= ix0 && cx < ix1 && cy >= iy0 && cy < iy1;
            if in_outer && !in_inner {
                fb.blend_pixel(px as u32, py as u32, rgba);
            }
        }
    }
}

/// Fill an axis-aligned ellipse centered at (cx, cy).
pub fn fill_ellipse(fb: &mut FrameBuffer, cx: f64, cy: f64, rx: f64, ry: f64, rgba: [u8; 4]) {
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    let x0 = (cx - rx).floor().max(0.0) as i64;
    let y0 = (cy - ry).floor().max(0.0) as i64;
    let x1 = ((cx + rx).ceil() as i64).min(fb.width as i64);
    let y1 = ((cy + ry).ceil() as i64).min(fb.height as i64);
    for py in y0..y1 {
        for px in x0..x1 {
            let dx = (px as f64 + 0.5 - cx) / rx;
            let dy = (py as f64 + 0.5 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                fb.blend_pixel(px as u32, py as u32, rgba);
            }
        }
    }
}

/// Stroke an axis-aligned ellipse outline, straddling the edge.
pub fn stroke_ellipse(
    fb: &mut FrameBuffer,
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    stroke_width: f64,
    rgba: [u8; 4],
) {
    if rx <= 0.0 || ry <= 0.0 || stroke_width <= 0.0 {
        return;
    }
    let half = stroke_width / 2.0;
    let (orx, ory) = (rx + half, ry + half);
    let (irx, iry) = ((rx - half).max(0.0), (ry - half).max(0.0));
    let x0 = (cx - orx).floor().max(0.0) as i64;
    let y0 = (cy - ory).floor().max(0.0) as i64;
    let x1 = ((cx + orx).ceil() as i64).min(fb.width as i64);
    let y1 = ((cy + ory).ceil() as i64).min(fb.height as i64);
    for py in y0..y1 {
        for px in x0..x1 {
            let dx = px as f64 + 0.5 - cx;
            let dy = py as f64 + 0.5 - cy;
            let in_outer = (dx / orx).powi(2) + (dy / ory).powi(2) <= 1.0;
            let in_inner =
                irx > 0.0 && iry > 0.0 && (dx / irx).powi(2) + (dy / iry).powi(2) <= 1.0;
            if in_outer && !in_inner {
                fb.blend_pixel(px as u32, py as u32, rgba);
            }
        }
    }
}

/// Fill a circle centered at (cx, cy).
pub fn fill_circle(fb: &mut FrameBuffer, cx: f64, cy: f64, radius: f64, rgba: [u8; 4]) {
    fill_ellipse(fb, cx, cy, radius, radius, rgba);
}

/// Stroke a circle outline.
pub fn stroke_circle(
    fb: &mut FrameBuffer,
    cx: f64,
    cy: f64,
    radius: f64,
    stroke_width: f64,
    rgba: [u8; 4],
) {
    stroke_ellipse(fb, cx, cy, radius, radius, stroke_width, rgba);
}

/// Fill a closed polygon with the even-odd rule via scanline
/// intersection.
pub fn fill_polygon(fb: &mut FrameBuffer, points: &[Point2D], rgba: [u8; 4]) {
    if points.len() < 3 {
        return;
    }
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    let y0 = min_y.floor().max(0.0) as i64;
    let y1 = (max_y.ceil() as i64).min(fb.height as i64);

    let mut crossings: Vec<f64> = Vec::new();
    for py in y0..y1 {
        let scan_y = py as f64 + 0.5;
        crossings.clear();
        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            // Half-open interval so shared vertices count once.
            if (a.y <= scan_y && b.y > scan_y) || (b.y <= scan_y && a.y > scan_y) {
                let t = (scan_y - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
        crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        for pair in crossings.chunks_exact(2) {
            let x0 = pair[0].max(0.0) as i64;
            let x1 = (pair[1].ceil() as i64).min(fb.width as i64);
            for px in x0..x1 {
                let cx = px as f64 + 0.5;
                if cx >= pair[0] && cx < pair[1] {
                    fb.blend_pixel(px as u32, py as u32, rgba);
                }
            }
        }
    }
}

/// Stroke a closed polygon outline by stroking its edge loop.
pub fn stroke_polygon(fb: &mut FrameBuffer, points: &[Point2D], width: f64, rgba: [u8; 4]) {
    if points.len() < 2 {
        return;
    }
    let mut closed: Vec<Point2D> = points.to_vec();
    closed.push(points[0]);
    stroke_polyline(fb, &closed, width, rgba);
}

/// Stroke an open polyline with round caps and joins.
///
/// Disks are stamped along each segment into a scratch coverage buffer
/// which composites once, so overlapping stamps do not darken
/// translucent strokes.
pub fn stroke_polyline(fb: &mut FrameBuffer, points: &[Point2D], width: f64, rgba: [u8; 4]) {
    if points.is_empty() || width <= 0.0 {
        return;
    }
    let half = width / 2.0;

    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min) - half;
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max) + half;
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min) - half;
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max) + half;

    let ox = min_x.floor().max(0.0);
    let oy = min_y.floor().max(0.0);
    let bw = (max_x.ceil().min(fb.width as f64) - ox).max(0.0) as u32;
    let bh = (max_y.ceil().min(fb.height as f64) - oy).max(0.0) as u32;
    if bw == 0 || bh == 0 {
        return;
    }

    let mut scratch = FrameBuffer::new(bw, bh, PixelFormat::Rgba8);
    let stamp = |scratch: &mut FrameBuffer, x: f64, y: f64| {
        let x0 = (x - ox - half).floor().max(0.0) as i64;
        let y0 = (y - oy - half).floor().max(0.0) as i64;
        let x1 = ((x - ox + half).ceil() as i64).min(bw as i64);
        let y1 = ((y - oy + half).ceil() as i64).min(bh as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f64 + 0.5 - (x - ox);
                let dy = py as f64 + 0.5 - (y - oy);
                if dx * dx + dy * dy <= half * half {
                    scratch.set_pixel(px as u32, py as u32, rgba);
                }
            }
        }
    };

    stamp(&mut scratch, points[0].x, points[0].y);
    for segment in points.windows(2) {
        let (a, b) = (segment[0], segment[1]);
        let len = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
        let steps = (len / 0.5).ceil().max(1.0) as usize;
        for step in 1..=steps {
            let t = step as f64 / steps as f64;
            stamp(&mut scratch, a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
        }
    }

    fb.composite_over(&scratch, ox as i32, oy as i32);
}

/// Flatten a quadratic Bézier segment into a polyline, endpoints
/// included.
pub fn flatten_quadratic(p0: Point2D, ctrl: Point2D, p1: Point2D, segments: usize) -> Vec<Point2D> {
    let segments = segments.max(1);
    let mut out = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let t = i as f64 / segments as f64;
        let mt = 1.0 - t;
        out.push(Point2D {
            x: mt * mt * p0.x + 2.0 * mt * t * ctrl.x + t * t * p1.x,
            y: mt * mt * p0.y + 2.0 * mt * t * ctrl.y + t * t * p1.y,
        });
    }
    out
}
