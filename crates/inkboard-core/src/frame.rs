use serde::{Deserialize, Serialize};

/// Pixel format of a frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit RGBA (4 bytes per pixel).
    Rgba8,
    /// 8-bit RGB (3 bytes per pixel, no alpha).
    Rgb8,
}

impl PixelFormat {
    /// Bytes per pixel for this format.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
        }
    }
}

/// A rendered raster as a raw pixel buffer.
///
/// Every layer renders into its own `FrameBuffer`, which the compositor
/// then alpha-blends into the output in z-order.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    /// Raw pixel data.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel format.
    pub format: PixelFormat,
}

impl FrameBuffer {
    /// Create a new frame buffer filled with zeros (transparent black).
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let size = (width as usize) * (height as usize) * format.bytes_per_pixel();
        Self {
            data: vec![0u8; size],
            width,
            height,
            format,
        }
    }

    /// Create a frame buffer filled with a solid color.
    pub fn solid(width: u32, height: u32, color: &crate::Color) -> Self {
        let format = PixelFormat::Rgba8;
        let pixel = color.to_rgba8();
        let pixel_count = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixel_count * 4);
        for _ in 0..pixel_count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data,
            width,
            height,
            format,
        }
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Total byte size of the pixel data.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    /// Get the RGBA value at a pixel coordinate. Returns None if out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.format.bytes_per_pixel();
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * bpp;
        match self.format {
            PixelFormat::Rgba8 => Some([
                self.data[offset],
                self.data[offset + 1],
                self.data[offset + 2],
                self.data[offset + 3],
            ]),
            PixelFormat::Rgb8 => Some([
                self.data[offset],
                self.data[offset + 1],
                self.data[offset + 2],
                255,
            ]),
        }
    }

    /// Set the RGBA value at a pixel coordinate. No-op if out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let bpp = self.format.bytes_per_pixel();
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * bpp;
        match self.format {
            PixelFormat::Rgba8 => {
                self.data[offset] = rgba[0];
                self.data[offset + 1] = rgba[1];
                self.data[offset + 2] = rgba[2];
                self.data[offset + 3] = rgba[3];
            }
            PixelFormat::Rgb8 => {
                self.data[offset] = rgba[0];
                self.data[offset + 1] = rgba[1];
                self.data[offset + 2] = rgba[2];
            }
        }
    }

    /// Blend a single RGBA value over the pixel at (x, y) using the
    /// source-over rule. No-op if out of bounds or fully transparent.
    pub fn blend_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if self.format != PixelFormat::Rgba8 || x >= self.width || y >= self.height {
            return;
        }
        let sa = rgba[3] as u32;
        if sa == 0 {
            return;
        }
        if sa == 255 {
            self.set_pixel(x, y, rgba);
            return;
        }
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let d = &mut self.data[offset..offset + 4];
        let da = d[3] as u32;
        let inv_sa = 255 - sa;
        let out_a = sa + ((da * inv_sa) / 255);
        if out_a == 0 {
            return;
        }
        for c in 0..3 {
            let s_c = rgba[c] as u32;
            let d_c = d[c] as u32;
            d[c] = ((s_c * sa * 255 + d_c * da * inv_sa) / (out_a * 255)) as u8;
        }
        d[3] = out_a as u8;
    }

    /// Multiply every pixel's alpha by `factor` in [0, 1]. Used to apply
    /// a layer's opacity before compositing.
    pub fn scale_alpha(&mut self, factor: f32) {
        if self.format != PixelFormat::Rgba8 {
            return;
        }
        let factor = factor.clamp(0.0, 1.0);
        if (factor - 1.0).abs() < f32::EPSILON {
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            px[3] = (px[3] as f32 * factor) as u8;
        }
    }

    /// Alpha-composite `src` on top of `self` at position (dx, dy).
    /// Uses integer math on clipped row slices so the inner loop
    /// auto-vectorizes.
    pub fn composite_over(&mut self, src: &FrameBuffer, dx: i32, dy: i32) {
        if self.format != PixelFormat::Rgba8 || src.format != PixelFormat::Rgba8 {
            return;
        }

        let dst_width = self.width as i32;
        let dst_height = self.height as i32;

        let mut start_y = 0;
        let mut end_y = src.height as i32;
        let mut start_x = 0;
        let mut end_x = src.width as i32;

        if dy < 0 {
            start_y = -dy;
        }
        if dy + end_y > dst_height {
            end_y = dst_height - dy;
        }
        if dx < 0 {
            start_x = -dx;
        }
        if dx + end_x > dst_width {
            end_x = dst_width - dx;
        }

        if start_x >= end_x || start_y >= end_y {
            return;
        }

        let src_stride = (src.width * 4) as usize;
        let dst_stride = (self.width * 4) as usize;

        for sy in start_y..end_y {
            let dst_y = dy + sy;
            let src_row_start = (sy as usize * src_stride) + (start_x as usize * 4);
            let dst_row_start = (dst_y as usize * dst_stride) + ((dx + start_x) as usize * 4);
            let len = (end_x - start_x) as usize * 4;

            let src_slice = &src.data[src_row_start..src_row_start + len];
            let dst_slice = &mut self.data[dst_row_start..dst_row_start + len];

            for (s, d) in src_slice.chunks_exact(4).zip(dst_slice.chunks_exact_mut(4)) {
                let sa = s[3] as u32;
                if sa == 0 {
                    continue;
                }
                if sa == 255 {
                    d.copy_from_slice(s);
                    continue;
                }

                let da = d[3] as u32;
                let inv_sa = 255 - sa;
                let out_a = sa + ((da * inv_sa) / 255);

                if out_a == 0 {
                    continue;
                }

                let s_r = s[0] as u32;
                let s_g = s[1] as u32;
                let s_b = s[2] as u32;
                let d_r = d[0] as u32;
                let d_g = d[1] as u32;
                let d_b = d[2] as u32;

                let out_r = (s_r * sa * 255 + d_r * da * inv_sa) / (out_a * 255);
                let out_g = (s_g * sa * 255 + d_g * da * inv_sa) / (out_a * 255);
                let out_b = (s_b * sa * 255 + d_b * da * inv_sa) / (out_a * 255);

                d[0] = out_r as u8;
                d[1] = out_g as u8;
                d[2] = out_b as u8;
                d[3] = out_a as u8;
            }
        }
    }

    /// Alpha-composite `src` rotated by `angle_rad` about its own center,
    /// with the rotated center landing at (cx, cy) in `self`.
    ///
    /// Destination pixels inside the rotated bounding box are inverse-mapped
    /// into the source with nearest-neighbor sampling. An angle of zero
    /// falls through to the straight `composite_over` path.
    pub fn composite_rotated(&mut self, src: &FrameBuffer, cx: f64, cy: f64, angle_rad: f64) {
        if self.format != PixelFormat::Rgba8 || src.format != PixelFormat::Rgba8 {
            return;
        }
        if angle_rad == 0.0 {
            let dx = (cx - src.width as f64 / 2.0).round() as i32;
            let dy = (cy - src.height as f64 / 2.0).round() as i32;
            self.composite_over(src, dx, dy);
            return;
        }

        let half_w = src.width as f64 / 2.0;
        let half_h = src.height as f64 / 2.0;
        // Bounding radius of the rotated source, used to clip the scan.
        let radius = (half_w * half_w + half_h * half_h).sqrt().ceil();

        let min_x = ((cx - radius).floor().max(0.0)) as i64;
        let max_x = ((cx + radius).ceil().min(self.width as f64)) as i64;
        let min_y = ((cy - radius).floor().max(0.0)) as i64;
        let max_y = ((cy + radius).ceil().min(self.height as f64)) as i64;
        if min_x >= max_x || min_y >= max_y {
            return;
        }

        let (sin, cos) = (-angle_rad).sin_cos();

        for y in min_y..max_y {
            for x in min_x..max_x {
                // Inverse-rotate the destination pixel center into source space.
                let rel_x = (x as f64 + 0.5) - cx;
                let rel_y = (y as f64 + 0.5) - cy;
                let src_x = rel_x * cos - rel_y * sin + half_w;
                let src_y = rel_x * sin + rel_y * cos + half_h;
                if src_x < 0.0 || src_y < 0.0 {
                    continue;
                }
                let (sx, sy) = (src_x as u32, src_y as u32);
                if sx >= src.width || sy >= src.height {
                    continue;
                }
                if let Some(rgba) = src.get_pixel(sx, sy) {
                    self.blend_pixel(x as u32, y as u32, rgba);
                }
            }
        }
    }
}
