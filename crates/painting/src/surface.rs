//! CPU surface for drawing - RGBA bitmap at native surface resolution

use image::RgbaImage;

use crate::constants::BLANK_PIXEL;

/// The drawing bitmap.
///
/// Channels are kept as `f32` in `0.0..=1.0` while drawing and converted to
/// 8-bit only when a snapshot is taken.
pub struct CpuSurface {
    pub width: u32,
    pub height: u32,
    /// Row-major `[r, g, b, a]`
    pixels: Vec<[f32; 4]>,
}

impl CpuSurface {
    /// Blank surface of `width` x `height` pixels
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![BLANK_PIXEL; pixel_count],
        }
    }

    /// Reset every pixel to transparent black
    pub fn clear(&mut self) {
        self.pixels.fill(BLANK_PIXEL);
    }

    /// Pixel at `(x, y)`, or None outside the surface
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        self.index(x, y).map(|index| self.pixels[index])
    }

    /// Source-over composite of `color`, scaled by `coverage`, onto one pixel.
    /// Writes outside the surface are dropped.
    ///
    /// Pixels hold straight (unpremultiplied) alpha, matching the 8-bit
    /// read-back in [`CpuSurface::to_rgba_image`].
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [f32; 4], coverage: f32) {
        let Some(index) = self.index(x, y) else {
            return;
        };
        let src_alpha = (color[3] * coverage).clamp(0.0, 1.0);
        if src_alpha <= 0.0 {
            return;
        }
        let dst = self.pixels[index];

        // Destination contribution that shows through the source
        let dst_weight = dst[3] * (1.0 - src_alpha);
        let out_alpha = src_alpha + dst_weight;
        let mix = |src: f32, dst: f32| (src * src_alpha + dst * dst_weight) / out_alpha;

        self.pixels[index] = [
            mix(color[0], dst[0]),
            mix(color[1], dst[1]),
            mix(color[2], dst[2]),
            out_alpha,
        ];
    }

    /// Check whether every channel of every pixel is zero
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| *p == BLANK_PIXEL)
    }

    /// Copy the surface out as an 8-bit RGBA image
    pub fn to_rgba_image(&self) -> RgbaImage {
        let bytes: Vec<u8> = self
            .pixels
            .iter()
            .flat_map(|pixel| pixel.map(channel_to_u8))
            .collect();
        // Length is width * height * 4 by construction
        RgbaImage::from_raw(self.width, self.height, bytes)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    /// Native f32 pixel data, for hosts that upload the surface for display
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }
}

#[inline]
fn channel_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
