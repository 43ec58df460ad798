//! Immutable, resolution-normalized copies of the drawing surface

use image::RgbaImage;

/// An 8-bit RGBA copy of the surface at the model's input resolution.
///
/// Produced once per inference request. The pixel buffer cannot be mutated
/// through a `Snapshot`.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    image: RgbaImage,
}

impl Snapshot {
    /// Wrap an already resampled image
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// RGBA value at (x, y), or None if out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Values of one channel (0 = R .. 3 = A) in row-major order.
    /// An index past 3 yields nothing.
    pub fn channel(&self, index: usize) -> impl Iterator<Item = u8> + '_ {
        self.image
            .as_raw()
            .chunks_exact(4)
            .filter_map(move |pixel| pixel.get(index).copied())
    }

    /// Raw RGBA bytes in row-major order
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Borrow the underlying image (e.g. to encode a preview)
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Check whether every channel of every pixel is zero
    pub fn is_blank(&self) -> bool {
        self.image.as_raw().iter().all(|&v| v == 0)
    }
}
