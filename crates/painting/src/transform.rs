//! Device-to-surface coordinate transforms and clamping

use crate::types::Point;

/// Maps raw device coordinates of one input source into surface space.
///
/// Each input source gets its own transform so pointer and touch input share
/// a single recorder.
pub trait CoordinateTransform: Send + Sync {
    /// Convert raw (x, y) into unclamped surface coordinates
    fn to_surface(&self, x: f32, y: f32) -> (f32, f32);
}

/// Subtracts a fixed offset (surface position plus any letterbox)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OffsetTransform {
    pub offset_x: f32,
    pub offset_y: f32,
}

impl OffsetTransform {
    pub fn new(offset_x: f32, offset_y: f32) -> Self {
        Self { offset_x, offset_y }
    }

    pub fn from_offsets(offsets: [f32; 2]) -> Self {
        Self::new(offsets[0], offsets[1])
    }
}

impl CoordinateTransform for OffsetTransform {
    #[inline]
    fn to_surface(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.offset_x, y - self.offset_y)
    }
}

/// Clamp surface coordinates into `[0, width) x [0, height)`.
///
/// Points are pulled onto the last pixel row/column rather than dropped, so a
/// stroke that leaves the surface continues along its edge. NaN maps to 0.
pub fn clamp_to_surface(x: f32, y: f32, width: u32, height: u32) -> Point {
    Point {
        x: clamp_axis(x, width),
        y: clamp_axis(y, height),
    }
}

#[inline]
fn clamp_axis(value: f32, extent: u32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    let max = extent.saturating_sub(1) as f32;
    value.clamp(0.0, max)
}
