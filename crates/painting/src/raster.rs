//! Surface rasterizer: owns the bitmap, draws stroke segments, produces snapshots

use digitpad_config::ResampleFilter;
use image::imageops::{self, FilterType};
use tracing::debug;

use crate::constants::{AA_EDGE_WIDTH, MIN_LINE_WIDTH};
use crate::snapshot::Snapshot;
use crate::surface::CpuSurface;
use crate::types::{Point, Segment};

/// Owns the drawing surface and is the only writer to it.
///
/// Segments are rendered as anti-aliased capsules (round caps and joins).
/// Snapshots are resampled with the configured filter; the default is
/// bilinear, `Nearest` is available for models trained on hard-edged input.
pub struct SurfaceRasterizer {
    surface: CpuSurface,
    filter: ResampleFilter,
    /// Last snapshot taken for inference, kept for display
    preview: Option<Snapshot>,
}

impl SurfaceRasterizer {
    /// Create a rasterizer with a blank surface of the given size
    pub fn new(width: u32, height: u32, filter: ResampleFilter) -> Self {
        Self {
            surface: CpuSurface::new(width, height),
            filter,
            preview: None,
        }
    }

    /// Create a rasterizer from pipeline configuration
    pub fn from_config(config: &digitpad_config::PipelineConfig) -> Self {
        Self::new(config.surface.width, config.surface.height, config.model.filter)
    }

    /// Get the surface width
    pub fn width(&self) -> u32 {
        self.surface.width
    }

    /// Get the surface height
    pub fn height(&self) -> u32 {
        self.surface.height
    }

    /// Read-only access to the bitmap
    pub fn surface(&self) -> &CpuSurface {
        &self.surface
    }

    /// Raw bitmap bytes for display upload
    pub fn surface_bytes(&self) -> &[u8] {
        self.surface.as_bytes()
    }

    /// Check whether nothing has been drawn since the last clear
    pub fn is_blank(&self) -> bool {
        self.surface.is_blank()
    }

    /// Draw a segment produced by the stroke recorder
    pub fn draw(&mut self, segment: &Segment) {
        self.draw_segment(segment.from, segment.to, segment.color, segment.width);
    }

    /// Render a line of the given width and color between two points.
    ///
    /// Coverage falls off linearly over one pixel at the edge of the capsule.
    /// A zero-length segment stamps a round dot. Parts outside the surface
    /// are clipped.
    pub fn draw_segment(&mut self, from: Point, to: Point, color: [f32; 4], width: f32) {
        let radius = width.max(MIN_LINE_WIDTH) / 2.0;
        let reach = radius + AA_EDGE_WIDTH;

        let x_min_f = (from.x.min(to.x) - reach).floor();
        let y_min_f = (from.y.min(to.y) - reach).floor();
        let x_max_f = (from.x.max(to.x) + reach).ceil();
        let y_max_f = (from.y.max(to.y) + reach).ceil();

        // Clamp to surface bounds
        let x_min = (x_min_f.max(0.0) as u32).min(self.surface.width);
        let y_min = (y_min_f.max(0.0) as u32).min(self.surface.height);
        let x_max = (x_max_f.max(0.0) as u32).min(self.surface.width);
        let y_max = (y_max_f.max(0.0) as u32).min(self.surface.height);

        if x_min >= x_max || y_min >= y_max {
            debug!("draw_segment: outside surface bounds, skipped");
            return;
        }

        for py in y_min..y_max {
            for px in x_min..x_max {
                let center = Point::new(px as f32 + 0.5, py as f32 + 0.5);
                let distance = distance_to_segment(center, from, to);
                let coverage = edge_coverage(distance, radius);
                if coverage > 0.0 {
                    self.surface.blend_pixel(px, py, color, coverage);
                }
            }
        }

        debug!(
            "draw_segment: ({:.1}, {:.1}) -> ({:.1}, {:.1}), width={:.1}, region=({}, {}) {}x{}",
            from.x,
            from.y,
            to.x,
            to.y,
            width,
            x_min,
            y_min,
            x_max - x_min,
            y_max - y_min
        );
    }

    /// Reset the bitmap and the preview to blank. Idempotent.
    pub fn clear(&mut self) {
        self.surface.clear();
        self.preview = None;
    }

    /// Copy the bitmap resampled to `target_width x target_height`.
    ///
    /// Does not touch the bitmap; the result depends only on the current
    /// pixels, the target size and the configured filter.
    pub fn capture_snapshot(&self, target_width: u32, target_height: u32) -> Snapshot {
        let target_width = target_width.max(1);
        let target_height = target_height.max(1);
        let full = self.surface.to_rgba_image();

        if full.dimensions() == (target_width, target_height) {
            return Snapshot::from_image(full);
        }

        let filter = match self.filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Bilinear => FilterType::Triangle,
        };
        Snapshot::from_image(imageops::resize(&full, target_width, target_height, filter))
    }

    /// Capture a snapshot and keep a copy as the preview
    pub fn capture_preview(&mut self, target_width: u32, target_height: u32) -> Snapshot {
        let snapshot = self.capture_snapshot(target_width, target_height);
        self.preview = Some(snapshot.clone());
        snapshot
    }

    /// The last snapshot taken for inference, if any since the last clear
    pub fn preview(&self) -> Option<&Snapshot> {
        self.preview.as_ref()
    }
}

/// Distance from `p` to the closest point of segment `a`-`b`
#[inline]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let length_sq = abx * abx + aby * aby;
    if length_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / length_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + abx * t, a.y + aby * t))
}

/// Coverage of a pixel whose center is `distance` from the stroke spine.
/// 1.0 inside the stroke, ramping to 0.0 across the anti-aliased edge.
#[inline]
pub fn edge_coverage(distance: f32, radius: f32) -> f32 {
    ((radius + AA_EDGE_WIDTH * 0.5 - distance) / AA_EDGE_WIDTH).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    #[test]
    fn test_distance_to_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((distance_to_segment(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-5);
        assert!((distance_to_segment(Point::new(-4.0, 0.0), a, b) - 4.0).abs() < 1e-5);
        // Degenerate segment is a point
        assert!((distance_to_segment(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_edge_coverage() {
        assert_eq!(edge_coverage(0.0, 2.5), 1.0);
        assert_eq!(edge_coverage(10.0, 2.5), 0.0);
        assert!((edge_coverage(2.5, 2.5) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_draw_segment_marks_line() {
        let mut raster = SurfaceRasterizer::new(64, 64, ResampleFilter::Bilinear);
        raster.draw_segment(Point::new(10.0, 32.0), Point::new(50.0, 32.0), WHITE, 5.0);

        let on_line = raster.surface().get_pixel(30, 31).unwrap();
        assert_eq!(on_line, WHITE);
        let far = raster.surface().get_pixel(30, 5).unwrap();
        assert_eq!(far, [0.0; 4]);
        // Round cap reaches past the end point by the radius
        assert!(raster.surface().get_pixel(51, 31).unwrap()[3] > 0.0);
    }

    #[test]
    fn test_antialiased_edge_keeps_ink_color() {
        let mut raster = SurfaceRasterizer::new(16, 16, ResampleFilter::Bilinear);
        raster.draw_segment(Point::new(2.0, 8.25), Point::new(14.0, 8.25), WHITE, 2.0);

        let snapshot = raster.capture_snapshot(16, 16);
        // Row 9 centers sit 1.25 px off the spine: a quarter covered
        assert_eq!(snapshot.pixel(8, 9), Some([255, 255, 255, 64]));
        // Row 7 centers sit 0.75 px off the spine
        assert_eq!(snapshot.pixel(8, 7), Some([255, 255, 255, 191]));
        assert_eq!(snapshot.pixel(8, 8), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_zero_length_segment_stamps_dot() {
        let mut raster = SurfaceRasterizer::new(16, 16, ResampleFilter::Bilinear);
        let p = Point::new(8.0, 8.0);
        raster.draw_segment(p, p, WHITE, 4.0);
        assert_eq!(raster.surface().get_pixel(7, 7), Some(WHITE));
    }

    #[test]
    fn test_segment_outside_is_clipped() {
        let mut raster = SurfaceRasterizer::new(16, 16, ResampleFilter::Bilinear);
        raster.draw_segment(Point::new(-100.0, -100.0), Point::new(-50.0, -50.0), WHITE, 4.0);
        assert!(raster.is_blank());
    }

    #[test]
    fn test_clear_then_snapshot_is_blank() {
        let mut raster = SurfaceRasterizer::new(100, 60, ResampleFilter::Bilinear);
        raster.draw_segment(Point::new(0.0, 0.0), Point::new(99.0, 59.0), WHITE, 9.0);
        raster.capture_preview(32, 32);
        assert!(raster.preview().is_some());

        raster.clear();
        assert!(raster.preview().is_none());

        for (w, h) in [(32, 32), (28, 28), (1, 1), (100, 60), (7, 300)] {
            let snapshot = raster.capture_snapshot(w, h);
            assert_eq!((snapshot.width(), snapshot.height()), (w, h));
            assert!(snapshot.as_raw().iter().all(|&v| v == 0));
        }
    }

    #[test]
    fn test_snapshot_does_not_mutate_surface() {
        let mut raster = SurfaceRasterizer::new(64, 64, ResampleFilter::Nearest);
        raster.draw_segment(Point::new(5.0, 5.0), Point::new(60.0, 60.0), WHITE, 6.0);
        let before = raster.surface_bytes().to_vec();

        let first = raster.capture_snapshot(32, 32);
        let second = raster.capture_snapshot(32, 32);

        assert_eq!(raster.surface_bytes(), before.as_slice());
        assert_eq!(first, second);
        assert!(!first.is_blank());
    }

    #[test]
    fn test_draw_from_segment() {
        let mut raster = SurfaceRasterizer::new(32, 32, ResampleFilter::Bilinear);
        raster.draw(&Segment {
            from: Point::new(4.0, 16.0),
            to: Point::new(28.0, 16.0),
            color: [0.0, 0.0, 1.0, 1.0],
            width: 3.0,
        });
        let snapshot = raster.capture_snapshot(32, 32);
        assert_eq!(snapshot.pixel(16, 15), Some([0, 0, 255, 255]));
    }
}
