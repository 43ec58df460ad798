//! Stroke recorder: turns drag gestures into strokes.

use tracing::{debug, warn};

use crate::transform::{clamp_to_surface, CoordinateTransform, OffsetTransform};
use crate::types::{FinishedStroke, InputSource, Point, RawPoint, Segment, Stroke};

/// Tracks the in-progress freehand path from drag start to drag end.
///
/// The recorder owns the currently selected ink color and width, plus one
/// coordinate transform per input source. It never touches pixels; accepted
/// moves come back as [`Segment`]s for the rasterizer.
///
/// # Example
///
/// ```ignore
/// let mut recorder = StrokeRecorder::new(280, 280);
/// recorder.on_drag_start(RawPoint::pointer(10.0, 10.0));
/// if let Some(segment) = recorder.on_drag_move(RawPoint::pointer(20.0, 12.0)) {
///     rasterizer.draw_segment(segment.from, segment.to, segment.color, segment.width);
/// }
/// let stroke = recorder.on_drag_end(RawPoint::pointer(20.0, 12.0));
/// ```
pub struct StrokeRecorder {
    width: u32,
    height: u32,
    pointer_transform: Box<dyn CoordinateTransform>,
    touch_transform: Box<dyn CoordinateTransform>,
    color: [f32; 4],
    line_width: f32,
    /// Active stroke; `Some` while dragging
    active: Option<Stroke>,
}

impl std::fmt::Debug for StrokeRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrokeRecorder")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("color", &self.color)
            .field("line_width", &self.line_width)
            .field("active_len", &self.active_len())
            .finish()
    }
}

impl StrokeRecorder {
    /// Create a recorder for a surface of the given size, with identity
    /// transforms, white ink and a 5 px line.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pointer_transform: Box::new(OffsetTransform::default()),
            touch_transform: Box::new(OffsetTransform::default()),
            color: digitpad_config::DEFAULT_INK_COLOR,
            line_width: digitpad_config::DEFAULT_LINE_WIDTH,
            active: None,
        }
    }

    /// Create a recorder from pipeline configuration
    pub fn from_config(config: &digitpad_config::PipelineConfig) -> Self {
        let mut recorder = Self::new(config.surface.width, config.surface.height);
        recorder.set_transform(
            InputSource::Pointer,
            OffsetTransform::from_offsets(config.input.pointer),
        );
        recorder.set_transform(
            InputSource::Touch,
            OffsetTransform::from_offsets(config.input.touch),
        );
        recorder.set_color(config.brush.color);
        recorder.set_line_width(config.brush.line_width);
        recorder
    }

    /// Replace the coordinate transform for one input source
    pub fn set_transform(&mut self, source: InputSource, transform: impl CoordinateTransform + 'static) {
        match source {
            InputSource::Pointer => self.pointer_transform = Box::new(transform),
            InputSource::Touch => self.touch_transform = Box::new(transform),
        }
    }

    /// Set the ink color used by the next stroke
    pub fn set_color(&mut self, color: [f32; 4]) {
        self.color = color;
    }

    /// Get the currently selected ink color
    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    /// Set the line width used by the next stroke
    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    /// Get the currently selected line width
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Check if a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Number of points in the active stroke (0 when idle)
    pub fn active_len(&self) -> usize {
        self.active.as_ref().map(Stroke::len).unwrap_or(0)
    }

    /// Transform a raw point into clamped surface coordinates
    pub fn to_surface(&self, raw: RawPoint) -> Point {
        let transform = match raw.source {
            InputSource::Pointer => &self.pointer_transform,
            InputSource::Touch => &self.touch_transform,
        };
        let (x, y) = transform.to_surface(raw.x, raw.y);
        clamp_to_surface(x, y, self.width, self.height)
    }

    /// Begin a new stroke at `raw`.
    ///
    /// If a stroke is already active it is finalized first and returned, so
    /// the caller still sees every completed stroke.
    pub fn on_drag_start(&mut self, raw: RawPoint) -> Option<FinishedStroke> {
        let superseded = self.active.take().map(|stroke| {
            warn!(
                "Drag start while a stroke was active ({} points); finalizing it",
                stroke.len()
            );
            stroke.finish()
        });

        let point = self.to_surface(raw);
        debug!(
            "StrokeRecorder::on_drag_start: {:?} ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            raw.source, raw.x, raw.y, point.x, point.y
        );
        self.active = Some(Stroke::begin(point, self.color, self.line_width, raw.source));

        superseded
    }

    /// Extend the active stroke. Returns the segment to draw, or None when
    /// no drag is in progress.
    pub fn on_drag_move(&mut self, raw: RawPoint) -> Option<Segment> {
        let point = self.to_surface(raw);
        let stroke = self.active.as_mut()?;
        let from = stroke.last_point().unwrap_or(point);
        stroke.push(point);

        Some(Segment {
            from,
            to: point,
            color: stroke.color(),
            width: stroke.line_width(),
        })
    }

    /// Finish the active stroke and hand it back, or None if idle.
    ///
    /// The release position goes through the same transform but is not
    /// appended; releasing draws nothing.
    pub fn on_drag_end(&mut self, raw: RawPoint) -> Option<FinishedStroke> {
        let point = self.to_surface(raw);
        let Some(stroke) = self.active.take() else {
            debug!("StrokeRecorder::on_drag_end: no active stroke, ignoring");
            return None;
        };
        debug!(
            "StrokeRecorder::on_drag_end: {} points, released at ({:.1}, {:.1})",
            stroke.len(),
            point.x,
            point.y
        );
        Some(stroke.finish())
    }

    /// Drop the active stroke without finalizing it
    pub fn cancel(&mut self) {
        if let Some(stroke) = self.active.take() {
            debug!("StrokeRecorder::cancel: discarded {} points", stroke.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_length_is_moves_plus_one() {
        let mut recorder = StrokeRecorder::new(100, 100);
        recorder.on_drag_start(RawPoint::pointer(1.0, 1.0));

        let moves: Vec<(f32, f32)> = (0..25).map(|i| (i as f32 * 3.0, 50.0 - i as f32)).collect();
        for &(x, y) in &moves {
            assert!(recorder.on_drag_move(RawPoint::pointer(x, y)).is_some());
        }

        let stroke = recorder.on_drag_end(RawPoint::pointer(0.0, 0.0)).unwrap();
        assert_eq!(stroke.len(), moves.len() + 1);
        assert_eq!(stroke.points()[0], Point::new(1.0, 1.0));
        for (point, &(x, y)) in stroke.points()[1..].iter().zip(&moves) {
            assert_eq!(*point, Point::new(x, y));
        }
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let mut recorder = StrokeRecorder::new(100, 100);
        assert!(recorder.on_drag_move(RawPoint::pointer(5.0, 5.0)).is_none());
        assert!(!recorder.is_dragging());
        assert!(recorder.on_drag_end(RawPoint::pointer(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_segments_chain_from_previous_point() {
        let mut recorder = StrokeRecorder::new(100, 100);
        recorder.set_color([1.0, 0.0, 0.0, 1.0]);
        recorder.set_line_width(8.0);
        recorder.on_drag_start(RawPoint::pointer(10.0, 10.0));

        let first = recorder.on_drag_move(RawPoint::pointer(20.0, 10.0)).unwrap();
        assert_eq!(first.from, Point::new(10.0, 10.0));
        assert_eq!(first.to, Point::new(20.0, 10.0));
        assert_eq!(first.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(first.width, 8.0);

        let second = recorder.on_drag_move(RawPoint::pointer(20.0, 30.0)).unwrap();
        assert_eq!(second.from, Point::new(20.0, 10.0));
    }

    #[test]
    fn test_color_change_applies_to_next_stroke() {
        let mut recorder = StrokeRecorder::new(100, 100);
        recorder.on_drag_start(RawPoint::pointer(0.0, 0.0));
        recorder.set_color([0.0, 0.0, 1.0, 1.0]);
        let segment = recorder.on_drag_move(RawPoint::pointer(1.0, 1.0)).unwrap();
        assert_eq!(segment.color, digitpad_config::DEFAULT_INK_COLOR);
        recorder.on_drag_end(RawPoint::pointer(1.0, 1.0));

        recorder.on_drag_start(RawPoint::pointer(0.0, 0.0));
        let segment = recorder.on_drag_move(RawPoint::pointer(1.0, 1.0)).unwrap();
        assert_eq!(segment.color, [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_touch_offset_applies_to_start_and_move() {
        let config = digitpad_config::PipelineConfig::default();
        let mut recorder = StrokeRecorder::from_config(&config);

        recorder.on_drag_start(RawPoint::touch(30.0, 180.0));
        recorder.on_drag_move(RawPoint::touch(40.0, 200.0));
        let stroke = recorder.on_drag_end(RawPoint::touch(40.0, 200.0)).unwrap();

        assert_eq!(stroke.source(), InputSource::Touch);
        assert_eq!(stroke.points(), &[Point::new(30.0, 30.0), Point::new(40.0, 50.0)]);
    }

    #[test]
    fn test_points_are_clamped_not_dropped() {
        let mut recorder = StrokeRecorder::new(50, 40);
        recorder.on_drag_start(RawPoint::pointer(-10.0, 10.0));
        recorder.on_drag_move(RawPoint::pointer(80.0, 100.0));
        let stroke = recorder.on_drag_end(RawPoint::pointer(80.0, 100.0)).unwrap();

        assert_eq!(stroke.points(), &[Point::new(0.0, 10.0), Point::new(49.0, 39.0)]);
    }

    #[test]
    fn test_restart_finalizes_previous_stroke() {
        let mut recorder = StrokeRecorder::new(100, 100);
        recorder.on_drag_start(RawPoint::pointer(1.0, 1.0));
        recorder.on_drag_move(RawPoint::pointer(2.0, 2.0));

        let previous = recorder.on_drag_start(RawPoint::pointer(50.0, 50.0)).unwrap();
        assert_eq!(previous.len(), 2);
        assert!(recorder.is_dragging());
        assert_eq!(recorder.active_len(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut recorder = StrokeRecorder::new(100, 100);
        recorder.on_drag_start(RawPoint::pointer(1.0, 1.0));
        recorder.cancel();
        assert!(!recorder.is_dragging());
        assert!(recorder.on_drag_end(RawPoint::pointer(1.0, 1.0)).is_none());
    }
}
