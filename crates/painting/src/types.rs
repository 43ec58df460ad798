use digitpad_ipc::InputEvent;
use serde::{Deserialize, Serialize};

pub use digitpad_ipc::InputSource;

/// A point in device/page coordinates, before any transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub source: InputSource,
    pub x: f32,
    pub y: f32,
}

impl From<InputEvent> for RawPoint {
    fn from(event: InputEvent) -> Self {
        let (x, y) = event.position();
        Self {
            source: event.source(),
            x,
            y,
        }
    }
}

impl RawPoint {
    pub fn pointer(x: f32, y: f32) -> Self {
        Self {
            source: InputSource::Pointer,
            x,
            y,
        }
    }

    pub fn touch(x: f32, y: f32) -> Self {
        Self {
            source: InputSource::Touch,
            x,
            y,
        }
    }
}

/// A point in surface-local pixel coordinates (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A line segment to render, emitted for every accepted drag move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    /// Ink color `[r, g, b, a]` in 0.0-1.0
    pub color: [f32; 4],
    /// Stroke width in pixels
    pub width: f32,
}

/// An in-progress stroke: points captured between drag start and drag end
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
    color: [f32; 4],
    line_width: f32,
    source: InputSource,
}

impl Stroke {
    pub(crate) fn begin(first: Point, color: [f32; 4], line_width: f32, source: InputSource) -> Self {
        Self {
            points: vec![first],
            color,
            line_width,
            source,
        }
    }

    pub(crate) fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub(crate) fn finish(self) -> FinishedStroke {
        FinishedStroke(self)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn source(&self) -> InputSource {
        self.source
    }
}

/// A finalized stroke. No further points can be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedStroke(Stroke);

impl FinishedStroke {
    pub fn points(&self) -> &[Point] {
        self.0.points()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn color(&self) -> [f32; 4] {
        self.0.color()
    }

    pub fn line_width(&self) -> f32 {
        self.0.line_width()
    }

    pub fn source(&self) -> InputSource {
        self.0.source()
    }
}
