/// Fully transparent pixel; the surface's blank state.
pub const BLANK_PIXEL: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// Thinnest line the rasterizer will draw, in pixels.
pub const MIN_LINE_WIDTH: f32 = 0.5;

/// Width of the anti-aliased edge ramp, in pixels.
pub const AA_EDGE_WIDTH: f32 = 1.0;
