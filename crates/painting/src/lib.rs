//! Digitpad painting system - stroke capture and surface rasterization
//!
//! This crate provides the drawing half of the pipeline:
//! - [`types`] - Points, strokes and segments
//! - [`transform`] - Per-source coordinate transforms and clamping
//! - [`recorder`] - Stroke recorder driven by drag events
//! - [`surface`] - CPU RGBA surface (the bitmap)
//! - [`raster`] - Surface rasterizer: segment drawing, clear, snapshots
//! - [`snapshot`] - Immutable resampled copies handed to inference

pub mod constants;
pub mod raster;
pub mod recorder;
pub mod snapshot;
pub mod surface;
pub mod transform;
pub mod types;

pub use constants::*;
pub use raster::*;
pub use recorder::*;
pub use snapshot::*;
pub use surface::*;
pub use transform::*;
pub use types::*;
