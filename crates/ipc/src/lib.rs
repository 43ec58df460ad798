//! IPC message protocol for Digitpad
//!
//! Defines the message types exchanged between the drawing pipeline and the
//! UI that hosts the surface, the prediction label and the probability chart.

mod error;
mod input;
mod messages;

pub use error::IpcError;
pub use input::{InputEvent, InputPhase, InputSource, PointerEvent, TouchEvent};
pub use messages::{DistributionPoint, PipelineToUi, UiToPipeline};
