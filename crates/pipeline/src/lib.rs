//! Digitpad drawing pipeline
//!
//! Turns pointer and touch drags into strokes on a CPU surface, snapshots the
//! surface at the model's input size and publishes the predicted digit.
//!
//! ```text
//! UI events -> StrokeRecorder -> SurfaceRasterizer -> Snapshot
//!           -> TensorPreprocessor -> InferenceInvoker -> ResultSink
//! ```

mod controller;
mod sink;

pub use controller::{CompletionOutcome, PipelineController, PipelineState};
pub use sink::ResultSink;

pub use digitpad_config::{ConfigError, PipelineConfig};
pub use digitpad_inference::{ClassifierModel, InferenceError, ModelHandle, PredictionResult};
pub use digitpad_ipc::{PipelineToUi, UiToPipeline};
