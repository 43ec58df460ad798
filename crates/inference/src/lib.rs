//! Digit classification for Digitpad
//!
//! Turns surface snapshots into model input tensors and model output tensors
//! into predictions. The model itself is an external capability behind
//! [`ClassifierModel`]; with the `local` feature, any candle module can be
//! plugged in via `CandleClassifier`.

mod invoker;
mod model;
mod preprocess;
mod tensor;

#[cfg(feature = "local")]
mod local;

pub use invoker::{argmax, InferenceInvoker, PredictionResult};
pub use model::ModelHandle;
pub use preprocess::TensorPreprocessor;
pub use tensor::{InputTensor, OutputTensor};

#[cfg(feature = "local")]
pub use local::CandleClassifier;

use std::future::Future;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("Model not ready: still loading")]
    ModelNotReady,

    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Model failed: {0}")]
    Backend(String),
}

impl InferenceError {
    /// Stable identifier sent to the UI alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            Self::ModelNotReady => "model_not_ready",
            Self::ShapeMismatch { .. } => "shape_mismatch",
            Self::Backend(_) => "backend",
        }
    }
}

/// Trait for digit classifier backends
///
/// `predict` may take noticeable wall-clock time (warm-up, device transfer)
/// and is always awaited off the input path.
pub trait ClassifierModel: Send + Sync + 'static {
    /// Score the input; the result is expected to have shape `[1, K]`
    fn predict(
        &self,
        input: InputTensor,
    ) -> impl Future<Output = Result<OutputTensor, InferenceError>> + Send;

    /// Input shape the model accepts, if it declares one
    fn input_shape(&self) -> Option<[usize; 4]> {
        None
    }
}
