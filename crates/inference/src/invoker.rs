//! Model invocation and prediction read-out

use digitpad_ipc::DistributionPoint;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::ModelHandle;
use crate::tensor::InputTensor;
use crate::{ClassifierModel, InferenceError};

/// Predicted digit, optionally with the raw per-class scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: usize,
    pub distribution: Option<Vec<f32>>,
}

impl PredictionResult {
    /// One chart bar per class; empty when no distribution was requested
    pub fn chart_points(&self) -> Vec<DistributionPoint> {
        self.distribution
            .iter()
            .flatten()
            .enumerate()
            .map(|(label, &y)| DistributionPoint { label, y })
            .collect()
    }
}

/// Index of the highest score; ties go to the lowest index and NaN never
/// wins over a number. Returns None for an empty slice.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let (first, rest) = scores.split_first()?;
    let mut best_index = 0;
    let mut best = *first;
    for (offset, &score) in rest.iter().enumerate() {
        if score > best || (best.is_nan() && !score.is_nan()) {
            best = score;
            best_index = offset + 1;
        }
    }
    Some(best_index)
}

/// Calls the classifier and reads a [`PredictionResult`] out of its output.
///
/// Cheap to clone so a copy can travel into a spawned task.
#[derive(Debug, Clone)]
pub struct InferenceInvoker {
    include_distribution: bool,
    num_classes: Option<usize>,
}

impl Default for InferenceInvoker {
    fn default() -> Self {
        Self {
            include_distribution: true,
            num_classes: None,
        }
    }
}

impl InferenceInvoker {
    pub fn new(include_distribution: bool) -> Self {
        Self {
            include_distribution,
            num_classes: None,
        }
    }

    /// Invoker that also checks the model scores exactly `num_classes` classes
    pub fn from_config(config: &digitpad_config::PipelineConfig) -> Self {
        Self {
            include_distribution: config.model.include_distribution,
            num_classes: Some(config.model.num_classes),
        }
    }

    /// Predict with the model in `handle`; fails fast if it is not loaded
    pub async fn predict<M: ClassifierModel>(
        &self,
        handle: &ModelHandle<M>,
        tensor: InputTensor,
    ) -> Result<PredictionResult, InferenceError> {
        let model = handle.get().ok_or(InferenceError::ModelNotReady)?;
        self.run(model.as_ref(), tensor).await
    }

    /// Predict with an already loaded model
    pub async fn run<M: ClassifierModel>(
        &self,
        model: &M,
        tensor: InputTensor,
    ) -> Result<PredictionResult, InferenceError> {
        if let Some(expected) = model.input_shape() {
            if expected != tensor.shape() {
                return Err(InferenceError::ShapeMismatch {
                    expected: format!("{:?}", expected),
                    actual: format!("{:?}", tensor.shape()),
                });
            }
        }

        let output = model.predict(tensor).await?;
        let scores = output.class_scores()?;

        if let Some(expected) = self.num_classes {
            if scores.len() != expected {
                return Err(InferenceError::ShapeMismatch {
                    expected: format!("[1, {}]", expected),
                    actual: format!("{:?}", output.shape()),
                });
            }
        }

        let label = argmax(scores).ok_or_else(|| InferenceError::ShapeMismatch {
            expected: "[1, K] with K >= 1".to_string(),
            actual: format!("{:?}", output.shape()),
        })?;
        debug!("InferenceInvoker::run: label={} over {} classes", label, scores.len());

        Ok(PredictionResult {
            label,
            distribution: self.include_distribution.then(|| scores.to_vec()),
        })
    }
}
