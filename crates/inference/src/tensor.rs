//! Model input and output tensors

use crate::InferenceError;

/// Model input: shape `[1, H, W, 1]`, values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    shape: [usize; 4],
    data: Vec<f32>,
}

impl InputTensor {
    /// All-zero tensor for an `height x width` image
    pub fn zeros(height: usize, width: usize) -> Self {
        Self {
            shape: [1, height, width, 1],
            data: vec![0.0; height * width],
        }
    }

    /// Build from row-major intensities. Returns None if the length does not
    /// match `height * width`.
    pub fn from_intensities(height: usize, width: usize, data: Vec<f32>) -> Option<Self> {
        if data.len() != height * width {
            return None;
        }
        Some(Self {
            shape: [1, height, width, 1],
            data,
        })
    }

    /// `[batch, height, width, channels]`
    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn height(&self) -> usize {
        self.shape[1]
    }

    pub fn width(&self) -> usize {
        self.shape[2]
    }

    /// Row-major values
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Largest element (0.0 for an empty tensor)
    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(0.0, f32::max)
    }

    /// Check whether every element is zero (blank drawing)
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }
}

/// Raw model output, expected shape `[1, K]` with index = class label.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl OutputTensor {
    /// Build from an explicit shape; the element count must match
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self, InferenceError> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(InferenceError::ShapeMismatch {
                expected: format!("{} elements for shape {:?}", expected, shape),
                actual: format!("{} elements", data.len()),
            });
        }
        Ok(Self { shape, data })
    }

    /// Batch of one: shape `[1, scores.len()]`
    pub fn from_scores(scores: Vec<f32>) -> Self {
        Self {
            shape: vec![1, scores.len()],
            data: scores,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The K class scores, after checking the shape is `[1, K]` with K >= 1
    pub fn class_scores(&self) -> Result<&[f32], InferenceError> {
        match self.shape.as_slice() {
            [1, k] if *k > 0 => Ok(&self.data),
            other => Err(InferenceError::ShapeMismatch {
                expected: "[1, K]".to_string(),
                actual: format!("{:?}", other),
            }),
        }
    }
}
