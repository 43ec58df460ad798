//! Local inference through candle

use std::sync::Arc;

use candle_core::{DType, Device, Module, Tensor};

use crate::tensor::{InputTensor, OutputTensor};
use crate::{ClassifierModel, InferenceError};

impl From<candle_core::Error> for InferenceError {
    fn from(e: candle_core::Error) -> Self {
        InferenceError::Backend(e.to_string())
    }
}

/// Adapts any candle [`Module`] (a loaded network, or a closure) to
/// [`ClassifierModel`]. Forward passes run on tokio's blocking pool.
#[derive(Clone)]
pub struct CandleClassifier {
    module: Arc<dyn Module + Send + Sync>,
    device: Device,
    input_shape: Option<[usize; 4]>,
}

impl CandleClassifier {
    pub fn new(module: impl Module + Send + Sync + 'static, device: Device) -> Self {
        Self {
            module: Arc::new(module),
            device,
            input_shape: None,
        }
    }

    /// Declare the input shape the network was built for
    pub fn with_input_shape(mut self, shape: [usize; 4]) -> Self {
        self.input_shape = Some(shape);
        self
    }
}

impl ClassifierModel for CandleClassifier {
    async fn predict(&self, input: InputTensor) -> Result<OutputTensor, InferenceError> {
        let module = Arc::clone(&self.module);
        let device = self.device.clone();
        tokio::task::spawn_blocking(move || forward(module.as_ref(), &device, input))
            .await
            .map_err(|e| InferenceError::Backend(format!("inference task failed: {}", e)))?
    }

    fn input_shape(&self) -> Option<[usize; 4]> {
        self.input_shape
    }
}

fn forward(
    module: &(dyn Module + Send + Sync),
    device: &Device,
    input: InputTensor,
) -> Result<OutputTensor, InferenceError> {
    let [batch, height, width, channels] = input.shape();
    let tensor = Tensor::from_vec(input.into_data(), (batch, height, width, channels), device)?;
    let output = module.forward(&tensor)?;
    let shape = output.dims().to_vec();
    let data = output.flatten_all()?.to_dtype(DType::F32)?.to_vec1::<f32>()?;
    OutputTensor::new(shape, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_closure_module() {
        // Scores each class by the summed intensity times its index
        let module = |xs: &Tensor| -> candle_core::Result<Tensor> {
            let total = xs.sum_all()?;
            let weights = Tensor::new(&[[0f32, 1.0, 2.0]], xs.device())?;
            weights.broadcast_mul(&total)
        };
        let classifier = CandleClassifier::new(module, Device::Cpu);

        let input = InputTensor::from_intensities(2, 2, vec![0.0, 1.0, 0.5, 0.0]).unwrap();
        let output = classifier.predict(input).await.unwrap();

        assert_eq!(output.shape(), &[1, 3]);
        assert_eq!(output.class_scores().unwrap(), &[0.0, 1.5, 3.0]);
    }

    #[tokio::test]
    async fn test_declared_shape() {
        let identity = |xs: &Tensor| -> candle_core::Result<Tensor> { Ok(xs.clone()) };
        let classifier =
            CandleClassifier::new(identity, Device::Cpu).with_input_shape([1, 32, 32, 1]);
        assert_eq!(classifier.input_shape(), Some([1, 32, 32, 1]));
    }
}
