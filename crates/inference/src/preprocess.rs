//! Snapshot to model-input conversion

use digitpad_config::IntensityChannel;
use painting::Snapshot;
use tracing::debug;

use crate::tensor::InputTensor;

/// Converts snapshots into the `[1, H, W, 1]` tensor the classifier expects.
///
/// One raw channel is taken as intensity (blue unless configured otherwise)
/// and scaled by the snapshot's own maximum, so a drawn snapshot always peaks
/// at exactly 1.0. A blank snapshot stays all zeros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TensorPreprocessor {
    channel: IntensityChannel,
}

impl TensorPreprocessor {
    pub fn new(channel: IntensityChannel) -> Self {
        Self { channel }
    }

    pub fn from_config(config: &digitpad_config::PipelineConfig) -> Self {
        Self::new(config.model.channel)
    }

    pub fn channel(&self) -> IntensityChannel {
        self.channel
    }

    /// Build the model input for `snapshot`. Never fails.
    pub fn to_input_tensor(&self, snapshot: &Snapshot) -> InputTensor {
        let height = snapshot.height() as usize;
        let width = snapshot.width() as usize;

        let mut values: Vec<f32> = snapshot.channel(self.channel.index()).map(f32::from).collect();
        let max_val = values.iter().copied().fold(0.0, f32::max);

        if max_val == 0.0 {
            debug!("to_input_tensor: blank {}x{} snapshot, zero tensor", width, height);
            return InputTensor::zeros(height, width);
        }

        for value in &mut values {
            *value /= max_val;
        }

        debug!(
            "to_input_tensor: {}x{} from {:?} channel, max={}",
            width, height, self.channel, max_val
        );

        InputTensor::from_intensities(height, width, values)
            .unwrap_or_else(|| InputTensor::zeros(height, width))
    }
}
