//! Main IPC message enums for communication between the pipeline and UI.

use serde::{Deserialize, Serialize};

use crate::error::IpcError;
use crate::input::InputEvent;

/// One bar of the probability chart: class label and its raw model score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionPoint {
    pub label: usize,
    pub y: f32,
}

/// Messages from the pipeline to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PipelineToUi {
    /// Predicted digit for a completed drawing
    Prediction {
        request_id: u64,
        label: usize,
        /// Raw model scores, one per class (None when not requested)
        distribution: Option<Vec<f32>>,
        /// Chart-ready view of the distribution
        chart: Vec<DistributionPoint>,
    },

    /// The drawing was blank; the model was fed an all-zero tensor
    EmptyCanvas { request_id: u64 },

    /// Inference failed; the pipeline is idle again
    Error {
        request_id: Option<u64>,
        code: String,
        message: String,
    },

    /// Surface and preview were cleared
    Cleared,
}

impl PipelineToUi {
    /// Encode for transport to the UI
    pub fn to_json(&self) -> Result<String, IpcError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Messages from the UI to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToPipeline {
    /// Drawing input
    Input(InputEvent),

    /// Set ink color (RGBA, 0.0-1.0)
    SetBrushColor { color: [f32; 4] },

    /// Set stroke width in pixels
    SetBrushSize { size: f32 },

    /// Clear the surface and drop any pending prediction
    Clear,
}

impl UiToPipeline {
    /// Decode a message received from the UI
    pub fn from_json(json: &str) -> Result<Self, IpcError> {
        serde_json::from_str(json).map_err(|e| IpcError::InvalidFormat(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerEvent;

    #[test]
    fn test_prediction_wire_format() {
        let message = PipelineToUi::Prediction {
            request_id: 7,
            label: 3,
            distribution: None,
            chart: vec![DistributionPoint { label: 0, y: 0.5 }],
        };
        let json = message.to_json().unwrap();
        assert!(json.contains(r#""type":"Prediction""#));
        assert!(json.contains(r#""label":3"#));

        let decoded: PipelineToUi = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_decode_ui_messages() {
        let clear = UiToPipeline::from_json(r#"{"type":"Clear"}"#).unwrap();
        assert_eq!(clear, UiToPipeline::Clear);

        let input =
            UiToPipeline::from_json(r#"{"type":"Input","data":{"Pointer":{"Down":{"x":1.0,"y":2.0}}}}"#)
                .unwrap();
        assert_eq!(
            input,
            UiToPipeline::Input(InputEvent::Pointer(PointerEvent::Down { x: 1.0, y: 2.0 }))
        );
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        let result = UiToPipeline::from_json(r#"{"type":"Undo"}"#);
        assert!(matches!(result, Err(IpcError::InvalidFormat(_))));
    }
}
