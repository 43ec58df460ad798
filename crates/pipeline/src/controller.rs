//! Pipeline controller: drag events in, published predictions out
//!
//! The controller connects:
//! - Input handling (pointer and touch events from the UI)
//! - Stroke recording and surface rasterization
//! - Snapshot capture and tensor preprocessing
//! - Model invocation on the tokio runtime
//! - Publication of results, with stale results suppressed
//!
//! Input is handled synchronously on the caller's thread. Only the model call
//! runs elsewhere; its completion comes back through a channel and is applied
//! by [`PipelineController::next_completion`] or
//! [`PipelineController::drain_completions`].

use digitpad_config::{ConfigError, PipelineConfig};
use digitpad_inference::{
    ClassifierModel, InferenceError, InferenceInvoker, ModelHandle, PredictionResult,
    TensorPreprocessor,
};
use digitpad_ipc::{InputEvent, InputPhase, PipelineToUi, UiToPipeline};
use painting::{RawPoint, StrokeRecorder, SurfaceRasterizer};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::sink::ResultSink;

/// Where the controller is in the draw / infer cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Drawing,
    Inferring,
}

/// What happened to a resolved model call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Result (or error) was sent to the sink
    Published { request_id: u64 },
    /// The drawing it was computed from is gone; nothing was sent
    Discarded { request_id: u64 },
}

/// A resolved model call, sent back from the inference task
#[derive(Debug)]
struct Completion {
    request_id: u64,
    /// The snapshot had no ink; announced with the result
    blank: bool,
    result: Result<PredictionResult, InferenceError>,
}

/// Orchestrates recorder, rasterizer, preprocessor and invoker for one
/// drawing surface.
///
/// Every inference request gets an id from a monotonically increasing
/// sequence. Only the id in `pending` may publish; `clear()` and a new drag
/// empty it, so results for drawings that no longer exist are dropped.
pub struct PipelineController<M, S> {
    config: PipelineConfig,
    recorder: StrokeRecorder,
    rasterizer: SurfaceRasterizer,
    preprocessor: TensorPreprocessor,
    invoker: InferenceInvoker,
    model: ModelHandle<M>,
    sink: S,
    state: PipelineState,
    /// Last issued request id
    sequence: u64,
    /// Request whose result is still wanted
    pending: Option<u64>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl<M: ClassifierModel, S: ResultSink> PipelineController<M, S> {
    /// Create a controller. `model` may still be loading.
    ///
    /// Fails if `config` does not pass [`PipelineConfig::validate`].
    pub fn new(config: PipelineConfig, model: ModelHandle<M>, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Ok(Self {
            recorder: StrokeRecorder::from_config(&config),
            rasterizer: SurfaceRasterizer::from_config(&config),
            preprocessor: TensorPreprocessor::from_config(&config),
            invoker: InferenceInvoker::from_config(&config),
            config,
            model,
            sink,
            state: PipelineState::Idle,
            sequence: 0,
            pending: None,
            completions_tx,
            completions_rx,
        })
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn recorder(&self) -> &StrokeRecorder {
        &self.recorder
    }

    pub fn rasterizer(&self) -> &SurfaceRasterizer {
        &self.rasterizer
    }

    pub fn model(&self) -> &ModelHandle<M> {
        &self.model
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Check if a model call is in flight whose result will be published
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle any message from the UI.
    ///
    /// Returns the id of the inference request started by a drag end, if any.
    pub fn handle_message(&mut self, message: UiToPipeline) -> Result<Option<u64>, InferenceError> {
        match message {
            UiToPipeline::Input(event) => return self.handle_input(event),
            UiToPipeline::SetBrushColor { color } => self.recorder.set_color(color),
            UiToPipeline::SetBrushSize { size } => self.recorder.set_line_width(size),
            UiToPipeline::Clear => self.clear(),
        }
        Ok(None)
    }

    /// Dispatch one pointer or touch event
    pub fn handle_input(&mut self, event: InputEvent) -> Result<Option<u64>, InferenceError> {
        let raw = RawPoint::from(event);

        match event.phase() {
            InputPhase::Start => {
                self.on_drag_start(raw);
                Ok(None)
            }
            InputPhase::Move => {
                self.on_drag_move(raw);
                Ok(None)
            }
            InputPhase::End => self.on_drag_end(raw),
        }
    }

    /// Begin a stroke. Any pending result is superseded by the new drawing.
    pub fn on_drag_start(&mut self, raw: RawPoint) {
        if let Some(previous) = self.recorder.on_drag_start(raw) {
            debug!("on_drag_start: finalized previous stroke of {} points", previous.len());
        }
        if let Some(request_id) = self.pending.take() {
            debug!("on_drag_start: request {} superseded by new drawing", request_id);
        }
        self.state = PipelineState::Drawing;
    }

    /// Extend the stroke and draw the new segment. Ignored when not drawing.
    pub fn on_drag_move(&mut self, raw: RawPoint) {
        if let Some(segment) = self.recorder.on_drag_move(raw) {
            self.rasterizer.draw(&segment);
        }
    }

    /// Finish the stroke and start inference.
    ///
    /// Returns `Ok(None)` for a release without a stroke, `Ok(Some(id))` once
    /// a request is in flight. A missing model fails fast: the error is
    /// published and the controller is left idle.
    pub fn on_drag_end(&mut self, raw: RawPoint) -> Result<Option<u64>, InferenceError> {
        let Some(stroke) = self.recorder.on_drag_end(raw) else {
            return Ok(None);
        };
        debug!("on_drag_end: stroke of {} points complete", stroke.len());
        self.request_inference().map(Some)
    }

    /// Snapshot the surface and send it to the model.
    ///
    /// Must be called from within a tokio runtime; without one the request
    /// fails with a backend error.
    pub fn request_inference(&mut self) -> Result<u64, InferenceError> {
        self.sequence += 1;
        let request_id = self.sequence;

        let model_cfg = &self.config.model;
        let snapshot = self
            .rasterizer
            .capture_preview(model_cfg.target_width, model_cfg.target_height);
        let tensor = self.preprocessor.to_input_tensor(&snapshot);

        let Some(model) = self.model.get() else {
            return Err(self.fail_fast(request_id, InferenceError::ModelNotReady));
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                return Err(self.fail_fast(request_id, InferenceError::Backend(e.to_string())));
            }
        };

        let blank = tensor.is_blank();
        if blank {
            info!("Request {}: blank drawing, classifying zero tensor", request_id);
        }

        self.state = PipelineState::Inferring;
        self.pending = Some(request_id);

        let invoker = self.invoker.clone();
        let completions = self.completions_tx.clone();
        runtime.spawn(async move {
            let result = invoker.run(model.as_ref(), tensor).await;
            // The controller may be gone; nothing left to notify
            let _ = completions.send(Completion {
                request_id,
                blank,
                result,
            });
        });

        debug!("Request {} in flight", request_id);
        Ok(request_id)
    }

    /// Clear the surface and forget any pending result. Valid in any state.
    pub fn clear(&mut self) {
        self.recorder.cancel();
        self.rasterizer.clear();
        if let Some(request_id) = self.pending.take() {
            debug!("clear: request {} will be discarded", request_id);
        }
        // Anything issued before this point is stale
        self.sequence += 1;
        self.state = PipelineState::Idle;
        self.sink.publish(PipelineToUi::Cleared);
    }

    /// Wait for the next model call to resolve and apply it.
    ///
    /// Waits indefinitely if nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<CompletionOutcome> {
        let completion = self.completions_rx.recv().await?;
        Some(self.complete(completion))
    }

    /// Apply every completion that has already arrived, without waiting
    pub fn drain_completions(&mut self) -> Vec<CompletionOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(completion) = self.completions_rx.try_recv() {
            outcomes.push(self.complete(completion));
        }
        outcomes
    }

    fn complete(&mut self, completion: Completion) -> CompletionOutcome {
        let request_id = completion.request_id;
        if self.pending != Some(request_id) {
            debug!("Discarding stale result for request {}", request_id);
            return CompletionOutcome::Discarded { request_id };
        }

        self.pending = None;
        self.state = PipelineState::Idle;

        if completion.blank {
            self.sink.publish(PipelineToUi::EmptyCanvas { request_id });
        }

        match completion.result {
            Ok(prediction) => {
                info!("Request {}: predicted {}", request_id, prediction.label);
                let chart = prediction.chart_points();
                self.sink.publish(PipelineToUi::Prediction {
                    request_id,
                    label: prediction.label,
                    distribution: prediction.distribution,
                    chart,
                });
            }
            Err(e) => {
                warn!("Request {} failed: {}", request_id, e);
                self.publish_error(Some(request_id), &e);
            }
        }

        CompletionOutcome::Published { request_id }
    }

    fn fail_fast(&mut self, request_id: u64, error: InferenceError) -> InferenceError {
        warn!("Request {} not started: {}", request_id, error);
        self.pending = None;
        self.state = PipelineState::Idle;
        self.publish_error(Some(request_id), &error);
        error
    }

    fn publish_error(&mut self, request_id: Option<u64>, error: &InferenceError) {
        self.sink.publish(PipelineToUi::Error {
            request_id,
            code: error.code().to_string(),
            message: error.to_string(),
        });
    }
}
