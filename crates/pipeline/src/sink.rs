//! Destinations for published pipeline results

use digitpad_ipc::PipelineToUi;
use tracing::debug;

/// Receives predictions, notices and errors from the controller.
///
/// Publishing is fire-and-forget; no acknowledgment is expected.
pub trait ResultSink {
    fn publish(&mut self, message: PipelineToUi);
}

impl ResultSink for tokio::sync::mpsc::UnboundedSender<PipelineToUi> {
    fn publish(&mut self, message: PipelineToUi) {
        if self.send(message).is_err() {
            debug!("ResultSink: UI receiver dropped, message discarded");
        }
    }
}

impl ResultSink for std::sync::mpsc::Sender<PipelineToUi> {
    fn publish(&mut self, message: PipelineToUi) {
        if self.send(message).is_err() {
            debug!("ResultSink: UI receiver dropped, message discarded");
        }
    }
}

/// Collects messages in memory; useful for headless runs
impl ResultSink for Vec<PipelineToUi> {
    fn publish(&mut self, message: PipelineToUi) {
        self.push(message);
    }
}
