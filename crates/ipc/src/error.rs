//! Errors raised while encoding or decoding pipeline messages.

#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Malformed message from UI: {0}")]
    InvalidFormat(String),
}
