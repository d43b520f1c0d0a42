use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every way a submission can fail, classified so the caller knows whether a
/// request was issued and whether history needs to be rolled back.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Deserialize, Serialize)]
pub enum ChatError {
    /// Input was rejected before anything was dispatched.
    #[error("{0}")]
    Validation(String),

    /// The resolved model does not support the requested operation.
    #[error("{0}")]
    CapabilityMismatch(String),

    /// A request is already in flight; submissions are not queued.
    #[error("Please wait for the current response to finish.")]
    Busy,

    /// No response was obtained from the endpoint.
    #[error("Request failed: {0}")]
    Transport(String),

    /// A response arrived but its body was not valid JSON.
    #[error("Failed to parse Gemini response: {0}")]
    MalformedResponse(String),

    /// The endpoint returned a non-success status.
    #[error("Gemini API error: {message}")]
    Api { status: u16, message: String },

    /// The prompt was rejected by the safety layer before generation.
    #[error("Blocked by safety filters: {0}")]
    Blocked(String),

    /// Generation started but was cut off by the safety layer.
    #[error("Response halted by Gemini safety filters.")]
    Halted,

    /// The response was well formed but normalization produced no parts.
    #[error("{0}")]
    EmptyResult(String),

    /// Out-of-order history bookkeeping. Signals a bug in the caller, not a
    /// runtime condition.
    #[error("Conversation protocol violation: {0}")]
    Protocol(String),
}

pub type ChatResult<T> = Result<T, ChatError>;

impl ChatError {
    /// The single human-readable line surfaced on the error channel.
    ///
    /// Messages quoting an unsupported-operation backend error get a hint
    /// appended, since the usual cause is a mistyped model id.
    pub fn user_message(&self) -> String {
        enrich_message(self.to_string())
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Transport(err.to_string())
    }
}

fn enrich_message(message: String) -> String {
    if message.contains("not found for API version")
        && (message.contains("generateContent") || message.contains("generateImages"))
    {
        format!("{message} Double-check the model ID or try another supported model.")
    } else {
        message
    }
}
