use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ChatError;
use crate::models::message::Turn;
use crate::models::model_id::ModelId;

/// Raw JSON body returned by an endpoint, before normalization.
pub type RawResponse = Value;

/// Transport-facing contract for the two Gemini operation families.
///
/// Implementations classify failures but do not interpret response bodies;
/// normalization into content parts happens in `providers::utils`.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Multi-turn text/multimodal generation over the full ordered history,
    /// including the newest user turn.
    async fn generate_content(
        &self,
        api_key: &str,
        model: &ModelId,
        contents: &[Turn],
    ) -> Result<RawResponse, ChatError>;

    /// Standalone image generation. Takes the prompt text alone; image
    /// generation is not multi-turn and never sees conversation history.
    async fn generate_images(
        &self,
        api_key: &str,
        model: &ModelId,
        prompt: &str,
    ) -> Result<RawResponse, ChatError>;
}
