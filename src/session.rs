use crate::capabilities::{CapabilityRegistry, Operation};
use crate::conversation::Conversation;
use crate::errors::ChatError;
use crate::models::content::Part;
use crate::models::message::Turn;
use crate::models::model_id::ModelId;
use crate::providers::base::Provider;
use crate::providers::utils::{content_response_to_parts, images_response_to_parts};

/// A user-selected image staged for the next submission, as handed over by
/// the file collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingImage {
    pub name: String,
    pub mime_type: String,
    pub data: String,
}

/// One submission from the input surface.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub api_key: String,
    pub model: String,
    pub prompt: String,
}

/// Drives the end-to-end submit flow: validation, capability routing, request
/// dispatch, response normalization, and transactional history upkeep.
///
/// All mutable state of a chat lives here and is plain owned data; execution
/// is cooperative and single-flight, so no locking is involved. The session
/// always returns to idle — every exit path releases the guard, and every
/// failure after the user turn was recorded rolls it back.
pub struct Session {
    provider: Box<dyn Provider>,
    registry: CapabilityRegistry,
    conversation: Conversation,
    pending_image: Option<PendingImage>,
    in_flight: bool,
}

impl Session {
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self {
            provider,
            registry: CapabilityRegistry::new(),
            conversation: Conversation::new(),
            pending_image: None,
            in_flight: false,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn pending_image(&self) -> Option<&PendingImage> {
        self.pending_image.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Stage an image for the next submission, replacing any previous
    /// selection. Only image MIME types are accepted.
    pub fn attach_image(&mut self, image: PendingImage) -> Result<(), ChatError> {
        if !image.mime_type.starts_with("image/") {
            return Err(ChatError::Validation(
                "Please choose an image file.".to_string(),
            ));
        }
        self.pending_image = Some(image);
        Ok(())
    }

    /// Drop the staged image without submitting it.
    pub fn clear_image(&mut self) {
        self.pending_image = None;
    }

    /// Run one complete turn. On success the returned parts are what the
    /// rendering surface should paint for the model's reply; for content
    /// models the exchange is also recorded in the conversation history.
    pub async fn submit(&mut self, request: SubmitRequest) -> Result<Vec<Part>, ChatError> {
        if self.in_flight {
            return Err(ChatError::Busy);
        }

        self.in_flight = true;
        let outcome = self.run_turn(&request).await;
        self.in_flight = false;
        outcome
    }

    async fn run_turn(&mut self, request: &SubmitRequest) -> Result<Vec<Part>, ChatError> {
        let api_key = request.api_key.trim();
        let prompt = request.prompt.trim();

        if api_key.is_empty() {
            return Err(ChatError::Validation(
                "Gemini API key is required.".to_string(),
            ));
        }

        let model = ModelId::new(&request.model);
        if model.is_empty() {
            return Err(ChatError::Validation(
                "Select a Gemini model to continue.".to_string(),
            ));
        }

        if prompt.is_empty() && self.pending_image.is_none() {
            return Err(ChatError::Validation(
                "Enter a prompt or attach an image.".to_string(),
            ));
        }

        let capabilities = self.registry.resolve(&model);
        let can_generate_content = capabilities.contains(&Operation::GenerateContent);
        let can_generate_images = capabilities.contains(&Operation::GenerateImages);

        if self.pending_image.is_some() && !can_generate_content {
            return Err(ChatError::CapabilityMismatch(
                "This model does not accept image uploads. Try a Gemini multimodal model."
                    .to_string(),
            ));
        }

        if can_generate_content {
            self.content_turn(api_key, &model, prompt).await
        } else if can_generate_images {
            self.images_turn(api_key, &model, prompt).await
        } else {
            Err(ChatError::CapabilityMismatch(
                "Selected model does not appear to support text or image generation in this \
                 client. Try another model ID."
                    .to_string(),
            ))
        }
    }

    async fn content_turn(
        &mut self,
        api_key: &str,
        model: &ModelId,
        prompt: &str,
    ) -> Result<Vec<Part>, ChatError> {
        let mut user_turn = Turn::user();
        if !prompt.is_empty() {
            user_turn = user_turn.with_text(prompt);
        }
        // The staged image is consumed now; a failed request does not restore
        // it, matching how the selection box is cleared at send time.
        if let Some(image) = self.pending_image.take() {
            user_turn = user_turn.with_inline_data(image.data, image.mime_type);
        }

        let token = self.conversation.reserve_user(user_turn)?;

        let outcome = self
            .provider
            .generate_content(api_key, model, self.conversation.turns())
            .await
            .and_then(|response| content_response_to_parts(&response));

        match outcome {
            Ok(parts) => {
                let model_turn = Turn::model().with_parts(parts.iter().cloned());
                self.conversation.commit_model(token, model_turn)?;
                Ok(parts)
            }
            Err(error) => {
                if let Err(rollback_error) = self.conversation.rollback(token) {
                    tracing::error!(
                        "Failed to roll back reserved user turn: {}",
                        rollback_error
                    );
                }
                Err(error)
            }
        }
    }

    /// Image generation is single-shot and is not recorded as conversation
    /// state; the parts are only surfaced for rendering.
    async fn images_turn(
        &mut self,
        api_key: &str,
        model: &ModelId,
        prompt: &str,
    ) -> Result<Vec<Part>, ChatError> {
        let response = self.provider.generate_images(api_key, model, prompt).await?;
        images_response_to_parts(&response)
    }
}
