use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::base::{Provider, RawResponse};
use crate::capabilities::Operation;
use crate::errors::ChatError;
use crate::models::message::Turn;
use crate::models::model_id::ModelId;

/// What a mock provider saw for one dispatch, for asserting payload shape.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub operation: Operation,
    pub model: String,
    pub history_len: usize,
    pub prompt: Option<String>,
}

/// A mock provider that returns pre-configured raw outcomes for testing
pub struct MockProvider {
    outcomes: Arc<Mutex<Vec<Result<RawResponse, ChatError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of outcomes
    pub fn new(outcomes: Vec<Result<RawResponse, ChatError>>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(outcomes)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle onto the call log, kept by tests before the provider is boxed
    pub fn call_log(&self) -> Arc<Mutex<Vec<RecordedCall>>> {
        Arc::clone(&self.calls)
    }

    fn next_outcome(&self) -> Result<RawResponse, ChatError> {
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            Err(ChatError::Transport("mock provider exhausted".to_string()))
        } else {
            outcomes.remove(0)
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn generate_content(
        &self,
        _api_key: &str,
        model: &ModelId,
        contents: &[Turn],
    ) -> Result<RawResponse, ChatError> {
        self.calls.lock().unwrap().push(RecordedCall {
            operation: Operation::GenerateContent,
            model: model.as_str().to_string(),
            history_len: contents.len(),
            prompt: None,
        });
        self.next_outcome()
    }

    async fn generate_images(
        &self,
        _api_key: &str,
        model: &ModelId,
        prompt: &str,
    ) -> Result<RawResponse, ChatError> {
        self.calls.lock().unwrap().push(RecordedCall {
            operation: Operation::GenerateImages,
            model: model.as_str().to_string(),
            history_len: 0,
            prompt: Some(prompt.to_string()),
        });
        self.next_outcome()
    }
}
