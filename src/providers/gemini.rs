use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};

use super::base::{Provider, RawResponse};
use super::configs::GeminiProviderConfig;
use crate::capabilities::Operation;
use crate::errors::ChatError;
use crate::models::message::Turn;
use crate::models::model_id::ModelId;

pub struct GeminiProvider {
    client: Client,
    config: GeminiProviderConfig,
}

impl GeminiProvider {
    pub fn new(config: GeminiProviderConfig) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let config = GeminiProviderConfig::from_env()?;
        Ok(Self::new(config)?)
    }

    fn endpoint(&self, model: &ModelId, operation: Operation) -> String {
        format!(
            "{}/v1beta/{}:{}",
            self.config.host.trim_end_matches('/'),
            model,
            operation
        )
    }

    /// One request, one classified outcome. The body is parsed before the
    /// status check because rejection bodies carry the server's message.
    async fn post(
        &self,
        url: &str,
        api_key: &str,
        payload: Value,
    ) -> Result<RawResponse, ChatError> {
        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let data: Value = serde_json::from_str(&body)
            .map_err(|e| ChatError::MalformedResponse(e.to_string()))?;

        if status != StatusCode::OK {
            let message = data
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!(
                        "{} {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("request rejected")
                    )
                });
            tracing::warn!("Gemini rejected the request: {}", message);
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(data)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate_content(
        &self,
        api_key: &str,
        model: &ModelId,
        contents: &[Turn],
    ) -> Result<RawResponse, ChatError> {
        tracing::debug!("Dispatching generateContent to {} ({} turns)", model, contents.len());
        let url = self.endpoint(model, Operation::GenerateContent);
        let payload = json!({ "contents": contents });
        self.post(&url, api_key, payload).await
    }

    async fn generate_images(
        &self,
        api_key: &str,
        model: &ModelId,
        prompt: &str,
    ) -> Result<RawResponse, ChatError> {
        tracing::debug!("Dispatching generateImages to {}", model);
        let url = self.endpoint(model, Operation::GenerateImages);
        let payload = json!({ "prompt": { "text": prompt } });
        self.post(&url, api_key, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::message::Turn;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> GeminiProvider {
        GeminiProvider::new(GeminiProviderConfig::new(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_generate_content_posts_full_history() {
        let server = MockServer::start().await;
        let response_body = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "Hi"}]}}]
        });

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "test_api_key"))
            .and(body_json(serde_json::json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "Hello?"}]}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body.clone()))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let model = ModelId::new("gemini-1.5-flash");
        let contents = vec![Turn::user().with_text("Hello?")];

        let raw = provider
            .generate_content("test_api_key", &model, &contents)
            .await
            .unwrap();
        assert_eq!(raw, response_body);
    }

    #[tokio::test]
    async fn test_generate_images_sends_prompt_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/imagen-3.0-generate-002:generateImages"))
            .and(query_param("key", "test_api_key"))
            .and(body_json(serde_json::json!({"prompt": {"text": "a goose"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "generatedImages": [{"b64Image": "AAAA"}]
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let model = ModelId::new("imagen-3.0-generate-002");

        let raw = provider
            .generate_images("test_api_key", &model, "a goose")
            .await
            .unwrap();
        assert!(raw.get("generatedImages").is_some());
    }

    #[tokio::test]
    async fn test_rejection_carries_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"code": 404, "message": "models/unknown is not found for API version v1beta, or does not support generateContent"}
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let model = ModelId::new("unknown");

        let error = provider
            .generate_content("test_api_key", &model, &[Turn::user().with_text("hi")])
            .await
            .unwrap_err();

        match error {
            ChatError::Api { status, message } => {
                assert_eq!(status, 404);
                assert!(message.contains("not found for API version"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejection_without_message_uses_status_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let model = ModelId::new("gemini-1.5-flash");

        let error = provider
            .generate_content("test_api_key", &model, &[Turn::user().with_text("hi")])
            .await
            .unwrap_err();

        match error {
            ChatError::Api { status, message } => {
                assert_eq!(status, 503);
                assert!(message.starts_with("503"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let model = ModelId::new("gemini-1.5-flash");

        let error = provider
            .generate_content("test_api_key", &model, &[Turn::user().with_text("hi")])
            .await
            .unwrap_err();
        assert!(matches!(error, ChatError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport() {
        // Nothing is listening on this port.
        let provider =
            GeminiProvider::new(GeminiProviderConfig::new("http://127.0.0.1:9".to_string()))
                .unwrap();
        let model = ModelId::new("gemini-1.5-flash");

        let error = provider
            .generate_content("test_api_key", &model, &[Turn::user().with_text("hi")])
            .await
            .unwrap_err();
        assert!(matches!(error, ChatError::Transport(_)));
    }
}
