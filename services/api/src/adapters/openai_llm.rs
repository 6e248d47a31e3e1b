//! services/api/src/adapters/openai_llm.rs
//!
//! This module contains the adapter for OpenAI-compatible chat models.
//! It implements the `TextGenerationService` port from the `core` crate. Gemini is
//! reached through its OpenAI-compatible endpoint with the same adapter.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use authoring_core::ports::{GenerationOptions, PortError, PortResult, TextGenerationService};
use base64::Engine;
use serde::{Deserialize, Serialize};

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const GEMINI_OPENAI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

const IMAGE_SIZE: &str = "1024x1024";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TextGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiTextAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    images: Option<ImageEndpoint>,
}

/// The images endpoint, only wired for the OpenAI provider.
#[derive(Clone)]
struct ImageEndpoint {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl OpenAiTextAdapter {
    /// An adapter for OpenAI itself, with image generation.
    pub fn openai(api_key: &str, model: String, image_model: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(OPENAI_API_BASE);
        Self {
            client: Client::with_config(config),
            model,
            images: Some(ImageEndpoint {
                http: reqwest::Client::new(),
                api_base: OPENAI_API_BASE.to_string(),
                api_key: api_key.to_string(),
                model: image_model,
            }),
        }
    }

    /// An adapter for Gemini's OpenAI-compatible endpoint. Text only.
    pub fn gemini(api_key: &str, model: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(GEMINI_OPENAI_API_BASE);
        Self {
            client: Client::with_config(config),
            model,
            images: None,
        }
    }
}

//=========================================================================================
// `TextGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextGenerationService for OpenAiTextAdapter {
    async fn generate(&self, prompt: &str, options: GenerationOptions) -> PortResult<String> {
        let messages = vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?,
        )];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(options.max_tokens)
            .temperature(options.temperature)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Upstream(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Upstream("LLM response contained no text content.".to_string())
            })
    }

    async fn generate_image(&self, prompt: &str) -> PortResult<Option<Vec<u8>>> {
        let Some(images) = &self.images else {
            return Ok(None);
        };

        let request = ImageRequest {
            model: &images.model,
            prompt,
            size: IMAGE_SIZE,
        };
        let response = images
            .http
            .post(format!("{}/images/generations", images.api_base))
            .bearer_auth(&images.api_key)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| PortError::Upstream(e.to_string()))?;
        let body: ImageResponse = response
            .json()
            .await
            .map_err(|e| PortError::Upstream(e.to_string()))?;

        decode_first_image(body).map(Some)
    }
}

//=========================================================================================
// Images API Payloads
//=========================================================================================

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    b64_json: Option<String>,
}

fn decode_first_image(body: ImageResponse) -> PortResult<Vec<u8>> {
    let encoded = body
        .data
        .into_iter()
        .next()
        .and_then(|d| d.b64_json)
        .ok_or_else(|| PortError::Upstream("Image response contained no data.".to_string()))?;
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| PortError::Upstream(format!("Image payload is not valid base64: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_the_first_b64_image() {
        let body: ImageResponse =
            serde_json::from_str(r#"{"data":[{"b64_json":"iVBORw=="},{"b64_json":"AA=="}]}"#)
                .unwrap();
        assert_eq!(decode_first_image(body).unwrap(), vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn empty_image_payload_is_an_upstream_failure() {
        let body: ImageResponse = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(matches!(
            decode_first_image(body),
            Err(PortError::Upstream(_))
        ));
    }

    #[tokio::test]
    async fn gemini_has_no_image_capability() {
        let adapter = OpenAiTextAdapter::gemini("key", "gemini-2.0-flash".to_string());
        assert_eq!(adapter.generate_image("a chart").await.unwrap(), None);
    }
}
