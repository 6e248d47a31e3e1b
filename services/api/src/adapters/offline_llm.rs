//! services/api/src/adapters/offline_llm.rs
//!
//! Text-generation backends that never leave the process: a mock used for
//! local development, and a stand-in for a provider that lacks credentials.

use async_trait::async_trait;
use authoring_core::ports::{GenerationOptions, PortError, PortResult, TextGenerationService};

/// Number of prompt characters echoed back by the mock.
const MOCK_PROMPT_PREVIEW: usize = 180;

/// Echoes the start of the prompt. Has no image capability.
#[derive(Clone, Default)]
pub struct MockTextAdapter;

#[async_trait]
impl TextGenerationService for MockTextAdapter {
    async fn generate(&self, prompt: &str, _options: GenerationOptions) -> PortResult<String> {
        let preview: String = prompt.chars().take(MOCK_PROMPT_PREVIEW).collect();
        Ok(format!("[MOCK LLM RESPONSE]\nPrompt: {}...", preview))
    }

    async fn generate_image(&self, _prompt: &str) -> PortResult<Option<Vec<u8>>> {
        Ok(None)
    }
}

/// Injected when the configured provider cannot be reached at all, e.g. its
/// API key is missing. Every text call fails with the stored reason.
#[derive(Clone)]
pub struct UnavailableTextAdapter {
    reason: String,
}

impl UnavailableTextAdapter {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl TextGenerationService for UnavailableTextAdapter {
    async fn generate(&self, _prompt: &str, _options: GenerationOptions) -> PortResult<String> {
        Err(PortError::Upstream(self.reason.clone()))
    }

    async fn generate_image(&self, _prompt: &str) -> PortResult<Option<Vec<u8>>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_echoes_a_bounded_preview() {
        let prompt = "x".repeat(500);
        let text = MockTextAdapter
            .generate(&prompt, GenerationOptions::default())
            .await
            .unwrap();
        assert!(text.starts_with("[MOCK LLM RESPONSE]\nPrompt: "));
        assert_eq!(text.matches('x').count(), MOCK_PROMPT_PREVIEW);
        assert_eq!(MockTextAdapter.generate_image("chart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unavailable_reports_its_reason() {
        let adapter = UnavailableTextAdapter::new("OPENAI_API_KEY not set");
        let err = adapter
            .generate("hi", GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY not set"));
        assert_eq!(adapter.generate_image("chart").await.unwrap(), None);
    }
}
