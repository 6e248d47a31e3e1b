pub mod db;
pub mod offline_llm;
pub mod openai_llm;

pub use db::DbAdapter;
pub use offline_llm::{MockTextAdapter, UnavailableTextAdapter};
pub use openai_llm::OpenAiTextAdapter;

use std::sync::Arc;

use authoring_core::ports::TextGenerationService;
use tracing::warn;

use crate::config::{Config, LlmProvider};

/// Picks the text-generation backend once, at startup.
///
/// A provider whose key is missing still starts: every generation then
/// degrades to tagged error text instead of failing the request.
pub fn select_text_service(config: &Config) -> Arc<dyn TextGenerationService> {
    match config.llm_provider {
        LlmProvider::Mock => Arc::new(MockTextAdapter),
        LlmProvider::OpenAi => match &config.openai_api_key {
            Some(key) => Arc::new(OpenAiTextAdapter::openai(
                key,
                config.text_model.clone(),
                config.image_model.clone(),
            )),
            None => {
                warn!("LLM_PROVIDER=openai but OPENAI_API_KEY is not set");
                Arc::new(UnavailableTextAdapter::new("OPENAI_API_KEY not set"))
            }
        },
        LlmProvider::Gemini => match &config.gemini_api_key {
            Some(key) => Arc::new(OpenAiTextAdapter::gemini(key, config.text_model.clone())),
            None => {
                warn!("LLM_PROVIDER=gemini but GEMINI_API_KEY is not set");
                Arc::new(UnavailableTextAdapter::new("GEMINI_API_KEY not set"))
            }
        },
    }
}
