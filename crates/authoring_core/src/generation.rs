//! crates/authoring_core/src/generation.rs
//!
//! The consumer side of the text-generation port.
//!
//! `TextGenerator` wraps whichever backend was selected at startup. It bounds
//! every call with a timeout, strips markdown from the answer, and turns
//! failures into tagged text so that callers can store them as content.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::ports::{GenerationOptions, PortError, PortResult, TextGenerationService};
use crate::text::clean_markdown;

/// Prefix of every degraded (failed) generation result.
pub const GENERATION_ERROR_TAG: &str = "[GENERATION ERROR]";

pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct TextGenerator {
    backend: Arc<dyn TextGenerationService>,
    timeout: Duration,
    options: GenerationOptions,
}

impl TextGenerator {
    pub fn new(backend: Arc<dyn TextGenerationService>) -> Self {
        Self {
            backend,
            timeout: DEFAULT_GENERATION_TIMEOUT,
            options: GenerationOptions::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Calls the backend once and returns cleaned text. No retries.
    pub async fn try_generate(&self, prompt: &str) -> PortResult<String> {
        let raw = tokio::time::timeout(self.timeout, self.backend.generate(prompt, self.options))
            .await
            .map_err(|_| {
                PortError::Upstream(format!(
                    "text generation timed out after {}s",
                    self.timeout.as_secs()
                ))
            })??;
        Ok(clean_markdown(&raw))
    }

    /// Like `try_generate`, but a failure becomes `[GENERATION ERROR] <reason>`.
    pub async fn generate(&self, prompt: &str) -> String {
        match self.try_generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Text generation failed, storing tagged error: {}", e);
                format!("{} {}", GENERATION_ERROR_TAG, e)
            }
        }
    }

    /// `Ok(None)` means the backend cannot produce images.
    pub async fn generate_image(&self, prompt: &str) -> PortResult<Option<Vec<u8>>> {
        tokio::time::timeout(self.timeout, self.backend.generate_image(prompt))
            .await
            .map_err(|_| PortError::Upstream("image generation timed out".to_string()))?
    }
}

/// Whether a stored text is a degraded generation result.
pub fn is_degraded(text: &str) -> bool {
    text.starts_with(GENERATION_ERROR_TAG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Fixed(&'static str);

    #[async_trait]
    impl TextGenerationService for Fixed {
        async fn generate(&self, _prompt: &str, _options: GenerationOptions) -> PortResult<String> {
            Ok(self.0.to_string())
        }

        async fn generate_image(&self, _prompt: &str) -> PortResult<Option<Vec<u8>>> {
            Ok(None)
        }
    }

    struct Failing;

    #[async_trait]
    impl TextGenerationService for Failing {
        async fn generate(&self, _prompt: &str, _options: GenerationOptions) -> PortResult<String> {
            Err(PortError::Upstream("backend unreachable".to_string()))
        }

        async fn generate_image(&self, _prompt: &str) -> PortResult<Option<Vec<u8>>> {
            Err(PortError::Upstream("backend unreachable".to_string()))
        }
    }

    struct Slow;

    #[async_trait]
    impl TextGenerationService for Slow {
        async fn generate(&self, _prompt: &str, _options: GenerationOptions) -> PortResult<String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }

        async fn generate_image(&self, _prompt: &str) -> PortResult<Option<Vec<u8>>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn strips_markdown_from_answers() {
        let generator = TextGenerator::new(Arc::new(Fixed("## **Growth** plan")));
        assert_eq!(generator.generate("p").await, "Growth plan");
    }

    #[tokio::test]
    async fn failures_become_tagged_text() {
        let generator = TextGenerator::new(Arc::new(Failing));
        let text = generator.generate("p").await;
        assert!(is_degraded(&text));
        assert!(text.contains("backend unreachable"));
    }

    #[tokio::test]
    async fn timeouts_are_upstream_failures() {
        let generator =
            TextGenerator::new(Arc::new(Slow)).with_timeout(Duration::from_millis(20));
        assert!(matches!(
            generator.try_generate("p").await,
            Err(PortError::Upstream(_))
        ));
    }

    #[tokio::test]
    async fn unsupported_images_are_empty() {
        let generator = TextGenerator::new(Arc::new(Fixed("x")));
        assert_eq!(generator.generate_image("a chart").await.unwrap(), None);
        let failing = TextGenerator::new(Arc::new(Failing));
        assert!(failing.generate_image("a chart").await.is_err());
    }
}
