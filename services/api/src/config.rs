//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which text-generation backend to wire in at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LlmProvider {
    Mock,
    OpenAi,
    Gemini,
}

impl LlmProvider {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "mock" => Ok(LlmProvider::Mock),
            "openai" => Ok(LlmProvider::OpenAi),
            "gemini" => Ok(LlmProvider::Gemini),
            other => Err(ConfigError::InvalidValue(
                "LLM_PROVIDER".to_string(),
                format!("'{}' is not one of mock/openai/gemini", other),
            )),
        }
    }

    pub fn default_text_model(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini-2.0-flash",
            LlmProvider::Mock | LlmProvider::OpenAi => "gpt-4o-mini",
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub secret_key: String,
    pub access_token_ttl: chrono::Duration,
    pub llm_provider: LlmProvider,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub text_model: String,
    pub image_model: String,
    pub generation_timeout: Duration,
    pub frontend_url: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = std::env::var("DATABASE_URL").ok().filter(|u| !u.is_empty());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Auth Settings ---
        let secret_key = std::env::var("SECRET_KEY")
            .map_err(|_| ConfigError::MissingVar("SECRET_KEY".to_string()))?;
        let ttl_minutes = parse_number("ACCESS_TOKEN_TTL_MINUTES", 60 * 24)?;
        let access_token_ttl = chrono::Duration::minutes(ttl_minutes as i64);

        // --- Load Generation Settings ---
        let llm_provider =
            LlmProvider::parse(&std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "mock".to_string()))?;
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());
        let gemini_api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        let text_model = std::env::var("TEXT_MODEL")
            .unwrap_or_else(|_| llm_provider.default_text_model().to_string());
        let image_model =
            std::env::var("IMAGE_MODEL").unwrap_or_else(|_| "gpt-image-1".to_string());
        let generation_timeout =
            Duration::from_secs(parse_number("GENERATION_TIMEOUT_SECS", 60)?);

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            secret_key,
            access_token_ttl,
            llm_provider,
            openai_api_key,
            gemini_api_key,
            text_model,
            image_model,
            generation_timeout,
            frontend_url,
        })
    }
}

fn parse_number(var: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value.trim().parse::<u64>().map_err(|_| {
            ConfigError::InvalidValue(var.to_string(), format!("'{}' is not a number", value))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_are_case_insensitive() {
        assert_eq!(LlmProvider::parse("OpenAI").unwrap(), LlmProvider::OpenAi);
        assert_eq!(LlmProvider::parse(" gemini ").unwrap(), LlmProvider::Gemini);
        assert!(matches!(
            LlmProvider::parse("claude"),
            Err(ConfigError::InvalidValue(var, _)) if var == "LLM_PROVIDER"
        ));
    }

    #[test]
    fn gemini_has_its_own_default_model() {
        assert_eq!(LlmProvider::Gemini.default_text_model(), "gemini-2.0-flash");
        assert_eq!(LlmProvider::Mock.default_text_model(), "gpt-4o-mini");
    }
}
