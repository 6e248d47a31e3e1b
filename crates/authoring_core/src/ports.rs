//! crates/authoring_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or LLM APIs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Feedback, NewProject, Project, RefinementEntry, Section, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("{0}")]
    NotFound(String),
    /// Malformed input, reported back to the caller with a readable reason.
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
    /// The text-generation backend failed, timed out or answered with garbage.
    #[error("Upstream generation failure: {0}")]
    Upstream(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable storage for projects and their ordered sections.
///
/// Every mutation is atomic per section: counter updates increment in place,
/// and a refinement overwrites content and appends history as one unit.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Creates a project and one empty section per outline item.
    async fn create_project(&self, owner_id: Uuid, project: NewProject) -> PortResult<Project>;

    /// Returns `NotFound` both when the project is absent and when it belongs
    /// to someone else.
    async fn get_project(&self, owner_id: Uuid, project_id: Uuid) -> PortResult<Project>;

    async fn list_projects(&self, owner_id: Uuid) -> PortResult<Vec<Project>>;

    /// Deletes the project together with all of its sections.
    async fn delete_project(&self, owner_id: Uuid, project_id: Uuid) -> PortResult<()>;

    async fn get_section(&self, project_id: Uuid, section_id: Uuid) -> PortResult<Section>;

    async fn set_section_content(&self, section_id: Uuid, content: &str) -> PortResult<()>;

    /// Sets `content = entry.result` and appends `entry` to the history.
    async fn apply_refinement(&self, section_id: Uuid, entry: RefinementEntry)
        -> PortResult<Section>;

    async fn record_feedback(&self, section_id: Uuid, feedback: &Feedback) -> PortResult<Section>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the e-mail is already registered.
    async fn create_user(&self, email: &str, hashed_password: &str) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;
}

/// Sampling knobs passed to the text-generation backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: 600,
            temperature: 0.7,
        }
    }
}

/// The external LLM capability. Implementations return the raw model text;
/// cleaning, timeouts and degradation are handled by `TextGenerator`.
#[async_trait]
pub trait TextGenerationService: Send + Sync {
    async fn generate(&self, prompt: &str, options: GenerationOptions) -> PortResult<String>;

    /// Returns `Ok(None)` when the backend has no image capability or no
    /// credentials. Only transport failures are errors.
    async fn generate_image(&self, prompt: &str) -> PortResult<Option<Vec<u8>>>;
}
