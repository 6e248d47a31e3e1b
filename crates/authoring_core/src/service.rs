//! crates/authoring_core/src/service.rs
//!
//! The orchestration facade used by the external interface. Every operation
//! re-checks that the caller owns the project before touching it; a missing
//! project and a foreign one are both reported as "Project not found".

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::assembly::{assemble, ExportArtifact};
use crate::domain::{DocType, ExportFormat, Feedback, NewProject, Project, Section};
use crate::generation::TextGenerator;
use crate::ports::{PortError, PortResult, ProjectStore};
use crate::refinement::{GenerationReport, RefinementEngine};

#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn ProjectStore>,
    engine: RefinementEngine,
}

impl ProjectService {
    pub fn new(store: Arc<dyn ProjectStore>, generator: TextGenerator) -> Self {
        let engine = RefinementEngine::new(store.clone(), generator);
        Self { store, engine }
    }

    pub async fn create_project(&self, owner_id: Uuid, project: NewProject) -> PortResult<Project> {
        if project.title.trim().is_empty() {
            return Err(PortError::Invalid("title must not be empty".to_string()));
        }
        let project = self.store.create_project(owner_id, project).await?;
        info!(
            "Created project {} with {} sections for user {}",
            project.id,
            project.sections.len(),
            owner_id
        );
        Ok(project)
    }

    pub async fn list_projects(&self, owner_id: Uuid) -> PortResult<Vec<Project>> {
        self.store.list_projects(owner_id).await
    }

    pub async fn get_project(&self, owner_id: Uuid, project_id: Uuid) -> PortResult<Project> {
        self.store.get_project(owner_id, project_id).await
    }

    pub async fn delete_project(&self, owner_id: Uuid, project_id: Uuid) -> PortResult<()> {
        self.store.delete_project(owner_id, project_id).await?;
        info!("Deleted project {} for user {}", project_id, owner_id);
        Ok(())
    }

    pub async fn generate_all(&self, owner_id: Uuid, project_id: Uuid) -> PortResult<GenerationReport> {
        let project = self.get_project(owner_id, project_id).await?;
        self.engine.generate_all(&project).await
    }

    pub async fn refine_section(
        &self,
        owner_id: Uuid,
        project_id: Uuid,
        section_id: Uuid,
        instruction: &str,
    ) -> PortResult<String> {
        let section = self.owned_section(owner_id, project_id, section_id).await?;
        self.engine.refine(&section, instruction).await
    }

    pub async fn record_feedback(
        &self,
        owner_id: Uuid,
        project_id: Uuid,
        section_id: Uuid,
        feedback: &Feedback,
    ) -> PortResult<Section> {
        let section = self.owned_section(owner_id, project_id, section_id).await?;
        self.engine.feedback(&section, feedback).await
    }

    /// Proposes outline titles for `topic`. The project is only checked for
    /// ownership; its own topic and sections are not used.
    pub async fn propose_outline(
        &self,
        owner_id: Uuid,
        project_id: Uuid,
        topic: &str,
        doc_type: DocType,
    ) -> PortResult<Vec<String>> {
        self.get_project(owner_id, project_id).await?;
        Ok(self.engine.generate_outline(topic, doc_type).await)
    }

    pub async fn export(
        &self,
        owner_id: Uuid,
        project_id: Uuid,
        format: ExportFormat,
    ) -> PortResult<ExportArtifact> {
        let project = self.get_project(owner_id, project_id).await?;
        assemble(&project, format.resolve(project.doc_type))
    }

    async fn owned_section(
        &self,
        owner_id: Uuid,
        project_id: Uuid,
        section_id: Uuid,
    ) -> PortResult<Section> {
        let project = self.get_project(owner_id, project_id).await?;
        self.store.get_section(project.id, section_id).await
    }
}
