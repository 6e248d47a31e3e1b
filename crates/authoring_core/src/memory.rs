//! crates/authoring_core/src/memory.rs
//!
//! An in-process implementation of the storage ports.
//!
//! Used when no database is configured, and by the tests. Each mutation runs
//! inside a single write-lock critical section, so concurrent feedback and
//! refinement on one section never lose updates.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    Feedback, NewProject, Project, RefinementEntry, Section, User, UserCredentials,
};
use crate::ports::{PortError, PortResult, ProjectStore, UserStore};

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    users: Vec<UserCredentials>,
    /// Insertion order doubles as listing order.
    projects: Vec<Project>,
    /// section id -> project id
    section_index: HashMap<Uuid, Uuid>,
}

impl State {
    fn section_mut(&mut self, section_id: Uuid) -> PortResult<&mut Section> {
        let project_id = *self
            .section_index
            .get(&section_id)
            .ok_or_else(section_not_found)?;
        self.projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .and_then(|p| p.sections.iter_mut().find(|s| s.id == section_id))
            .ok_or_else(section_not_found)
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn project_not_found() -> PortError {
    PortError::NotFound("Project not found".to_string())
}

fn section_not_found() -> PortError {
    PortError::NotFound("Section not found".to_string())
}

#[async_trait]
impl ProjectStore for InMemoryStore {
    async fn create_project(&self, owner_id: Uuid, new: NewProject) -> PortResult<Project> {
        let id = Uuid::new_v4();
        let sections: Vec<Section> = new
            .outline
            .iter()
            .map(|item| Section::seeded(id, item))
            .collect();
        let project = Project {
            id,
            owner_id,
            title: new.title,
            topic: new.topic,
            doc_type: new.doc_type,
            sections,
            created_at: Utc::now(),
        };

        let mut state = self.state.write().await;
        for section in &project.sections {
            state.section_index.insert(section.id, id);
        }
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn get_project(&self, owner_id: Uuid, project_id: Uuid) -> PortResult<Project> {
        let state = self.state.read().await;
        state
            .projects
            .iter()
            .find(|p| p.id == project_id && p.owner_id == owner_id)
            .cloned()
            .ok_or_else(project_not_found)
    }

    async fn list_projects(&self, owner_id: Uuid) -> PortResult<Vec<Project>> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn delete_project(&self, owner_id: Uuid, project_id: Uuid) -> PortResult<()> {
        let mut state = self.state.write().await;
        let position = state
            .projects
            .iter()
            .position(|p| p.id == project_id && p.owner_id == owner_id)
            .ok_or_else(project_not_found)?;
        let project = state.projects.remove(position);
        for section in &project.sections {
            state.section_index.remove(&section.id);
        }
        Ok(())
    }

    async fn get_section(&self, project_id: Uuid, section_id: Uuid) -> PortResult<Section> {
        let state = self.state.read().await;
        state
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .and_then(|p| p.section(section_id))
            .cloned()
            .ok_or_else(section_not_found)
    }

    async fn set_section_content(&self, section_id: Uuid, content: &str) -> PortResult<()> {
        let mut state = self.state.write().await;
        state.section_mut(section_id)?.content = content.to_string();
        Ok(())
    }

    async fn apply_refinement(
        &self,
        section_id: Uuid,
        entry: RefinementEntry,
    ) -> PortResult<Section> {
        let mut state = self.state.write().await;
        let section = state.section_mut(section_id)?;
        section.apply_refinement(entry);
        Ok(section.clone())
    }

    async fn record_feedback(&self, section_id: Uuid, feedback: &Feedback) -> PortResult<Section> {
        let mut state = self.state.write().await;
        let section = state.section_mut(section_id)?;
        section.apply_feedback(feedback);
        Ok(section.clone())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> PortResult<User> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.email == email) {
            return Err(PortError::Conflict("Email already registered".to_string()));
        }
        let credentials = UserCredentials {
            id: Uuid::new_v4(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
        };
        let user = User {
            id: credentials.id,
            email: credentials.email.clone(),
        };
        state.users.push(credentials);
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let state = self.state.read().await;
        state
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }
}
