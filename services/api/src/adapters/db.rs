//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ProjectStore` and `UserStore` ports from the `core` crate. It handles all
//! interactions with the PostgreSQL database using `sqlx`.

use std::collections::HashMap;

use async_trait::async_trait;
use authoring_core::domain::{
    Comment, Feedback, FeedbackAction, NewProject, Project, RefinementEntry, Section, User,
    UserCredentials,
};
use authoring_core::ports::{PortError, PortResult, ProjectStore, UserStore};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

const PROJECT_COLUMNS: &str = "id, owner_id, title, topic, doc_type, created_at";
const SECTION_COLUMNS: &str =
    "id, project_id, title, content, sort_order, likes, dislikes, refinement_history, comments";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the storage ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn sections_of(&self, project_ids: &[Uuid]) -> PortResult<Vec<Section>> {
        let records = sqlx::query_as::<_, SectionRecord>(&format!(
            "SELECT {SECTION_COLUMNS} FROM sections WHERE project_id = ANY($1) ORDER BY project_id, position"
        ))
        .bind(project_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(SectionRecord::to_domain).collect())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn section_not_found() -> PortError {
    PortError::NotFound("Section not found".to_string())
}

/// Decodes a JSON array column. A corrupt value is logged and read as empty.
fn decode_list<T: DeserializeOwned>(column: &str, raw: &str) -> Vec<T> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Ignoring unreadable {} column: {}", column, e);
        Vec::new()
    })
}

fn encode_list<T: Serialize>(items: &[T]) -> PortResult<String> {
    serde_json::to_string(items).map_err(|e| PortError::Unexpected(e.to_string()))
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
    hashed_password: String,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            email: self.email,
        }
    }

    fn to_credentials(self) -> UserCredentials {
        UserCredentials {
            id: self.id,
            email: self.email,
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct ProjectRecord {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    topic: Option<String>,
    doc_type: String,
    created_at: DateTime<Utc>,
}
impl ProjectRecord {
    fn to_domain(self, sections: Vec<Section>) -> PortResult<Project> {
        Ok(Project {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            topic: self.topic,
            doc_type: self
                .doc_type
                .parse()
                .map_err(|_| PortError::Unexpected(format!("Unknown doc_type '{}'", self.doc_type)))?,
            sections,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct SectionRecord {
    id: Uuid,
    project_id: Uuid,
    title: String,
    content: String,
    sort_order: i32,
    likes: i32,
    dislikes: i32,
    refinement_history: String,
    comments: String,
}
impl SectionRecord {
    fn to_domain(self) -> Section {
        Section {
            id: self.id,
            project_id: self.project_id,
            title: self.title,
            content: self.content,
            order: self.sort_order,
            likes: self.likes.max(0) as u32,
            dislikes: self.dislikes.max(0) as u32,
            refinement_history: decode_list("refinement_history", &self.refinement_history),
            comments: decode_list("comments", &self.comments),
        }
    }
}

//=========================================================================================
// `ProjectStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ProjectStore for DbAdapter {
    async fn create_project(&self, owner_id: Uuid, project: NewProject) -> PortResult<Project> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let record = sqlx::query_as::<_, ProjectRecord>(&format!(
            "INSERT INTO projects (id, owner_id, title, topic, doc_type) VALUES ($1, $2, $3, $4, $5) RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&project.title)
        .bind(&project.topic)
        .bind(project.doc_type.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;

        let mut sections = Vec::with_capacity(project.outline.len());
        for (position, item) in project.outline.iter().enumerate() {
            let section = sqlx::query_as::<_, SectionRecord>(&format!(
                "INSERT INTO sections (id, project_id, position, title, sort_order) VALUES ($1, $2, $3, $4, $5) RETURNING {SECTION_COLUMNS}"
            ))
            .bind(Uuid::new_v4())
            .bind(record.id)
            .bind(position as i32)
            .bind(&item.title)
            .bind(item.order)
            .fetch_one(&mut *tx)
            .await
            .map_err(unexpected)?;
            sections.push(section.to_domain());
        }

        tx.commit().await.map_err(unexpected)?;
        record.to_domain(sections)
    }

    async fn get_project(&self, owner_id: Uuid, project_id: Uuid) -> PortResult<Project> {
        let record = sqlx::query_as::<_, ProjectRecord>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 AND owner_id = $2"
        ))
        .bind(project_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound("Project not found".to_string()))?;

        let sections = self.sections_of(&[record.id]).await?;
        record.to_domain(sections)
    }

    async fn list_projects(&self, owner_id: Uuid) -> PortResult<Vec<Project>> {
        let records = sqlx::query_as::<_, ProjectRecord>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE owner_id = $1 ORDER BY created_at, id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        let mut by_project: HashMap<Uuid, Vec<Section>> = HashMap::new();
        for section in self.sections_of(&ids).await? {
            by_project.entry(section.project_id).or_default().push(section);
        }

        records
            .into_iter()
            .map(|record| {
                let sections = by_project.remove(&record.id).unwrap_or_default();
                record.to_domain(sections)
            })
            .collect()
    }

    async fn delete_project(&self, owner_id: Uuid, project_id: Uuid) -> PortResult<()> {
        // Sections go with the project through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND owner_id = $2")
            .bind(project_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound("Project not found".to_string()));
        }
        Ok(())
    }

    async fn get_section(&self, project_id: Uuid, section_id: Uuid) -> PortResult<Section> {
        sqlx::query_as::<_, SectionRecord>(&format!(
            "SELECT {SECTION_COLUMNS} FROM sections WHERE id = $1 AND project_id = $2"
        ))
        .bind(section_id)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .map(SectionRecord::to_domain)
        .ok_or_else(section_not_found)
    }

    async fn set_section_content(&self, section_id: Uuid, content: &str) -> PortResult<()> {
        let result = sqlx::query("UPDATE sections SET content = $1 WHERE id = $2")
            .bind(content)
            .bind(section_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(section_not_found());
        }
        Ok(())
    }

    async fn apply_refinement(
        &self,
        section_id: Uuid,
        entry: RefinementEntry,
    ) -> PortResult<Section> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let raw: String =
            sqlx::query_scalar("SELECT refinement_history FROM sections WHERE id = $1 FOR UPDATE")
                .bind(section_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(unexpected)?
                .ok_or_else(section_not_found)?;

        let mut history: Vec<RefinementEntry> = decode_list("refinement_history", &raw);
        let content = entry.result.clone();
        history.push(entry);

        let record = sqlx::query_as::<_, SectionRecord>(&format!(
            "UPDATE sections SET content = $1, refinement_history = $2 WHERE id = $3 RETURNING {SECTION_COLUMNS}"
        ))
        .bind(&content)
        .bind(encode_list(&history)?)
        .bind(section_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn record_feedback(&self, section_id: Uuid, feedback: &Feedback) -> PortResult<Section> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let raw: String = sqlx::query_scalar("SELECT comments FROM sections WHERE id = $1 FOR UPDATE")
            .bind(section_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(unexpected)?
            .ok_or_else(section_not_found)?;

        let mut comments: Vec<Comment> = decode_list("comments", &raw);
        if let Some(comment) = feedback.comment() {
            comments.push(Comment {
                comment: comment.to_string(),
            });
        }
        let (like, dislike) = match feedback.action {
            FeedbackAction::Like => (1, 0),
            FeedbackAction::Dislike => (0, 1),
            FeedbackAction::Unrecognized => (0, 0),
        };

        let record = sqlx::query_as::<_, SectionRecord>(&format!(
            "UPDATE sections SET likes = likes + $1, dislikes = dislikes + $2, comments = $3 WHERE id = $4 RETURNING {SECTION_COLUMNS}"
        ))
        .bind(like as i32)
        .bind(dislike as i32)
        .bind(encode_list(&comments)?)
        .bind(section_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        Ok(record.to_domain())
    }
}

//=========================================================================================
// `UserStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl UserStore for DbAdapter {
    async fn create_user(&self, email: &str, hashed_password: &str) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, email, hashed_password) VALUES ($1, $2, $3) RETURNING id, email, hashed_password",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PortError::Conflict("Email already registered".to_string())
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", email)),
            _ => unexpected(e),
        })?;
        Ok(record.to_credentials())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_json_columns_read_as_empty() {
        let history: Vec<RefinementEntry> = decode_list("refinement_history", "{not json");
        assert!(history.is_empty());
        let comments: Vec<Comment> = decode_list("comments", "");
        assert!(comments.is_empty());
    }

    #[test]
    fn section_records_map_counters_and_json() {
        let record = SectionRecord {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            title: "Intro".to_string(),
            content: "Hello".to_string(),
            sort_order: 2,
            likes: 3,
            dislikes: 1,
            refinement_history: r#"[{"instruction":"shorter","result":"Hello"}]"#.to_string(),
            comments: r#"[{"comment":"nice"}]"#.to_string(),
        };
        let section = record.to_domain();
        assert_eq!(section.order, 2);
        assert_eq!((section.likes, section.dislikes), (3, 1));
        assert_eq!(section.refinement_history[0].instruction, "shorter");
        assert_eq!(section.comments[0].comment, "nice");
    }

    #[test]
    fn unknown_doc_type_is_rejected() {
        let record = ProjectRecord {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "T".to_string(),
            topic: None,
            doc_type: "xlsx".to_string(),
            created_at: Utc::now(),
        };
        assert!(matches!(record.to_domain(Vec::new()), Err(PortError::Unexpected(_))));
    }
}
