//! services/api/src/web/projects.rs
//!
//! Axum handlers for the project and section endpoints. Every handler runs
//! behind `require_auth` and acts on behalf of the authenticated user.

use authoring_core::domain::{
    Comment, DocType, Feedback, FeedbackAction, NewProject, OutlineItem, Project, RefinementEntry,
    Section,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::state::AppState;

//=========================================================================================
// API Payload Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct OutlineItemRequest {
    pub title: String,
    pub order: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub title: String,
    pub topic: Option<String>,
    /// `docx` or `pptx`.
    pub doc_type: String,
    pub outline: Vec<OutlineItemRequest>,
}

#[derive(Deserialize, ToSchema)]
pub struct RefineRequest {
    pub instruction: String,
}

#[derive(Deserialize, ToSchema)]
pub struct FeedbackRequest {
    /// `like` or `dislike`; anything else only records the comment.
    pub action: String,
    pub comment: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct TemplateRequest {
    pub topic: String,
    pub doc_type: String,
}

//=========================================================================================
// API Response Structs
//=========================================================================================

#[derive(Serialize, Deserialize, ToSchema)]
pub struct RefinementResponse {
    pub instruction: String,
    pub result: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub comment: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SectionResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub order: i32,
    pub likes: u32,
    pub dislikes: u32,
    pub refinement_history: Vec<RefinementResponse>,
    pub comments: Vec<CommentResponse>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub title: String,
    pub topic: Option<String>,
    pub doc_type: String,
    pub created_at: DateTime<Utc>,
    pub sections: Vec<SectionResponse>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct GenerateResponse {
    pub status: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct RefineResponse {
    pub status: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct OutlineResponse {
    pub outline: Vec<String>,
}

impl From<RefinementEntry> for RefinementResponse {
    fn from(entry: RefinementEntry) -> Self {
        Self {
            instruction: entry.instruction,
            result: entry.result,
        }
    }
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            comment: comment.comment,
        }
    }
}

impl From<Section> for SectionResponse {
    fn from(section: Section) -> Self {
        Self {
            id: section.id,
            title: section.title,
            content: section.content,
            order: section.order,
            likes: section.likes,
            dislikes: section.dislikes,
            refinement_history: section
                .refinement_history
                .into_iter()
                .map(Into::into)
                .collect(),
            comments: section.comments.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            title: project.title,
            topic: project.topic,
            doc_type: project.doc_type.to_string(),
            created_at: project.created_at,
            sections: project.sections.into_iter().map(Into::into).collect(),
        }
    }
}

fn ok() -> String {
    "ok".to_string()
}

//=========================================================================================
// Handlers
//=========================================================================================

/// List the caller's projects.
#[utoipa::path(
    get,
    path = "/api/projects/",
    responses(
        (status = 200, description = "The caller's projects", body = [ProjectResponse]),
        (status = 401, description = "Missing or invalid access token")
    ),
    security(("bearer" = []))
)]
pub async fn list_projects_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let projects = state.projects.list_projects(user_id).await?;
    Ok(Json(projects.into_iter().map(Into::into).collect()))
}

/// Create a project with one empty section per outline item.
#[utoipa::path(
    post,
    path = "/api/projects/",
    request_body = CreateProjectRequest,
    responses(
        (status = 200, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Invalid doc_type or empty title"),
        (status = 401, description = "Missing or invalid access token")
    ),
    security(("bearer" = []))
)]
pub async fn create_project_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let doc_type: DocType = req.doc_type.parse()?;
    let project = NewProject {
        title: req.title,
        topic: req.topic,
        doc_type,
        outline: req
            .outline
            .into_iter()
            .map(|item| OutlineItem {
                title: item.title,
                order: item.order,
            })
            .collect(),
    };
    let project = state.projects.create_project(user_id, project).await?;
    Ok(Json(project.into()))
}

/// Fetch one project with its sections.
#[utoipa::path(
    get,
    path = "/api/projects/{project_id}",
    params(("project_id" = Uuid, Path, description = "The project id")),
    responses(
        (status = 200, description = "The project", body = ProjectResponse),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_project_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = state.projects.get_project(user_id, project_id).await?;
    Ok(Json(project.into()))
}

/// Delete a project and all of its sections.
#[utoipa::path(
    delete,
    path = "/api/projects/{project_id}",
    params(("project_id" = Uuid, Path, description = "The project id")),
    responses(
        (status = 200, description = "Project deleted", body = StatusResponse),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_project_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.projects.delete_project(user_id, project_id).await?;
    Ok(Json(StatusResponse { status: ok() }))
}

/// Generate content for every section of a project.
///
/// Generation failures do not fail the request; they are stored as tagged
/// text in the affected sections.
#[utoipa::path(
    post,
    path = "/api/projects/{project_id}/generate",
    params(("project_id" = Uuid, Path, description = "The project id")),
    responses(
        (status = 200, description = "Content generated", body = GenerateResponse),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = []))
)]
pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<GenerateResponse>, ApiError> {
    state.projects.generate_all(user_id, project_id).await?;
    Ok(Json(GenerateResponse {
        status: ok(),
        message: "Content generated.".to_string(),
    }))
}

/// Rewrite one section following an instruction.
#[utoipa::path(
    post,
    path = "/api/projects/{project_id}/sections/{section_id}/refine",
    params(
        ("project_id" = Uuid, Path, description = "The project id"),
        ("section_id" = Uuid, Path, description = "The section id")
    ),
    request_body = RefineRequest,
    responses(
        (status = 200, description = "Section refined", body = RefineResponse),
        (status = 404, description = "Project or section not found")
    ),
    security(("bearer" = []))
)]
pub async fn refine_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path((project_id, section_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<RefineRequest>,
) -> Result<Json<RefineResponse>, ApiError> {
    let content = state
        .projects
        .refine_section(user_id, project_id, section_id, &req.instruction)
        .await?;
    Ok(Json(RefineResponse {
        status: ok(),
        content,
    }))
}

/// Record a like, a dislike and/or a comment on one section.
#[utoipa::path(
    post,
    path = "/api/projects/{project_id}/sections/{section_id}/feedback",
    params(
        ("project_id" = Uuid, Path, description = "The project id"),
        ("section_id" = Uuid, Path, description = "The section id")
    ),
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback recorded", body = StatusResponse),
        (status = 404, description = "Project or section not found")
    ),
    security(("bearer" = []))
)]
pub async fn feedback_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path((project_id, section_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let feedback = Feedback {
        action: FeedbackAction::parse(&req.action),
        comment: req.comment,
    };
    state
        .projects
        .record_feedback(user_id, project_id, section_id, &feedback)
        .await?;
    Ok(Json(StatusResponse { status: ok() }))
}

/// Propose outline titles for a topic.
#[utoipa::path(
    post,
    path = "/api/projects/{project_id}/ai-template",
    params(("project_id" = Uuid, Path, description = "The project id")),
    request_body = TemplateRequest,
    responses(
        (status = 200, description = "Proposed outline", body = OutlineResponse),
        (status = 400, description = "Invalid doc_type"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = []))
)]
pub async fn ai_template_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<TemplateRequest>,
) -> Result<Json<OutlineResponse>, ApiError> {
    let doc_type: DocType = req.doc_type.parse()?;
    let outline = state
        .projects
        .propose_outline(user_id, project_id, &req.topic, doc_type)
        .await?;
    Ok(Json(OutlineResponse { outline }))
}
