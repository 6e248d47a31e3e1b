//! services/api/src/web/export.rs
//!
//! Streams an assembled `.docx` or `.pptx` back to the caller.

use authoring_core::domain::ExportFormat;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Extension,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::state::AppState;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// `docx` or `pptx` forces the format; anything else uses the project's type.
    pub format: Option<String>,
}

/// Export a project as a binary document.
#[utoipa::path(
    get,
    path = "/api/export/{project_id}",
    params(
        ("project_id" = Uuid, Path, description = "The project id"),
        ExportQuery
    ),
    responses(
        (status = 200, description = "The exported .docx or .pptx file"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = []))
)]
pub async fn export_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let format = ExportFormat::parse_lenient(query.format.as_deref());
    let artifact = state.projects.export(user_id, project_id, format).await?;
    info!(
        "Exported project {} as {} ({} bytes)",
        project_id,
        artifact.doc_type,
        artifact.bytes.len()
    );

    let disposition = format!("attachment; filename=\"{}\"", artifact.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, artifact.media_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    ))
}
