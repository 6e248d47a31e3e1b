//! services/api/src/web/rest.rs
//!
//! Contains the health endpoint and the master definition for the OpenAPI
//! specification.

use axum::response::Json;
use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::web::{auth, export, projects};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        auth::register_handler,
        auth::login_handler,
        projects::list_projects_handler,
        projects::create_project_handler,
        projects::get_project_handler,
        projects::delete_project_handler,
        projects::generate_handler,
        projects::refine_handler,
        projects::feedback_handler,
        projects::ai_template_handler,
        export::export_handler,
    ),
    components(
        schemas(
            HealthResponse,
            auth::CredentialsRequest,
            auth::TokenResponse,
            projects::OutlineItemRequest,
            projects::CreateProjectRequest,
            projects::RefineRequest,
            projects::FeedbackRequest,
            projects::TemplateRequest,
            projects::ProjectResponse,
            projects::SectionResponse,
            projects::RefinementResponse,
            projects::CommentResponse,
            projects::StatusResponse,
            projects::GenerateResponse,
            projects::RefineResponse,
            projects::OutlineResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Document Authoring API", description = "Projects, AI-generated sections and document export.")
    )
)]
pub struct ApiDoc;

/// Registers the bearer-token scheme referenced by the protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "The service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
