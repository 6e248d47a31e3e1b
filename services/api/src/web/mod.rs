pub mod auth;
pub mod export;
pub mod middleware;
pub mod projects;
pub mod rest;
pub mod state;

pub use middleware::require_auth;
pub use state::AppState;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Builds every `/api` route. Project and export routes sit behind `require_auth`.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/health", get(rest::health_handler))
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route(
            "/api/projects",
            get(projects::list_projects_handler).post(projects::create_project_handler),
        )
        .route(
            "/api/projects/",
            get(projects::list_projects_handler).post(projects::create_project_handler),
        )
        .route(
            "/api/projects/{project_id}",
            get(projects::get_project_handler).delete(projects::delete_project_handler),
        )
        .route(
            "/api/projects/{project_id}/generate",
            post(projects::generate_handler),
        )
        .route(
            "/api/projects/{project_id}/sections/{section_id}/refine",
            post(projects::refine_handler),
        )
        .route(
            "/api/projects/{project_id}/sections/{section_id}/feedback",
            post(projects::feedback_handler),
        )
        .route(
            "/api/projects/{project_id}/ai-template",
            post(projects::ai_template_handler),
        )
        .route("/api/export/{project_id}", get(export::export_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
