//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{select_text_service, DbAdapter},
    config::Config,
    error::ApiError,
    web::{auth::TokenKeys, build_router, rest::ApiDoc, state::AppState},
};
use authoring_core::{
    ports::{ProjectStore, UserStore},
    InMemoryStore, ProjectService, TextGenerator,
};
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    let (projects_store, users_store): (Arc<dyn ProjectStore>, Arc<dyn UserStore>) =
        match &config.database_url {
            Some(database_url) => {
                info!("Connecting to database...");
                let db_pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(database_url)
                    .await?;
                let db_adapter = Arc::new(DbAdapter::new(db_pool));
                info!("Running database migrations...");
                db_adapter.run_migrations().await?;
                info!("Database migrations complete.");
                (
                    db_adapter.clone() as Arc<dyn ProjectStore>,
                    db_adapter as Arc<dyn UserStore>,
                )
            }
            None => {
                warn!("DATABASE_URL is not set; using the in-memory store. Data is lost on restart.");
                let store = Arc::new(InMemoryStore::new());
                (
                    store.clone() as Arc<dyn ProjectStore>,
                    store as Arc<dyn UserStore>,
                )
            }
        };

    // --- 3. Select the Text-Generation Backend ---
    let backend = select_text_service(&config);
    info!(
        "Text generation: {:?} with model {}",
        config.llm_provider, config.text_model
    );
    let generator = TextGenerator::new(backend).with_timeout(config.generation_timeout);

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        projects: Arc::new(ProjectService::new(projects_store, generator)),
        users: users_store,
        tokens: TokenKeys::new(&config.secret_key, config.access_token_ttl),
    });

    // --- 5. Create the Web Router ---
    let frontend_origin = config.frontend_url.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!(
            "FRONTEND_URL '{}' is not a valid origin: {}",
            config.frontend_url, e
        ))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(frontend_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(build_router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
