#![allow(dead_code)]

use std::sync::Arc;

use api_lib::web::{auth::TokenKeys, build_router, state::AppState};
use async_trait::async_trait;
use authoring_core::ports::{GenerationOptions, PortResult, TextGenerationService};
use authoring_core::{InMemoryStore, ProjectService, TextGenerator};
use axum::Router;
use serde_json::{json, Value};

/// A generator with one canned answer per prompt kind.
pub struct ScriptedText;

#[async_trait]
impl TextGenerationService for ScriptedText {
    async fn generate(&self, prompt: &str, _options: GenerationOptions) -> PortResult<String> {
        let text = if prompt.contains("JSON array") {
            r#"["Introduction", "Market Overview", "Outlook"]"#
        } else if prompt.contains("Instruction:") {
            "**Refined** text"
        } else {
            "- First point\n- Second point"
        };
        Ok(text.to_string())
    }

    async fn generate_image(&self, _prompt: &str) -> PortResult<Option<Vec<u8>>> {
        Ok(None)
    }
}

/// The full router wired to the in-memory store.
pub struct TestEnv {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
}

impl TestEnv {
    pub fn start() -> Self {
        Self::with_backend(Arc::new(ScriptedText))
    }

    pub fn with_backend(backend: Arc<dyn TextGenerationService>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = Arc::new(AppState {
            projects: Arc::new(ProjectService::new(
                store.clone(),
                TextGenerator::new(backend),
            )),
            users: store.clone(),
            tokens: TokenKeys::new("test-secret", chrono::Duration::minutes(30)),
        });
        Self {
            router: build_router(state),
            store,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }
}

/// Helper: register a user and return its access token.
pub async fn register(server: &axum_test::TestServer, email: &str) -> String {
    let response = server
        .post("/api/auth/register")
        .json(&json!({ "email": email, "password": "hunter2" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["access_token"]
        .as_str()
        .expect("access_token missing")
        .to_string()
}

/// Helper: create the two-section "Q1 Report" project and return its JSON.
pub async fn create_q1_report(
    server: &axum_test::TestServer,
    token: &str,
    doc_type: &str,
) -> Value {
    let response = server
        .post("/api/projects/")
        .authorization_bearer(token)
        .json(&json!({
            "title": "Q1 Report",
            "topic": "Quarterly results",
            "doc_type": doc_type,
            "outline": [
                { "title": "Intro", "order": 0 },
                { "title": "Summary", "order": 1 }
            ]
        }))
        .await;
    response.assert_status_ok();
    response.json()
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id missing").to_string()
}
