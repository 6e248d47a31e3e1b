//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use authoring_core::ports::UserStore;
use authoring_core::ProjectService;
use std::sync::Arc;

use crate::web::auth::TokenKeys;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub projects: Arc<ProjectService>,
    pub users: Arc<dyn UserStore>,
    pub tokens: TokenKeys,
}
