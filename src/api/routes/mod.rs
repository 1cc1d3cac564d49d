//! API routes module

pub mod chat;
pub mod upload;

use std::sync::Arc;

use axum::Router;
use tokio::sync::Mutex;

use crate::api::state::AppState;

type SharedState = Arc<Mutex<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Conversation routes
        .nest("/chat", chat::router())
        // Image upload routes
        .nest("/upload", upload::router())
}
