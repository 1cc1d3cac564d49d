//! Test utilities for integration tests
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use tokio::sync::Mutex;

use tutor::api::AppState;
use tutor::api::app;
use tutor::core::AppConfig;
use tutor::dashscope::GenerationParams;

/// Creates a test application router wired against the given model API
/// base URL (usually a mockito server). Each call builds a fresh,
/// empty session.
pub fn test_app(api_url: &str) -> Router {
    let config = AppConfig {
        api_key: String::from("test-api-key"),
        api_url: api_url.to_string(),
        model: String::from("qwen-vl-max"),
        system_prompt: String::from("You are a math tutor."),
        context_window: 5,
        generation: GenerationParams::default(),
    };
    let app_state = AppState::new(config);
    app(Arc::new(Mutex::new(app_state)))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("Response body was not utf-8")
}
