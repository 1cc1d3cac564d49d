//! Router for the tutoring chat API

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, sse::Event, sse::KeepAlive, sse::Sse},
    routing::post,
};
use tokio::sync::{Mutex, mpsc};
use tokio_stream::StreamExt as _;
use tokio_stream::wrappers::UnboundedReceiverStream;

use super::public;
use crate::api::state::AppState;
use crate::chat::{Tutor, UserInput};

type SharedState = Arc<Mutex<AppState>>;

/// Submit the next message and stream the tutor's reply
async fn chat_handler(
    State(state): State<SharedState>,
    axum::Json(payload): axum::Json<public::ChatRequest>,
) -> Result<impl IntoResponse, crate::api::public::ApiError> {
    let (tx, rx) = mpsc::unbounded_channel::<String>();

    let sse_stream = UnboundedReceiverStream::new(rx)
        .map(|update| Ok::<Event, Infallible>(Event::default().data(update)));

    let input = match payload.image_path {
        Some(path) => UserInput::with_image(&payload.message, &path),
        None => UserInput::text(&payload.message),
    };

    tokio::spawn(async move {
        // The session lock is held for the whole pipeline, so
        // submissions are serialized: the next one starts only after
        // this reply is committed or has failed.
        let mut app = state.lock().await;
        let tutor = Tutor::from_config(&app.config);

        if let Err(e) = tutor.respond(&tx, &mut app.session, input).await {
            tracing::error!("Chat handler error: {}. Root cause: {}", e, e.root_cause());
            let _ = tx.send(format!("Something went wrong: {}", e));
        }
    });

    let resp = Sse::new(sse_stream)
        .keep_alive(
            KeepAlive::default()
                .text("keep-alive")
                .interval(Duration::from_millis(100)),
        )
        .into_response();

    Ok(resp)
}

/// Get the current conversation transcript
async fn transcript(State(state): State<SharedState>) -> axum::Json<public::TranscriptResponse> {
    let app = state.lock().await;
    axum::Json(public::TranscriptResponse {
        transcript: app.session.turns().to_vec(),
    })
}

/// Wipe the conversation and start over
async fn clear(State(state): State<SharedState>) -> StatusCode {
    let mut app = state.lock().await;
    app.session.clear();
    StatusCode::NO_CONTENT
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(chat_handler).get(transcript).delete(clear))
}
