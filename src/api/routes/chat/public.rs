//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::chat::Turn;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// `file://` path returned by the upload endpoint, attached to
    /// this submission only.
    pub image_path: Option<String>,
}

#[derive(Serialize)]
pub struct TranscriptResponse {
    pub transcript: Vec<Turn>,
}
