//! The tutoring pipeline for one submission.
//!
//! Each user submission drives greeting check, payload assembly, the
//! streamed model call, and the session commit to completion before
//! the next submission is taken. Incremental display updates go out on
//! the transmitter channel `tx`; the caller decides how to surface
//! them (the API server forwards them as SSE events).

use anyhow::{Error, Result};
use futures_util::StreamExt;
use tokio::sync::mpsc;

use crate::chat::greeting;
use crate::chat::session::{Session, Turn};
use crate::core::AppConfig;
use crate::dashscope::{
    GenerationInput, GenerationParams, GenerationRequest, Message, Role, generation_stream,
};

/// Trailing glyph on every in-progress display update. The final
/// update is sent without it.
pub const CURSOR: &str = "▌";

/// One user submission: the typed question plus an optional `file://`
/// reference to an uploaded image.
#[derive(Clone, Debug)]
pub struct UserInput {
    pub text: String,
    pub image_path: Option<String>,
}

impl UserInput {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            image_path: None,
        }
    }

    pub fn with_image(text: &str, image_path: &str) -> Self {
        Self {
            text: text.to_string(),
            image_path: Some(image_path.to_string()),
        }
    }
}

/// The request/response pipeline against the hosted model. Holds the
/// per-process configuration; all conversation state lives in the
/// `Session` passed to `respond`.
pub struct Tutor {
    api_url: String,
    api_key: String,
    model: String,
    system_prompt: String,
    context_window: usize,
    params: GenerationParams,
}

impl Tutor {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            context_window: config.context_window,
            params: config.generation.clone(),
        }
    }

    /// Assemble the ordered message list for one request: the system
    /// prompt, a text-only suffix window of the stored history, then
    /// the current input. Images from prior turns are never re-sent;
    /// only the current turn's image, if any, is attached.
    pub fn context_messages(&self, session: &Session, input: &UserInput) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.context_window + 2);
        messages.push(Message::text(Role::System, &self.system_prompt));

        for turn in session.window(self.context_window) {
            messages.push(Message::text(turn.role.clone(), &turn.content));
        }

        messages.push(match &input.image_path {
            Some(path) => Message::with_image(Role::User, path, &input.text),
            None => Message::text(Role::User, &input.text),
        });

        messages
    }

    /// Run one submission through the pipeline and return the
    /// committed reply text.
    ///
    /// The user's turn is committed as soon as the submission is
    /// accepted, so a failed call leaves the question in the
    /// transcript without a reply. At most one assistant turn is
    /// appended per submission, and only after the stream has run to
    /// exhaustion.
    pub async fn respond(
        &self,
        tx: &mpsc::UnboundedSender<String>,
        session: &mut Session,
        input: UserInput,
    ) -> Result<String, Error> {
        if let Some(reply) = greeting::canned_reply(&input.text) {
            session.append(Turn::user(&input.text, input.image_path.as_deref()));
            session.append(Turn::assistant(reply));
            let _ = tx.send(reply.to_string());
            return Ok(reply.to_string());
        }

        // Build the payload before the current turn lands in the
        // session so the window holds prior turns only.
        let messages = self.context_messages(session, &input);

        session.append(Turn::user(&input.text, input.image_path.as_deref()));

        let reply = self.stream_reply(tx, messages).await?;

        session.append(Turn::assistant(&reply));

        Ok(reply)
    }

    /// Consume the unit stream: accumulate fragments, push display
    /// updates, and return the final reply text.
    async fn stream_reply(
        &self,
        tx: &mpsc::UnboundedSender<String>,
        messages: Vec<Message>,
    ) -> Result<String, Error> {
        let request = GenerationRequest {
            model: self.model.clone(),
            input: GenerationInput { messages },
            parameters: self.params.clone(),
        };

        let mut units = generation_stream(&self.api_url, &self.api_key, &request).await?;

        let mut reply = String::new();
        while let Some(unit) = units.next().await {
            let unit = unit?;
            if unit.is_success() {
                if let Some(fragment) = unit.fragment() {
                    reply.push_str(fragment);
                    // The send result is ignored; a disconnected
                    // reader must not abort the reply.
                    let _ = tx.send(format!("{reply}{CURSOR}"));
                }
            } else {
                // A failed unit renders inline and the stream keeps
                // being consumed.
                let marker = unit.failure_text();
                tracing::warn!("Generation stream unit failed: {}", marker);
                reply.push_str(&marker);
                let _ = tx.send(format!("{reply}{CURSOR}"));
            }
        }

        let _ = tx.send(reply.clone());

        Ok(reply)
    }
}
