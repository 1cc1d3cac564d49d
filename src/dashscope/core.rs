//! Client for the DashScope multimodal generation API.
//!
//! Requests carry role-tagged messages whose content is a list of typed
//! parts (text and/or image references). Responses are consumed in
//! streaming mode: the server pushes SSE events, each carrying an
//! `:HTTP_STATUS/<code>` comment line and a `data:` JSON payload. The
//! stream returned here is a lazy, finite, non-restartable sequence of
//! parsed units; rendering decisions belong to the caller.

use std::time::Duration;

use anyhow::{Error, Result, bail};
use futures::stream::BoxStream;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

const GENERATION_PATH: &str = "/api/v1/services/aigc/multimodal-generation/generation";

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

/// One typed entry in a message's content list. Serializes to the
/// single-key objects the API expects: `{"text": ...}` or
/// `{"image": ...}`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum ContentPart {
    Image { image: String },
    Text { text: String },
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

impl Message {
    pub fn text(role: Role, content: &str) -> Self {
        Message {
            role,
            content: vec![ContentPart::Text {
                text: content.to_string(),
            }],
        }
    }

    /// A user-style message with an attached image. The image part
    /// precedes the text part, matching the order the API expects for
    /// multimodal input.
    pub fn with_image(role: Role, image_url: &str, content: &str) -> Self {
        Message {
            role,
            content: vec![
                ContentPart::Image {
                    image: image_url.to_string(),
                },
                ContentPart::Text {
                    text: content.to_string(),
                },
            ],
        }
    }
}

/// Sampling configuration sent with every generation request. The
/// values bias toward deterministic, short, non-repetitive output and
/// stay constant for the lifetime of the process.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_p: f32,
    pub repetition_penalty: f32,
    pub max_tokens: u32,
    pub incremental_output: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_p: 0.8,
            repetition_penalty: 1.05,
            max_tokens: 800,
            incremental_output: true,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct GenerationInput {
    pub messages: Vec<Message>,
}

#[derive(Serialize, Debug)]
pub struct GenerationRequest {
    pub model: String,
    pub input: GenerationInput,
    pub parameters: GenerationParams,
}

/// The `data:` payload of one streamed event. Success events nest the
/// text fragment under choices/message/content; failure events carry a
/// provider error code and message instead.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum GenerationChunk {
    Output { output: GenerationOutput },
    Failure { code: String, message: String },
}

#[derive(Deserialize, Debug)]
pub struct GenerationOutput {
    pub choices: Vec<GenerationChoice>,
}

impl GenerationOutput {
    /// The text fragment carried by this chunk, if any.
    pub fn fragment(&self) -> Option<&str> {
        self.choices.first().and_then(|choice| {
            choice.message.content.iter().find_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
        })
    }
}

#[derive(Deserialize, Debug)]
pub struct GenerationChoice {
    pub message: OutputMessage,
}

#[derive(Deserialize, Debug)]
pub struct OutputMessage {
    pub content: Vec<ContentPart>,
}

/// One parsed SSE event: the per-event HTTP status plus its payload.
#[derive(Debug)]
pub struct ResponseUnit {
    pub status_code: u16,
    pub chunk: GenerationChunk,
}

impl ResponseUnit {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn fragment(&self) -> Option<&str> {
        match &self.chunk {
            GenerationChunk::Output { output } => output.fragment(),
            GenerationChunk::Failure { .. } => None,
        }
    }

    /// Inline rendering of a failed unit.
    pub fn failure_text(&self) -> String {
        match &self.chunk {
            GenerationChunk::Failure { code, message } => format!("[{}: {}]", code, message),
            GenerationChunk::Output { .. } => format!("[HTTP {}]", self.status_code),
        }
    }
}

/// Parse one SSE event block into a unit. Events look like:
///
/// ```text
/// id:1
/// event:result
/// :HTTP_STATUS/200
/// data:{"output":{"choices":[...]}, ...}
/// ```
///
/// Events without a data line (comments, keep-alives) parse to `None`.
fn parse_sse_event(event: &str) -> Result<Option<ResponseUnit>, Error> {
    let mut status_code = 200u16;
    let mut data = None;

    for line in event.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix(":HTTP_STATUS/") {
            status_code = rest.trim().parse().unwrap_or(200);
        } else if let Some(rest) = line.strip_prefix("data:") {
            data = Some(rest.trim());
        }
    }

    let Some(data) = data else {
        return Ok(None);
    };
    if data.is_empty() {
        return Ok(None);
    }

    let chunk = serde_json::from_str::<GenerationChunk>(data)
        .inspect_err(|e| tracing::error!("Parsing generation chunk failed for {}\nError:{}", data, e))?;

    Ok(Some(ResponseUnit { status_code, chunk }))
}

/// Open a streaming generation call and return the unit stream.
///
/// The HTTP exchange is initiated eagerly so call-initiation failures
/// (network errors, rejected credentials) surface here as an `Err`
/// rather than mid-stream. The returned stream yields one unit per SSE
/// event until the server closes the response.
pub async fn generation_stream(
    api_url: &str,
    api_key: &str,
    request: &GenerationRequest,
) -> Result<BoxStream<'static, Result<ResponseUnit, Error>>, Error> {
    let url = format!("{}{}", api_url.trim_end_matches('/'), GENERATION_PATH);
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .header("X-DashScope-SSE", "enable")
        .timeout(Duration::from_secs(60 * 5))
        .json(request)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        bail!("Generation call failed with status {}: {}", status, body);
    }

    let stream: BoxStream<'static, Result<ResponseUnit, Error>> =
        Box::pin(async_stream::try_stream! {
        let mut bytes = response.bytes_stream();
        let mut buffer = String::new();

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk?;
            let chunk_str = std::str::from_utf8(&chunk)?;

            // Append new data to the buffer. This is necessary to
            // handle SSE fragmentation over HTTP/2 frames.
            buffer.push_str(chunk_str);

            // Process all complete SSE events from the buffer
            while let Some(event_end) = buffer.find("\n\n") {
                let event_data = buffer[..event_end].to_string();
                buffer = buffer[event_end + 2..].to_string();

                if let Some(unit) = parse_sse_event(&event_data)? {
                    yield unit;
                }
            }
        }

        // A final event may arrive without a trailing blank line when
        // the server closes the connection right after it.
        if !buffer.trim().is_empty() {
            if let Some(unit) = parse_sse_event(&buffer)? {
                yield unit;
            }
        }
    });

    Ok(stream)
}
