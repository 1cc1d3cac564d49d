//! Router for problem-image uploads

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use tokio::sync::Mutex;

use super::public;
use crate::api::state::AppState;

type SharedState = Arc<Mutex<AppState>>;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Persist an uploaded problem image and return a `file://` reference
/// for the next submission.
///
/// Files are written once per upload under unique names and never
/// cleaned up; they accumulate in the temp directory for the lifetime
/// of the host process.
async fn upload_handler(
    mut multipart: Multipart,
) -> Result<impl IntoResponse, crate::api::public::ApiError> {
    while let Some(field) = multipart.next_field().await? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let extension = Path::new(&file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            tracing::warn!("Rejected upload '{}' with unsupported type", file_name);
            return Ok((
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("Unsupported image type: {}", file_name),
            )
                .into_response());
        }

        let data = field.bytes().await?;

        let suffix = format!(".{}", extension);
        let mut tmp = tempfile::Builder::new()
            .prefix("tutor-upload-")
            .suffix(&suffix)
            .tempfile()?;
        tmp.write_all(&data)?;
        let path = tmp.into_temp_path().keep()?;

        return Ok(axum::Json(public::UploadResponse {
            path: format!("file://{}", path.display()),
        })
        .into_response());
    }

    Ok((StatusCode::BAD_REQUEST, "No file in upload").into_response())
}

/// Create the upload router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(upload_handler))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
}
