//! Public types for the upload API
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct UploadResponse {
    /// `file://` path to the stored image, to be attached to the next
    /// chat submission.
    pub path: String,
}
