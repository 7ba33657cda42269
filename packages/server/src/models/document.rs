use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UploadDocumentRequest {
    /// File content, base64 encoded. A `data:<mime>;base64,` prefix is accepted.
    pub base64: String,
    #[schema(example = "application/pdf")]
    pub mime_type: String,
    #[schema(example = "rubric.pdf")]
    pub filename: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadDocumentResponse {
    #[schema(example = "success")]
    pub status: &'static str,
    /// Shareable link; anyone holding it can view the document.
    pub file_url: String,
    pub filename: String,
}

/// Decode an upload payload, tolerating data-URL prefixes and line-wrapped base64.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, AppError> {
    let data = match payload.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => payload,
    };
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| AppError::Validation(format!("Invalid base64 payload: {e}")))
}

/// Pick the stored content type: the declared one if it parses, else a guess from the name.
pub fn resolve_content_type(declared: &str, filename: &str) -> String {
    let declared = declared.trim();
    if !declared.is_empty()
        && declared.contains('/')
        && !declared.chars().any(|c| c.is_control())
    {
        return declared.to_string();
    }
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string()
}
