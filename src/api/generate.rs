//! Lighting-design generation endpoint.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState, GenerationDto};
use crate::services::GenerationRequest;

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Default)]
struct UploadForm {
    image: Option<Vec<u8>>,
    mime_type: Option<String>,
    prompt: Option<String>,
}

/// Generates a lighting plan for an uploaded photo.
///
/// # Endpoint
/// `POST /api/generate` (multipart: `image`, optional `prompt`)
///
/// # Returns
/// - 200 with `{ success: true, result }`
/// - 400 when no image was uploaded
/// - 401 without an identity
/// - 500 when the model call fails
pub async fn generate(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<GenerationDto>>, ApiError> {
    let multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "Request is not a multipart form");
        ApiError::validation("No image")
    })?;

    let form = read_form(multipart).await?;

    let Some(image) = form.image.filter(|bytes| !bytes.is_empty()) else {
        return Err(ApiError::validation("No image"));
    };

    let request = GenerationRequest {
        image,
        mime_type: form.mime_type.unwrap_or_else(|| FALLBACK_MIME.to_string()),
        prompt: form.prompt.unwrap_or_default(),
    };

    let outcome = state
        .generation_service()
        .generate(&user.username, request)
        .await?;

    Ok(Json(ApiResponse::success(GenerationDto {
        result: outcome.text,
    })))
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                form.mime_type = resolve_mime(field.content_type(), field.file_name());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read image: {e}")))?;
                form.image = Some(bytes.to_vec());
            }
            Some("prompt") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read prompt: {e}")))?;
                form.prompt = Some(text);
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Declared part type first, then a guess from the file name.
fn resolve_mime(content_type: Option<&str>, file_name: Option<&str>) -> Option<String> {
    content_type
        .map(str::trim)
        .filter(|ct| !ct.is_empty() && *ct != FALLBACK_MIME)
        .map(str::to_string)
        .or_else(|| {
            file_name
                .and_then(|name| mime_guess::from_path(name).first())
                .map(|mime| mime.essence_str().to_string())
        })
}
