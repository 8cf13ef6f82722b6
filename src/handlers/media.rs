// src/handlers/media.rs

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use std::path::Path;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Maps an accepted image content type to the extension stored on disk.
fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Handler for POST /api/media (authenticated).
/// Accepts a multipart form with a single `file` field and stores the image
/// under the configured media directory with a random name. The response
/// carries the public URL that story blocks and avatars reference.
pub async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("Malformed multipart request".to_string()))?
    {
        if field.name() == Some("file") {
            content_type = field.content_type().map(|s| s.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|_| AppError::BadRequest("Could not read uploaded file".to_string()))?;
            file_bytes = Some(bytes.to_vec());
            break;
        }
    }

    let data = file_bytes
        .ok_or_else(|| AppError::BadRequest("Multipart field 'file' is required".to_string()))?;

    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::BadRequest(
            "Uploaded file exceeds the 5 MB limit".to_string(),
        ));
    }

    let extension = content_type
        .as_deref()
        .and_then(image_extension)
        .ok_or_else(|| {
            AppError::BadRequest("Only JPEG, PNG, GIF and WebP images are accepted".to_string())
        })?;

    let filename = format!("{}.{}", Uuid::new_v4(), extension);
    let media_dir = Path::new(&state.config.media_dir);

    tokio::fs::create_dir_all(media_dir).await.map_err(|e| {
        AppError::InternalServerError(format!("Failed to create media directory: {}", e))
    })?;
    tokio::fs::write(media_dir.join(&filename), &data)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Failed to store upload: {}", e)))?;

    tracing::info!("Stored media upload {} ({} bytes)", filename, data.len());

    Ok((
        StatusCode::CREATED,
        Json(json!({ "url": format!("/media/{}", filename) })),
    ))
}
