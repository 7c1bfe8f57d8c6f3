//! File-upload endpoints.

use crate::error::{AppError, Result};
use crate::models::{AuthUser, MessageResponse, UploadedFile};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// POST /file-upload (multipart, authenticated)
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadedFile>)> {
    let mut file: Option<(Vec<u8>, String)> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::bad_request(format!("Failed to read file: {}", e)))?;
                file = Some((bytes.to_vec(), filename));
            }
            Some("description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::bad_request(format!("Invalid description: {}", e)))?;
                description = Some(text);
            }
            _ => {}
        }
    }

    let (bytes, filename) = file.ok_or_else(|| AppError::bad_request("File is required"))?;

    let record = state
        .file_service()
        .upload(bytes, &filename, description, &user)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /file-upload
pub async fn get_all_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UploadedFile>>> {
    let files = state.file_service().get_all_files().await?;
    Ok(Json(files))
}

/// DELETE /file-upload/:id (admin only)
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    state.file_service().delete_file(id).await?;

    Ok(Json(MessageResponse {
        message: "File deleted successfully".to_string(),
    }))
}
