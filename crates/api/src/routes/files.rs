//! File upload and download routes.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Json, Router,
    extract::{Multipart, Query, State, multipart::MultipartError},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use tokio_util::io::StreamReader;
use tracing::{info, warn};

use crate::{AppState, error::ApiError};
use ossbridge_core::storage::{DEFAULT_CONTENT_TYPE, UploadFile, content_type_for, extension_of};
use ossbridge_shared::AppError;

/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Creates the file routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/files", post(upload_file))
        .route("/files/base64", post(upload_base64))
        .route("/files/download", get(download_file))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for a successful upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Public URL of the stored object.
    pub src: String,
}

/// Request body for a base64 image upload.
#[derive(Debug, Deserialize)]
pub struct Base64UploadRequest {
    /// JPEG bytes as base64, optionally as a `data:` URL.
    pub image: String,
}

/// Query for a download.
#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    /// URL returned by an earlier upload.
    pub url: String,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Strip a `data:<mime>;base64,` prefix if present.
fn strip_data_url(payload: &str) -> &str {
    if payload.starts_with("data:") {
        payload
            .split_once(";base64,")
            .map_or(payload, |(_, data)| data)
    } else {
        payload
    }
}

/// Map a multipart failure, keeping body-limit overruns distinct.
fn multipart_error(e: &MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(e.body_text())
    }
}

/// Content type for a downloaded object, from the extension of its key.
fn download_content_type(key: &str) -> String {
    let filename = key.rsplit('/').next().unwrap_or(key);
    extension_of(filename).map_or_else(
        || DEFAULT_CONTENT_TYPE.to_string(),
        |ext| content_type_for(ext).to_string(),
    )
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/files`
/// Upload the multipart field `file` and return its public URL.
///
/// A body that runs past the size limit while streaming is answered with 413.
async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!(error = %e, "Malformed multipart request");
        multipart_error(&e)
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let too_large = AtomicBool::new(false);
        let content = StreamReader::new(Box::pin(field.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                too_large.store(true, Ordering::Relaxed);
            }
            io::Error::other(e)
        })));

        let uploaded = state
            .storage
            .upload(UploadFile::new(filename.clone(), content))
            .await;
        let src = match uploaded {
            Ok(src) => src,
            Err(_) if too_large.load(Ordering::Relaxed) => {
                warn!(filename = %filename, "Upload exceeded the body limit");
                return Err(
                    AppError::PayloadTooLarge("Request payload is too large".to_string()).into(),
                );
            }
            Err(e) => return Err(e.into()),
        };

        info!(filename = %filename, src = %src, "File uploaded");
        return Ok(Json(UploadResponse { src }));
    }

    Err(AppError::Validation(format!("Missing multipart field '{FILE_FIELD}'")).into())
}

/// POST `/files/base64`
/// Upload a base64-encoded JPEG and return its public URL.
async fn upload_base64(
    State(state): State<AppState>,
    Json(payload): Json<Base64UploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    let encoded = strip_data_url(payload.image.trim());
    let bytes = STANDARD.decode(encoded).map_err(|e| {
        warn!(error = %e, "Invalid base64 image payload");
        AppError::Validation("Image payload is not valid base64".to_string())
    })?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Image payload is empty".to_string()).into());
    }

    let src = state.storage.upload_bytes(bytes).await?;

    info!(src = %src, "Base64 image uploaded");
    Ok(Json(UploadResponse { src }))
}

/// GET `/files/download?url=...`
/// Return the raw bytes of an object previously uploaded here.
async fn download_file(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let data = state.storage.download(&query.url).await?;
    let content_type = state
        .storage
        .key_from_url(&query.url)
        .map_or_else(|_| DEFAULT_CONTENT_TYPE.to_string(), download_content_type);

    Ok(([(header::CONTENT_TYPE, content_type)], data).into_response())
}
