//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - File upload routes (multipart and base64)
//! - File download route
//! - Health check
//! - JSON error responses

pub mod error;
pub mod routes;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use ossbridge_core::storage::{ObjectStorageService, OpendalObjectStore};

/// Storage façade type used by the HTTP layer.
pub type Storage = ObjectStorageService<OpendalObjectStore>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Object storage façade.
    pub storage: Arc<Storage>,
}

/// Creates the main application router.
///
/// Request bodies larger than `body_limit_bytes` are rejected with 413,
/// whether the size is declared up front or only discovered while an
/// upload streams in.
pub fn create_router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use std::io;
    use tower::ServiceExt;

    use crate::routes::test_support::memory_state;

    const BOUNDARY: &str = "X-OSSBRIDGE-BOUNDARY";
    const LIMIT: usize = 256;

    fn upload_request(body: Body) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/files")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(body)
            .unwrap()
    }

    /// Multipart body split so the field header fits under [`LIMIT`] and the
    /// content arrives in later chunks.
    fn chunked_multipart(content_chunks: usize) -> Body {
        let mut chunks = vec![format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"big.bin\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )];
        chunks.extend((0..content_chunks).map(|_| "x".repeat(64)));
        chunks.push(format!("\r\n--{BOUNDARY}--\r\n"));
        Body::from_stream(futures::stream::iter(chunks.into_iter().map(Ok::<_, io::Error>)))
    }

    #[tokio::test]
    async fn test_chunked_upload_over_limit_is_413() {
        let app = create_router(memory_state(), LIMIT);

        let response = app
            .oneshot(upload_request(chunked_multipart(64)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_chunked_upload_under_limit_succeeds() {
        let app = create_router(memory_state(), LIMIT);

        let response = app
            .oneshot(upload_request(chunked_multipart(1)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_declared_length_over_limit_is_413() {
        let app = create_router(memory_state(), LIMIT);

        let mut request = upload_request(Body::from("x".repeat(LIMIT * 4)));
        request
            .headers_mut()
            .insert(header::CONTENT_LENGTH, (LIMIT * 4).into());

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
