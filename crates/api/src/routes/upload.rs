//! Upload route.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;

use crate::AppState;
use crate::extractors::{UploadForm, UploadFormRejection};
use filedrop_core::upload::UploadError;

/// Creates the upload routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload_file))
}

/// POST `/upload`
/// Store a file and record who uploaded it.
///
/// Expects `multipart/form-data` with text fields `name` and `email` and a
/// file part `file`.
async fn upload_file(
    State(state): State<AppState>,
    form: Result<UploadForm, UploadFormRejection>,
) -> Response {
    let outcome = match form {
        Ok(UploadForm(decoded)) => state.uploads.upload(decoded).await,
        Err(rejection) => Err(state.uploads.reject_malformed(rejection.to_string())),
    };

    match outcome {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Map an upload error to its public response.
fn error_response(err: &UploadError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err.public_message() }))).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, header::CONTENT_TYPE},
    };
    use bytes::Bytes;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::create_router;
    use filedrop_core::metadata::MetadataStore;
    use filedrop_core::storage::BlobStore;
    use filedrop_core::testing::{FakeBlobStore, FakeMetadataStore};
    use filedrop_core::upload::{UploadRecord, UploadService, UploadSettings};
    use filedrop_shared::{CorsConfig, ServerConfig};

    const BOUNDARY: &str = "filedrop-test-boundary";
    const BUCKET: &str = "user-files";
    const TABLE: &str = "UserUploads";
    const STUB_URL: &str = "https://user-files.s3.amazonaws.com";

    /// One part of a multipart body.
    enum Part<'a> {
        Text(&'a str, &'a str),
        File {
            field: &'a str,
            filename: &'a str,
            content_type: Option<&'a str>,
            bytes: &'a [u8],
        },
    }

    fn text(name: &'static str, value: &'static str) -> Part<'static> {
        Part::Text(name, value)
    }

    fn file(filename: &'static str, bytes: &'static [u8]) -> Part<'static> {
        Part::File {
            field: "file",
            filename,
            content_type: Some("text/plain"),
            bytes,
        }
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    field,
                    filename,
                    content_type,
                    bytes,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
                        )
                        .as_bytes(),
                    );
                    if let Some(content_type) = content_type {
                        body.extend_from_slice(
                            format!("Content-Type: {content_type}\r\n").as_bytes(),
                        );
                    }
                    body.extend_from_slice(b"\r\n");
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    struct TestApp {
        blobs: Arc<FakeBlobStore>,
        metadata: Arc<FakeMetadataStore>,
        router: Router,
    }

    fn test_app_with(server: &ServerConfig, cors: &CorsConfig) -> TestApp {
        let blobs = Arc::new(FakeBlobStore::new(STUB_URL));
        let metadata = Arc::new(FakeMetadataStore::new());
        let service = UploadService::new(
            blobs.clone(),
            metadata.clone(),
            UploadSettings::new(BUCKET, TABLE),
        );
        let state = AppState {
            uploads: Arc::new(service),
        };

        TestApp {
            blobs,
            metadata,
            router: create_router(state, server, cors),
        }
    }

    fn test_app() -> TestApp {
        test_app_with(&ServerConfig::default(), &CorsConfig::default())
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_upload_success() {
        let app = test_app();

        let response = app
            .router
            .oneshot(upload_request(&[
                text("name", "Ada"),
                text("email", "ada@example.com"),
                file("notes.txt", b"hello"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(
            json,
            json!({
                "message": "Upload successful",
                "fileUrl": format!("{STUB_URL}/notes.txt"),
            })
        );

        assert_eq!(
            app.metadata.records(TABLE),
            vec![UploadRecord {
                email: "ada@example.com".to_string(),
                name: "Ada".to_string(),
                file_url: format!("{STUB_URL}/notes.txt"),
            }]
        );
        assert_eq!(
            app.blobs.object(BUCKET, "notes.txt"),
            Some(Bytes::from_static(b"hello"))
        );
        assert_eq!(
            app.blobs.content_type(BUCKET, "notes.txt").as_deref(),
            Some("text/plain")
        );
    }

    #[tokio::test]
    async fn test_file_url_escapes_filename() {
        let app = test_app();

        let response = app
            .router
            .oneshot(upload_request(&[
                text("name", "Ada"),
                text("email", "ada@example.com"),
                file("a#b report.txt", b"hello"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await["fileUrl"],
            format!("{STUB_URL}/a%23b%20report.txt")
        );
        assert_eq!(
            app.blobs.object(BUCKET, "a#b report.txt"),
            Some(Bytes::from_static(b"hello"))
        );
    }

    #[tokio::test]
    async fn test_missing_email_returns_400() {
        let app = test_app();

        let response = app
            .router
            .oneshot(upload_request(&[
                text("name", "Ada"),
                file("notes.txt", b"hello"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({ "error": "Missing fields" }));
        assert_eq!(app.blobs.upload_calls(), 0);
        assert_eq!(app.metadata.put_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_file_returns_400() {
        let app = test_app();

        let response = app
            .router
            .oneshot(upload_request(&[
                text("name", "Ada"),
                text("email", "ada@example.com"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({ "error": "Missing fields" }));
        assert_eq!(app.blobs.upload_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_file_returns_400() {
        let app = test_app();

        let response = app
            .router
            .oneshot(upload_request(&[
                text("name", "Ada"),
                text("email", "ada@example.com"),
                file("notes.txt", b""),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({ "error": "Missing fields" }));
        assert_eq!(app.blobs.upload_calls(), 0);
    }

    #[tokio::test]
    async fn test_blob_failure_returns_500() {
        let app = test_app();
        app.blobs.fail_uploads(true);

        let response = app
            .router
            .oneshot(upload_request(&[
                text("name", "Ada"),
                text("email", "ada@example.com"),
                file("notes.txt", b"hello"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({ "error": "Upload failed" }));
        assert_eq!(app.metadata.put_calls(), 0);
    }

    #[tokio::test]
    async fn test_metadata_failure_returns_500_and_leaves_blob() {
        let app = test_app();
        app.metadata.fail_puts(true);

        let response = app
            .router
            .oneshot(upload_request(&[
                text("name", "Ada"),
                text("email", "ada@example.com"),
                file("notes.txt", b"hello"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({ "error": "Upload failed" }));

        let orphan = app
            .blobs
            .read(BUCKET, "notes.txt")
            .await
            .expect("blob should remain");
        assert_eq!(orphan, Bytes::from_static(b"hello"));
        assert!(
            app.metadata
                .get(TABLE, "ada@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_same_filename_overwrites() {
        let app = test_app();

        for contents in [&b"first"[..], &b"second"[..]] {
            let response = app
                .router
                .clone()
                .oneshot(upload_request(&[
                    text("name", "Ada"),
                    text("email", "ada@example.com"),
                    file("notes.txt", contents),
                ]))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(
            app.blobs.read(BUCKET, "notes.txt").await.unwrap(),
            Bytes::from_static(b"second")
        );
    }

    #[tokio::test]
    async fn test_non_multipart_body_is_missing_fields() {
        let app = test_app();

        let response = app
            .router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/upload")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Ada","email":"ada@example.com"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({ "error": "Missing fields" }));
        assert_eq!(app.blobs.upload_calls(), 0);
        assert_eq!(app.metadata.put_calls(), 0);
    }

    #[tokio::test]
    async fn test_body_without_content_type_is_missing_fields() {
        let app = test_app();

        let response = app
            .router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/upload")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({ "error": "Missing fields" }));
        assert_eq!(app.blobs.upload_calls(), 0);
    }

    #[tokio::test]
    async fn test_truncated_multipart_returns_400() {
        let app = test_app();
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"notes.txt\"\r\n\r\nhel"
        );

        let response = app
            .router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/upload")
                    .header(
                        CONTENT_TYPE,
                        format!("multipart/form-data; boundary={BOUNDARY}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Invalid multipart request" })
        );
        assert_eq!(app.blobs.upload_calls(), 0);
    }

    #[tokio::test]
    async fn test_file_under_other_field_returns_400() {
        let app = test_app();

        let response = app
            .router
            .oneshot(upload_request(&[
                text("name", "Ada"),
                text("email", "ada@example.com"),
                Part::File {
                    field: "attachment",
                    filename: "notes.txt",
                    content_type: Some("text/plain"),
                    bytes: b"hello",
                },
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Invalid multipart request" })
        );
        assert_eq!(app.blobs.upload_calls(), 0);
    }

    #[tokio::test]
    async fn test_second_file_part_returns_400() {
        let app = test_app();

        let response = app
            .router
            .oneshot(upload_request(&[
                text("name", "Ada"),
                text("email", "ada@example.com"),
                file("a.txt", b"a"),
                file("b.txt", b"b"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(app.blobs.upload_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_content_type_defaults_to_octet_stream() {
        let app = test_app();

        let response = app
            .router
            .oneshot(upload_request(&[
                text("name", "Ada"),
                text("email", "ada@example.com"),
                Part::File {
                    field: "file",
                    filename: "blob.bin",
                    content_type: None,
                    bytes: b"\x00\x01",
                },
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            app.blobs.content_type(BUCKET, "blob.bin").as_deref(),
            Some("application/octet-stream")
        );
    }

    #[tokio::test]
    async fn test_body_over_limit_returns_400() {
        let server = ServerConfig {
            max_body_bytes: 64,
            ..ServerConfig::default()
        };
        let app = test_app_with(&server, &CorsConfig::default());

        let response = app
            .router
            .oneshot(upload_request(&[
                text("name", "Ada"),
                text("email", "ada@example.com"),
                file("big.txt", &[b'x'; 4096]),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(app.blobs.upload_calls(), 0);
    }

    #[tokio::test]
    async fn test_root_acknowledges() {
        let app = test_app();

        let response = app
            .router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Filedrop upload service is running");
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();

        let response = app
            .router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let cors = CorsConfig {
            allowed_origins: vec!["https://app.example.com".to_string()],
        };
        let app = test_app_with(&ServerConfig::default(), &cors);

        let response = app
            .router
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("Origin", "https://app.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "https://app.example.com"
        );
    }

    #[tokio::test]
    async fn test_cors_ignores_other_origins() {
        let cors = CorsConfig {
            allowed_origins: vec!["https://app.example.com".to_string()],
        };
        let app = test_app_with(&ServerConfig::default(), &cors);

        let response = app
            .router
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("Origin", "https://evil.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            response
                .headers()
                .get("access-control-allow-origin")
                .is_none()
        );
    }
}
