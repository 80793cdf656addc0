use axum::{
    Json, Router,
    body::Body,
    extract::{DefaultBodyLimit, Multipart, Path, State, multipart::MultipartRejection},
    http::{HeaderMap, HeaderValue, header},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome,
    errors::responses::{BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse},
};
use futures::TryStreamExt;
use observability::FileMetrics;
use serde_json::json;
use std::io;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::error::{FileError, FileResult};
use crate::store::{BlobStore, ByteStream, FileInfo};

const TAG: &str = "files";

/// Multipart field carrying the upload
pub const FILE_FIELD: &str = "file";

pub const UPLOADED_MESSAGE: &str = "File uploaded successfully.";

/// Upload form
#[allow(dead_code)]
#[derive(ToSchema)]
struct UploadForm {
    /// Binary file content
    file: String,
}

/// OpenAPI documentation for Files API
#[derive(OpenApi)]
#[openapi(
    paths(upload_file, download_file, list_files, file_details),
    components(
        schemas(FileInfo, UploadForm),
        responses(NotFoundResponse, BadRequestValidationResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = TAG, description = "File upload and download")
    )
)]
pub struct ApiDoc;

/// Create the files router.
///
/// `max_upload_bytes` caps the whole multipart request body.
pub fn router<S: BlobStore + 'static>(store: S, max_upload_bytes: usize) -> Router {
    let shared_store = Arc::new(store);

    Router::new()
        .route(
            "/upload",
            post(upload_file).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/download/{file_name}", get(download_file))
        .route("/", get(list_files))
        .route("/{file_name}", get(file_details))
        .with_state(shared_store)
}

/// Upload a file
///
/// Stores the `file` part of a multipart form under its client file name.
#[utoipa::path(
    post,
    path = "/upload",
    tag = TAG,
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = String, content_type = "text/plain"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upload_file<S: BlobStore>(
    State(store): State<Arc<S>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> FileResult<&'static str> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Upload without a multipart body");
        FileError::NotSelected
    })?;

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let Some(name) = field.file_name().filter(|n| !n.is_empty()).map(str::to_owned) else {
            return Err(FileError::NotSelected);
        };

        let content: ByteStream<'_> = Box::pin(field.map_err(malformed));
        let written = store.upload(&name, content).await?;
        FileMetrics::record_uploaded(written);

        AuditEvent::new(
            "file.upload",
            Some(format!("file:{}", name)),
            AuditOutcome::Success,
        )
        .with_request_headers(&headers)
        .with_details(json!({ "size": written }))
        .log();

        return Ok(UPLOADED_MESSAGE);
    }

    Err(FileError::NotSelected)
}

fn malformed(err: axum::extract::multipart::MultipartError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err.body_text())
}

/// Download a file
#[utoipa::path(
    get,
    path = "/download/{file_name}",
    tag = TAG,
    params(
        ("file_name" = String, Path, description = "Stored file name")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream",
            headers(("Content-Disposition" = String, description = "attachment; filename=\"...\""))
        ),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn download_file<S: BlobStore>(
    State(store): State<Arc<S>>,
    Path(file_name): Path<String>,
) -> FileResult<impl IntoResponse> {
    let stream = store.download(&file_name).await?;
    FileMetrics::record_downloaded();

    // Stored names never contain quotes or control characters
    let disposition = HeaderValue::try_from(format!("attachment; filename=\"{}\"", file_name))
        .map_err(|e| FileError::Io(io::Error::other(e)))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(stream),
    ))
}

/// List stored files
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "Stored files", body = Vec<FileInfo>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_files<S: BlobStore>(State(store): State<Arc<S>>) -> FileResult<Json<Vec<FileInfo>>> {
    Ok(Json(store.list().await?))
}

/// Get file details
#[utoipa::path(
    get,
    path = "/{file_name}",
    tag = TAG,
    params(
        ("file_name" = String, Path, description = "Stored file name")
    ),
    responses(
        (status = 200, description = "File details", body = FileInfo),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn file_details<S: BlobStore>(
    State(store): State<Arc<S>>,
    Path(file_name): Path<String>,
) -> FileResult<Json<FileInfo>> {
    Ok(Json(store.details(&file_name).await?))
}
