use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("File not selected.")]
    NotSelected,

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Storage error: {0}")]
    Io(#[from] io::Error),
}

pub type FileResult<T> = Result<T, FileError>;

impl From<FileError> for AppError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::NotSelected => AppError::BadRequest(err.to_string()),
            FileError::NotFound(name) => AppError::NotFound(format!("File {} not found", name)),
            FileError::InvalidName(_) => AppError::BadRequest(err.to_string()),
            // Broken upload bodies surface as InvalidData from the request stream
            FileError::Io(e) if e.kind() == io::ErrorKind::InvalidData => {
                AppError::BadRequest(format!("Malformed upload: {}", e))
            }
            FileError::Io(e) => AppError::Io(e),
        }
    }
}

impl IntoResponse for FileError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
