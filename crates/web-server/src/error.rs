use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input file: {0}")]
    Ingestion(#[from] ingestion::IngestionError),
    #[error("Missing upload field: {0}")]
    MissingFile(&'static str),
    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Ingestion(ingestion_err) => {
                tracing::warn!(error = %ingestion_err, "Rejected upload.");
                (StatusCode::UNPROCESSABLE_ENTITY, ingestion_err.to_string())
            }
            AppError::MissingFile(field) => (
                StatusCode::BAD_REQUEST,
                format!("Missing required file field '{}'", field),
            ),
            AppError::Multipart(multipart_err) => {
                tracing::warn!(error = %multipart_err, "Multipart error.");
                (multipart_err.status(), multipart_err.body_text())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
