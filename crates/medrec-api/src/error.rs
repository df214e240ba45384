use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medrec_storage::StorageError;
use thiserror::Error;
use tracing::error;

/// Handler-level error taxonomy.
///
/// Infrastructure failures keep their source for server-side logging but
/// serialize to a stable, opaque message; raw driver errors never reach the
/// response body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("patient {0} not found")]
    NotFound(i64),

    #[error("record store failure")]
    Store(#[source] StorageError),

    #[error("object store failure")]
    Blob(#[source] StorageError),
}

impl From<medrec_core::Error> for ApiError {
    fn from(err: medrec_core::Error) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Store(source) => {
                error!(error = %source, "record store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error talking to the database".to_string(),
                )
            }
            ApiError::Blob(source) => {
                error!(error = %source, "object store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error storing image".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
