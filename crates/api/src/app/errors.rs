use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use pharmacie_replenishment::{RunError, StorageError};

pub fn run_error_to_response(err: RunError) -> axum::response::Response {
    match err {
        RunError::Storage(StorageError::Unavailable(msg)) => {
            json_error(StatusCode::BAD_GATEWAY, "storage_unavailable", msg)
        }
        RunError::Storage(StorageError::Malformed(msg)) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_malformed", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
