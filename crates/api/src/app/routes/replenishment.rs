use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use pharmacie_notifications::MessageTransport;
use pharmacie_replenishment::{CatalogRepository, RunCoordinator};

use crate::app::{dto, errors};

/// Run the replenishment process and return its summary.
///
/// Accepts GET and POST without a body. Send failures are not reported here
/// (only in the server log); storage failures are.
pub async fn launch<R, T>(
    Extension(coordinator): Extension<Arc<RunCoordinator<R, T>>>,
) -> axum::response::Response
where
    R: CatalogRepository + 'static,
    T: MessageTransport + 'static,
{
    tracing::info!("replenishment requested");

    match coordinator.run_from_storage().await {
        Ok(summary) => (StatusCode::OK, Json(dto::summary_to_response(summary))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "replenishment run failed");
            errors::run_error_to_response(e)
        }
    }
}
