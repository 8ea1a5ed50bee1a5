//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: collaborator wiring (catalog storage, mail transport, coordinator)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use pharmacie_notifications::MessageTransport;
use pharmacie_replenishment::{CatalogRepository, RunCoordinator};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router around an already-wired coordinator.
pub fn build_app<R, T>(coordinator: RunCoordinator<R, T>) -> Router
where
    R: CatalogRepository + 'static,
    T: MessageTransport + 'static,
{
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router::<R, T>())
        .layer(Extension(Arc::new(coordinator)))
        .layer(ServiceBuilder::new())
}
