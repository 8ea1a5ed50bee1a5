use axum::{routing::get, Router};

use pharmacie_notifications::MessageTransport;
use pharmacie_replenishment::CatalogRepository;

pub mod replenishment;
pub mod system;

/// Router for the replenishment service endpoints.
pub fn router<R, T>() -> Router
where
    R: CatalogRepository + 'static,
    T: MessageTransport + 'static,
{
    Router::new().route(
        "/api/services/approvisionnement",
        get(replenishment::launch::<R, T>).post(replenishment::launch::<R, T>),
    )
}
