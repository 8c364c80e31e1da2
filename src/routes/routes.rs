//! Defines routes for the collection details service.
//!
//! ## Structure
//! - **Health endpoints**
//!   - `GET  /healthz` — liveness
//!   - `GET  /readyz`  — readiness (store ping)
//!
//! - **Collection details**
//!   - `GET  /admin/custom/collections/{collection_id}/details` — read normalized details
//!   - `POST /admin/custom/collections/{collection_id}/details` — validate and merge-write

use crate::{
    handlers::{
        details_handlers::{get_details, update_details},
        health_handlers::{healthz, readyz},
    },
    services::details_service::DetailsService,
};
use axum::{Router, routing::get};

/// Build and return the router for all routes.
///
/// The router carries shared state (`DetailsService`) to all handlers.
pub fn routes() -> Router<DetailsService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route(
            "/admin/custom/collections/{collection_id}/details",
            get(get_details).post(update_details),
        )
}

/// The full application with its state attached.
pub fn app(service: DetailsService) -> Router {
    routes().with_state(service)
}
