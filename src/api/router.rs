//! Application router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! HTML form routes live under `/sessions/`, JSON routes under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! 1. Request tracing → 2. Cache control

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the application router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn app_router(ctx: ApiContext) -> Router {
    let pages = Router::new()
        .route("/", get(endpoints::sessions::start))
        .route("/sessions/:id", get(endpoints::sessions::page))
        .route("/sessions/:id/symptoms", post(endpoints::sessions::add_symptom))
        .route(
            "/sessions/:id/symptoms/:index/remove",
            post(endpoints::sessions::remove_symptom),
        )
        .route("/sessions/:id/check", post(endpoints::sessions::check));

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/analyze", post(endpoints::analyze::analyze));

    pages
        .nest("/api", api)
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::cache::no_store))
        .layer(TraceLayer::new_for_http())
}
