//! Cache-control middleware.
//!
//! Pages and analysis results are per-session health data; no
//! intermediary or browser cache may keep them.

use axum::http::{header, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;

pub async fn no_store(req: Request<axum::body::Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
