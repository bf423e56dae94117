//! API middleware.
//!
//! Execution order (outermost → innermost):
//! 1. Request tracing (`tower_http::trace::TraceLayer`)
//! 2. Cache control: every response is marked `no-store`

pub mod cache;
