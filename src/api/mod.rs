//! HTTP surface for the symptom checker.
//!
//! Server-rendered form pages under `/sessions/`, plus a small JSON API
//! under `/api/`. The router is composable: `app_router()` returns a
//! `Router` that `server::start_server` mounts on a listener.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::app_router;
pub use server::{start_server, AppServer, ServerError};
pub use types::ApiContext;
