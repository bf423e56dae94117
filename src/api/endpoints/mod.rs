//! API endpoint handlers.
//!
//! `sessions` serves the HTML form; `analyze` and `health` are JSON.

pub mod analyze;
pub mod health;
pub mod sessions;
