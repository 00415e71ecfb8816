//! HTTP REST API (axum)

pub mod handlers;
pub mod server;

pub use server::{run_api_server, ApiConfig};
