//! HTTP API module for the betting, health and metrics endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::{ApiError, AppState};
pub use routes::create_router;
