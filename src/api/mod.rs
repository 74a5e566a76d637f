//! HTTP API module for the swipe audit engine.
//!
//! This module exposes the audit as a JSON endpoint at `POST /audit`, plus a
//! liveness probe at `GET /health`.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::AuditRequest;
pub use response::{ApiError, ApiErrorResponse, AuditResponse, HealthResponse};
pub use state::AppState;
