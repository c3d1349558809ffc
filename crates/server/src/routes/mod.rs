//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                  - Customer management page
//! GET    /health            - Liveness check
//! GET    /health/ready      - Readiness check (sheet backend configured)
//!
//! # Customer API
//! GET    /api/customers     - List customers
//! POST   /api/customers     - Create a customer
//! PUT    /api/customers     - Update a customer (id in body)
//! DELETE /api/customers?id= - Delete a customer
//! ```

pub mod customers;
pub mod home;

use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::state::AppState;

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route(
            "/api/customers",
            get(customers::list)
                .post(customers::create)
                .put(customers::update)
                .delete(customers::delete),
        )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the sheet backend is not configured.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.customers().is_configured() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
