//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health              - Liveness check
//! GET    /health/ready        - Readiness check (store ping)
//!
//! # Items
//! POST   /items               - Create item
//! GET    /items/filter        - Filter items by query parameters
//! GET    /items/aggregate     - Item counts per email
//! GET    /items/{id}          - Item detail
//! PUT    /items/{id}          - Partial update
//! DELETE /items/{id}          - Delete item
//!
//! # Clock-in
//! POST   /clock-in            - Record a clock-in
//! GET    /clock-in/{id}       - Record detail
//! PUT    /clock-in/{id}       - Partial update
//! ```

pub mod clock_in;
pub mod health;
pub mod items;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the item routes router.
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(items::create))
        .route("/filter", get(items::filter))
        .route("/aggregate", get(items::aggregate))
        .route(
            "/{id}",
            get(items::show).put(items::update).delete(items::delete),
        )
}

/// Create the clock-in routes router.
pub fn clock_in_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(clock_in::create))
        .route("/{id}", get(clock_in::show).put(clock_in::update))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/items", item_routes())
        .nest("/clock-in", clock_in_routes())
}
