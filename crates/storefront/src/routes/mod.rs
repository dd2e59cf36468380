//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Health check
//!
//! # Checkout
//! POST /api/checkout                - Place an order from the active cart
//!
//! # Orders
//! GET  /api/orders/{order_number}   - The shopper's own order, with items
//! ```
//!
//! The handlers here are thin: they deserialize the wire shape, resolve the
//! ambient shopper, invoke the checkout service, and map its typed result
//! or error onto a transport response. All business rules live in
//! `services::checkout`.

pub mod checkout;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(checkout::checkout))
        .route("/orders/{order_number}", get(orders::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
}

/// Liveness probe.
async fn health() -> &'static str {
    "ok"
}
