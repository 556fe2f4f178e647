//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                        - Liveness
//! GET    /health/ready                  - Readiness (database)
//!
//! # Cart (owner)
//! GET    /cart                          - Cart lines
//! POST   /cart                          - Add item (merges into existing line)
//! PUT    /cart/{line_id}                - Set quantity
//! DELETE /cart/{line_id}                - Remove line
//! DELETE /cart                          - Clear cart
//!
//! # Orders (owner)
//! POST   /orders                        - Place order from items or cart
//! GET    /orders                        - Order history
//! GET    /orders/{id}                   - Order with lines
//!
//! # Events
//! GET    /events/{id}                   - Event with remaining seats
//! POST   /events/{id}/participate       - Register (owner or guest)
//!
//! # Coupons (owner)
//! POST   /coupons/apply                 - Redeem a code
//! GET    /coupons                       - Owner's grants
//! POST   /coupons/grants/{id}/consume   - Use a grant
//!
//! # Addresses (owner)
//! GET    /addresses                     - Address list, default first
//! POST   /addresses                     - Add address
//! PUT    /addresses/{id}/default        - Make default
//! DELETE /addresses/{id}                - Delete address
//! ```

pub mod addresses;
pub mod cart;
pub mod coupons;
pub mod events;
pub mod health;
pub mod orders;

use axum::{
    Router,
    routing::{get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// `{"success": true}` acknowledgement body.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    #[must_use]
    pub const fn ok() -> Self {
        Self { success: true }
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::list).post(cart::add).delete(cart::clear))
        .route("/{line_id}", put(cart::update).delete(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route("/{id}", get(orders::show))
}

/// Create the event routes router.
pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(events::show))
        .route("/{id}/participate", post(events::participate))
}

/// Create the coupon routes router.
pub fn coupon_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(coupons::list))
        .route("/apply", post(coupons::apply))
        .route("/grants/{id}/consume", post(coupons::consume))
}

/// Create the address routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(addresses::list).post(addresses::create))
        .route("/{id}", axum::routing::delete(addresses::delete))
        .route("/{id}/default", put(addresses::set_default))
}

/// Build the complete storefront router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .nest("/events", event_routes())
        .nest("/coupons", coupon_routes())
        .nest("/addresses", address_routes())
}
