//! HTTP route handlers for the admin console.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                  - Liveness
//! GET    /health/ready                            - Readiness (database)
//!
//! # Catalog (scope: catalog)
//! POST   /admin/subscription-plans/reorder        - Overwrite plan ranks
//! POST   /admin/banners/reorder                   - Overwrite banner ranks
//!
//! # Promotions (scope: promotions)
//! GET    /admin/promotions/{id}/products          - Products in display order
//! PUT    /admin/promotions/{id}/products          - Replace product list
//! POST   /admin/promotions/{id}/products/reorder  - Overwrite product ranks
//!
//! # Orders (scope: orders)
//! PUT    /admin/orders/{id}/status                - Status transition
//! ```

pub mod catalog;
pub mod health;
pub mod orders;
pub mod promotions;

use axum::{
    Router,
    routing::{get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

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

/// Reorder acknowledgement: `{"success": true, "updated": n}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Reordered {
    pub success: bool,
    pub updated: u64,
}

impl Reordered {
    #[must_use]
    pub const fn new(updated: u64) -> Self {
        Self {
            success: true,
            updated,
        }
    }
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/subscription-plans/reorder", post(catalog::reorder_plans))
        .route("/banners/reorder", post(catalog::reorder_banners))
        .route(
            "/promotions/{id}/products",
            get(promotions::list_products).put(promotions::set_products),
        )
        .route(
            "/promotions/{id}/products/reorder",
            post(promotions::reorder_products),
        )
        .route("/orders/{id}/status", put(orders::update_status))
}

/// Build the complete admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/admin", admin_routes())
}
