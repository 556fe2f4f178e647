//! Database operations for the storefront.
//!
//! # Schema: `shop`
//!
//! ## Tables
//!
//! - `user` - Owners (accounts are created by the external login flow)
//! - `product` - Catalog items and their current prices
//! - `cart_line` - One row per (owner, product)
//! - `order` / `order_line` - Placed orders with price snapshots
//! - `event` / `event_registration` - Capacity-limited events
//! - `coupon` / `coupon_grant` - Coupons and per-owner redemptions
//! - `address` - Shipping addresses, at most one default per owner
//! - `subscription_plan`, `banner`, `promotion`, `promotion_product` - Ranked
//!   catalog collections (reordered from the admin console)
//! - `session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p wellnest-cli -- migrate storefront
//! ```

pub mod addresses;
pub mod cart;
pub mod coupons;
pub mod events;
pub mod orders;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::AddressRepository;
pub use cart::CartRepository;
pub use coupons::CouponRepository;
pub use events::EventRepository;
pub use orders::OrderRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found (or is not visible to the caller).
    #[error("not found: {0}")]
    NotFound(String),

    /// Input rejected before touching the database.
    #[error("validation failed: {0}")]
    Validation(String),

    /// State conflict (e.g. grant already consumed).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Event is full.
    #[error("event is full")]
    CapacityExceeded,

    /// Coupon is inactive or outside its validity window.
    #[error("coupon cannot be redeemed: {0}")]
    WindowInvalid(String),
}

impl RepositoryError {
    /// Map a foreign-key violation to `NotFound`, everything else to `Database`.
    pub(crate) fn missing_reference(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_foreign_key_violation()
        {
            return Self::NotFound(what.to_owned());
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(2.min(max_connections))
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
