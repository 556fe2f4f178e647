//! Database operations for the admin console.
//!
//! The console shares the storefront's database. It writes to a few `shop`
//! tables (ranks, promotion membership, order status) and owns the `admin`
//! schema:
//!
//! - `admin.admin_user` - Admin accounts with role and optional explicit scopes
//! - `admin.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p wellnest-cli -- migrate admin
//! ```

pub mod admin_users;
pub mod catalog_order;
pub mod orders;
pub mod promotions;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use wellnest_core::RankError;

pub use admin_users::AdminUserRepository;
pub use catalog_order::CatalogOrderRepository;
pub use orders::AdminOrderRepository;
pub use promotions::PromotionRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input rejected before touching the database.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Constraint violation or illegal state change.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<RankError> for RepositoryError {
    fn from(err: RankError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Create a `PostgreSQL` connection pool.
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
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
