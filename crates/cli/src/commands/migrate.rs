//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! wn-cli migrate storefront
//! wn-cli migrate admin
//! wn-cli migrate all
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - Connection string for the storefront migrations
//! - `ADMIN_DATABASE_URL` - Connection string for the admin migrations
//! - `DATABASE_URL` - Fallback for either
//!
//! Both sets usually target the same database. They share the
//! `_sqlx_migrations` table, so each migrator ignores versions applied by
//! the other.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run storefront (`shop` schema) migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the URL is missing, the connection fails or a
/// migration fails.
pub async fn storefront() -> Result<(), MigrationError> {
    run(
        "storefront",
        "STOREFRONT_DATABASE_URL",
        sqlx::migrate!("../storefront/migrations"),
    )
    .await
}

/// Run admin (`admin` schema) migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the URL is missing, the connection fails or a
/// migration fails.
pub async fn admin() -> Result<(), MigrationError> {
    run("admin", "ADMIN_DATABASE_URL", sqlx::migrate!("../admin/migrations")).await
}

async fn run(
    label: &str,
    url_var: &'static str,
    mut migrator: Migrator,
) -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url =
        super::database_url(url_var).ok_or(MigrationError::MissingEnvVar(url_var))?;

    tracing::info!("Connecting to {label} database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!(
        count = migrator.iter().count(),
        "Running {label} migrations..."
    );
    migrator.set_ignore_missing(true);
    migrator.run(&pool).await?;

    tracing::info!("{label} migrations complete!");
    Ok(())
}
