//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Super admin (every scope)
//! wn-cli admin create -e ops-lead@wellnest.health -n "Ops Lead" -r super_admin
//!
//! # Admin with an explicit scope set instead of the role default
//! wn-cli admin create -e mkt@wellnest.health -n "Marketing" -r admin \
//!     --scope catalog --scope promotions
//!
//! wn-cli admin list
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

use wellnest_admin::db::{AdminUserRepository, RepositoryError};
use wellnest_core::{AdminRole, Email, EmailError, PermissionScope, PermissionSet};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: super_admin, admin, operator")]
    InvalidRole(String),

    /// Invalid scope name.
    #[error("{0}")]
    InvalidScope(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// User already exists.
    #[error("Admin user already exists with email: {0}")]
    UserExists(String),
}

/// Parse the `--scope` arguments. No arguments means "use the role default".
fn parse_scopes(names: &[String]) -> Result<Option<PermissionSet>, AdminError> {
    if names.is_empty() {
        return Ok(None);
    }
    PermissionSet::from_names(names)
        .map(Some)
        .map_err(|e| AdminError::InvalidScope(format!("{e}. Valid scopes: {}", valid_scopes())))
}

fn valid_scopes() -> String {
    PermissionScope::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

async fn connect() -> Result<PgPool, AdminError> {
    dotenvy::dotenv().ok();

    let database_url = super::database_url("ADMIN_DATABASE_URL")
        .ok_or(AdminError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    tracing::info!("Connecting to admin database...");
    Ok(PgPool::connect(database_url.expose_secret()).await?)
}

/// Create a new admin user.
///
/// # Returns
///
/// The ID of the created admin user.
///
/// # Errors
///
/// Returns `AdminError` for invalid input, an existing email or a database
/// failure.
pub async fn create_user(
    email: &str,
    name: &str,
    role: &str,
    scopes: &[String],
) -> Result<i32, AdminError> {
    let role: AdminRole = role
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;
    let email = Email::parse(email)?;
    let scopes = parse_scopes(scopes)?;

    let pool = connect().await?;
    let repo = AdminUserRepository::new(&pool);

    if repo.get_by_email(&email).await?.is_some() {
        return Err(AdminError::UserExists(email.to_string()));
    }

    tracing::info!("Creating admin user: {} ({})", email, role);

    let user = repo
        .create(&email, name, role, scopes.as_ref())
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(email.to_string()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}, Role: {}, Scopes: [{}]",
        user.id,
        user.email,
        user.role,
        user.scopes.to_names().join(", ")
    );

    Ok(user.id.as_i32())
}

/// List admin users with their effective scopes.
///
/// # Errors
///
/// Returns `AdminError` if the database cannot be reached.
pub async fn list_users() -> Result<(), AdminError> {
    let pool = connect().await?;
    let users = AdminUserRepository::new(&pool).list().await?;

    if users.is_empty() {
        tracing::info!("No admin users");
    }
    for user in users {
        tracing::info!(
            "{:>4}  {:<32} {:<12} [{}]",
            user.id.as_i32(),
            user.email.as_str(),
            user.role.to_string(),
            user.scopes.to_names().join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_no_scopes_means_role_default() {
        assert!(parse_scopes(&[]).unwrap().is_none());
    }

    #[test]
    fn test_explicit_scopes() {
        let set = parse_scopes(&["catalog".to_owned(), "orders".to_owned()])
            .unwrap()
            .unwrap();
        assert!(set.contains(PermissionScope::Catalog));
        assert!(set.contains(PermissionScope::Orders));
        assert!(!set.contains(PermissionScope::Promotions));
    }

    #[test]
    fn test_unknown_scope_lists_valid_ones() {
        let err = parse_scopes(&["menus".to_owned()]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("menus"));
        assert!(message.contains("admin_users"));
    }
}
