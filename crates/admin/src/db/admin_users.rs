//! Admin user repository.
//!
//! Accounts are provisioned from the CLI. A `NULL` `scopes` column means
//! the role's default set applies; an explicit array overrides it.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use wellnest_core::{AdminRole, AdminUserId, Email, PermissionSet};

use super::RepositoryError;
use crate::models::AdminUser;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: AdminUserId,
    email: Email,
    name: String,
    role: AdminRole,
    scopes: Option<Vec<String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AdminUserRow> for AdminUser {
    type Error = RepositoryError;

    fn try_from(row: AdminUserRow) -> Result<Self, Self::Error> {
        let scopes = match row.scopes {
            Some(names) => PermissionSet::from_names(names.as_slice()).map_err(|e| {
                RepositoryError::DataCorruption(format!("admin {}: {e}", row.id))
            })?,
            None => PermissionSet::for_role(row.role),
        };

        Ok(Self {
            id: row.id,
            email: row.email,
            name: row.name,
            role: row.role,
            scopes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const ADMIN_USER_COLUMNS: &str = "id, email, name, role, scopes, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for admin accounts.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an admin user.
    ///
    /// `scopes = None` stores no explicit set, so the role default applies.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, scopes), fields(email = %email, role = %role))]
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        role: AdminRole,
        scopes: Option<&PermissionSet>,
    ) -> Result<AdminUser, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            r"
            INSERT INTO admin.admin_user (email, name, role, scopes)
            VALUES ($1, $2, $3, $4)
            RETURNING {ADMIN_USER_COLUMNS}
            "
        ))
        .bind(email)
        .bind(name)
        .bind(role)
        .bind(scopes.map(PermissionSet::to_names))
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        tracing::info!(admin_id = %row.id, "admin user created");
        row.try_into()
    }

    /// Get an admin user by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored scopes are invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<AdminUser>, RepositoryError> {
        sqlx::query_as::<_, AdminUserRow>(&format!(
            "SELECT {ADMIN_USER_COLUMNS} FROM admin.admin_user WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?
        .map(TryInto::try_into)
        .transpose()
    }

    /// List all admin users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<AdminUser>, RepositoryError> {
        sqlx::query_as::<_, AdminUserRow>(&format!(
            "SELECT {ADMIN_USER_COLUMNS} FROM admin.admin_user ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(TryInto::try_into)
        .collect()
    }
}
