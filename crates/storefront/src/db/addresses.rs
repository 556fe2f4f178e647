//! Shipping address repository.
//!
//! Every write that touches `is_default` first locks the owner's `shop.user`
//! row, so two concurrent "make this my default" calls for one owner run one
//! after the other. The partial unique index on `(owner_id) WHERE is_default`
//! backs the invariant at the storage level.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use wellnest_core::{AddressId, UserId};

use super::RepositoryError;
use crate::models::{Address, NewAddress};

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: AddressId,
    owner_id: UserId,
    recipient: String,
    phone: String,
    postal_code: String,
    line1: String,
    line2: Option<String>,
    is_default: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            recipient: row.recipient,
            phone: row.phone,
            postal_code: row.postal_code,
            line1: row.line1,
            line2: row.line2,
            is_default: row.is_default,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for shipping addresses.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The owner's addresses, default first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, owner: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(
            r"
            SELECT id, owner_id, recipient, phone, postal_code, line1, line2,
                   is_default, created_at, updated_at
            FROM shop.address
            WHERE owner_id = $1
            ORDER BY is_default DESC, created_at, id
            ",
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Address::from).collect())
    }

    /// Add an address. When `is_default` is set, any previous default is
    /// cleared in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if a required field is blank.
    /// Returns `RepositoryError::NotFound` if the owner does not exist.
    #[instrument(skip(self, address), fields(owner = %owner))]
    pub async fn create(
        &self,
        owner: UserId,
        address: NewAddress,
    ) -> Result<Address, RepositoryError> {
        let address = address
            .normalized()
            .map_err(|field| RepositoryError::Validation(format!("{field} is required")))?;

        let mut tx = self.pool.begin().await?;
        lock_owner(&mut tx, owner).await?;

        if address.is_default {
            clear_default(&mut tx, owner).await?;
        }

        let row = sqlx::query_as::<_, AddressRow>(
            r"
            INSERT INTO shop.address (owner_id, recipient, phone, postal_code, line1, line2, is_default)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, owner_id, recipient, phone, postal_code, line1, line2,
                      is_default, created_at, updated_at
            ",
        )
        .bind(owner)
        .bind(&address.recipient)
        .bind(&address.phone)
        .bind(&address.postal_code)
        .bind(&address.line1)
        .bind(address.line2.as_deref())
        .bind(address.is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(address = %row.id, is_default = row.is_default, "address created");
        Ok(row.into())
    }

    /// Make `address_id` the owner's only default address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist or
    /// belongs to another owner. Nothing changes in that case.
    #[instrument(skip(self), fields(owner = %owner, address = %address_id))]
    pub async fn set_default(
        &self,
        owner: UserId,
        address_id: AddressId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        lock_owner(&mut tx, owner).await?;

        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM shop.address WHERE id = $1 AND owner_id = $2)",
        )
        .bind(address_id)
        .bind(owner)
        .fetch_one(&mut *tx)
        .await?;
        if !owned {
            return Err(RepositoryError::NotFound("address".to_owned()));
        }

        clear_default(&mut tx, owner).await?;
        sqlx::query(
            r"
            UPDATE shop.address
            SET is_default = TRUE, updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            ",
        )
        .bind(address_id)
        .bind(owner)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("default address changed");
        Ok(())
    }

    /// Delete one of the owner's addresses.
    ///
    /// Deleting the default leaves the owner without one; no other address
    /// is promoted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist or
    /// belongs to another owner.
    pub async fn delete(&self, owner: UserId, address_id: AddressId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        lock_owner(&mut tx, owner).await?;

        let result = sqlx::query("DELETE FROM shop.address WHERE id = $1 AND owner_id = $2")
            .bind(address_id)
            .bind(owner)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("address".to_owned()));
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Serialize default-address writes for one owner.
async fn lock_owner(conn: &mut PgConnection, owner: UserId) -> Result<(), RepositoryError> {
    sqlx::query_scalar::<_, i32>("SELECT id FROM shop.user WHERE id = $1 FOR UPDATE")
        .bind(owner)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| RepositoryError::NotFound("owner".to_owned()))?;
    Ok(())
}

async fn clear_default(conn: &mut PgConnection, owner: UserId) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        UPDATE shop.address
        SET is_default = FALSE, updated_at = NOW()
        WHERE owner_id = $1 AND is_default
        ",
    )
    .bind(owner)
    .execute(conn)
    .await?;
    Ok(())
}
