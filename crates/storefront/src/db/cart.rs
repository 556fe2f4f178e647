//! Cart repository.
//!
//! Repeated adds of the same product merge into one row through a single
//! `INSERT .. ON CONFLICT` statement, so concurrent adds cannot create
//! duplicate lines or lose an increment.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use wellnest_core::{CartLineId, MAX_LINE_QUANTITY, ProductId, UserId};

use super::RepositoryError;
use crate::models::CartLine;

#[derive(sqlx::FromRow)]
struct CartLineRow {
    id: CartLineId,
    owner_id: UserId,
    product_id: ProductId,
    quantity: i32,
    options: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            product_id: row.product_id,
            quantity: row.quantity,
            options: row.options,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for cart lines.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Lines in the owner's cart, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, owner: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT id, owner_id, product_id, quantity, options, created_at, updated_at
            FROM shop.cart_line
            WHERE owner_id = $1
            ORDER BY created_at, id
            ",
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CartLine::from).collect())
    }

    /// Add `quantity` units of a product, merging into an existing line.
    ///
    /// `quantity` must already be normalized (see
    /// [`wellnest_core::normalize_add_quantity`]). Options replace the
    /// stored payload only when supplied.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Validation` if the line would hold more than
    /// [`MAX_LINE_QUANTITY`] units.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip_all, fields(owner = %owner, product = %product_id))]
    pub async fn add_item(
        &self,
        owner: UserId,
        product_id: ProductId,
        quantity: i32,
        options: Option<serde_json::Value>,
    ) -> Result<CartLine, RepositoryError> {
        check_quantity(quantity)?;

        // The conflict branch only fires while the merged quantity stays in
        // range; otherwise no row comes back.
        let row = sqlx::query_as::<_, CartLineRow>(
            r"
            INSERT INTO shop.cart_line AS cl (owner_id, product_id, quantity, options)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (owner_id, product_id) DO UPDATE
            SET quantity = cl.quantity + EXCLUDED.quantity,
                options = COALESCE(EXCLUDED.options, cl.options),
                updated_at = NOW()
            WHERE cl.quantity::int8 + EXCLUDED.quantity <= $5
            RETURNING id, owner_id, product_id, quantity, options, created_at, updated_at
            ",
        )
        .bind(owner)
        .bind(product_id)
        .bind(quantity)
        .bind(options)
        .bind(i64::from(MAX_LINE_QUANTITY))
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::missing_reference(e, "item"))?
        .ok_or_else(|| {
            tracing::warn!(quantity, "cart line would exceed the quantity limit");
            RepositoryError::Validation(format!(
                "cart quantity for an item cannot exceed {MAX_LINE_QUANTITY}"
            ))
        })?;

        tracing::debug!(line = %row.id, quantity = row.quantity, "cart line upserted");
        Ok(row.into())
    }

    /// Overwrite the quantity of one of the owner's lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if `quantity` is outside
    /// `1..=MAX_LINE_QUANTITY`.
    /// Returns `RepositoryError::NotFound` if the owner has no such line.
    pub async fn set_quantity(
        &self,
        owner: UserId,
        line_id: CartLineId,
        quantity: i32,
    ) -> Result<CartLine, RepositoryError> {
        check_quantity(quantity)?;

        let row = sqlx::query_as::<_, CartLineRow>(
            r"
            UPDATE shop.cart_line
            SET quantity = $3, updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, product_id, quantity, options, created_at, updated_at
            ",
        )
        .bind(line_id)
        .bind(owner)
        .bind(quantity)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound("cart line".to_owned()))?;

        Ok(row.into())
    }

    /// Remove one of the owner's lines. Removing a missing line succeeds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(
        &self,
        owner: UserId,
        line_id: CartLineId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM shop.cart_line WHERE id = $1 AND owner_id = $2")
            .bind(line_id)
            .bind(owner)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Empty the owner's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, owner: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.cart_line WHERE owner_id = $1")
            .bind(owner)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn check_quantity(quantity: i32) -> Result<(), RepositoryError> {
    if (1..=MAX_LINE_QUANTITY).contains(&quantity) {
        Ok(())
    } else {
        Err(RepositoryError::Validation(format!(
            "quantity must be between 1 and {MAX_LINE_QUANTITY}"
        )))
    }
}
