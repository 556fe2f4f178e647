//! Promotion product membership.

use sqlx::PgPool;
use tracing::instrument;

use wellnest_core::{ProductId, PromotionId, validate_members};

use super::RepositoryError;
use crate::models::PromotionProduct;

#[derive(sqlx::FromRow)]
struct PromotionProductRow {
    promotion_id: PromotionId,
    product_id: ProductId,
    product_name: String,
    display_order: i32,
}

impl From<PromotionProductRow> for PromotionProduct {
    fn from(row: PromotionProductRow) -> Self {
        Self {
            promotion_id: row.promotion_id,
            product_id: row.product_id,
            product_name: row.product_name,
            display_order: row.display_order,
        }
    }
}

/// Repository for promotion product lists.
pub struct PromotionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PromotionRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Replace a promotion's products with `product_ids`, ranked by position.
    ///
    /// Destructive: links not in `product_ids` are removed. The promotion row
    /// is locked for the duration so concurrent replaces apply one after the
    /// other.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if a product id repeats.
    /// Returns `RepositoryError::NotFound` if the promotion or a product does
    /// not exist; nothing is changed in that case.
    #[instrument(skip(self, product_ids), fields(promotion = %promotion_id, size = product_ids.len()))]
    pub async fn set_members(
        &self,
        promotion_id: PromotionId,
        product_ids: &[ProductId],
    ) -> Result<u64, RepositoryError> {
        let ids: Vec<i32> = product_ids.iter().map(ProductId::as_i32).collect();
        validate_members(&ids)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM shop.promotion WHERE id = $1 FOR UPDATE")
            .bind(promotion_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("promotion".to_owned()))?;

        let removed = sqlx::query("DELETE FROM shop.promotion_product WHERE promotion_id = $1")
            .bind(promotion_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let inserted = sqlx::query(
            r"
            INSERT INTO shop.promotion_product (promotion_id, product_id, display_order)
            SELECT $1, v.id, (v.position - 1)::int4
            FROM UNNEST($2::int4[]) WITH ORDINALITY AS v(id, position)
            ",
        )
        .bind(promotion_id)
        .bind(&ids)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound("product".to_owned());
            }
            RepositoryError::Database(e)
        })?
        .rows_affected();

        tx.commit().await?;

        tracing::info!(removed, inserted, "promotion products replaced");
        Ok(inserted)
    }

    /// A promotion's products in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the promotion does not exist.
    pub async fn list_members(
        &self,
        promotion_id: PromotionId,
    ) -> Result<Vec<PromotionProduct>, RepositoryError> {
        ensure_promotion(self.pool, promotion_id).await?;

        let rows = sqlx::query_as::<_, PromotionProductRow>(
            r"
            SELECT pp.promotion_id, pp.product_id, p.name AS product_name, pp.display_order
            FROM shop.promotion_product pp
            JOIN shop.product p ON p.id = pp.product_id
            WHERE pp.promotion_id = $1
            ORDER BY pp.display_order, pp.product_id
            ",
        )
        .bind(promotion_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// `NotFound` unless the promotion exists.
pub(super) async fn ensure_promotion(
    pool: &PgPool,
    promotion_id: PromotionId,
) -> Result<(), RepositoryError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM shop.promotion WHERE id = $1)")
            .bind(promotion_id)
            .fetch_one(pool)
            .await?;
    if exists {
        Ok(())
    } else {
        Err(RepositoryError::NotFound("promotion".to_owned()))
    }
}
