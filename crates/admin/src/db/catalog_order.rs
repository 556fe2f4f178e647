//! Rank overwrites for ranked catalog collections.
//!
//! A reorder writes `display_order` for exactly the ids in the request, in
//! one `UPDATE ... FROM UNNEST(...)` statement. Ids that are not named keep
//! their rank; ids that do not exist match no row and are skipped. There is
//! no concurrency token, so the last reorder to commit wins.

use sqlx::PgPool;
use tracing::instrument;

use wellnest_core::{PromotionId, RankList};

use super::RepositoryError;
use super::promotions::ensure_promotion;
use crate::models::RankedCollection;

/// Repository for ranked catalog collections.
pub struct CatalogOrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogOrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Overwrite the ranks named in `ranks`.
    ///
    /// Returns the number of rows updated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if a promotion's links are
    /// reordered and the promotion does not exist.
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self, ranks), fields(collection = collection.label(), size = ranks.len()))]
    pub async fn reorder(
        &self,
        collection: RankedCollection,
        ranks: &RankList,
    ) -> Result<u64, RepositoryError> {
        if let RankedCollection::PromotionProducts(promotion_id) = collection {
            ensure_promotion(self.pool, promotion_id).await?;
        }
        if ranks.is_empty() {
            return Ok(0);
        }

        let query = match collection {
            RankedCollection::SubscriptionPlans => sqlx::query(
                r"
                UPDATE shop.subscription_plan AS t
                SET display_order = v.rank
                FROM UNNEST($1::int4[], $2::int4[]) AS v(id, rank)
                WHERE t.id = v.id
                ",
            ),
            RankedCollection::Banners => sqlx::query(
                r"
                UPDATE shop.banner AS t
                SET display_order = v.rank
                FROM UNNEST($1::int4[], $2::int4[]) AS v(id, rank)
                WHERE t.id = v.id
                ",
            ),
            RankedCollection::PromotionProducts(_) => sqlx::query(
                r"
                UPDATE shop.promotion_product AS t
                SET display_order = v.rank
                FROM UNNEST($1::int4[], $2::int4[]) AS v(id, rank)
                WHERE t.promotion_id = $3 AND t.product_id = v.id
                ",
            ),
        };

        let mut query = query.bind(ranks.ids()).bind(ranks.ranks());
        if let RankedCollection::PromotionProducts(promotion_id) = collection {
            query = query.bind(promotion_id);
        }

        let updated = query.execute(self.pool).await?.rows_affected();

        if usize::try_from(updated).ok() != Some(ranks.len()) {
            tracing::debug!(
                requested = ranks.len(),
                updated,
                "some ids in reorder did not match a row"
            );
        }
        tracing::info!(updated, "ranks overwritten");
        Ok(updated)
    }

    /// Ids of a collection in display order (ties broken by id).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn ordered_ids(
        &self,
        collection: RankedCollection,
    ) -> Result<Vec<i32>, RepositoryError> {
        let ids = match collection {
            RankedCollection::SubscriptionPlans => {
                sqlx::query_scalar(
                    "SELECT id FROM shop.subscription_plan ORDER BY display_order, id",
                )
                .fetch_all(self.pool)
                .await?
            }
            RankedCollection::Banners => {
                sqlx::query_scalar("SELECT id FROM shop.banner ORDER BY display_order, id")
                    .fetch_all(self.pool)
                    .await?
            }
            RankedCollection::PromotionProducts(promotion_id) => {
                promotion_product_ids(self.pool, promotion_id).await?
            }
        };
        Ok(ids)
    }
}

async fn promotion_product_ids(
    pool: &PgPool,
    promotion_id: PromotionId,
) -> Result<Vec<i32>, sqlx::Error> {
    sqlx::query_scalar(
        r"
        SELECT product_id
        FROM shop.promotion_product
        WHERE promotion_id = $1
        ORDER BY display_order, product_id
        ",
    )
    .bind(promotion_id)
    .fetch_all(pool)
    .await
}
