//! Order status transitions.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use wellnest_core::{OrderId, OrderNumber, OrderStatus, Price, UserId};

use super::RepositoryError;
use crate::models::AdminOrder;

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    owner_id: UserId,
    order_number: OrderNumber,
    total_amount: Price,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for AdminOrder {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            order_number: row.order_number,
            total_amount: row.total_amount,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for order management from the console.
pub struct AdminOrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminOrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Move an order to `next`.
    ///
    /// The current status is read under a row lock, so two concurrent
    /// transitions are checked against each other's result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Conflict` if the transition is not allowed.
    #[instrument(skip(self), fields(order = %order_id, next = %next))]
    pub async fn transition(
        &self,
        order_id: OrderId,
        next: OrderStatus,
    ) -> Result<AdminOrder, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current: OrderStatus =
            sqlx::query_scalar("SELECT status FROM shop.order WHERE id = $1 FOR UPDATE")
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| RepositoryError::NotFound("order".to_owned()))?;

        current.transition_to(next).map_err(|e| {
            tracing::warn!(error = %e, "order transition rejected");
            RepositoryError::Conflict(e.to_string())
        })?;

        let row = sqlx::query_as::<_, OrderRow>(
            r"
            UPDATE shop.order
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_id, order_number, total_amount, status, created_at, updated_at
            ",
        )
        .bind(order_id)
        .bind(next)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(from = %current, "order status changed");
        Ok(row.into())
    }
}
