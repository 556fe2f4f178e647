//! Order repository.
//!
//! `create` converts explicit items (or the owner's cart) into an order in a
//! single transaction: order row, every line, and the cart clear either all
//! commit together or none of them do. Prices are snapshotted from
//! `shop.product` inside the same transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use wellnest_core::{
    AddressId, CartLineId, OrderId, OrderItem, OrderItemError, OrderLineId, OrderNumber,
    OrderStatus, Price, PricedItem, ProductId, UserId, merge_items, order_total,
};

use super::RepositoryError;
use crate::models::{NewOrder, Order, OrderDetail, OrderLine, ShippingSnapshot};

/// Attempts at allocating an unused order number before giving up.
const MAX_ORDER_NUMBER_ATTEMPTS: usize = 5;

const ORDER_COLUMNS: &str = "id, owner_id, order_number, total_amount, status, memo, \
     ship_recipient, ship_phone, ship_postal_code, ship_line1, ship_line2, \
     created_at, updated_at";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    owner_id: UserId,
    order_number: OrderNumber,
    total_amount: Price,
    status: OrderStatus,
    memo: Option<String>,
    ship_recipient: Option<String>,
    ship_phone: Option<String>,
    ship_postal_code: Option<String>,
    ship_line1: Option<String>,
    ship_line2: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        let shipping = match (
            row.ship_recipient,
            row.ship_phone,
            row.ship_postal_code,
            row.ship_line1,
        ) {
            (Some(recipient), Some(phone), Some(postal_code), Some(line1)) => {
                Some(ShippingSnapshot {
                    recipient,
                    phone,
                    postal_code,
                    line1,
                    line2: row.ship_line2,
                })
            }
            _ => None,
        };

        Self {
            id: row.id,
            owner_id: row.owner_id,
            order_number: row.order_number,
            total_amount: row.total_amount,
            status: row.status,
            memo: row.memo,
            shipping,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderLineRow {
    id: OrderLineId,
    order_id: OrderId,
    product_id: ProductId,
    product_name: String,
    quantity: i32,
    unit_price: Price,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductPriceRow {
    id: ProductId,
    name: String,
    price: Price,
}

#[derive(sqlx::FromRow)]
struct ShippingRow {
    recipient: String,
    phone: String,
    postal_code: String,
    line1: String,
    line2: Option<String>,
}

impl From<OrderItemError> for RepositoryError {
    fn from(err: OrderItemError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Repository for orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order for `owner`.
    ///
    /// Uses `input.items` when non-empty, otherwise the owner's cart. On
    /// success every cart line that existed when the order started is
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if there is nothing to order, a
    /// quantity is out of range, or the total exceeds the amount column.
    /// Returns `RepositoryError::NotFound` for an unknown or inactive item,
    /// or an address that does not belong to the owner.
    /// Returns `RepositoryError::Database` for other database errors; the
    /// transaction is rolled back and nothing is persisted.
    #[instrument(skip_all, fields(owner = %owner))]
    pub async fn create(
        &self,
        owner: UserId,
        input: NewOrder,
    ) -> Result<OrderDetail, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Only the lines read here are cleared on commit; a line added by a
        // concurrent request after this read stays in the cart.
        let cart = locked_cart(&mut tx, owner).await?;
        let requested = if input.items.is_empty() {
            if cart.is_empty() {
                return Err(RepositoryError::Validation(
                    "no items supplied and the cart is empty".to_owned(),
                ));
            }
            cart.iter().map(|line| line.item).collect()
        } else {
            input.items
        };
        let items = merge_items(&requested)?;

        let priced = price_items(&mut tx, &items).await?;
        let shipping = match input.address_id {
            Some(address_id) => Some(shipping_snapshot(&mut tx, owner, address_id).await?),
            None => None,
        };
        let memo = input
            .memo
            .map(|m| m.trim().to_owned())
            .filter(|m| !m.is_empty());

        let order = insert_order(
            &mut tx,
            owner,
            order_total(&priced)?,
            memo.as_deref(),
            shipping.as_ref(),
        )
        .await?;

        let mut lines = Vec::with_capacity(priced.len());
        for item in &priced {
            let line = sqlx::query_as::<_, OrderLineRow>(
                r"
                INSERT INTO shop.order_line (order_id, product_id, product_name, quantity, unit_price)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, order_id, product_id, product_name, quantity, unit_price
                ",
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .fetch_one(&mut *tx)
            .await?;
            lines.push(OrderLine::from(line));
        }

        let line_ids: Vec<i32> = cart.iter().map(|line| line.id.as_i32()).collect();
        sqlx::query("DELETE FROM shop.cart_line WHERE owner_id = $1 AND id = ANY($2)")
            .bind(owner)
            .bind(&line_ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            order = %order.id,
            order_number = %order.order_number,
            lines = lines.len(),
            total = %order.total_amount,
            "order created"
        );

        Ok(OrderDetail { order, lines })
    }

    /// The owner's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.order WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// One of the owner's orders with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist or
    /// belongs to another owner.
    pub async fn get_for_owner(
        &self,
        owner: UserId,
        order_id: OrderId,
    ) -> Result<OrderDetail, RepositoryError> {
        let order = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.order WHERE id = $1 AND owner_id = $2"
        ))
        .bind(order_id)
        .bind(owner)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound("order".to_owned()))?;

        let lines = sqlx::query_as::<_, OrderLineRow>(
            r"
            SELECT id, order_id, product_id, product_name, quantity, unit_price
            FROM shop.order_line
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(OrderDetail {
            order: order.into(),
            lines: lines.into_iter().map(OrderLine::from).collect(),
        })
    }
}

/// A cart line as read at the start of order creation.
struct LockedLine {
    id: CartLineId,
    item: OrderItem,
}

/// The owner's cart lines, locked so a concurrent update or removal waits
/// for this order to commit.
async fn locked_cart(
    conn: &mut PgConnection,
    owner: UserId,
) -> Result<Vec<LockedLine>, RepositoryError> {
    let rows: Vec<(CartLineId, ProductId, i32)> = sqlx::query_as(
        r"
        SELECT id, product_id, quantity
        FROM shop.cart_line
        WHERE owner_id = $1
        ORDER BY created_at, id
        FOR UPDATE
        ",
    )
    .bind(owner)
    .fetch_all(conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, product_id, quantity)| LockedLine {
            id,
            item: OrderItem {
                product_id,
                quantity,
            },
        })
        .collect())
}

/// Snapshot current name and price for every item.
async fn price_items(
    conn: &mut PgConnection,
    items: &[OrderItem],
) -> Result<Vec<PricedItem>, RepositoryError> {
    let ids: Vec<i32> = items.iter().map(|i| i.product_id.as_i32()).collect();
    let products: HashMap<ProductId, ProductPriceRow> = sqlx::query_as::<_, ProductPriceRow>(
        r"
        SELECT id, name, price
        FROM shop.product
        WHERE id = ANY($1) AND is_active
        ",
    )
    .bind(&ids)
    .fetch_all(conn)
    .await?
    .into_iter()
    .map(|p| (p.id, p))
    .collect();

    items
        .iter()
        .map(|item| {
            let product = products
                .get(&item.product_id)
                .ok_or_else(|| RepositoryError::NotFound(format!("item {}", item.product_id)))?;
            Ok(PricedItem {
                product_id: item.product_id,
                product_name: product.name.clone(),
                unit_price: product.price,
                quantity: item.quantity,
            })
        })
        .collect()
}

async fn shipping_snapshot(
    conn: &mut PgConnection,
    owner: UserId,
    address_id: AddressId,
) -> Result<ShippingSnapshot, RepositoryError> {
    let row = sqlx::query_as::<_, ShippingRow>(
        r"
        SELECT recipient, phone, postal_code, line1, line2
        FROM shop.address
        WHERE id = $1 AND owner_id = $2
        ",
    )
    .bind(address_id)
    .bind(owner)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| RepositoryError::NotFound("address".to_owned()))?;

    Ok(ShippingSnapshot {
        recipient: row.recipient,
        phone: row.phone,
        postal_code: row.postal_code,
        line1: row.line1,
        line2: row.line2,
    })
}

/// Insert the order row under a fresh order number, regenerating on the
/// (rare) collision with an existing number.
async fn insert_order(
    conn: &mut PgConnection,
    owner: UserId,
    total: Price,
    memo: Option<&str>,
    shipping: Option<&ShippingSnapshot>,
) -> Result<Order, RepositoryError> {
    let today = Utc::now().date_naive();

    for attempt in 1..=MAX_ORDER_NUMBER_ATTEMPTS {
        let order_number = OrderNumber::generate(today, &mut rand::rng());

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO shop.order (
                owner_id, order_number, total_amount, memo,
                ship_recipient, ship_phone, ship_postal_code, ship_line1, ship_line2
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (order_number) DO NOTHING
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(owner)
        .bind(&order_number)
        .bind(total)
        .bind(memo)
        .bind(shipping.map(|s| s.recipient.as_str()))
        .bind(shipping.map(|s| s.phone.as_str()))
        .bind(shipping.map(|s| s.postal_code.as_str()))
        .bind(shipping.map(|s| s.line1.as_str()))
        .bind(shipping.and_then(|s| s.line2.as_deref()))
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(row) = row {
            return Ok(row.into());
        }
        tracing::warn!(%order_number, attempt, "order number collision, regenerating");
    }

    Err(RepositoryError::Conflict(
        "could not allocate a unique order number".to_owned(),
    ))
}
