//! Order view for status management.

use chrono::{DateTime, Utc};
use serde::Serialize;

use wellnest_core::{OrderId, OrderNumber, OrderStatus, Price, UserId};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrder {
    pub id: OrderId,
    pub owner_id: UserId,
    pub order_number: OrderNumber,
    pub total_amount: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
