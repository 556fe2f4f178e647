use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wellnest_core::{
    AddressId, OrderId, OrderItem, OrderLineId, OrderNumber, OrderStatus, Price, ProductId,
    UserId,
};

/// Input for placing an order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Address to snapshot into the order; must belong to the owner.
    pub address_id: Option<AddressId>,
    pub memo: Option<String>,
    /// Explicit items. When empty, the owner's cart is ordered.
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Shipping address copied into the order at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingSnapshot {
    pub recipient: String,
    pub phone: String,
    pub postal_code: String,
    pub line1: String,
    pub line2: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub owner_id: UserId,
    pub order_number: OrderNumber,
    pub total_amount: Price,
    pub status: OrderStatus,
    pub memo: Option<String>,
    pub shipping: Option<ShippingSnapshot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: OrderLineId,
    pub order_id: OrderId,
    #[serde(rename = "itemId")]
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Price,
}

impl OrderLine {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// An order with its lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<OrderLine>,
}
