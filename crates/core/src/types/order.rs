//! Order line assembly rules.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{MAX_LINE_QUANTITY, Price, ProductId};

/// A requested line of a new order, before prices are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(rename = "itemId")]
    pub product_id: ProductId,
    pub quantity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderItemError {
    #[error("order must contain at least one item")]
    Empty,
    #[error("quantity for item {product_id} must be at least 1")]
    Quantity { product_id: ProductId },
    #[error("quantity for item {product_id} must be at most {max}", max = MAX_LINE_QUANTITY)]
    QuantityTooLarge { product_id: ProductId },
    #[error("order total exceeds {}", Price::MAX_STORED)]
    TotalTooLarge,
}

/// Merge repeated products by summing quantities.
///
/// First-seen order is kept so order lines follow the request.
///
/// # Errors
///
/// Returns an error for an empty list, a non-positive quantity, or a merged
/// quantity above [`MAX_LINE_QUANTITY`].
pub fn merge_items(items: &[OrderItem]) -> Result<Vec<OrderItem>, OrderItemError> {
    if items.is_empty() {
        return Err(OrderItemError::Empty);
    }

    let mut merged: Vec<OrderItem> = Vec::with_capacity(items.len());
    let mut index: HashMap<ProductId, usize> = HashMap::with_capacity(items.len());
    for item in items {
        if item.quantity < 1 {
            return Err(OrderItemError::Quantity {
                product_id: item.product_id,
            });
        }
        let too_large = OrderItemError::QuantityTooLarge {
            product_id: item.product_id,
        };
        if let Some(line) = index.get(&item.product_id).and_then(|&i| merged.get_mut(i)) {
            line.quantity = line.quantity.saturating_add(item.quantity);
            if line.quantity > MAX_LINE_QUANTITY {
                return Err(too_large);
            }
        } else {
            if item.quantity > MAX_LINE_QUANTITY {
                return Err(too_large);
            }
            index.insert(item.product_id, merged.len());
            merged.push(*item);
        }
    }
    Ok(merged)
}

/// An order line with its snapshotted unit price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Price,
    pub quantity: i32,
}

impl PricedItem {
    /// `None` if `unit_price * quantity` overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Price> {
        self.unit_price.checked_times(self.quantity)
    }
}

/// Sum of `unit_price * quantity` over all lines.
///
/// # Errors
///
/// Returns `OrderItemError::TotalTooLarge` if the total does not fit the
/// stored amount column.
pub fn order_total(lines: &[PricedItem]) -> Result<Price, OrderItemError> {
    lines
        .iter()
        .try_fold(Price::ZERO, |total, line| {
            line.line_total().and_then(|amount| total.checked_add(amount))
        })
        .filter(|total| total.fits_stored())
        .ok_or(OrderItemError::TotalTooLarge)
}
