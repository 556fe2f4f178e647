use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wellnest_core::{CartLineId, ProductId, UserId};

/// A cart line. At most one exists per (owner, product).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: CartLineId,
    pub owner_id: UserId,
    #[serde(rename = "itemId")]
    pub product_id: ProductId,
    pub quantity: i32,
    /// Free-form option payload (size, flavor, subscription cadence...).
    pub options: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
