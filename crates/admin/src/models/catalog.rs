//! Ranked catalog collections and promotion membership.

use serde::Serialize;

use wellnest_core::{ProductId, PromotionId};

/// Collections whose rows carry a `display_order` rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankedCollection {
    SubscriptionPlans,
    Banners,
    /// Product links of one promotion; ids are product ids.
    PromotionProducts(PromotionId),
}

impl RankedCollection {
    /// Name used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SubscriptionPlans => "subscription_plans",
            Self::Banners => "banners",
            Self::PromotionProducts(_) => "promotion_products",
        }
    }
}

/// A product's place in a promotion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionProduct {
    pub promotion_id: PromotionId,
    pub product_id: ProductId,
    pub product_name: String,
    pub display_order: i32,
}
