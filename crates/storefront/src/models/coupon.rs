use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wellnest_core::{CouponGrantId, CouponId, UserId, ValidityWindow};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: CouponId,
    pub code: String,
    pub name: String,
    #[serde(flatten)]
    pub window: ValidityWindow,
    pub is_active: bool,
}

/// A coupon granted to an owner by a successful redemption.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponGrant {
    pub id: CouponGrantId,
    pub owner_id: UserId,
    pub coupon_id: CouponId,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Redemption {
    pub coupon: Coupon,
    pub grant: CouponGrant,
}
