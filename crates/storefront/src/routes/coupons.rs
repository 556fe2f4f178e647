//! Coupon route handlers.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;

use wellnest_core::CouponGrantId;

use crate::db::CouponRepository;
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAuth;
use crate::models::{CouponGrant, Redemption};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplyCouponRequest {
    pub code: String,
}

/// Redeem a coupon code for the signed-in owner.
pub async fn apply(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ApplyCouponRequest>,
) -> Result<Json<Redemption>> {
    let redemption = CouponRepository::new(state.pool())
        .redeem(&body.code, user.id, Utc::now())
        .await?;
    Ok(Json(redemption))
}

pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<CouponGrant>>> {
    let grants = CouponRepository::new(state.pool())
        .list_grants(user.id)
        .await?;
    Ok(Json(grants))
}

/// Mark a grant as used.
pub async fn consume(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiPath(grant_id): ApiPath<CouponGrantId>,
) -> Result<Json<CouponGrant>> {
    let grant = CouponRepository::new(state.pool())
        .consume(user.id, grant_id)
        .await?;
    Ok(Json(grant))
}
