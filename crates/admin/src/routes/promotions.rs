//! Promotion product list handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use wellnest_core::{PermissionScope, ProductId, PromotionId, RankAssignment};

use super::{Reordered, Success, catalog};
use crate::db::PromotionRepository;
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAdminAuth;
use crate::models::{PromotionProduct, RankedCollection};
use crate::state::AppState;

/// Body of `PUT /admin/promotions/{id}/products`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetMembersRequest {
    pub product_ids: Vec<ProductId>,
}

/// `POST /admin/promotions/{id}/products/reorder`
///
/// The `id` of each entry is a product id within this promotion.
#[instrument(skip_all, fields(admin = %admin.id, promotion = %promotion_id))]
pub async fn reorder_products(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(promotion_id): ApiPath<PromotionId>,
    ApiJson(body): ApiJson<Vec<RankAssignment>>,
) -> Result<Json<Reordered>> {
    admin.require(PermissionScope::Promotions)?;
    catalog::reorder(&state, RankedCollection::PromotionProducts(promotion_id), body).await
}

/// `PUT /admin/promotions/{id}/products`
#[instrument(skip_all, fields(admin = %admin.id, promotion = %promotion_id))]
pub async fn set_products(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(promotion_id): ApiPath<PromotionId>,
    ApiJson(body): ApiJson<SetMembersRequest>,
) -> Result<Json<Success>> {
    admin.require(PermissionScope::Promotions)?;
    PromotionRepository::new(state.pool())
        .set_members(promotion_id, &body.product_ids)
        .await?;
    Ok(Json(Success::ok()))
}

/// `GET /admin/promotions/{id}/products`
pub async fn list_products(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(promotion_id): ApiPath<PromotionId>,
) -> Result<Json<Vec<PromotionProduct>>> {
    admin.require(PermissionScope::Promotions)?;
    let products = PromotionRepository::new(state.pool())
        .list_members(promotion_id)
        .await?;
    Ok(Json(products))
}
