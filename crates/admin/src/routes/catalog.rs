//! Display-order handlers for subscription plans and banners.

use axum::{Json, extract::State};
use tracing::instrument;

use wellnest_core::{PermissionScope, RankAssignment, RankList};

use super::Reordered;
use crate::db::{CatalogOrderRepository, RepositoryError};
use crate::error::Result;
use crate::extract::ApiJson;
use crate::middleware::RequireAdminAuth;
use crate::models::RankedCollection;
use crate::state::AppState;

/// `POST /admin/subscription-plans/reorder`
#[instrument(skip_all, fields(admin = %admin.id))]
pub async fn reorder_plans(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Vec<RankAssignment>>,
) -> Result<Json<Reordered>> {
    admin.require(PermissionScope::Catalog)?;
    reorder(&state, RankedCollection::SubscriptionPlans, body).await
}

/// `POST /admin/banners/reorder`
#[instrument(skip_all, fields(admin = %admin.id))]
pub async fn reorder_banners(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Vec<RankAssignment>>,
) -> Result<Json<Reordered>> {
    admin.require(PermissionScope::Catalog)?;
    reorder(&state, RankedCollection::Banners, body).await
}

pub(super) async fn reorder(
    state: &AppState,
    collection: RankedCollection,
    body: Vec<RankAssignment>,
) -> Result<Json<Reordered>> {
    let ranks = RankList::new(body).map_err(RepositoryError::from)?;
    let updated = CatalogOrderRepository::new(state.pool())
        .reorder(collection, &ranks)
        .await?;
    Ok(Json(Reordered::new(updated)))
}
