//! Order status handler.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use wellnest_core::{OrderId, OrderStatus, PermissionScope};

use crate::db::AdminOrderRepository;
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAdminAuth;
use crate::models::AdminOrder;
use crate::state::AppState;

/// Body of `PUT /admin/orders/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Move an order along its lifecycle. Illegal transitions are `409`.
#[instrument(skip_all, fields(admin = %admin.id, order = %order_id))]
pub async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(order_id): ApiPath<OrderId>,
    ApiJson(body): ApiJson<UpdateStatusRequest>,
) -> Result<Json<AdminOrder>> {
    admin.require(PermissionScope::Orders)?;
    let order = AdminOrderRepository::new(state.pool())
        .transition(order_id, body.status)
        .await?;
    Ok(Json(order))
}
