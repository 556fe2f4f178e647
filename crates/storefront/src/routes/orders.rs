//! Order route handlers.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use wellnest_core::OrderId;

use crate::db::OrderRepository;
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAuth;
use crate::models::{NewOrder, Order, OrderDetail};
use crate::state::AppState;

/// Place an order from explicit items or, when none are given, the cart.
#[instrument(skip_all, fields(owner = %user.id))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewOrder>,
) -> Result<(StatusCode, Json<OrderDetail>)> {
    let order = OrderRepository::new(state.pool())
        .create(user.id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// The owner's orders, newest first.
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_owner(user.id)
        .await?;
    Ok(Json(orders))
}

/// One order with its lines.
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiPath(order_id): ApiPath<OrderId>,
) -> Result<Json<OrderDetail>> {
    let order = OrderRepository::new(state.pool())
        .get_for_owner(user.id, order_id)
        .await?;
    Ok(Json(order))
}
