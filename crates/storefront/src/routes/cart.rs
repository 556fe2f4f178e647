//! Cart route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use wellnest_core::{CartLineId, ProductId, normalize_add_quantity};

use super::Success;
use crate::db::CartRepository;
use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAuth;
use crate::models::CartLine;
use crate::state::AppState;

/// Body of `POST /cart`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub item_id: Option<ProductId>,
    pub quantity: Option<i64>,
    pub options: Option<serde_json::Value>,
}

/// Body of `PUT /cart/{lineId}`.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

/// List the owner's cart.
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<CartLine>>> {
    let lines = CartRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(lines))
}

/// Add an item, merging with an existing line for the same item.
#[instrument(skip_all, fields(owner = %user.id))]
pub async fn add(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AddToCartRequest>,
) -> Result<Json<CartLine>> {
    let item_id = body
        .item_id
        .ok_or_else(|| AppError::BadRequest("itemId is required".to_owned()))?;
    let quantity = normalize_add_quantity(body.quantity);

    let line = CartRepository::new(state.pool())
        .add_item(user.id, item_id, quantity, body.options)
        .await?;
    Ok(Json(line))
}

/// Overwrite a line's quantity.
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiPath(line_id): ApiPath<CartLineId>,
    ApiJson(body): ApiJson<UpdateQuantityRequest>,
) -> Result<Json<CartLine>> {
    let line = CartRepository::new(state.pool())
        .set_quantity(user.id, line_id, body.quantity)
        .await?;
    Ok(Json(line))
}

/// Remove a line. Succeeds even if the line is already gone.
pub async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiPath(line_id): ApiPath<CartLineId>,
) -> Result<Json<Success>> {
    CartRepository::new(state.pool())
        .remove_item(user.id, line_id)
        .await?;
    Ok(Json(Success::ok()))
}

/// Empty the cart.
pub async fn clear(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Success>> {
    CartRepository::new(state.pool()).clear(user.id).await?;
    Ok(Json(Success::ok()))
}
