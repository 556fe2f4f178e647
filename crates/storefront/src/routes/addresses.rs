//! Shipping address route handlers.

use axum::{Json, extract::State, http::StatusCode};

use wellnest_core::AddressId;

use super::Success;
use crate::db::AddressRepository;
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAuth;
use crate::models::{Address, NewAddress};
use crate::state::AppState;

pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Address>>> {
    let addresses = AddressRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(addresses))
}

pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewAddress>,
) -> Result<(StatusCode, Json<Address>)> {
    let address = AddressRepository::new(state.pool())
        .create(user.id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(address)))
}

/// Make an address the owner's default.
pub async fn set_default(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiPath(address_id): ApiPath<AddressId>,
) -> Result<Json<Success>> {
    AddressRepository::new(state.pool())
        .set_default(user.id, address_id)
        .await?;
    Ok(Json(Success::ok()))
}

pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiPath(address_id): ApiPath<AddressId>,
) -> Result<Json<Success>> {
    AddressRepository::new(state.pool())
        .delete(user.id, address_id)
        .await?;
    Ok(Json(Success::ok()))
}
