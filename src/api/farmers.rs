//! Admin-only farmer account management. Every query on this surface is
//! pre-filtered to Farmer-role rows, so admin ids resolve to 404 here.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{validate_email, validate_password, validate_username};
use super::{ApiError, ApiResponse, AppState, CreateFarmerRequest, UpdateFarmerRequest, UserDto};
use crate::db::FarmerUpdate;
use crate::entities::users::Role;

/// GET /farmers
pub async fn list_farmers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let farmers = state.store().list_farmers().await?;

    let base_url = &state.config().server.base_url;
    let dtos = farmers
        .into_iter()
        .map(|f| UserDto::from_user(f, base_url))
        .collect();

    Ok(Json(ApiResponse::success(dtos)))
}

/// POST /farmers
/// Role is forced to Farmer on this path too.
pub async fn create_farmer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateFarmerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let username = validate_username(&payload.username)?;
    let email = validate_email(&payload.email)?;
    validate_password(&payload.password, state.config().security.min_password_length)?;

    let farmer = state
        .store()
        .create_user(
            username,
            email,
            &payload.password,
            Role::Farmer,
            &state.config().security,
        )
        .await?;

    tracing::info!(username = %farmer.username, "Farmer account created by admin");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from_user(
            farmer,
            &state.config().server.base_url,
        ))),
    ))
}

/// GET /farmers/{id}
pub async fn get_farmer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let farmer = state
        .store()
        .get_farmer(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Farmer", id))?;

    Ok(Json(ApiResponse::success(UserDto::from_user(
        farmer,
        &state.config().server.base_url,
    ))))
}

/// PATCH /farmers/{id}
pub async fn update_farmer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateFarmerRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let mut update = FarmerUpdate {
        is_active: payload.is_active,
        ..FarmerUpdate::default()
    };

    if let Some(username) = &payload.username {
        update.username = Some(validate_username(username)?.to_string());
    }
    if let Some(email) = &payload.email {
        update.email = Some(validate_email(email)?.to_string());
    }

    let farmer = state.store().update_farmer(id, update).await?;

    Ok(Json(ApiResponse::success(UserDto::from_user(
        farmer,
        &state.config().server.base_url,
    ))))
}

/// DELETE /farmers/{id}
/// Hard delete; the farmer's crops cascade away with the account.
pub async fn delete_farmer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.store().delete_farmer(id).await?;

    if !deleted {
        return Err(ApiError::not_found("Farmer", id));
    }

    tracing::info!(farmer_id = id, "Farmer account deleted");

    Ok(StatusCode::NO_CONTENT)
}
