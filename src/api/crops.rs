//! Crop records, on two deliberately distinct surfaces.
//!
//! The farmer-facing surface (`/farmer/crops`) is owner-scoped: detail
//! queries are pre-filtered to the caller's own rows, so a crop outside that
//! set is indistinguishable from one that does not exist. The admin surface
//! (`/crops`) is unrestricted and can act across owners, including creating a
//! crop on behalf of any farmer.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{parse_crop_type, validate_crop_name, validate_quantity};
use super::{
    AdminCreateCropRequest, ApiError, ApiResponse, AppState, CreateCropRequest, CropDto,
    UpdateCropRequest,
};
use crate::db::{CropUpdate, CropWithOwner};
use crate::entities::users::Role;

// ============================================================================
// Farmer-facing surface
// ============================================================================

/// GET /farmer/crops
/// A farmer sees only their own crops; an admin sees everyone's. Both are
/// newest-first.
pub async fn list_crops(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<CropDto>>>, ApiError> {
    let rows = match user.role {
        Role::Admin => state.store().list_crops().await?,
        Role::Farmer => state.store().list_crops_for_farmer(user.id).await?,
    };

    Ok(Json(ApiResponse::success(
        rows.into_iter().map(CropDto::from).collect(),
    )))
}

/// POST /farmer/crops
/// Ownership is always the caller; there is no way to create for someone
/// else on this surface.
pub async fn create_crop(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateCropRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CropDto>>), ApiError> {
    let name = validate_crop_name(&payload.name)?;
    let crop_type = parse_crop_type(&payload.crop_type)?;
    let quantity = validate_quantity(payload.quantity)?;

    let crop = state
        .store()
        .create_crop(user.id, name, crop_type, quantity)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CropDto::from(CropWithOwner {
            crop,
            farmer_username: user.username,
        }))),
    ))
}

/// GET /farmer/crops/{id}
pub async fn get_crop(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CropDto>>, ApiError> {
    let row = state
        .store()
        .get_owned_crop(id, user.id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Crop", id))?;

    Ok(Json(ApiResponse::success(CropDto::from(row))))
}

/// PATCH /farmer/crops/{id}
pub async fn update_crop(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCropRequest>,
) -> Result<Json<ApiResponse<CropDto>>, ApiError> {
    let row = state
        .store()
        .get_owned_crop(id, user.id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Crop", id))?;

    let update = validate_update(&payload)?;

    let updated = state
        .store()
        .update_crop(row.crop, update)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(CropDto::from(CropWithOwner {
        crop: updated,
        farmer_username: row.farmer_username,
    }))))
}

/// DELETE /farmer/crops/{id}
pub async fn delete_crop(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .store()
        .delete_owned_crop(id, user.id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !deleted {
        return Err(ApiError::not_found("Crop", id));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Admin surface
// ============================================================================

/// GET /crops
pub async fn admin_list_crops(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CropDto>>>, ApiError> {
    let rows = state
        .store()
        .list_crops()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        rows.into_iter().map(CropDto::from).collect(),
    )))
}

/// POST /crops
/// Create on behalf of any farmer. The target must exist and actually be a
/// farmer.
pub async fn admin_create_crop(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AdminCreateCropRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CropDto>>), ApiError> {
    let name = validate_crop_name(&payload.name)?;
    let crop_type = parse_crop_type(&payload.crop_type)?;
    let quantity = validate_quantity(payload.quantity)?;

    let farmer = state
        .store()
        .get_farmer(payload.farmer_id)
        .await?
        .ok_or_else(|| {
            ApiError::validation_field(
                "farmer_id",
                format!("No farmer with id {}", payload.farmer_id),
            )
        })?;

    let crop = state
        .store()
        .create_crop(farmer.id, name, crop_type, quantity)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CropDto::from(CropWithOwner {
            crop,
            farmer_username: farmer.username,
        }))),
    ))
}

/// GET /crops/{id}
pub async fn admin_get_crop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CropDto>>, ApiError> {
    let row = state
        .store()
        .get_crop(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Crop", id))?;

    Ok(Json(ApiResponse::success(CropDto::from(row))))
}

/// PATCH /crops/{id}
/// Cross-owner update is allowed here.
pub async fn admin_update_crop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCropRequest>,
) -> Result<Json<ApiResponse<CropDto>>, ApiError> {
    let row = state
        .store()
        .get_crop(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Crop", id))?;

    let update = validate_update(&payload)?;

    let updated = state
        .store()
        .update_crop(row.crop, update)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(CropDto::from(CropWithOwner {
        crop: updated,
        farmer_username: row.farmer_username,
    }))))
}

/// DELETE /crops/{id}
pub async fn admin_delete_crop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .store()
        .delete_crop(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !deleted {
        return Err(ApiError::not_found("Crop", id));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn validate_update(payload: &UpdateCropRequest) -> Result<CropUpdate, ApiError> {
    let mut update = CropUpdate::default();

    if let Some(name) = &payload.name {
        update.name = Some(validate_crop_name(name)?.to_string());
    }
    if let Some(crop_type) = &payload.crop_type {
        update.crop_type = Some(parse_crop_type(crop_type)?);
    }
    if let Some(quantity) = payload.quantity {
        update.quantity = Some(validate_quantity(quantity)?);
    }

    Ok(update)
}
