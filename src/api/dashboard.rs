//! Row-counted dashboard data. The stats endpoints sum quantities; these
//! count rows.

use axum::{Extension, Json, extract::State};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{
    AdminDashboardResponse, ApiError, ApiResponse, AppState, CropTypeRowCount,
    FarmerDashboardResponse, FarmerRowCount,
};

/// GET /admin/dashboard
pub async fn admin_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<AdminDashboardResponse>>, ApiError> {
    let total_farmers = state.store().count_farmers().await?;

    let total_crops = state
        .store()
        .count_crops()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let crops_per_farmer = state
        .store()
        .crop_rows_per_farmer()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .into_iter()
        .map(|(farmer_id, farmer_username, total_crops)| FarmerRowCount {
            farmer_id,
            farmer_username,
            total_crops,
        })
        .collect();

    Ok(Json(ApiResponse::success(AdminDashboardResponse {
        total_farmers,
        total_crops,
        crops_per_farmer,
    })))
}

/// GET /farmer/dashboard
pub async fn farmer_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<FarmerDashboardResponse>>, ApiError> {
    let total_crops = state
        .store()
        .count_crops_for_farmer(user.id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let crops_by_type = state
        .store()
        .count_crops_by_type(user.id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .into_iter()
        .map(|(crop_type, count)| CropTypeRowCount { crop_type, count })
        .collect();

    Ok(Json(ApiResponse::success(FarmerDashboardResponse {
        total_crops,
        crops_by_type,
    })))
}
