//! Quantity-summed statistics. Deliberately distinct from the row-counted
//! dashboard endpoints; the two are not interchangeable.

use axum::{Extension, Json, extract::State};
use std::collections::HashMap;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{
    AdminStatsResponse, ApiError, ApiResponse, AppState, CropTypeQuantity, FarmerQuantityRow,
    FarmerStatsResponse,
};
use crate::entities::crops::CropType;

/// GET /farmer/crops/stats
/// Per-type quantity sums for the caller (zero-filled, one entry per
/// enumerated type in enumeration order), the grand total, and the caller's
/// rank among all farmers by summed quantity.
pub async fn farmer_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<FarmerStatsResponse>>, ApiError> {
    let rows = state
        .store()
        .sum_quantity_by_type(user.id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let by_type: HashMap<String, i64> = rows.into_iter().collect();

    let mut total_count = 0;
    let crops_by_type = CropType::ALL
        .iter()
        .map(|t| {
            let count = by_type.get(t.as_key()).copied().unwrap_or(0);
            total_count += count;
            CropTypeQuantity {
                crop_type: t.label().to_string(),
                count,
            }
        })
        .collect();

    // Rank is the first matching position in the descending scan. Equal
    // totals therefore resolve by scan order, and a farmer with no crops
    // ranks first; both quirks are inherited behavior, kept as-is.
    let totals = state
        .store()
        .farmer_totals_desc()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let mut rank = 1;
    for (i, (farmer_id, _)) in totals.iter().enumerate() {
        if *farmer_id == user.id {
            rank = i + 1;
            break;
        }
    }

    Ok(Json(ApiResponse::success(FarmerStatsResponse {
        crops_by_type,
        total_count,
        rank,
    })))
}

/// GET /admin/crops/stats
/// Farmer head-count, total quantity across every crop row, and per-farmer
/// quantity sums ordered by username.
pub async fn admin_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<AdminStatsResponse>>, ApiError> {
    let total_farmers = state.store().count_farmers().await?;

    let total_crops = state
        .store()
        .total_crop_quantity()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let crops_per_farmer = state
        .store()
        .quantity_per_farmer()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .into_iter()
        .map(|(farmer, total)| FarmerQuantityRow {
            farmer,
            total_crops: total,
        })
        .collect();

    Ok(Json(ApiResponse::success(AdminStatsResponse {
        username: user.username,
        total_farmers,
        total_crops,
        crops_per_farmer,
    })))
}
