use axum::{
    Extension, Json,
    extract::{Multipart, State},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_email, validate_username};
use super::{ApiError, ApiResponse, AppState, UserDto};
use crate::db::ProfileUpdate;

/// GET /profile
/// The caller's own record, with the profile icon resolved to an absolute
/// URL (placeholder when unset).
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let record = state
        .store()
        .get_user(user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", user.id))?;

    Ok(Json(ApiResponse::success(UserDto::from_user(
        record,
        &state.config().server.base_url,
    ))))
}

/// PATCH /profile/update
/// Partial multipart update of username, email, and profile icon for the
/// caller only. Field checks and the write are all-or-nothing; the icon is
/// independent of the text fields. Role is not touchable here.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let mut update = ProfileUpdate::default();
    let mut icon: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(ToString::to_string);

        match name.as_deref() {
            Some("username") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation_field("username", e.to_string()))?;
                update.username = Some(validate_username(&value)?.to_string());
            }
            Some("email") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation_field("email", e.to_string()))?;
                update.email = Some(validate_email(&value)?.to_string());
            }
            Some("profile_icon") => {
                let original_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation_field("profile_icon", e.to_string()))?;
                icon = Some((original_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    if let Some((original_name, bytes)) = icon {
        let stored = state
            .images()
            .save_profile_icon(&original_name, &bytes)
            .await
            .map_err(|e| ApiError::validation_field("profile_icon", e.to_string()))?;
        update.profile_icon = Some(stored);
    }

    let updated = state.store().update_profile(user.id, update).await?;

    tracing::info!(username = %updated.username, "Profile updated");

    Ok(Json(ApiResponse::success(UserDto::from_user(
        updated,
        &state.config().server.base_url,
    ))))
}
