use serde::{Deserialize, Serialize};

use crate::db::{CropWithOwner, User};
use crate::entities::users::Role;
use crate::services::ImageService;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Names the offending input on field-scoped validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            field: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            field: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub profile_icon: String,
    pub is_active: bool,
    pub created: String,
}

impl UserDto {
    pub fn from_user(user: User, base_url: &str) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            profile_icon: ImageService::icon_url(base_url, user.profile_icon.as_deref()),
            is_active: user.is_active,
            created: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CropDto {
    pub id: i32,
    /// Owning farmer's username.
    pub farmer: String,
    pub farmer_id: i32,
    pub name: String,
    pub crop_type: String,
    pub quantity: i32,
    pub created: String,
}

impl From<CropWithOwner> for CropDto {
    fn from(row: CropWithOwner) -> Self {
        Self {
            id: row.crop.id,
            farmer: row.farmer_username,
            farmer_id: row.crop.farmer_id,
            name: row.crop.name,
            crop_type: row.crop.crop_type.as_key().to_string(),
            quantity: row.crop.quantity,
            created: row.crop.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: UserDto,
    pub tokens: crate::services::TokenPair,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub role: Role,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

// ============================================================================
// Farmers (admin management)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateFarmerRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFarmerRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

// ============================================================================
// Crops
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateCropRequest {
    pub name: String,
    pub crop_type: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct AdminCreateCropRequest {
    pub farmer_id: i32,
    pub name: String,
    pub crop_type: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCropRequest {
    pub name: Option<String>,
    pub crop_type: Option<String>,
    pub quantity: Option<i64>,
}

// ============================================================================
// Stats & dashboards
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CropTypeQuantity {
    /// Display label ("Cereal/Grain", ...), not the stored key.
    pub crop_type: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct FarmerStatsResponse {
    /// One entry per enumerated crop type, in enumeration order.
    pub crops_by_type: Vec<CropTypeQuantity>,
    pub total_count: i64,
    pub rank: usize,
}

#[derive(Debug, Serialize)]
pub struct FarmerQuantityRow {
    pub farmer: String,
    #[serde(rename = "totalCrops")]
    pub total_crops: i64,
}

#[derive(Debug, Serialize)]
pub struct AdminStatsResponse {
    pub username: String,
    pub total_farmers: u64,
    /// Summed quantity across all crop rows.
    pub total_crops: i64,
    pub crops_per_farmer: Vec<FarmerQuantityRow>,
}

#[derive(Debug, Serialize)]
pub struct FarmerRowCount {
    pub farmer_id: i32,
    pub farmer_username: String,
    pub total_crops: i64,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboardResponse {
    pub total_farmers: u64,
    /// Crop row count, not a quantity sum.
    pub total_crops: u64,
    pub crops_per_farmer: Vec<FarmerRowCount>,
}

#[derive(Debug, Serialize)]
pub struct CropTypeRowCount {
    /// Stored key ("cereal", "root_tuber", ...).
    pub crop_type: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct FarmerDashboardResponse {
    pub total_crops: u64,
    pub crops_by_type: Vec<CropTypeRowCount>,
}

// ============================================================================
// System
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub total_farmers: u64,
    pub total_crops: u64,
    pub database: String,
}
