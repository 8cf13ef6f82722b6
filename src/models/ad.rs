use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

pub const AD_POSITIONS: [&str; 3] = ["top", "middle", "bottom"];
pub const AD_TYPES: [&str; 3] = ["adsense", "meta", "custom"];

/// Represents the 'ad_spaces' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AdSpace {
    pub id: i64,
    pub name: String,
    /// Page slot: 'top', 'middle' or 'bottom'.
    pub position: String,
    /// Provider: 'adsense', 'meta' or 'custom'.
    pub ad_type: String,
    /// Raw embed snippet pasted by the operator.
    pub ad_code: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating an ad space. Admin only.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdSpaceRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub position: String,
    pub ad_type: String,
    #[validate(length(min = 1, max = 10000))]
    pub ad_code: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// DTO for updating an ad space. Fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateAdSpaceRequest {
    pub name: Option<String>,
    pub position: Option<String>,
    pub ad_type: Option<String>,
    pub ad_code: Option<String>,
    pub is_active: Option<bool>,
}
