use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'team_members' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    /// Lower values appear first on the team page.
    pub display_order: i64,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a team member. Admin only.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamMemberRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub position: String,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[validate(url(message = "photo_url must be a valid URL"))]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// DTO for updating a team member. Fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateTeamMemberRequest {
    pub name: Option<String>,
    pub position: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub display_order: Option<i64>,
    pub is_active: Option<bool>,
}
