use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::block::{BlockResponse, CreateBlockRequest};

pub const APPROVAL_PENDING: &str = "pending";
pub const APPROVAL_APPROVED: &str = "approved";
pub const APPROVAL_REJECTED: &str = "rejected";

pub const APPROVAL_STATUSES: [&str; 3] =
    [APPROVAL_PENDING, APPROVAL_APPROVED, APPROVAL_REJECTED];

/// Represents the 'stories' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Story {
    pub id: i64,
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub title: String,
    pub subtitle: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_banner: bool,
    pub banner_image_url: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    /// 'pending', 'approved' or 'rejected'. New stories start pending.
    pub approval_status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for publishing a story together with its content blocks and tags.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStoryRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title length must be between 1 and 200 chars"
    ))]
    pub title: String,

    #[validate(length(max = 200))]
    pub subtitle: Option<String>,

    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,

    #[validate(url(message = "cover_image_url must be a valid URL"))]
    pub cover_image_url: Option<String>,

    #[validate(length(max = 300))]
    pub meta_description: Option<String>,

    #[validate(length(max = 200))]
    pub meta_keywords: Option<String>,

    /// Ordered content blocks; at least one is required (checked in the
    /// handler alongside the per-type field rules).
    #[validate(nested)]
    pub blocks: Vec<CreateBlockRequest>,

    /// Tag names; normalized to lowercase on write.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Query parameters for listing stories.
#[derive(Debug, Deserialize)]
pub struct StoryListParams {
    /// Cursor for pagination: the created_at timestamp of the last story in
    /// the previous page.
    pub cursor: Option<chrono::DateTime<chrono::Utc>>,

    /// Number of items to return (default: 20, max: 100).
    pub limit: Option<i64>,

    /// Sort order: 'new' (default) or 'top' (most liked).
    pub sort: Option<String>,

    /// Search keyword matched against title, subtitle, tags and author.
    pub q: Option<String>,

    pub tag: Option<String>,
    pub category_id: Option<i64>,
    pub author_id: Option<i64>,
}

/// One story in a list response, with author info and derived counts.
#[derive(Debug, Serialize, FromRow)]
pub struct StoryListItem {
    pub id: i64,
    pub title: String,
    pub subtitle: Option<String>,
    pub cover_image_url: Option<String>,
    pub category_id: Option<i64>,
    pub approval_status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub author_id: i64,
    pub author_username: String,
    pub author_full_name: Option<String>,
    pub author_avatar_url: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
}

/// Flat story row for the detail endpoint, before blocks and tags
/// are attached.
#[derive(Debug, FromRow)]
pub struct StoryDetailRow {
    pub id: i64,
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub title: String,
    pub subtitle: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_banner: bool,
    pub banner_image_url: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub approval_status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub author_username: String,
    pub author_full_name: Option<String>,
    pub author_avatar_url: Option<String>,
    pub author_bio: Option<String>,
    pub like_count: i64,
    pub save_count: i64,
    pub view_count: i64,
    pub comment_count: i64,
    pub liked_by_viewer: bool,
    pub saved_by_viewer: bool,
    pub following_author: bool,
}

/// Full story payload: detail row plus blocks, tags and related stories.
#[derive(Debug, Serialize)]
pub struct StoryDetailResponse {
    #[serde(flatten)]
    pub story: StoryDetail,
    pub blocks: Vec<BlockResponse>,
    pub tags: Vec<String>,
    pub related: Vec<RelatedStory>,
}

#[derive(Debug, Serialize)]
pub struct StoryDetail {
    pub id: i64,
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub title: String,
    pub subtitle: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_banner: bool,
    pub banner_image_url: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub approval_status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub author_username: String,
    pub author_full_name: Option<String>,
    pub author_avatar_url: Option<String>,
    pub author_bio: Option<String>,
    pub like_count: i64,
    pub save_count: i64,
    pub view_count: i64,
    pub comment_count: i64,
    pub liked_by_viewer: bool,
    pub saved_by_viewer: bool,
    pub following_author: bool,
}

impl From<StoryDetailRow> for StoryDetail {
    fn from(row: StoryDetailRow) -> Self {
        StoryDetail {
            id: row.id,
            user_id: row.user_id,
            category_id: row.category_id,
            subcategory_id: row.subcategory_id,
            title: row.title,
            subtitle: row.subtitle,
            cover_image_url: row.cover_image_url,
            is_banner: row.is_banner,
            banner_image_url: row.banner_image_url,
            meta_description: row.meta_description,
            meta_keywords: row.meta_keywords,
            approval_status: row.approval_status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author_username: row.author_username,
            author_full_name: row.author_full_name,
            author_avatar_url: row.author_avatar_url,
            author_bio: row.author_bio,
            like_count: row.like_count,
            save_count: row.save_count,
            view_count: row.view_count,
            comment_count: row.comment_count,
            liked_by_viewer: row.liked_by_viewer,
            saved_by_viewer: row.saved_by_viewer,
            following_author: row.following_author,
        }
    }
}

/// One entry in the current user's saved-stories list.
#[derive(Debug, Serialize, FromRow)]
pub struct SavedStoryItem {
    pub story_id: i64,
    pub title: String,
    pub author_username: String,
    pub saved_at: chrono::DateTime<chrono::Utc>,
}

/// Compact card for "related stories" suggestions.
#[derive(Debug, Serialize, FromRow)]
pub struct RelatedStory {
    pub id: i64,
    pub title: String,
    pub cover_image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub author_username: String,
}

/// Banner story card for the front-page carousel.
#[derive(Debug, Serialize, FromRow)]
pub struct BannerStory {
    pub id: i64,
    pub title: String,
    pub subtitle: Option<String>,
    pub banner_image_url: Option<String>,
    pub author_username: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct Subcategory {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubcategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

/// DTO for the admin approval decision on a story.
#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    /// One of 'pending', 'approved', 'rejected'.
    pub status: String,
}

/// DTO for the admin banner toggle on a story.
#[derive(Debug, Deserialize, Validate)]
pub struct BannerRequest {
    pub is_banner: bool,
    #[validate(url(message = "banner_image_url must be a valid URL"))]
    pub banner_image_url: Option<String>,
}
