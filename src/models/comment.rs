use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'comments' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub story_id: i64,
    pub user_id: i64,
    pub parent_id: Option<i64>,
    /// Nesting level: 0 for top-level comments, up to 2 for the deepest replies.
    pub depth: i64,
    pub body: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a new comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Comment must be between 1 and 2000 characters"
    ))]
    pub body: String,

    /// Optional: the ID of the comment being replied to.
    pub parent_id: Option<i64>,
}

/// Sibling ordering inside a comment tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentOrder {
    #[default]
    Oldest,
    Newest,
}

/// Query parameters for listing a story's comments.
#[derive(Debug, Deserialize)]
pub struct CommentListParams {
    pub order: Option<CommentOrder>,
}

/// One fetched comment row with author info and like aggregates,
/// before tree assembly.
#[derive(Debug, FromRow)]
pub struct CommentTreeRow {
    pub id: i64,
    pub story_id: i64,
    pub user_id: i64,
    pub username: String,
    pub author_full_name: Option<String>,
    pub author_avatar_url: Option<String>,
    pub parent_id: Option<i64>,
    pub depth: i64,
    pub body: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub like_count: i64,
    /// Non-zero when the requesting viewer has liked this comment.
    pub liked_by_viewer: i64,
}

/// A comment with its replies nested underneath, ready for display.
#[derive(Debug, Serialize)]
pub struct CommentNode {
    pub id: i64,
    pub story_id: i64,
    pub user_id: i64,
    pub username: String,
    pub author_full_name: Option<String>,
    pub author_avatar_url: Option<String>,
    pub parent_id: Option<i64>,
    pub depth: i64,
    pub body: String,
    pub like_count: i64,
    pub liked_by_viewer: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub replies: Vec<CommentNode>,
}

impl From<CommentTreeRow> for CommentNode {
    fn from(row: CommentTreeRow) -> Self {
        CommentNode {
            id: row.id,
            story_id: row.story_id,
            user_id: row.user_id,
            username: row.username,
            author_full_name: row.author_full_name,
            author_avatar_url: row.author_avatar_url,
            parent_id: row.parent_id,
            depth: row.depth,
            body: row.body,
            like_count: row.like_count,
            liked_by_viewer: row.liked_by_viewer != 0,
            created_at: row.created_at,
            replies: Vec::new(),
        }
    }
}

/// Result of a like toggle: the new state plus the authoritative count.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LikeOutcome {
    pub liked: bool,
    pub like_count: i64,
}
