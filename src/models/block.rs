use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

pub const BLOCK_PARAGRAPH: &str = "paragraph";
pub const BLOCK_IMAGE: &str = "image";
pub const BLOCK_BLOCKQUOTE: &str = "blockquote";
pub const BLOCK_YOUTUBE: &str = "youtube";
pub const BLOCK_CODE: &str = "code";

pub const BLOCK_TYPES: [&str; 5] = [
    BLOCK_PARAGRAPH,
    BLOCK_IMAGE,
    BLOCK_BLOCKQUOTE,
    BLOCK_YOUTUBE,
    BLOCK_CODE,
];

/// Represents the 'content_blocks' table in the database.
/// A story's body is an ordered sequence of these.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: i64,
    pub story_id: i64,
    pub block_type: String,
    pub position: i64,
    pub text_content: Option<String>,
    pub image_url: Option<String>,
    /// Normalized 11-char YouTube id, never a full URL.
    pub youtube_video_id: Option<String>,
    pub code_language: Option<String>,
}

/// DTO for one content block inside a story submission.
/// Position is taken from the block's index in the submitted list.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBlockRequest {
    pub block_type: String,

    #[validate(length(max = 20000))]
    pub text_content: Option<String>,

    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,

    /// YouTube URL or bare video id; resolved to the id before storage.
    pub video_url: Option<String>,

    #[validate(length(max = 20))]
    pub code_language: Option<String>,
}

/// Block as served on the story detail endpoint.
#[derive(Debug, Serialize, FromRow)]
pub struct BlockResponse {
    pub id: i64,
    pub block_type: String,
    pub position: i64,
    pub text_content: Option<String>,
    pub image_url: Option<String>,
    pub youtube_video_id: Option<String>,
    pub code_language: Option<String>,
}
