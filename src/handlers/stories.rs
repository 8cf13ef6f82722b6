use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::{
        block::{
            BLOCK_BLOCKQUOTE, BLOCK_CODE, BLOCK_IMAGE, BLOCK_PARAGRAPH, BLOCK_YOUTUBE,
            BlockResponse, CreateBlockRequest,
        },
        story::{
            APPROVAL_APPROVED, BannerStory, CreateStoryRequest, RelatedStory, StoryDetail,
            StoryDetailResponse, StoryDetailRow, StoryListItem, StoryListParams,
        },
    },
    utils::{
        html::{clean_html, escape_text},
        jwt::{Claims, claims_from_headers},
        video::youtube_video_id,
    },
};

/// Shared column list for story list endpoints.
pub(crate) const LIST_COLUMNS: &str = r#"
    s.id, s.title, s.subtitle, s.cover_image_url, s.category_id,
    s.approval_status, s.created_at,
    u.id AS author_id, u.username AS author_username,
    u.full_name AS author_full_name, u.avatar_url AS author_avatar_url,
    (SELECT COUNT(*) FROM story_likes sl WHERE sl.story_id = s.id) AS like_count,
    (SELECT COUNT(*) FROM comments c WHERE c.story_id = s.id) AS comment_count
"#;

/// A content block validated and sanitized, ready to insert.
struct PreparedBlock {
    block_type: String,
    position: i64,
    text_content: Option<String>,
    image_url: Option<String>,
    youtube_video_id: Option<String>,
    code_language: Option<String>,
}

/// Applies the per-type field rules before anything touches the database:
/// text blocks need text (sanitized), image blocks need a URL, youtube
/// blocks must resolve to a video id, code blocks are entity-escaped.
fn prepare_block(block: &CreateBlockRequest, position: i64) -> Result<PreparedBlock, AppError> {
    let mut prepared = PreparedBlock {
        block_type: block.block_type.clone(),
        position,
        text_content: None,
        image_url: None,
        youtube_video_id: None,
        code_language: None,
    };

    match block.block_type.as_str() {
        BLOCK_PARAGRAPH | BLOCK_BLOCKQUOTE => {
            let text = block.text_content.as_deref().map(str::trim).unwrap_or("");
            if text.is_empty() {
                return Err(AppError::BadRequest(format!(
                    "Block {} requires text_content",
                    position
                )));
            }
            prepared.text_content = Some(clean_html(text));
        }
        BLOCK_CODE => {
            let text = block.text_content.as_deref().unwrap_or("");
            if text.trim().is_empty() {
                return Err(AppError::BadRequest(format!(
                    "Block {} requires text_content",
                    position
                )));
            }
            prepared.text_content = Some(escape_text(text));
            prepared.code_language = block.code_language.clone();
        }
        BLOCK_IMAGE => {
            let url = block.image_url.as_deref().map(str::trim).unwrap_or("");
            if url.is_empty() {
                return Err(AppError::BadRequest(format!(
                    "Block {} requires image_url",
                    position
                )));
            }
            prepared.image_url = Some(url.to_string());
        }
        BLOCK_YOUTUBE => {
            let raw = block.video_url.as_deref().unwrap_or("");
            let video_id = youtube_video_id(raw).ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Block {} has no recognizable YouTube video",
                    position
                ))
            })?;
            prepared.youtube_video_id = Some(video_id);
        }
        other => {
            return Err(AppError::BadRequest(format!(
                "Unknown block type '{}'",
                other
            )));
        }
    }

    Ok(prepared)
}

/// Publishes a new story with its content blocks and tags.
///
/// Everything lands in one transaction; the story starts 'pending' and
/// stays off public lists until an admin approves it.
pub async fn create_story(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateStoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }
    if payload.blocks.is_empty() {
        return Err(AppError::BadRequest(
            "A story needs at least one content block".to_string(),
        ));
    }

    let user_id = claims.user_id();

    let mut prepared_blocks = Vec::with_capacity(payload.blocks.len());
    for (position, block) in payload.blocks.iter().enumerate() {
        prepared_blocks.push(prepare_block(block, position as i64)?);
    }

    let mut tx = pool.begin().await?;

    if let Some(category_id) = payload.category_id {
        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM categories WHERE id = ?")
            .bind(category_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound("Category not found".to_string()));
        }
    }

    if let Some(subcategory_id) = payload.subcategory_id {
        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM subcategories WHERE id = ?")
            .bind(subcategory_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound("Subcategory not found".to_string()));
        }
    }

    let now = Utc::now();
    let story_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO stories
        (user_id, category_id, subcategory_id, title, subtitle, cover_image_url,
         meta_description, meta_keywords, approval_status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'pending', ?, ?)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(payload.category_id)
    .bind(payload.subcategory_id)
    .bind(payload.title.trim())
    .bind(payload.subtitle.as_deref())
    .bind(payload.cover_image_url.as_deref())
    .bind(payload.meta_description.as_deref())
    .bind(payload.meta_keywords.as_deref())
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    for block in &prepared_blocks {
        sqlx::query(
            r#"
            INSERT INTO content_blocks
            (story_id, block_type, position, text_content, image_url, youtube_video_id, code_language)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(story_id)
        .bind(&block.block_type)
        .bind(block.position)
        .bind(&block.text_content)
        .bind(&block.image_url)
        .bind(&block.youtube_video_id)
        .bind(&block.code_language)
        .execute(&mut *tx)
        .await?;
    }

    // Tags are normalized to lowercase; unknown ones are created on the fly.
    for raw_tag in &payload.tags {
        let name = raw_tag.trim().to_lowercase();
        if name.is_empty() {
            continue;
        }
        sqlx::query("INSERT INTO tags (name) VALUES (?) ON CONFLICT (name) DO NOTHING")
            .bind(&name)
            .execute(&mut *tx)
            .await?;
        let tag_id = sqlx::query_scalar::<_, i64>("SELECT id FROM tags WHERE name = ?")
            .bind(&name)
            .fetch_one(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO story_tags (story_id, tag_id) VALUES (?, ?) ON CONFLICT DO NOTHING",
        )
        .bind(story_id)
        .bind(tag_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": story_id }))))
}

/// Lists approved stories, newest first by default.
///
/// Supports cursor-based pagination plus q/tag/category/author filters;
/// `sort=top` switches to a most-liked ranking.
pub async fn list_stories(
    State(pool): State<SqlitePool>,
    Query(params): Query<StoryListParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(20).min(100);
    let q = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let tag = params
        .tag
        .as_deref()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty());

    let base = format!(
        r#"
        SELECT {LIST_COLUMNS}
        FROM stories s
        JOIN users u ON u.id = s.user_id
        WHERE s.deleted_at IS NULL
          AND s.approval_status = 'approved'
          AND (?1 IS NULL OR s.created_at < ?1)
          AND (?2 IS NULL OR s.category_id = ?2)
          AND (?3 IS NULL OR s.user_id = ?3)
          AND (?4 IS NULL OR EXISTS (
                SELECT 1 FROM story_tags st JOIN tags t ON t.id = st.tag_id
                WHERE st.story_id = s.id AND t.name = ?4))
          AND (?5 IS NULL
               OR s.title LIKE '%' || ?5 || '%'
               OR s.subtitle LIKE '%' || ?5 || '%'
               OR u.username LIKE '%' || ?5 || '%'
               OR EXISTS (
                    SELECT 1 FROM story_tags st2 JOIN tags t2 ON t2.id = st2.tag_id
                    WHERE st2.story_id = s.id AND t2.name LIKE '%' || ?5 || '%'))
        "#
    );

    let sql = match params.sort.as_deref() {
        Some("top") => format!("{base} ORDER BY like_count DESC, s.created_at DESC LIMIT ?6"),
        _ => format!("{base} ORDER BY s.created_at DESC, s.id DESC LIMIT ?6"),
    };

    let stories = sqlx::query_as::<_, StoryListItem>(&sql)
        .bind(params.cursor)
        .bind(params.category_id)
        .bind(params.author_id)
        .bind(tag)
        .bind(q)
        .bind(limit)
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list stories: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(Json(stories))
}

/// Approved stories flagged for the front-page banner carousel.
pub async fn list_banners(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let banners = sqlx::query_as::<_, BannerStory>(
        r#"
        SELECT s.id, s.title, s.subtitle, s.banner_image_url, s.created_at,
               u.username AS author_username
        FROM stories s
        JOIN users u ON u.id = s.user_id
        WHERE s.is_banner = 1
          AND s.approval_status = 'approved'
          AND s.deleted_at IS NULL
        ORDER BY s.created_at DESC
        LIMIT 10
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(banners))
}

/// Full story payload: detail row, blocks, tags and related stories.
///
/// Pending/rejected stories stay visible to their author and to admins
/// only. A valid bearer token personalizes the viewer flags and records
/// a unique per-user view.
pub async fn get_story(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let claims = claims_from_headers(&headers, &config.jwt_secret);
    let viewer = claims.as_ref().map(|c| c.user_id());

    let row = sqlx::query_as::<_, StoryDetailRow>(
        r#"
        SELECT
            s.id, s.user_id, s.category_id, s.subcategory_id,
            s.title, s.subtitle, s.cover_image_url,
            s.is_banner, s.banner_image_url,
            s.meta_description, s.meta_keywords,
            s.approval_status, s.created_at, s.updated_at,
            u.username AS author_username,
            u.full_name AS author_full_name,
            u.avatar_url AS author_avatar_url,
            u.bio AS author_bio,
            (SELECT COUNT(*) FROM story_likes WHERE story_id = s.id) AS like_count,
            (SELECT COUNT(*) FROM saved_stories WHERE story_id = s.id) AS save_count,
            (SELECT COUNT(*) FROM story_views WHERE story_id = s.id) AS view_count,
            (SELECT COUNT(*) FROM comments WHERE story_id = s.id) AS comment_count,
            EXISTS(SELECT 1 FROM story_likes WHERE story_id = s.id AND user_id = ?2) AS liked_by_viewer,
            EXISTS(SELECT 1 FROM saved_stories WHERE story_id = s.id AND user_id = ?2) AS saved_by_viewer,
            EXISTS(SELECT 1 FROM follows WHERE follower_id = ?2 AND followee_id = s.user_id) AS following_author
        FROM stories s
        JOIN users u ON u.id = s.user_id
        WHERE s.id = ?1 AND s.deleted_at IS NULL
        "#,
    )
    .bind(id)
    .bind(viewer)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Story not found".to_string()))?;

    let is_admin = claims.as_ref().map(|c| c.role == "admin").unwrap_or(false);
    if row.approval_status != APPROVAL_APPROVED && viewer != Some(row.user_id) && !is_admin {
        return Err(AppError::NotFound("Story not found".to_string()));
    }

    let blocks = sqlx::query_as::<_, BlockResponse>(
        r#"
        SELECT id, block_type, position, text_content, image_url,
               youtube_video_id, code_language
        FROM content_blocks
        WHERE story_id = ?
        ORDER BY position ASC
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    let tags = sqlx::query_scalar::<_, String>(
        r#"
        SELECT t.name FROM tags t
        JOIN story_tags st ON st.tag_id = t.id
        WHERE st.story_id = ?
        ORDER BY t.name ASC
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    let related = sqlx::query_as::<_, RelatedStory>(
        r#"
        SELECT DISTINCT s.id, s.title, s.cover_image_url, s.created_at,
               u.username AS author_username
        FROM stories s
        JOIN users u ON u.id = s.user_id
        JOIN story_tags st ON st.story_id = s.id
        WHERE st.tag_id IN (SELECT tag_id FROM story_tags WHERE story_id = ?1)
          AND s.id <> ?1
          AND s.deleted_at IS NULL
          AND s.approval_status = 'approved'
        ORDER BY s.created_at DESC
        LIMIT 3
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    // One view per reader; anonymous traffic is not tracked.
    if let Some(viewer_id) = viewer {
        sqlx::query(
            r#"
            INSERT INTO story_views (story_id, user_id, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT (story_id, user_id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(viewer_id)
        .bind(Utc::now())
        .execute(&pool)
        .await?;
    }

    Ok(Json(StoryDetailResponse {
        story: StoryDetail::from(row),
        blocks,
        tags,
        related,
    }))
}

/// Delete a story (Soft Delete).
/// Requires: Login + (Author OR Admin).
pub async fn delete_story(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();

    let owner = sqlx::query_scalar::<_, i64>(
        "SELECT user_id FROM stories WHERE id = ? AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Story not found".to_string()))?;

    if owner != user_id && claims.role != "admin" {
        return Err(AppError::Forbidden(
            "You are not authorized to delete this story".to_string(),
        ));
    }

    sqlx::query("UPDATE stories SET deleted_at = ? WHERE id = ?")
        .bind(Utc::now())
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete story: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(StatusCode::NO_CONTENT)
}
