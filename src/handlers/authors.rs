// src/handlers/authors.rs

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    models::{story::StoryListItem, user::AuthorProfile},
    utils::jwt::claims_from_headers,
};

/// Public author page: profile, follower stats, latest approved stories
/// and the author's three most-liked stories. `is_following` reflects the
/// optional viewer.
pub async fn get_author(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = claims_from_headers(&headers, &config.jwt_secret).map(|c| c.user_id());

    let author = sqlx::query_as::<_, AuthorProfile>(
        r#"
        SELECT
            u.id, u.username, u.full_name, u.bio, u.avatar_url,
            u.website, u.twitter_handle, u.linkedin_profile,
            (SELECT COUNT(*) FROM follows WHERE followee_id = u.id) AS followers_count,
            EXISTS(SELECT 1 FROM follows
                   WHERE follower_id = ?2 AND followee_id = u.id) AS is_following
        FROM users u
        WHERE u.id = ?1
        "#,
    )
    .bind(id)
    .bind(viewer)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Author not found".to_string()))?;

    let stories = sqlx::query_as::<_, StoryListItem>(
        r#"
        SELECT
            s.id, s.title, s.subtitle, s.cover_image_url, s.category_id,
            s.approval_status, s.created_at,
            u.id AS author_id, u.username AS author_username,
            u.full_name AS author_full_name, u.avatar_url AS author_avatar_url,
            (SELECT COUNT(*) FROM story_likes sl WHERE sl.story_id = s.id) AS like_count,
            (SELECT COUNT(*) FROM comments c WHERE c.story_id = s.id) AS comment_count
        FROM stories s
        JOIN users u ON u.id = s.user_id
        WHERE s.user_id = ? AND s.approval_status = 'approved' AND s.deleted_at IS NULL
        ORDER BY s.created_at DESC
        LIMIT 20
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    let top_stories = sqlx::query_as::<_, StoryListItem>(
        r#"
        SELECT
            s.id, s.title, s.subtitle, s.cover_image_url, s.category_id,
            s.approval_status, s.created_at,
            u.id AS author_id, u.username AS author_username,
            u.full_name AS author_full_name, u.avatar_url AS author_avatar_url,
            (SELECT COUNT(*) FROM story_likes sl WHERE sl.story_id = s.id) AS like_count,
            (SELECT COUNT(*) FROM comments c WHERE c.story_id = s.id) AS comment_count
        FROM stories s
        JOIN users u ON u.id = s.user_id
        WHERE s.user_id = ? AND s.approval_status = 'approved' AND s.deleted_at IS NULL
        ORDER BY like_count DESC, s.created_at DESC
        LIMIT 3
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({
        "author": author,
        "stories": stories,
        "top_stories": top_stories,
    })))
}
