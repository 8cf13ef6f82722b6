use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        story::{SavedStoryItem, StoryListItem, StoryListParams},
        user::{MeResponse, UpdateProfileRequest, User},
    },
    utils::jwt::Claims,
};

/// Get current user's profile and statistics.
pub async fn get_me(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    // Using subqueries for counts is efficient given our indexes on user_id
    // and story_id.
    let (stories_count, likes_received, followers_count, following_count) =
        sqlx::query_as::<_, (i64, i64, i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM stories WHERE user_id = ?1 AND deleted_at IS NULL),
                (SELECT COUNT(*) FROM story_likes sl
                 JOIN stories s ON sl.story_id = s.id
                 WHERE s.user_id = ?1 AND s.deleted_at IS NULL),
                (SELECT COUNT(*) FROM follows WHERE followee_id = ?1),
                (SELECT COUNT(*) FROM follows WHERE follower_id = ?1)
            "#,
        )
        .bind(user_id)
        .fetch_one(&pool)
        .await?;

    Ok(Json(MeResponse {
        id: user.id,
        username: user.username,
        role: user.role,
        full_name: user.full_name,
        bio: user.bio,
        avatar_url: user.avatar_url,
        website: user.website,
        twitter_handle: user.twitter_handle,
        linkedin_profile: user.linkedin_profile,
        created_at: user.created_at,
        stories_count,
        likes_received,
        followers_count,
        following_count,
    }))
}

/// Update the current user's profile fields. Absent fields stay as-is.
pub async fn update_me(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id();

    if payload.full_name.is_none()
        && payload.bio.is_none()
        && payload.avatar_url.is_none()
        && payload.website.is_none()
        && payload.twitter_handle.is_none()
        && payload.linkedin_profile.is_none()
    {
        return Ok(StatusCode::OK);
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE users SET ");
    let mut separated = builder.separated(", ");

    if let Some(full_name) = payload.full_name {
        separated.push("full_name = ");
        separated.push_bind_unseparated(full_name);
    }

    if let Some(bio) = payload.bio {
        separated.push("bio = ");
        separated.push_bind_unseparated(bio);
    }

    if let Some(avatar_url) = payload.avatar_url {
        separated.push("avatar_url = ");
        separated.push_bind_unseparated(avatar_url);
    }

    if let Some(website) = payload.website {
        separated.push("website = ");
        separated.push_bind_unseparated(website);
    }

    if let Some(twitter_handle) = payload.twitter_handle {
        separated.push("twitter_handle = ");
        separated.push_bind_unseparated(twitter_handle);
    }

    if let Some(linkedin_profile) = payload.linkedin_profile {
        separated.push("linkedin_profile = ");
        separated.push_bind_unseparated(linkedin_profile);
    }

    separated.push("updated_at = ");
    separated.push_bind_unseparated(Utc::now());

    builder.push(" WHERE id = ");
    builder.push_bind(user_id);

    builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update profile: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(StatusCode::OK)
}

/// List stories created by the current user, any approval status.
pub async fn list_my_stories(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<StoryListParams>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();
    let limit = params.limit.unwrap_or(20).min(100);

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
        WHERE s.user_id = ?1 AND s.deleted_at IS NULL
          AND (?2 IS NULL OR s.created_at < ?2)
        ORDER BY s.created_at DESC, s.id DESC
        LIMIT ?3
        "#,
    )
    .bind(user_id)
    .bind(params.cursor)
    .bind(limit)
    .fetch_all(&pool)
    .await?;

    Ok(Json(stories))
}

/// List stories saved by the current user.
pub async fn list_my_saved(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();

    let saved = sqlx::query_as::<_, SavedStoryItem>(
        r#"
        SELECT ss.story_id, s.title, u.username AS author_username,
               ss.created_at AS saved_at
        FROM saved_stories ss
        JOIN stories s ON ss.story_id = s.id
        JOIN users u ON s.user_id = u.id
        WHERE ss.user_id = ? AND s.deleted_at IS NULL
        ORDER BY ss.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(saved))
}
