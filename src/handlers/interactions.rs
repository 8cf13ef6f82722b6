// src/handlers/interactions.rs
//
// Story like/save toggles and author follows. All three share the same
// shape: delete first, insert on miss, recount, one transaction. The
// UNIQUE pair keys keep concurrent duplicates down to a single row.

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;

use crate::{error::AppError, utils::jwt::Claims};

/// Toggle Like on a story.
pub async fn toggle_story_like(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(story_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();

    let mut tx = pool.begin().await?;

    let story = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM stories WHERE id = ? AND deleted_at IS NULL",
    )
    .bind(story_id)
    .fetch_optional(&mut *tx)
    .await?;
    if story.is_none() {
        return Err(AppError::NotFound("Story not found".to_string()));
    }

    let removed = sqlx::query("DELETE FROM story_likes WHERE story_id = ? AND user_id = ?")
        .bind(story_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let liked = if removed == 0 {
        sqlx::query(
            r#"
            INSERT INTO story_likes (story_id, user_id, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT (story_id, user_id) DO NOTHING
            "#,
        )
        .bind(story_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
        true
    } else {
        false
    };

    let like_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM story_likes WHERE story_id = ?")
            .bind(story_id)
            .fetch_one(&mut *tx)
            .await?;

    tx.commit().await?;

    Ok(Json(json!({ "liked": liked, "like_count": like_count })))
}

/// Toggle Save (reading list) on a story.
pub async fn toggle_story_save(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(story_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();

    let mut tx = pool.begin().await?;

    let story = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM stories WHERE id = ? AND deleted_at IS NULL",
    )
    .bind(story_id)
    .fetch_optional(&mut *tx)
    .await?;
    if story.is_none() {
        return Err(AppError::NotFound("Story not found".to_string()));
    }

    let removed = sqlx::query("DELETE FROM saved_stories WHERE story_id = ? AND user_id = ?")
        .bind(story_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let saved = if removed == 0 {
        sqlx::query(
            r#"
            INSERT INTO saved_stories (story_id, user_id, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT (story_id, user_id) DO NOTHING
            "#,
        )
        .bind(story_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
        true
    } else {
        false
    };

    let save_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM saved_stories WHERE story_id = ?")
            .bind(story_id)
            .fetch_one(&mut *tx)
            .await?;

    tx.commit().await?;

    Ok(Json(json!({ "saved": saved, "save_count": save_count })))
}

/// Toggle Follow on an author. Following yourself is rejected.
pub async fn toggle_follow(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(author_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let follower_id = claims.user_id();

    if follower_id == author_id {
        return Err(AppError::BadRequest(
            "You cannot follow yourself".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let author = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = ?")
        .bind(author_id)
        .fetch_optional(&mut *tx)
        .await?;
    if author.is_none() {
        return Err(AppError::NotFound("Author not found".to_string()));
    }

    let removed = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followee_id = ?")
        .bind(follower_id)
        .bind(author_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let following = if removed == 0 {
        sqlx::query(
            r#"
            INSERT INTO follows (follower_id, followee_id, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT (follower_id, followee_id) DO NOTHING
            "#,
        )
        .bind(follower_id)
        .bind(author_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
        true
    } else {
        false
    };

    let followers_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE followee_id = ?")
            .bind(author_id)
            .fetch_one(&mut *tx)
            .await?;

    tx.commit().await?;

    Ok(Json(
        json!({ "following": following, "followers_count": followers_count }),
    ))
}
