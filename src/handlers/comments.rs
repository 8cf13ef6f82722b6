// src/handlers/comments.rs
//
// HTTP surface over `CommentService`. Permission and depth rules live in
// the service; these handlers only translate between HTTP and it.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    comments::CommentService,
    config::Config,
    error::AppError,
    models::comment::{CommentListParams, CreateCommentRequest},
    utils::jwt::{Claims, claims_from_headers},
};

/// Full comment tree for a story, together with the total count.
///
/// Public endpoint; a valid bearer token sets the viewer for the
/// `liked_by_viewer` flags. `?order=newest` flips sibling ordering.
pub async fn list_story_comments(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    headers: HeaderMap,
    Path(story_id): Path<i64>,
    Query(params): Query<CommentListParams>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = claims_from_headers(&headers, &config.jwt_secret).map(|c| c.user_id());
    let order = params.order.unwrap_or_default();

    let service = CommentService::new(pool);
    let comments = service.tree(story_id, viewer, order).await?;
    let count = service.count_for_story(story_id).await?;

    Ok(Json(json!({ "comments": comments, "count": count })))
}

/// Posts a comment on a story, optionally as a reply.
pub async fn create_comment(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(story_id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let comment = CommentService::new(pool)
        .create(story_id, claims.user_id(), &payload.body, payload.parent_id)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Toggles the current user's like on a comment.
pub async fn toggle_comment_like(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(comment_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = CommentService::new(pool)
        .toggle_like(comment_id, claims.user_id())
        .await?;

    Ok(Json(outcome))
}

/// Deletes a comment (author or moderator), cascading to its replies.
pub async fn delete_comment(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(comment_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    CommentService::new(pool)
        .delete(comment_id, claims.user_id())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
