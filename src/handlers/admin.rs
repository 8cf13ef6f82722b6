// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use validator::Validate;

use crate::{
    error::AppError,
    handlers::stories::LIST_COLUMNS,
    models::{
        ad::{AD_POSITIONS, AD_TYPES, CreateAdSpaceRequest, UpdateAdSpaceRequest},
        contact::{ContactInfo, ContactMessage, UpdateContactInfoRequest},
        story::{
            APPROVAL_PENDING, APPROVAL_STATUSES, ApprovalRequest, BannerRequest, Category,
            CreateCategoryRequest, CreateSubcategoryRequest, StoryListItem, Subcategory,
        },
        team::{CreateTeamMemberRequest, UpdateTeamMemberRequest},
        user::User,
    },
    utils::jwt::Claims,
};

/// Lists all users in the system.
/// Admin only.
pub async fn list_users(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id DESC")
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(Json(users))
}

/// Deletes a user by ID.
/// Admin only. Prevents deleting self. The FK cascades take the user's
/// stories, comments and likes along.
pub async fn delete_user(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if id == claims.user_id() {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = ?1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete user: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ReviewQueueParams {
    pub status: Option<String>,
}

/// Review queue for submitted stories, oldest first. Defaults to the
/// pending ones.
/// Admin only.
pub async fn list_stories_for_review(
    State(pool): State<SqlitePool>,
    Query(params): Query<ReviewQueueParams>,
) -> Result<impl IntoResponse, AppError> {
    let status = params.status.unwrap_or_else(|| APPROVAL_PENDING.to_string());
    if !APPROVAL_STATUSES.contains(&status.as_str()) {
        return Err(AppError::BadRequest(format!(
            "status must be one of: {}",
            APPROVAL_STATUSES.join(", ")
        )));
    }

    let sql = format!(
        r#"
        SELECT {LIST_COLUMNS}
        FROM stories s
        JOIN users u ON u.id = s.user_id
        WHERE s.deleted_at IS NULL AND s.approval_status = ?1
        ORDER BY s.created_at ASC, s.id ASC
        LIMIT 100
        "#
    );

    let stories = sqlx::query_as::<_, StoryListItem>(&sql)
        .bind(&status)
        .fetch_all(&pool)
        .await?;

    Ok(Json(stories))
}

/// Records the moderation decision on a story.
/// Admin only.
pub async fn set_story_approval(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<ApprovalRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !APPROVAL_STATUSES.contains(&payload.status.as_str()) {
        return Err(AppError::BadRequest(format!(
            "status must be one of: {}",
            APPROVAL_STATUSES.join(", ")
        )));
    }

    let result = sqlx::query(
        "UPDATE stories SET approval_status = ?1, updated_at = ?2
         WHERE id = ?3 AND deleted_at IS NULL",
    )
    .bind(&payload.status)
    .bind(Utc::now())
    .bind(id)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Story not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Flags a story for the front-page banner carousel (or takes it out).
/// Admin only.
pub async fn set_story_banner(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<BannerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let result = sqlx::query(
        "UPDATE stories SET is_banner = ?1, banner_image_url = ?2, updated_at = ?3
         WHERE id = ?4 AND deleted_at IS NULL",
    )
    .bind(payload.is_banner)
    .bind(&payload.banner_image_url)
    .bind(Utc::now())
    .bind(id)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Story not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Adds a team member to the public team page.
/// Admin only.
pub async fn create_team_member(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateTeamMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO team_members
            (name, position, bio, photo_url, display_order, is_active, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
        RETURNING id
        "#,
    )
    .bind(payload.name.trim())
    .bind(payload.position.trim())
    .bind(&payload.bio)
    .bind(&payload.photo_url)
    .bind(payload.display_order)
    .bind(payload.is_active)
    .bind(Utc::now())
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(json!({"id": id}))))
}

/// Updates a team member by ID.
/// Admin only.
pub async fn update_team_member(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTeamMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.is_none()
        && payload.position.is_none()
        && payload.bio.is_none()
        && payload.photo_url.is_none()
        && payload.display_order.is_none()
        && payload.is_active.is_none()
    {
        return Ok(StatusCode::OK);
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE team_members SET ");
    let mut separated = builder.separated(", ");

    if let Some(name) = payload.name {
        separated.push("name = ");
        separated.push_bind_unseparated(name);
    }

    if let Some(position) = payload.position {
        separated.push("position = ");
        separated.push_bind_unseparated(position);
    }

    if let Some(bio) = payload.bio {
        separated.push("bio = ");
        separated.push_bind_unseparated(bio);
    }

    if let Some(photo_url) = payload.photo_url {
        separated.push("photo_url = ");
        separated.push_bind_unseparated(photo_url);
    }

    if let Some(display_order) = payload.display_order {
        separated.push("display_order = ");
        separated.push_bind_unseparated(display_order);
    }

    if let Some(is_active) = payload.is_active {
        separated.push("is_active = ");
        separated.push_bind_unseparated(is_active);
    }

    separated.push("updated_at = ");
    separated.push_bind_unseparated(Utc::now());

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update team member: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Team member not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes a team member by ID.
/// Admin only.
pub async fn delete_team_member(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM team_members WHERE id = ?1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete team member: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Team member not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Replaces the contact-info singleton, creating the row on first save.
/// Admin only.
pub async fn update_contact_info(
    State(pool): State<SqlitePool>,
    Json(payload): Json<UpdateContactInfoRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let info = sqlx::query_as::<_, ContactInfo>(
        r#"
        INSERT INTO contact_info
            (id, company_name, address_line1, address_line2, phone1, phone2,
             email, map_latitude, map_longitude, map_zoom, updated_at)
        VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        ON CONFLICT (id) DO UPDATE SET
            company_name = excluded.company_name,
            address_line1 = excluded.address_line1,
            address_line2 = excluded.address_line2,
            phone1 = excluded.phone1,
            phone2 = excluded.phone2,
            email = excluded.email,
            map_latitude = excluded.map_latitude,
            map_longitude = excluded.map_longitude,
            map_zoom = excluded.map_zoom,
            updated_at = excluded.updated_at
        RETURNING *
        "#,
    )
    .bind(payload.company_name.trim())
    .bind(&payload.address_line1)
    .bind(&payload.address_line2)
    .bind(&payload.phone1)
    .bind(&payload.phone2)
    .bind(&payload.email)
    .bind(&payload.map_latitude)
    .bind(&payload.map_longitude)
    .bind(payload.map_zoom.unwrap_or(17))
    .bind(Utc::now())
    .fetch_one(&pool)
    .await?;

    Ok(Json(info))
}

/// Inbox of contact-form submissions, newest first.
/// Admin only.
pub async fn list_contact_messages(
    State(pool): State<SqlitePool>,
) -> Result<impl IntoResponse, AppError> {
    let messages = sqlx::query_as::<_, ContactMessage>(
        "SELECT * FROM contact_messages ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(messages))
}

/// Marks a contact message as read.
/// Admin only.
pub async fn mark_message_read(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("UPDATE contact_messages SET is_read = 1 WHERE id = ?1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Message not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Rejects ad payloads whose position or provider is not a known value.
fn check_ad_fields(position: Option<&str>, ad_type: Option<&str>) -> Result<(), AppError> {
    if let Some(position) = position {
        if !AD_POSITIONS.contains(&position) {
            return Err(AppError::BadRequest(format!(
                "position must be one of: {}",
                AD_POSITIONS.join(", ")
            )));
        }
    }
    if let Some(ad_type) = ad_type {
        if !AD_TYPES.contains(&ad_type) {
            return Err(AppError::BadRequest(format!(
                "ad_type must be one of: {}",
                AD_TYPES.join(", ")
            )));
        }
    }
    Ok(())
}

/// Creates an ad space.
/// Admin only.
pub async fn create_ad_space(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateAdSpaceRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }
    check_ad_fields(Some(payload.position.as_str()), Some(payload.ad_type.as_str()))?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO ad_spaces (name, position, ad_type, ad_code, is_active, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
        RETURNING id
        "#,
    )
    .bind(payload.name.trim())
    .bind(&payload.position)
    .bind(&payload.ad_type)
    .bind(&payload.ad_code)
    .bind(payload.is_active)
    .bind(Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(format!("Ad space '{}' already exists", payload.name.trim()))
        }
        _ => AppError::from(e),
    })?;

    Ok((StatusCode::CREATED, Json(json!({"id": id}))))
}

/// Updates an ad space by ID.
/// Admin only.
pub async fn update_ad_space(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateAdSpaceRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.is_none()
        && payload.position.is_none()
        && payload.ad_type.is_none()
        && payload.ad_code.is_none()
        && payload.is_active.is_none()
    {
        return Ok(StatusCode::OK);
    }

    check_ad_fields(payload.position.as_deref(), payload.ad_type.as_deref())?;

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE ad_spaces SET ");
    let mut separated = builder.separated(", ");

    if let Some(name) = payload.name {
        separated.push("name = ");
        separated.push_bind_unseparated(name);
    }

    if let Some(position) = payload.position {
        separated.push("position = ");
        separated.push_bind_unseparated(position);
    }

    if let Some(ad_type) = payload.ad_type {
        separated.push("ad_type = ");
        separated.push_bind_unseparated(ad_type);
    }

    if let Some(ad_code) = payload.ad_code {
        separated.push("ad_code = ");
        separated.push_bind_unseparated(ad_code);
    }

    if let Some(is_active) = payload.is_active {
        separated.push("is_active = ");
        separated.push_bind_unseparated(is_active);
    }

    separated.push("updated_at = ");
    separated.push_bind_unseparated(Utc::now());

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update ad space: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Ad space not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes an ad space by ID.
/// Admin only.
pub async fn delete_ad_space(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM ad_spaces WHERE id = ?1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete ad space: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Ad space not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Creates a category.
/// Admin only.
pub async fn create_category(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, description) VALUES (?1, ?2) RETURNING *",
    )
    .bind(payload.name.trim())
    .bind(&payload.description)
    .fetch_one(&pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(format!("Category '{}' already exists", payload.name.trim()))
        }
        _ => AppError::from(e),
    })?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Creates a subcategory under an existing category.
/// Admin only.
pub async fn create_subcategory(
    State(pool): State<SqlitePool>,
    Path(category_id): Path<i64>,
    Json(payload): Json<CreateSubcategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)")
        .bind(category_id)
        .fetch_one(&pool)
        .await?;
    if !exists {
        return Err(AppError::NotFound("Category not found".to_string()));
    }

    let subcategory = sqlx::query_as::<_, Subcategory>(
        "INSERT INTO subcategories (category_id, name, description)
         VALUES (?1, ?2, ?3) RETURNING *",
    )
    .bind(category_id)
    .bind(payload.name.trim())
    .bind(&payload.description)
    .fetch_one(&pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Subcategory already exists in this category".to_string())
        }
        _ => AppError::from(e),
    })?;

    Ok((StatusCode::CREATED, Json(subcategory)))
}
