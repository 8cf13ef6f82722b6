// src/handlers/site.rs
//
// Public site chrome: team page, contact info, ad slots, tag and
// category indexes, robots.txt.

use std::collections::HashMap;

use axum::{Json, extract::State, http::header, response::IntoResponse};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{ad::AdSpace, contact::ContactInfo, story::Category, team::TeamMember},
};

/// Active team members, ordered for display.
pub async fn list_team(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let members = sqlx::query_as::<_, TeamMember>(
        r#"
        SELECT * FROM team_members
        WHERE is_active = 1
        ORDER BY display_order ASC, created_at ASC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(members))
}

/// The site's contact details. Null until an admin sets them.
pub async fn get_contact_info(
    State(pool): State<SqlitePool>,
) -> Result<impl IntoResponse, AppError> {
    let info = sqlx::query_as::<_, ContactInfo>("SELECT * FROM contact_info WHERE id = 1")
        .fetch_optional(&pool)
        .await?;

    Ok(Json(info))
}

/// Active ad spaces grouped by page slot ('top'/'middle'/'bottom'),
/// the shape the front page consumes.
pub async fn list_ads(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let ads = sqlx::query_as::<_, AdSpace>(
        "SELECT * FROM ad_spaces WHERE is_active = 1 ORDER BY position ASC, name ASC",
    )
    .fetch_all(&pool)
    .await?;

    let mut grouped: HashMap<String, Vec<AdSpace>> = HashMap::new();
    for ad in ads {
        grouped.entry(ad.position.clone()).or_default().push(ad);
    }

    Ok(Json(grouped))
}

/// Tags currently in use on approved stories.
pub async fn list_tags(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let tags = sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT t.name
        FROM tags t
        JOIN story_tags st ON st.tag_id = t.id
        JOIN stories s ON s.id = st.story_id
        WHERE s.approval_status = 'approved' AND s.deleted_at IS NULL
        ORDER BY t.name ASC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(tags))
}

/// All categories, for navigation and the story editor.
pub async fn list_categories(
    State(pool): State<SqlitePool>,
) -> Result<impl IntoResponse, AppError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name, description FROM categories ORDER BY name ASC",
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(categories))
}

pub async fn robots_txt() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain")],
        "User-agent: *\nAllow: /\nDisallow: /api/\n",
    )
}
