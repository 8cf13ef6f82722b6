// src/handlers/contact.rs

use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::{NaiveTime, Utc};
use serde_json::json;
use std::net::SocketAddr;
use validator::Validate;

use crate::error::AppError;
use crate::models::contact::CreateContactMessageRequest;
use crate::state::AppState;
use crate::utils::net::client_ip;

/// Handler for POST /api/contact/messages (public).
/// Submissions are capped per client IP per UTC day; the counter resets at
/// midnight rather than on a rolling window.
pub async fn submit_contact_message(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<CreateContactMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let ip_address = client_ip(&headers, peer);
    let midnight = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();

    let sent_today: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM contact_messages WHERE ip_address = ?1 AND created_at >= ?2",
    )
    .bind(&ip_address)
    .bind(midnight)
    .fetch_one(&state.pool)
    .await?;

    if sent_today >= state.config.contact_daily_limit {
        tracing::warn!("Contact form rate limit hit for {}", ip_address);
        return Err(AppError::RateLimited(format!(
            "You have already sent {} messages today. Please try again tomorrow.",
            sent_today
        )));
    }

    sqlx::query(
        "INSERT INTO contact_messages (name, email, message, ip_address, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(payload.name.trim())
    .bind(payload.email.trim())
    .bind(payload.message.trim())
    .bind(&ip_address)
    .bind(Utc::now())
    .execute(&state.pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Thank you for your message! We will get back to you soon."
        })),
    ))
}
