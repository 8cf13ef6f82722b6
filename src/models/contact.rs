use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the single-row 'contact_info' table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ContactInfo {
    pub id: i64,
    pub company_name: String,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub phone1: Option<String>,
    pub phone2: Option<String>,
    pub email: Option<String>,
    pub map_latitude: Option<String>,
    pub map_longitude: Option<String>,
    pub map_zoom: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for the admin contact-info upsert.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContactInfoRequest {
    #[validate(length(min = 1, max = 200))]
    pub company_name: String,
    #[validate(length(max = 200))]
    pub address_line1: Option<String>,
    #[validate(length(max = 200))]
    pub address_line2: Option<String>,
    #[validate(length(max = 20))]
    pub phone1: Option<String>,
    #[validate(length(max = 20))]
    pub phone2: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub map_latitude: Option<String>,
    #[validate(length(max = 20))]
    pub map_longitude: Option<String>,
    pub map_zoom: Option<i64>,
}

/// Represents the 'contact_messages' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub ip_address: String,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for a visitor submitting the contact form.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContactMessageRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
}
