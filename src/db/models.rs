use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct SiteSetting {
    pub id: String,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Donation {
    pub id: String,
    pub donor_name: String,
    pub donor_email: String,
    pub amount: f64,
    pub currency: String,
    pub message: Option<String>,
    pub is_anonymous: bool,
    pub payment_status: String,
    pub stripe_session_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub image_url: Option<String>,
    pub max_attendees: Option<i64>,
    pub current_attendees: i64,
    pub registration_fee: f64,
    pub published: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Program {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_url: Option<String>,
    pub published: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub target_amount: f64,
    pub raised_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub image_url: Option<String>,
    pub image_gallery: Json<Vec<String>>,
    pub show_gallery: bool,
    pub beneficiaries: i64,
    pub program_category: String,
    pub published: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct NewsletterSubscriber {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub user_id: Option<String>,
    pub subscribed_at: DateTime<Utc>,
    pub is_active: bool,
    pub unsubscribe_token: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct SiteStat {
    pub id: String,
    pub key: String,
    pub label: String,
    pub display_order: i64,
    pub is_active: bool,
    pub page: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct ResponseTime {
    pub id: String,
    pub inquiry_type: String,
    pub response_time: String,
    pub display_order: i64,
    pub is_active: bool,
    pub page: String,
}
