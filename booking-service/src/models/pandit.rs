use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Ceremony officiant account and public profile.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Pandit {
    #[serde(rename = "id")]
    pub pandit_id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub experience_years: i32,
    pub languages: Vec<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub is_online: bool,
    pub is_verified: bool,
    pub rating: Decimal,
    pub total_reviews: i32,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Pandit {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        phone: Option<String>,
        specialization: Option<String>,
        experience_years: i32,
        languages: Vec<String>,
        city: Option<String>,
        bio: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            pandit_id: Uuid::new_v4(),
            name,
            email: email.to_lowercase(),
            password_hash,
            phone,
            specialization,
            experience_years,
            languages,
            bio,
            city,
            is_online: false,
            is_verified: false,
            rating: Decimal::ZERO,
            total_reviews: 0,
            created_utc: now,
            updated_utc: now,
        }
    }
}
