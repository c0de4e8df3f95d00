use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// At most one per (user, pandit), enforced by a unique constraint.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "id")]
    pub review_id: Uuid,
    pub user_id: Uuid,
    pub pandit_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub ceremony_type: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Review {
    pub fn new(
        user_id: Uuid,
        pandit_id: Uuid,
        rating: i16,
        comment: Option<String>,
        ceremony_type: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            review_id: Uuid::new_v4(),
            user_id,
            pandit_id,
            rating,
            comment,
            ceremony_type,
            created_utc: now,
            updated_utc: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub review: Review,
    pub user_name: String,
}
