use uuid::Uuid;

use super::Database;
use crate::models::Pandit;
use crate::services::ServiceError;

/// Public directory filters.
#[derive(Debug, Clone, Default)]
pub struct PanditFilter {
    pub specialization: Option<String>,
    pub city: Option<String>,
    pub online: Option<bool>,
}

/// Profile fields a pandit may edit; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct PanditProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub experience_years: Option<i32>,
    pub languages: Option<Vec<String>>,
    pub city: Option<String>,
    pub bio: Option<String>,
}

impl Database {
    pub async fn find_pandit_by_id(&self, pandit_id: Uuid) -> Result<Option<Pandit>, ServiceError> {
        let pandit = sqlx::query_as::<_, Pandit>("SELECT * FROM pandits WHERE pandit_id = $1")
            .bind(pandit_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(pandit)
    }

    pub async fn find_pandit_by_email(&self, email: &str) -> Result<Option<Pandit>, ServiceError> {
        let pandit =
            sqlx::query_as::<_, Pandit>("SELECT * FROM pandits WHERE LOWER(email) = LOWER($1)")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(pandit)
    }

    pub async fn insert_pandit(&self, pandit: &Pandit) -> Result<(), ServiceError> {
        sqlx::query(
            r#"
            INSERT INTO pandits (pandit_id, name, email, password_hash, phone, specialization,
                                 experience_years, languages, bio, city, is_online, is_verified,
                                 rating, total_reviews, created_utc, updated_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(pandit.pandit_id)
        .bind(&pandit.name)
        .bind(&pandit.email)
        .bind(&pandit.password_hash)
        .bind(&pandit.phone)
        .bind(&pandit.specialization)
        .bind(pandit.experience_years)
        .bind(&pandit.languages)
        .bind(&pandit.bio)
        .bind(&pandit.city)
        .bind(pandit.is_online)
        .bind(pandit.is_verified)
        .bind(pandit.rating)
        .bind(pandit.total_reviews)
        .bind(pandit.created_utc)
        .bind(pandit.updated_utc)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            ServiceError::on_unique_violation(e, "Pandit already exists with this email")
        })?;
        Ok(())
    }

    /// Verified pandits matching the filter, best rated first.
    pub async fn list_verified_pandits(
        &self,
        filter: &PanditFilter,
    ) -> Result<Vec<Pandit>, ServiceError> {
        let pandits = sqlx::query_as::<_, Pandit>(
            r#"
            SELECT * FROM pandits
            WHERE is_verified = TRUE
              AND ($1::text IS NULL OR specialization ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR city ILIKE $2)
              AND ($3::boolean IS NULL OR is_online = $3)
            ORDER BY rating DESC, total_reviews DESC, name
            "#,
        )
        .bind(&filter.specialization)
        .bind(&filter.city)
        .bind(filter.online)
        .fetch_all(&self.pool)
        .await?;
        Ok(pandits)
    }

    /// Every pandit, verified or not. Admin listing.
    pub async fn list_all_pandits(&self) -> Result<Vec<Pandit>, ServiceError> {
        let pandits =
            sqlx::query_as::<_, Pandit>("SELECT * FROM pandits ORDER BY created_utc DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(pandits)
    }

    pub async fn set_pandit_online(
        &self,
        pandit_id: Uuid,
        is_online: bool,
    ) -> Result<Pandit, ServiceError> {
        sqlx::query_as::<_, Pandit>(
            "UPDATE pandits SET is_online = $2, updated_utc = NOW() WHERE pandit_id = $1 RETURNING *",
        )
        .bind(pandit_id)
        .bind(is_online)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Pandit"))
    }

    pub async fn set_pandit_verified(
        &self,
        pandit_id: Uuid,
        is_verified: bool,
    ) -> Result<Pandit, ServiceError> {
        sqlx::query_as::<_, Pandit>(
            "UPDATE pandits SET is_verified = $2, updated_utc = NOW() WHERE pandit_id = $1 RETURNING *",
        )
        .bind(pandit_id)
        .bind(is_verified)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Pandit"))
    }

    pub async fn update_pandit_profile(
        &self,
        pandit_id: Uuid,
        update: &PanditProfileUpdate,
    ) -> Result<Pandit, ServiceError> {
        sqlx::query_as::<_, Pandit>(
            r#"
            UPDATE pandits
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                specialization = COALESCE($4, specialization),
                experience_years = COALESCE($5, experience_years),
                languages = COALESCE($6, languages),
                city = COALESCE($7, city),
                bio = COALESCE($8, bio),
                updated_utc = NOW()
            WHERE pandit_id = $1
            RETURNING *
            "#,
        )
        .bind(pandit_id)
        .bind(&update.name)
        .bind(&update.phone)
        .bind(&update.specialization)
        .bind(update.experience_years)
        .bind(&update.languages)
        .bind(&update.city)
        .bind(&update.bio)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Pandit"))
    }
}
