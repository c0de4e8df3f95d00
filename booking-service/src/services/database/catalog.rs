use uuid::Uuid;

use super::Database;
use crate::models::{Ceremony, Dosha, Epuja};
use crate::services::ServiceError;

impl Database {
    // ==================== Ceremonies ====================

    pub async fn list_active_ceremonies(&self) -> Result<Vec<Ceremony>, ServiceError> {
        let ceremonies = sqlx::query_as::<_, Ceremony>(
            "SELECT * FROM ceremonies WHERE is_active = TRUE ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(ceremonies)
    }

    pub async fn find_ceremony_by_id(&self, id: Uuid) -> Result<Option<Ceremony>, ServiceError> {
        let ceremony =
            sqlx::query_as::<_, Ceremony>("SELECT * FROM ceremonies WHERE ceremony_id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(ceremony)
    }

    pub async fn find_ceremony_by_slug(&self, slug: &str) -> Result<Option<Ceremony>, ServiceError> {
        let ceremony = sqlx::query_as::<_, Ceremony>(
            "SELECT * FROM ceremonies WHERE slug = $1 AND is_active = TRUE",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(ceremony)
    }

    /// Resolves the free-text ceremony type a booking carries: slug first,
    /// then title. Both compare trimmed and case-insensitively.
    pub async fn find_ceremony_for_type(
        &self,
        ceremony_type: &str,
    ) -> Result<Option<Ceremony>, ServiceError> {
        let ceremony = sqlx::query_as::<_, Ceremony>(
            r#"
            SELECT * FROM ceremonies
            WHERE is_active = TRUE AND (LOWER(slug) = LOWER($1) OR LOWER(title) = LOWER($1))
            ORDER BY (LOWER(slug) = LOWER($1)) DESC
            LIMIT 1
            "#,
        )
        .bind(ceremony_type.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(ceremony)
    }

    /// Inserts or fully rewrites a ceremony row.
    pub async fn save_ceremony(&self, c: &Ceremony) -> Result<Ceremony, ServiceError> {
        sqlx::query_as::<_, Ceremony>(
            r#"
            INSERT INTO ceremonies (ceremony_id, slug, title, description, samagri, process_steps,
                                    base_price, duration_minutes, image_url, videos, reviews,
                                    translations, is_active, created_utc, updated_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (ceremony_id) DO UPDATE SET
                slug = EXCLUDED.slug,
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                samagri = EXCLUDED.samagri,
                process_steps = EXCLUDED.process_steps,
                base_price = EXCLUDED.base_price,
                duration_minutes = EXCLUDED.duration_minutes,
                image_url = EXCLUDED.image_url,
                videos = EXCLUDED.videos,
                reviews = EXCLUDED.reviews,
                translations = EXCLUDED.translations,
                is_active = EXCLUDED.is_active,
                updated_utc = EXCLUDED.updated_utc
            RETURNING *
            "#,
        )
        .bind(c.ceremony_id)
        .bind(&c.slug)
        .bind(&c.title)
        .bind(&c.description)
        .bind(&c.samagri)
        .bind(&c.process_steps)
        .bind(c.base_price)
        .bind(c.duration_minutes)
        .bind(&c.image_url)
        .bind(&c.videos)
        .bind(&c.reviews)
        .bind(&c.translations)
        .bind(c.is_active)
        .bind(c.created_utc)
        .bind(c.updated_utc)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ServiceError::on_unique_violation(e, "A ceremony with this slug already exists"))
    }

    /// Soft delete; past bookings keep referring to the ceremony by name.
    pub async fn deactivate_ceremony(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = sqlx::query(
            "UPDATE ceremonies SET is_active = FALSE, updated_utc = NOW() WHERE ceremony_id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Ceremony"));
        }
        Ok(())
    }

    // ==================== Doshas ====================

    pub async fn list_active_doshas(&self) -> Result<Vec<Dosha>, ServiceError> {
        let doshas =
            sqlx::query_as::<_, Dosha>("SELECT * FROM doshas WHERE is_active = TRUE ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(doshas)
    }

    pub async fn find_dosha_by_id(&self, id: Uuid) -> Result<Option<Dosha>, ServiceError> {
        let dosha = sqlx::query_as::<_, Dosha>("SELECT * FROM doshas WHERE dosha_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(dosha)
    }

    pub async fn find_dosha_by_slug(&self, slug: &str) -> Result<Option<Dosha>, ServiceError> {
        let dosha = sqlx::query_as::<_, Dosha>(
            "SELECT * FROM doshas WHERE slug = $1 AND is_active = TRUE",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(dosha)
    }

    pub async fn save_dosha(&self, d: &Dosha) -> Result<Dosha, ServiceError> {
        sqlx::query_as::<_, Dosha>(
            r#"
            INSERT INTO doshas (dosha_id, slug, name, description, benefits, pricing_tiers,
                                translations, image_url, is_active, created_utc, updated_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (dosha_id) DO UPDATE SET
                slug = EXCLUDED.slug,
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                benefits = EXCLUDED.benefits,
                pricing_tiers = EXCLUDED.pricing_tiers,
                translations = EXCLUDED.translations,
                image_url = EXCLUDED.image_url,
                is_active = EXCLUDED.is_active,
                updated_utc = EXCLUDED.updated_utc
            RETURNING *
            "#,
        )
        .bind(d.dosha_id)
        .bind(&d.slug)
        .bind(&d.name)
        .bind(&d.description)
        .bind(&d.benefits)
        .bind(&d.pricing_tiers)
        .bind(&d.translations)
        .bind(&d.image_url)
        .bind(d.is_active)
        .bind(d.created_utc)
        .bind(d.updated_utc)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ServiceError::on_unique_violation(e, "A dosha with this slug already exists"))
    }

    pub async fn deactivate_dosha(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = sqlx::query(
            "UPDATE doshas SET is_active = FALSE, updated_utc = NOW() WHERE dosha_id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Dosha"));
        }
        Ok(())
    }

    // ==================== E-pujas ====================

    pub async fn list_active_epujas(&self) -> Result<Vec<Epuja>, ServiceError> {
        let epujas =
            sqlx::query_as::<_, Epuja>("SELECT * FROM epujas WHERE is_active = TRUE ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(epujas)
    }

    pub async fn find_epuja_by_id(&self, id: Uuid) -> Result<Option<Epuja>, ServiceError> {
        let epuja = sqlx::query_as::<_, Epuja>("SELECT * FROM epujas WHERE epuja_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(epuja)
    }

    pub async fn find_epuja_by_slug(&self, slug: &str) -> Result<Option<Epuja>, ServiceError> {
        let epuja = sqlx::query_as::<_, Epuja>(
            "SELECT * FROM epujas WHERE slug = $1 AND is_active = TRUE",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(epuja)
    }

    pub async fn save_epuja(&self, e: &Epuja) -> Result<Epuja, ServiceError> {
        sqlx::query_as::<_, Epuja>(
            r#"
            INSERT INTO epujas (epuja_id, slug, name, description, benefits, pricing_tiers,
                                translations, image_url, temple, deity, duration_minutes,
                                is_active, created_utc, updated_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (epuja_id) DO UPDATE SET
                slug = EXCLUDED.slug,
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                benefits = EXCLUDED.benefits,
                pricing_tiers = EXCLUDED.pricing_tiers,
                translations = EXCLUDED.translations,
                image_url = EXCLUDED.image_url,
                temple = EXCLUDED.temple,
                deity = EXCLUDED.deity,
                duration_minutes = EXCLUDED.duration_minutes,
                is_active = EXCLUDED.is_active,
                updated_utc = EXCLUDED.updated_utc
            RETURNING *
            "#,
        )
        .bind(e.epuja_id)
        .bind(&e.slug)
        .bind(&e.name)
        .bind(&e.description)
        .bind(&e.benefits)
        .bind(&e.pricing_tiers)
        .bind(&e.translations)
        .bind(&e.image_url)
        .bind(&e.temple)
        .bind(&e.deity)
        .bind(e.duration_minutes)
        .bind(e.is_active)
        .bind(e.created_utc)
        .bind(e.updated_utc)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            ServiceError::on_unique_violation(err, "An e-puja with this slug already exists")
        })
    }

    pub async fn deactivate_epuja(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = sqlx::query(
            "UPDATE epujas SET is_active = FALSE, updated_utc = NOW() WHERE epuja_id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("E-puja"));
        }
        Ok(())
    }
}
