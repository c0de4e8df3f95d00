use uuid::Uuid;

use super::{BookingScope, Database};
use crate::models::{DoshaBooking, EpujaBooking, ServiceBookingStatus};
use crate::services::ServiceError;

impl Database {
    // ==================== Dosha bookings ====================

    pub async fn insert_dosha_booking(&self, b: &DoshaBooking) -> Result<(), ServiceError> {
        sqlx::query(
            r#"
            INSERT INTO dosha_bookings (dosha_booking_id, user_id, pandit_id, dosha_id, tier_name,
                                        amount, full_name, birth_date, birth_time, birth_place,
                                        gotra, family_members, preferred_date, status,
                                        payment_status, notes, created_utc, updated_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(b.dosha_booking_id)
        .bind(b.user_id)
        .bind(b.pandit_id)
        .bind(b.dosha_id)
        .bind(&b.tier_name)
        .bind(b.amount)
        .bind(&b.full_name)
        .bind(b.birth_date)
        .bind(b.birth_time)
        .bind(&b.birth_place)
        .bind(&b.gotra)
        .bind(&b.family_members)
        .bind(b.preferred_date)
        .bind(&b.status)
        .bind(&b.payment_status)
        .bind(&b.notes)
        .bind(b.created_utc)
        .bind(b.updated_utc)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_dosha_booking(&self, id: Uuid) -> Result<Option<DoshaBooking>, ServiceError> {
        let booking = sqlx::query_as::<_, DoshaBooking>(
            "SELECT * FROM dosha_bookings WHERE dosha_booking_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    pub async fn list_dosha_bookings(
        &self,
        scope: BookingScope,
    ) -> Result<Vec<DoshaBooking>, ServiceError> {
        let (user_id, pandit_id) = scope.ids();
        let bookings = sqlx::query_as::<_, DoshaBooking>(
            r#"
            SELECT * FROM dosha_bookings
            WHERE ($1::uuid IS NULL OR user_id = $1) AND ($2::uuid IS NULL OR pandit_id = $2)
            ORDER BY created_utc DESC
            "#,
        )
        .bind(user_id)
        .bind(pandit_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    pub async fn update_dosha_booking(
        &self,
        id: Uuid,
        status: ServiceBookingStatus,
        pandit_id: Option<Uuid>,
    ) -> Result<DoshaBooking, ServiceError> {
        sqlx::query_as::<_, DoshaBooking>(
            r#"
            UPDATE dosha_bookings
            SET status = $2, pandit_id = COALESCE($3, pandit_id), updated_utc = NOW()
            WHERE dosha_booking_id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(pandit_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Dosha booking"))
    }

    // ==================== E-puja bookings ====================

    pub async fn insert_epuja_booking(&self, b: &EpujaBooking) -> Result<(), ServiceError> {
        sqlx::query(
            r#"
            INSERT INTO epuja_bookings (epuja_booking_id, user_id, pandit_id, epuja_id, tier_name,
                                        amount, devotee_name, gotra, sankalp_details,
                                        family_members, preferred_date, shipping_address,
                                        status, payment_status, video_link,
                                        created_utc, updated_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(b.epuja_booking_id)
        .bind(b.user_id)
        .bind(b.pandit_id)
        .bind(b.epuja_id)
        .bind(&b.tier_name)
        .bind(b.amount)
        .bind(&b.devotee_name)
        .bind(&b.gotra)
        .bind(&b.sankalp_details)
        .bind(&b.family_members)
        .bind(b.preferred_date)
        .bind(&b.shipping_address)
        .bind(&b.status)
        .bind(&b.payment_status)
        .bind(&b.video_link)
        .bind(b.created_utc)
        .bind(b.updated_utc)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_epuja_booking(&self, id: Uuid) -> Result<Option<EpujaBooking>, ServiceError> {
        let booking = sqlx::query_as::<_, EpujaBooking>(
            "SELECT * FROM epuja_bookings WHERE epuja_booking_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    pub async fn list_epuja_bookings(
        &self,
        scope: BookingScope,
    ) -> Result<Vec<EpujaBooking>, ServiceError> {
        let (user_id, pandit_id) = scope.ids();
        let bookings = sqlx::query_as::<_, EpujaBooking>(
            r#"
            SELECT * FROM epuja_bookings
            WHERE ($1::uuid IS NULL OR user_id = $1) AND ($2::uuid IS NULL OR pandit_id = $2)
            ORDER BY created_utc DESC
            "#,
        )
        .bind(user_id)
        .bind(pandit_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    /// `video_link` is kept when `None`.
    pub async fn update_epuja_booking(
        &self,
        id: Uuid,
        status: ServiceBookingStatus,
        pandit_id: Option<Uuid>,
        video_link: Option<&str>,
    ) -> Result<EpujaBooking, ServiceError> {
        sqlx::query_as::<_, EpujaBooking>(
            r#"
            UPDATE epuja_bookings
            SET status = $2, pandit_id = COALESCE($3, pandit_id),
                video_link = COALESCE($4, video_link), updated_utc = NOW()
            WHERE epuja_booking_id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(pandit_id)
        .bind(video_link)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("E-puja booking"))
    }
}

