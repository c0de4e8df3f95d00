use chrono::{NaiveDate, NaiveTime};
use sqlx::PgExecutor;
use uuid::Uuid;

use super::Database;
use crate::models::{AvailabilitySlot, SlotType};
use crate::services::ServiceError;

/// Frees every slot held by a booking.
pub(super) const RELEASE_BOOKING_SLOTS: &str = r#"
    UPDATE pandit_availability
    SET is_available = TRUE, slot_type = 'available', booking_id = NULL, updated_utc = NOW()
    WHERE booking_id = $1
"#;

pub(super) async fn insert_slot_with<'e, E>(
    executor: E,
    slot: &AvailabilitySlot,
) -> Result<AvailabilitySlot, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, AvailabilitySlot>(
        r#"
        INSERT INTO pandit_availability (slot_id, pandit_id, slot_date, start_time, end_time,
                                         is_available, slot_type, booking_id, notes,
                                         created_utc, updated_utc)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(slot.slot_id)
    .bind(slot.pandit_id)
    .bind(slot.slot_date)
    .bind(slot.start_time)
    .bind(slot.end_time)
    .bind(slot.is_available)
    .bind(&slot.slot_type)
    .bind(slot.booking_id)
    .bind(&slot.notes)
    .bind(slot.created_utc)
    .bind(slot.updated_utc)
    .fetch_one(executor)
    .await
}

impl Database {
    pub async fn insert_slot(&self, slot: &AvailabilitySlot) -> Result<AvailabilitySlot, ServiceError> {
        Ok(insert_slot_with(&self.pool, slot).await?)
    }

    pub async fn find_slot(&self, slot_id: Uuid) -> Result<Option<AvailabilitySlot>, ServiceError> {
        let slot = sqlx::query_as::<_, AvailabilitySlot>(
            "SELECT * FROM pandit_availability WHERE slot_id = $1",
        )
        .bind(slot_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(slot)
    }

    /// All of a pandit's slots on `date`, optionally skipping one.
    pub async fn slots_on_date(
        &self,
        pandit_id: Uuid,
        date: NaiveDate,
        exclude: Option<Uuid>,
    ) -> Result<Vec<AvailabilitySlot>, ServiceError> {
        let slots = sqlx::query_as::<_, AvailabilitySlot>(
            r#"
            SELECT * FROM pandit_availability
            WHERE pandit_id = $1 AND slot_date = $2 AND ($3::uuid IS NULL OR slot_id <> $3)
            ORDER BY start_time
            "#,
        )
        .bind(pandit_id)
        .bind(date)
        .bind(exclude)
        .fetch_all(&self.pool)
        .await?;
        Ok(slots)
    }

    pub async fn list_slots(
        &self,
        pandit_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AvailabilitySlot>, ServiceError> {
        let slots = sqlx::query_as::<_, AvailabilitySlot>(
            r#"
            SELECT * FROM pandit_availability
            WHERE pandit_id = $1
              AND ($2::date IS NULL OR slot_date >= $2)
              AND ($3::date IS NULL OR slot_date <= $3)
            ORDER BY slot_date, start_time
            "#,
        )
        .bind(pandit_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(slots)
    }

    /// Open slots from `from_date` on, for the public pandit calendar.
    pub async fn list_open_slots(
        &self,
        pandit_id: Uuid,
        from_date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, ServiceError> {
        let slots = sqlx::query_as::<_, AvailabilitySlot>(
            r#"
            SELECT * FROM pandit_availability
            WHERE pandit_id = $1 AND slot_date >= $2
              AND is_available = TRUE AND slot_type = 'available'
            ORDER BY slot_date, start_time
            "#,
        )
        .bind(pandit_id)
        .bind(from_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(slots)
    }

    /// Slots of verified pandits on `date`, plus slots from the day before
    /// that run past midnight into it.
    pub async fn verified_slots_on_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, ServiceError> {
        let slots = sqlx::query_as::<_, AvailabilitySlot>(
            r#"
            SELECT a.* FROM pandit_availability a
            JOIN pandits p ON p.pandit_id = a.pandit_id
            WHERE p.is_verified = TRUE
              AND (a.slot_date = $1
                   OR (a.slot_date = $1::date - 1 AND a.end_time <= a.start_time))
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(slots)
    }

    pub async fn update_slot(
        &self,
        slot_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        slot_type: SlotType,
        notes: Option<&str>,
    ) -> Result<AvailabilitySlot, ServiceError> {
        sqlx::query_as::<_, AvailabilitySlot>(
            r#"
            UPDATE pandit_availability
            SET slot_date = $2, start_time = $3, end_time = $4,
                slot_type = $5, is_available = $6, notes = COALESCE($7, notes),
                updated_utc = NOW()
            WHERE slot_id = $1 AND slot_type <> 'booked'
            RETURNING *
            "#,
        )
        .bind(slot_id)
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .bind(slot_type.as_str())
        .bind(slot_type == SlotType::Available)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::Conflict("Booked slots cannot be modified".to_string()))
    }

    pub async fn delete_slot(&self, slot_id: Uuid) -> Result<(), ServiceError> {
        let result = sqlx::query(
            "DELETE FROM pandit_availability WHERE slot_id = $1 AND slot_type <> 'booked'",
        )
        .bind(slot_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::Conflict(
                "Booked slots cannot be deleted".to_string(),
            ));
        }
        Ok(())
    }
}
