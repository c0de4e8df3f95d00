use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::availability::{insert_slot_with, RELEASE_BOOKING_SLOTS};
use super::Database;
use crate::domain::assignment::{ensure_slot_assignable, synthesized_slot};
use crate::domain::lifecycle::Transition;
use crate::domain::payment::PaymentType;
use crate::domain::refund::{compute_refund, ensure_cancellable, RefundDecision};
use crate::models::{
    AvailabilitySlot, Booking, BookingStatus, BookingView, PaymentStatus, SlotType,
};
use crate::services::ServiceError;

const BOOKING_VIEW_SELECT: &str = r#"
    SELECT b.*,
           u.name AS user_name, u.email AS user_email, u.phone AS user_phone,
           p.name AS pandit_name, p.phone AS pandit_phone
    FROM bookings b
    LEFT JOIN users u ON u.user_id = b.user_id
    LEFT JOIN pandits p ON p.pandit_id = b.pandit_id
"#;

/// Which bookings a principal may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingScope {
    All,
    User(Uuid),
    Pandit(Uuid),
}

impl BookingScope {
    /// `(user_id, pandit_id)` filter values.
    pub(super) fn ids(self) -> (Option<Uuid>, Option<Uuid>) {
        match self {
            BookingScope::All => (None, None),
            BookingScope::User(id) => (Some(id), None),
            BookingScope::Pandit(id) => (None, Some(id)),
        }
    }
}

/// A verified checkout for one portion of a booking.
#[derive(Debug, Clone, Copy)]
pub struct PaymentCapture<'a> {
    pub kind: PaymentType,
    pub order_id: &'a str,
    pub payment_id: &'a str,
}

impl Database {
    pub async fn insert_booking(&self, booking: &Booking) -> Result<(), ServiceError> {
        sqlx::query(
            r#"
            INSERT INTO bookings (booking_id, user_id, pandit_id, ceremony_type, booking_date,
                                  booking_time, address, notes, status, payment_status,
                                  total_amount, advance_amount, remaining_amount,
                                  advance_paid, remaining_paid, refund_amount, refund_status,
                                  created_utc, updated_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(booking.booking_id)
        .bind(booking.user_id)
        .bind(booking.pandit_id)
        .bind(&booking.ceremony_type)
        .bind(booking.booking_date)
        .bind(booking.booking_time)
        .bind(&booking.address)
        .bind(&booking.notes)
        .bind(&booking.status)
        .bind(&booking.payment_status)
        .bind(booking.total_amount)
        .bind(booking.advance_amount)
        .bind(booking.remaining_amount)
        .bind(booking.advance_paid)
        .bind(booking.remaining_paid)
        .bind(booking.refund_amount)
        .bind(&booking.refund_status)
        .bind(booking.created_utc)
        .bind(booking.updated_utc)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_booking_by_id(&self, booking_id: Uuid) -> Result<Option<Booking>, ServiceError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE booking_id = $1")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(booking)
    }

    pub async fn find_booking_view(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<BookingView>, ServiceError> {
        let query = format!("{} WHERE b.booking_id = $1", BOOKING_VIEW_SELECT);
        let view = sqlx::query_as::<_, BookingView>(&query)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(view)
    }

    pub async fn list_bookings(
        &self,
        scope: BookingScope,
        status: Option<BookingStatus>,
    ) -> Result<Vec<BookingView>, ServiceError> {
        let (user_id, pandit_id) = scope.ids();
        let query = format!(
            r#"{}
            WHERE ($1::uuid IS NULL OR b.user_id = $1)
              AND ($2::uuid IS NULL OR b.pandit_id = $2)
              AND ($3::text IS NULL OR b.status = $3)
            ORDER BY b.booking_date DESC, b.booking_time DESC
            "#,
            BOOKING_VIEW_SELECT
        );

        let bookings = sqlx::query_as::<_, BookingView>(&query)
            .bind(user_id)
            .bind(pandit_id)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }

    /// Applies a validated transition, provided the booking is still in
    /// `expected` state.
    pub async fn update_booking_status(
        &self,
        booking_id: Uuid,
        expected: BookingStatus,
        transition: Transition,
    ) -> Result<Booking, ServiceError> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $2, payment_status = COALESCE($3, payment_status), updated_utc = NOW()
            WHERE booking_id = $1 AND status = $4
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(transition.status.as_str())
        .bind(transition.payment_status.map(|s| s.as_str()))
        .bind(expected.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            ServiceError::Conflict("Booking status changed, please retry".to_string())
        })
    }

    /// Cancels a booking, records the refund owed and frees its slot, all in
    /// one transaction. `authorize` runs against the locked row.
    pub async fn cancel_booking<F>(
        &self,
        booking_id: Uuid,
        reason: Option<&str>,
        now: DateTime<Utc>,
        authorize: F,
    ) -> Result<(Booking, RefundDecision), ServiceError>
    where
        F: FnOnce(&Booking) -> Result<(), ServiceError>,
    {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE booking_id = $1 FOR UPDATE",
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::NotFound("Booking"))?;

        authorize(&booking)?;
        ensure_cancellable(booking.status())?;

        let refund = compute_refund(
            booking.advance_paid,
            booking.advance_amount,
            booking.ceremony_at(),
            now,
        );

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'cancelled', refund_amount = $2, refund_status = $3,
                cancelled_utc = $4, cancellation_reason = $5, updated_utc = $4
            WHERE booking_id = $1
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(refund.amount)
        .bind(refund.status.as_str())
        .bind(now)
        .bind(reason)
        .fetch_one(&mut *tx)
        .await?;

        let released = sqlx::query(RELEASE_BOOKING_SLOTS)
            .bind(booking_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        tracing::info!(
            booking_id = %booking_id,
            refund_status = %refund.status.as_str(),
            refund_amount = %refund.amount,
            released_slots = released,
            "Booking cancelled"
        );

        Ok((booking, refund))
    }

    /// Assigns a pandit and books a slot for the booking in one transaction.
    ///
    /// With `slot_id` the chosen slot must belong to the pandit and be open;
    /// without it a two-hour slot is created at the booking time. Any slot
    /// previously held by the booking is released and the booking goes back
    /// to `pending` for the pandit to accept.
    pub async fn assign_pandit(
        &self,
        booking_id: Uuid,
        pandit_id: Uuid,
        slot_id: Option<Uuid>,
    ) -> Result<(Booking, AvailabilitySlot), ServiceError> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE booking_id = $1 FOR UPDATE",
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::NotFound("Booking"))?;

        if matches!(
            booking.status(),
            BookingStatus::Cancelled | BookingStatus::Completed
        ) {
            return Err(ServiceError::Conflict(format!(
                "Cannot assign a pandit to a {} booking",
                booking.status()
            )));
        }

        sqlx::query_as::<_, (Uuid,)>("SELECT pandit_id FROM pandits WHERE pandit_id = $1")
            .bind(pandit_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ServiceError::NotFound("Pandit"))?;

        sqlx::query(RELEASE_BOOKING_SLOTS)
            .bind(booking_id)
            .execute(&mut *tx)
            .await?;

        let slot = match slot_id {
            Some(slot_id) => {
                let slot = sqlx::query_as::<_, AvailabilitySlot>(
                    "SELECT * FROM pandit_availability WHERE slot_id = $1 FOR UPDATE",
                )
                .bind(slot_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(ServiceError::NotFound("Availability slot"))?;

                ensure_slot_assignable(&slot, pandit_id)?;

                sqlx::query_as::<_, AvailabilitySlot>(
                    r#"
                    UPDATE pandit_availability
                    SET is_available = FALSE, slot_type = 'booked', booking_id = $2, updated_utc = NOW()
                    WHERE slot_id = $1
                    RETURNING *
                    "#,
                )
                .bind(slot_id)
                .bind(booking_id)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                let (start, end) = synthesized_slot(booking.booking_time);
                let mut slot = AvailabilitySlot::new(
                    pandit_id,
                    booking.booking_date,
                    start,
                    end,
                    SlotType::Booked,
                    Some("Created on assignment".to_string()),
                );
                slot.booking_id = Some(booking_id);
                insert_slot_with(&mut *tx, &slot).await?
            }
        };

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET pandit_id = $2, status = 'pending', updated_utc = NOW()
            WHERE booking_id = $1
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(pandit_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            booking_id = %booking_id,
            pandit_id = %pandit_id,
            slot_id = %slot.slot_id,
            "Pandit assigned"
        );

        Ok((booking, slot))
    }

    /// Opens `order_id` as the order for one portion, replacing any earlier one.
    pub async fn record_order(
        &self,
        booking_id: Uuid,
        order_id: &str,
        kind: PaymentType,
    ) -> Result<(), ServiceError> {
        sqlx::query(
            r#"
            UPDATE bookings
            SET razorpay_order_id = $2, razorpay_order_type = $3, updated_utc = NOW()
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .bind(order_id)
        .bind(kind.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Records a verified payment against the open order for its portion.
    /// Each portion can be captured once, and never on a cancelled or
    /// rejected booking. Capturing closes the order.
    pub async fn capture_payment(
        &self,
        booking_id: Uuid,
        capture: PaymentCapture<'_>,
    ) -> Result<Booking, ServiceError> {
        let (query, already) = match capture.kind {
            PaymentType::Advance => (
                r#"
                UPDATE bookings
                SET advance_paid = TRUE, advance_payment_id = $2,
                    payment_status = 'advance_paid',
                    razorpay_order_id = NULL, razorpay_order_type = NULL,
                    updated_utc = NOW()
                WHERE booking_id = $1 AND advance_paid = FALSE
                  AND razorpay_order_id = $3 AND razorpay_order_type = 'advance'
                  AND status NOT IN ('cancelled', 'rejected')
                RETURNING *
                "#,
                "Advance payment cannot be recorded for this booking",
            ),
            PaymentType::Remaining => (
                r#"
                UPDATE bookings
                SET remaining_paid = TRUE, remaining_payment_id = $2,
                    payment_status = 'paid',
                    razorpay_order_id = NULL, razorpay_order_type = NULL,
                    updated_utc = NOW()
                WHERE booking_id = $1 AND advance_paid = TRUE AND remaining_paid = FALSE
                  AND razorpay_order_id = $3 AND razorpay_order_type = 'remaining'
                  AND status NOT IN ('cancelled', 'rejected')
                RETURNING *
                "#,
                "Remaining payment cannot be recorded for this booking",
            ),
        };

        sqlx::query_as::<_, Booking>(query)
            .bind(booking_id)
            .bind(capture.payment_id)
            .bind(capture.order_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::Conflict(already.to_string()))
    }

    pub async fn set_payment_status(
        &self,
        booking_id: Uuid,
        status: PaymentStatus,
    ) -> Result<(), ServiceError> {
        sqlx::query(
            "UPDATE bookings SET payment_status = $2, updated_utc = NOW() WHERE booking_id = $1",
        )
        .bind(booking_id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Marks a pending refund as sent to the gateway.
    pub async fn mark_refund_processed(
        &self,
        booking_id: Uuid,
        refund_id: &str,
    ) -> Result<Booking, ServiceError> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET refund_status = 'processed', payment_status = 'refunded',
                refund_id = $2, updated_utc = NOW()
            WHERE booking_id = $1 AND refund_status IN ('full', 'partial')
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(refund_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::Conflict("Refund has already been processed".to_string()))
    }
}
