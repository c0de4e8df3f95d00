use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DomainError;
use crate::models::{Booking, BookingStatus, PaymentStatus, RefundStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Advance,
    Remaining,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Advance => "advance",
            PaymentType::Remaining => "remaining",
        }
    }
}

fn ensure_payable(booking: &Booking) -> Result<(), DomainError> {
    match booking.status() {
        status @ (BookingStatus::Cancelled | BookingStatus::Rejected) => Err(
            DomainError::Conflict(format!("Cannot take payment for a {} booking", status)),
        ),
        _ => Ok(()),
    }
}

/// Amount still due for the requested portion of a booking.
pub fn payment_amount(booking: &Booking, kind: PaymentType) -> Result<Decimal, DomainError> {
    ensure_payable(booking)?;

    match kind {
        PaymentType::Advance if booking.advance_paid => Err(DomainError::Conflict(
            "Advance payment has already been made".to_string(),
        )),
        PaymentType::Advance => Ok(booking.advance_amount),
        PaymentType::Remaining if !booking.advance_paid => Err(DomainError::Conflict(
            "Advance payment must be completed first".to_string(),
        )),
        PaymentType::Remaining if booking.remaining_paid => Err(DomainError::Conflict(
            "Remaining payment has already been made".to_string(),
        )),
        PaymentType::Remaining => Ok(booking.remaining_amount),
    }
}

/// Converts rupees to paise for the gateway.
pub fn to_minor_units(amount: Decimal) -> Result<u64, DomainError> {
    (amount * Decimal::ONE_HUNDRED)
        .round()
        .to_u64()
        .filter(|paise| *paise > 0)
        .ok_or_else(|| DomainError::InvalidAmount(format!("Invalid payment amount: {}", amount)))
}

/// A completed checkout must name the order last opened for the same
/// portion of a still-payable booking.
pub fn ensure_order_matches(
    booking: &Booking,
    kind: PaymentType,
    order_id: &str,
) -> Result<(), DomainError> {
    ensure_payable(booking)?;

    let recorded = booking
        .razorpay_order_id
        .as_deref()
        .zip(booking.razorpay_order_type.as_deref());
    match recorded {
        Some((id, portion)) if id == order_id && portion == kind.as_str() => Ok(()),
        _ => Err(DomainError::Conflict(format!(
            "Order does not match the {} payment for this booking",
            kind.as_str()
        ))),
    }
}

/// Payload the gateway signs when a checkout completes.
pub fn signature_payload(order_id: &str, payment_id: &str) -> String {
    format!("{}|{}", order_id, payment_id)
}

/// Only a pending `full` or `partial` refund can be sent to the gateway.
pub fn ensure_refundable(status: RefundStatus) -> Result<(), DomainError> {
    match status {
        RefundStatus::Full | RefundStatus::Partial => Ok(()),
        RefundStatus::None => Err(DomainError::Conflict(
            "No refund is due for this booking".to_string(),
        )),
        RefundStatus::Processed => Err(DomainError::Conflict(
            "Refund has already been processed".to_string(),
        )),
    }
}

/// Payment status after a reported checkout failure. A booking with any
/// captured portion keeps its current status.
pub fn status_after_failure(current: PaymentStatus, advance_paid: bool) -> PaymentStatus {
    if advance_paid {
        current
    } else {
        PaymentStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use uuid::Uuid;

    fn booking() -> Booking {
        let now = Utc::now();
        Booking {
            booking_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            pandit_id: None,
            ceremony_type: "griha-pravesh".to_string(),
            booking_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            booking_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            address: "12 MG Road".to_string(),
            notes: None,
            status: "pending".to_string(),
            payment_status: "pending".to_string(),
            total_amount: Decimal::from(2500),
            advance_amount: Decimal::new(62500, 2),
            remaining_amount: Decimal::new(187500, 2),
            advance_paid: false,
            remaining_paid: false,
            razorpay_order_id: None,
            razorpay_order_type: None,
            advance_payment_id: None,
            remaining_payment_id: None,
            refund_amount: Decimal::ZERO,
            refund_status: "none".to_string(),
            refund_id: None,
            cancelled_utc: None,
            cancellation_reason: None,
            created_utc: now,
            updated_utc: now,
        }
    }

    #[test]
    fn advance_then_remaining() {
        let mut b = booking();
        assert_eq!(
            payment_amount(&b, PaymentType::Advance).unwrap(),
            Decimal::new(62500, 2)
        );
        assert!(payment_amount(&b, PaymentType::Remaining).is_err());

        b.advance_paid = true;
        assert!(payment_amount(&b, PaymentType::Advance).is_err());
        assert_eq!(
            payment_amount(&b, PaymentType::Remaining).unwrap(),
            Decimal::new(187500, 2)
        );

        b.remaining_paid = true;
        assert!(payment_amount(&b, PaymentType::Remaining).is_err());
    }

    #[test]
    fn cancelled_bookings_take_no_payment() {
        let mut b = booking();
        b.status = "cancelled".to_string();
        assert!(matches!(
            payment_amount(&b, PaymentType::Advance),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn checkout_must_name_the_open_order_for_its_portion() {
        let mut b = booking();
        // Nothing recorded yet
        assert!(ensure_order_matches(&b, PaymentType::Advance, "order_a").is_err());

        b.razorpay_order_id = Some("order_a".to_string());
        b.razorpay_order_type = Some("advance".to_string());
        assert!(ensure_order_matches(&b, PaymentType::Advance, "order_a").is_ok());
        assert!(ensure_order_matches(&b, PaymentType::Advance, "order_b").is_err());
        // An advance order cannot settle the remaining portion
        assert!(ensure_order_matches(&b, PaymentType::Remaining, "order_a").is_err());
    }

    #[test]
    fn checkout_after_cancellation_is_refused() {
        let mut b = booking();
        b.razorpay_order_id = Some("order_a".to_string());
        b.razorpay_order_type = Some("advance".to_string());

        for status in ["cancelled", "rejected"] {
            b.status = status.to_string();
            assert!(matches!(
                ensure_order_matches(&b, PaymentType::Advance, "order_a"),
                Err(DomainError::Conflict(_))
            ));
        }
    }

    #[test]
    fn minor_units_are_paise() {
        assert_eq!(to_minor_units(Decimal::new(62500, 2)).unwrap(), 62500);
        assert_eq!(to_minor_units(Decimal::new(31250, 2)).unwrap(), 31250);
        assert!(to_minor_units(Decimal::ZERO).is_err());
        assert!(to_minor_units(Decimal::from(-5)).is_err());
    }

    #[test]
    fn signature_payload_joins_ids_with_pipe() {
        assert_eq!(signature_payload("order_1", "pay_1"), "order_1|pay_1");
    }

    #[test]
    fn refundable_states() {
        assert!(ensure_refundable(RefundStatus::Full).is_ok());
        assert!(ensure_refundable(RefundStatus::Partial).is_ok());
        assert!(ensure_refundable(RefundStatus::None).is_err());
        assert!(ensure_refundable(RefundStatus::Processed).is_err());
    }

    #[test]
    fn failure_keeps_captured_payments() {
        assert_eq!(
            status_after_failure(PaymentStatus::Pending, false),
            PaymentStatus::Failed
        );
        assert_eq!(
            status_after_failure(PaymentStatus::AdvancePaid, true),
            PaymentStatus::AdvancePaid
        );
    }
}
