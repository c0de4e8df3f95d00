use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use super::{round_money, DomainError};
use crate::models::{BookingStatus, RefundStatus};

/// Cancellations at least this far ahead get the whole advance back.
pub const FULL_REFUND_NOTICE_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundDecision {
    pub amount: Decimal,
    pub status: RefundStatus,
}

/// Refund owed when a booking is cancelled at `now`.
///
/// Only the advance is ever refunded: all of it with at least 24 hours'
/// notice, half of it otherwise (including after the start time).
pub fn compute_refund(
    advance_paid: bool,
    advance_amount: Decimal,
    ceremony_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> RefundDecision {
    if !advance_paid {
        return RefundDecision {
            amount: Decimal::ZERO,
            status: RefundStatus::None,
        };
    }

    if ceremony_at - now >= Duration::hours(FULL_REFUND_NOTICE_HOURS) {
        RefundDecision {
            amount: advance_amount,
            status: RefundStatus::Full,
        }
    } else {
        RefundDecision {
            amount: round_money(advance_amount * Decimal::new(5, 1)),
            status: RefundStatus::Partial,
        }
    }
}

pub fn ensure_cancellable(status: BookingStatus) -> Result<(), DomainError> {
    match status {
        BookingStatus::Cancelled => Err(DomainError::Conflict(
            "Booking is already cancelled".to_string(),
        )),
        BookingStatus::Completed => Err(DomainError::Conflict(
            "Completed bookings cannot be cancelled".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, h, 0, 0).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn thirty_hours_notice_refunds_everything() {
        let ceremony = at(18);
        let now = ceremony - Duration::hours(30);
        let decision = compute_refund(true, dec("625"), ceremony, now);
        assert_eq!(decision.status, RefundStatus::Full);
        assert_eq!(decision.amount, dec("625.00"));
    }

    #[test]
    fn ten_hours_notice_refunds_half() {
        let ceremony = at(18);
        let now = ceremony - Duration::hours(10);
        let decision = compute_refund(true, dec("625"), ceremony, now);
        assert_eq!(decision.status, RefundStatus::Partial);
        assert_eq!(decision.amount, dec("312.50"));
    }

    #[test]
    fn exactly_24_hours_is_full() {
        let ceremony = at(18);
        let decision = compute_refund(true, dec("100"), ceremony, ceremony - Duration::hours(24));
        assert_eq!(decision.status, RefundStatus::Full);

        let just_inside = ceremony - Duration::hours(24) + Duration::seconds(1);
        let decision = compute_refund(true, dec("100"), ceremony, just_inside);
        assert_eq!(decision.status, RefundStatus::Partial);
    }

    #[test]
    fn past_ceremony_is_partial() {
        let ceremony = at(6);
        let decision = compute_refund(true, dec("100.01"), ceremony, at(9));
        assert_eq!(decision.status, RefundStatus::Partial);
        assert_eq!(decision.amount, dec("50.01"));
    }

    #[test]
    fn unpaid_advance_refunds_nothing() {
        let ceremony = at(18);
        let decision = compute_refund(false, dec("625"), ceremony, ceremony - Duration::days(5));
        assert_eq!(decision.status, RefundStatus::None);
        assert_eq!(decision.amount, Decimal::ZERO);
    }

    #[test]
    fn terminal_bookings_cannot_be_cancelled() {
        assert!(ensure_cancellable(BookingStatus::Cancelled).is_err());
        assert!(ensure_cancellable(BookingStatus::Completed).is_err());
        assert!(ensure_cancellable(BookingStatus::Pending).is_ok());
        assert!(ensure_cancellable(BookingStatus::Accepted).is_ok());
    }
}
