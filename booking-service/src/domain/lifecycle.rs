use uuid::Uuid;

use super::DomainError;
use crate::models::{BookingStatus, PaymentStatus, Role};

/// Result of an accepted status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub status: BookingStatus,
    /// Set when the change also settles the payment status.
    pub payment_status: Option<PaymentStatus>,
}

/// Validates a status change requested through the status endpoint.
///
/// ```text
/// pending  -> accepted | rejected   (pandit, admin)
/// accepted -> completed             (pandit, admin)
/// ```
///
/// Cancellation goes through the cancel flow and is refused here.
pub fn transition(
    current: BookingStatus,
    requested: BookingStatus,
    actor: Role,
    advance_paid: bool,
) -> Result<Transition, DomainError> {
    if !matches!(actor, Role::Pandit | Role::Admin) {
        return Err(DomainError::Forbidden(
            "Only pandits and admins can update booking status".to_string(),
        ));
    }

    let allowed = matches!(
        (current, requested),
        (BookingStatus::Pending, BookingStatus::Accepted)
            | (BookingStatus::Pending, BookingStatus::Rejected)
            | (BookingStatus::Accepted, BookingStatus::Completed)
    );

    if !allowed {
        return Err(DomainError::InvalidTransition {
            from: current.to_string(),
            to: requested.to_string(),
        });
    }

    let payment_status = (requested == BookingStatus::Completed && advance_paid)
        .then_some(PaymentStatus::Paid);

    Ok(Transition {
        status: requested,
        payment_status,
    })
}

/// A pandit may only act on bookings assigned to them.
pub fn ensure_assigned(assigned: Option<Uuid>, pandit_id: Uuid) -> Result<(), DomainError> {
    if assigned == Some(pandit_id) {
        Ok(())
    } else {
        Err(DomainError::Forbidden(
            "This booking is not assigned to you".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    #[test]
    fn pandit_accepts_and_rejects_pending() {
        let t = transition(Pending, Accepted, Role::Pandit, false).unwrap();
        assert_eq!(t.status, Accepted);
        assert_eq!(t.payment_status, None);

        assert!(transition(Pending, Rejected, Role::Pandit, false).is_ok());
    }

    #[test]
    fn completing_with_advance_marks_paid() {
        let t = transition(Accepted, Completed, Role::Admin, true).unwrap();
        assert_eq!(t.payment_status, Some(PaymentStatus::Paid));

        let t = transition(Accepted, Completed, Role::Pandit, false).unwrap();
        assert_eq!(t.payment_status, None);
    }

    #[test]
    fn illegal_edges_are_rejected() {
        for (from, to) in [
            (Pending, Completed),
            (Accepted, Rejected),
            (Rejected, Accepted),
            (Completed, Pending),
            (Cancelled, Accepted),
            (Pending, Cancelled),
            (Pending, Pending),
        ] {
            assert!(
                matches!(
                    transition(from, to, Role::Admin, false),
                    Err(DomainError::InvalidTransition { .. })
                ),
                "{from} -> {to}"
            );
        }
    }

    #[test]
    fn customers_cannot_drive_transitions() {
        assert!(matches!(
            transition(Pending, Accepted, Role::User, false),
            Err(DomainError::Forbidden(_))
        ));
    }

    #[test]
    fn pandit_must_be_assigned() {
        let me = Uuid::new_v4();
        assert!(ensure_assigned(Some(me), me).is_ok());
        assert!(ensure_assigned(Some(Uuid::new_v4()), me).is_err());
        assert!(ensure_assigned(None, me).is_err());
    }
}
