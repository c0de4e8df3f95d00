//! Pure booking rules: pricing, refunds, status transitions, slot
//! synthesis, payment portions, ratings and catalog localisation.
//!
//! Nothing in here touches the database or the network; callers pass in
//! the current time where it matters.

pub mod assignment;
pub mod lifecycle;
pub mod payment;
pub mod pricing;
pub mod rating;
pub mod refund;
pub mod translation;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{0}")]
    InvalidAmount(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Cannot change booking status from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("{0}")]
    InvalidSlot(String),
}

/// Rounds to two decimal places, halves away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_money_rounds_half_away_from_zero() {
        assert_eq!(round_money(Decimal::new(12345, 3)), Decimal::new(1235, 2));
        assert_eq!(round_money(Decimal::new(12344, 3)), Decimal::new(1234, 2));
        assert_eq!(round_money(Decimal::new(-12345, 3)), Decimal::new(-1235, 2));
    }
}
