use rust_decimal::Decimal;
use serde::Serialize;

use super::{round_money, DomainError};

/// Share of the total collected upfront.
pub fn advance_rate() -> Decimal {
    Decimal::new(25, 2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSplit {
    pub total_amount: Decimal,
    pub advance_amount: Decimal,
    pub remaining_amount: Decimal,
}

/// Splits a booking total into the 25 % advance and the 75 % balance.
///
/// The total is first rounded to paise, so `advance + remaining == total`
/// holds exactly for the stored values.
pub fn split_payment(total: Decimal) -> Result<PaymentSplit, DomainError> {
    let total = round_money(total);
    if total <= Decimal::ZERO {
        return Err(DomainError::InvalidAmount(
            "Total amount must be greater than zero".to_string(),
        ));
    }

    let advance = round_money(total * advance_rate());
    let remaining = round_money(total - advance);

    Ok(PaymentSplit {
        total_amount: total,
        advance_amount: advance,
        remaining_amount: remaining,
    })
}
