use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::pricing::PaymentSplit;
use crate::models::BookingStatus;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, max = 200, message = "Ceremony type is required"))]
    pub ceremony_type: String,

    pub date: NaiveDate,

    #[serde(with = "super::clock_time")]
    pub time: NaiveTime,

    #[validate(length(min = 5, max = 500, message = "Address must be between 5 and 500 characters"))]
    pub address: String,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,

    pub pandit_id: Option<Uuid>,

    /// Overrides the catalog price when present.
    pub total_amount: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BookingListQuery {
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CancelBookingRequest {
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CeremonyPriceResponse {
    pub ceremony_type: String,
    pub total_amount: Decimal,
    pub advance_amount: Decimal,
    pub remaining_amount: Decimal,
}

impl CeremonyPriceResponse {
    pub fn new(ceremony_type: String, split: PaymentSplit) -> Self {
        Self {
            ceremony_type,
            total_amount: split.total_amount,
            advance_amount: split.advance_amount,
            remaining_amount: split.remaining_amount,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingResponse {
    pub message: String,
    pub booking: crate::models::Booking,
    pub refund_amount: Decimal,
    pub refund_status: crate::models::RefundStatus,
}
