//! Dosha remedy and e-puja bookings. Both are priced by a named catalog tier.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceBookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl ServiceBookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceBookingStatus::Pending => "pending",
            ServiceBookingStatus::Confirmed => "confirmed",
            ServiceBookingStatus::InProgress => "in_progress",
            ServiceBookingStatus::Completed => "completed",
            ServiceBookingStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ServiceBookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ServiceBookingStatus::Pending),
            "confirmed" => Ok(ServiceBookingStatus::Confirmed),
            "in_progress" => Ok(ServiceBookingStatus::InProgress),
            "completed" => Ok(ServiceBookingStatus::Completed),
            "cancelled" => Ok(ServiceBookingStatus::Cancelled),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DoshaBooking {
    #[serde(rename = "id")]
    pub dosha_booking_id: Uuid,
    pub user_id: Uuid,
    pub pandit_id: Option<Uuid>,
    pub dosha_id: Uuid,
    pub tier_name: String,
    pub amount: Decimal,
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub birth_time: Option<NaiveTime>,
    pub birth_place: Option<String>,
    pub gotra: Option<String>,
    pub family_members: Value,
    pub preferred_date: Option<NaiveDate>,
    pub status: String,
    pub payment_status: String,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EpujaBooking {
    #[serde(rename = "id")]
    pub epuja_booking_id: Uuid,
    pub user_id: Uuid,
    pub pandit_id: Option<Uuid>,
    pub epuja_id: Uuid,
    pub tier_name: String,
    pub amount: Decimal,
    pub devotee_name: String,
    pub gotra: Option<String>,
    pub sankalp_details: Option<String>,
    pub family_members: Value,
    pub preferred_date: Option<NaiveDate>,
    pub shipping_address: Option<Value>,
    pub status: String,
    pub payment_status: String,
    pub video_link: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}
