use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{AvailabilitySlot, Booking, Pandit};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPanditRequest {
    pub booking_id: Uuid,
    pub pandit_id: Uuid,
    pub slot_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct AssignPanditResponse {
    pub message: String,
    pub booking: Booking,
    pub slot: AvailabilitySlot,
}

#[derive(Debug, Deserialize)]
pub struct AvailablePanditsQuery {
    pub date: NaiveDate,
    #[serde(with = "super::clock_time")]
    pub time: NaiveTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailablePandit {
    #[serde(flatten)]
    pub pandit: Pandit,
    /// Open slots on the requested date.
    pub slots: Vec<AvailabilitySlot>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPanditRequest {
    #[serde(default = "default_true")]
    pub is_verified: bool,
}

fn default_true() -> bool {
    true
}
