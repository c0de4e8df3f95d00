use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Types a pandit may set directly; `booked` only comes from assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManualSlotType {
    #[default]
    Available,
    Blocked,
}

impl From<ManualSlotType> for crate::models::SlotType {
    fn from(value: ManualSlotType) -> Self {
        match value {
            ManualSlotType::Available => crate::models::SlotType::Available,
            ManualSlotType::Blocked => crate::models::SlotType::Blocked,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SlotRequest {
    pub date: NaiveDate,

    #[serde(with = "super::clock_time")]
    pub start_time: NaiveTime,

    #[serde(with = "super::clock_time")]
    pub end_time: NaiveTime,

    #[serde(default)]
    pub slot_type: ManualSlotType,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

impl SlotRequest {
    pub fn has_valid_range(&self) -> bool {
        self.end_time > self.start_time
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SlotRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
