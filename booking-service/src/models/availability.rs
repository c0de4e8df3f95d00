use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotType {
    Available,
    Booked,
    Blocked,
}

impl SlotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotType::Available => "available",
            SlotType::Booked => "booked",
            SlotType::Blocked => "blocked",
        }
    }
}

impl FromStr for SlotType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(SlotType::Available),
            "booked" => Ok(SlotType::Booked),
            "blocked" => Ok(SlotType::Blocked),
            _ => Err(format!("Invalid slot type: {}", s)),
        }
    }
}

/// A pandit's time range on one date.
///
/// A slot of type `booked` always has `is_available = false` and a `booking_id`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    #[serde(rename = "id")]
    pub slot_id: Uuid,
    pub pandit_id: Uuid,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub slot_type: String,
    pub booking_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl AvailabilitySlot {
    pub fn new(
        pandit_id: Uuid,
        slot_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        slot_type: SlotType,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            slot_id: Uuid::new_v4(),
            pandit_id,
            slot_date,
            start_time,
            end_time,
            is_available: slot_type == SlotType::Available,
            slot_type: slot_type.as_str().to_string(),
            booking_id: None,
            notes,
            created_utc: now,
            updated_utc: now,
        }
    }

    pub fn slot_type(&self) -> SlotType {
        self.slot_type.parse().unwrap_or(SlotType::Blocked)
    }

    pub fn is_bookable(&self) -> bool {
        self.is_available && self.slot_type() == SlotType::Available
    }
}
