use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    DoshaBooking, EpujaBooking, PaymentStatus, PricingTier, ServiceBookingStatus,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoshaBookingRequest {
    pub dosha_id: Uuid,

    #[validate(length(min = 1, message = "Tier name is required"))]
    pub tier_name: String,

    #[validate(length(min = 1, max = 200, message = "Full name is required"))]
    pub full_name: String,

    pub birth_date: Option<NaiveDate>,

    #[serde(default, with = "super::clock_time::option")]
    pub birth_time: Option<NaiveTime>,

    #[validate(length(max = 200, message = "Birth place must be at most 200 characters"))]
    pub birth_place: Option<String>,

    #[validate(length(max = 100, message = "Gotra must be at most 100 characters"))]
    pub gotra: Option<String>,

    #[serde(default)]
    pub family_members: Vec<Value>,

    pub preferred_date: Option<NaiveDate>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

impl CreateDoshaBookingRequest {
    pub fn into_booking(self, user_id: Uuid, tier: PricingTier) -> DoshaBooking {
        let now = Utc::now();
        DoshaBooking {
            dosha_booking_id: Uuid::new_v4(),
            user_id,
            pandit_id: None,
            dosha_id: self.dosha_id,
            tier_name: tier.name,
            amount: tier.price,
            full_name: self.full_name.trim().to_string(),
            birth_date: self.birth_date,
            birth_time: self.birth_time,
            birth_place: self.birth_place,
            gotra: self.gotra,
            family_members: Value::Array(self.family_members),
            preferred_date: self.preferred_date,
            status: ServiceBookingStatus::Pending.as_str().to_string(),
            payment_status: PaymentStatus::Pending.as_str().to_string(),
            notes: self.notes,
            created_utc: now,
            updated_utc: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEpujaBookingRequest {
    pub epuja_id: Uuid,

    #[validate(length(min = 1, message = "Tier name is required"))]
    pub tier_name: String,

    #[validate(length(min = 1, max = 200, message = "Devotee name is required"))]
    pub devotee_name: String,

    #[validate(length(max = 100, message = "Gotra must be at most 100 characters"))]
    pub gotra: Option<String>,

    #[validate(length(max = 2000, message = "Sankalp details must be at most 2000 characters"))]
    pub sankalp_details: Option<String>,

    #[serde(default)]
    pub family_members: Vec<Value>,

    pub preferred_date: Option<NaiveDate>,

    /// Where prasad is posted after the puja.
    pub shipping_address: Option<Value>,
}

impl CreateEpujaBookingRequest {
    pub fn into_booking(self, user_id: Uuid, tier: PricingTier) -> EpujaBooking {
        let now = Utc::now();
        EpujaBooking {
            epuja_booking_id: Uuid::new_v4(),
            user_id,
            pandit_id: None,
            epuja_id: self.epuja_id,
            tier_name: tier.name,
            amount: tier.price,
            devotee_name: self.devotee_name.trim().to_string(),
            gotra: self.gotra,
            sankalp_details: self.sankalp_details,
            family_members: Value::Array(self.family_members),
            preferred_date: self.preferred_date,
            shipping_address: self.shipping_address,
            status: ServiceBookingStatus::Pending.as_str().to_string(),
            payment_status: PaymentStatus::Pending.as_str().to_string(),
            video_link: None,
            created_utc: now,
            updated_utc: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceBookingRequest {
    pub status: ServiceBookingStatus,

    /// Admin only.
    pub pandit_id: Option<Uuid>,

    /// E-pujas only: recording of the performed puja.
    #[validate(url(message = "Video link must be a valid URL"))]
    pub video_link: Option<String>,
}
