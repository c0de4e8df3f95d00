//! Row types and status enums for the marketplace tables.

mod availability;
mod booking;
mod catalog;
mod content;
mod pandit;
mod review;
mod service_booking;
mod user;

pub use availability::{AvailabilitySlot, SlotType};
pub use booking::{Booking, BookingStatus, BookingView, PaymentStatus, RefundStatus};
pub use catalog::{pricing_tiers, Ceremony, Dosha, Epuja, PricingTier};
pub use content::{PageContent, SettingValueType, SiteSetting};
pub use pandit::Pandit;
pub use review::{Review, ReviewView};
pub use service_booking::{DoshaBooking, EpujaBooking, ServiceBookingStatus};
pub use user::{Role, User};
