//! HTTP handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod availability;
pub mod bookings;
pub mod ceremonies;
pub mod content;
pub mod doshas;
pub mod epujas;
pub mod metrics;
pub mod pandits;
pub mod payments;
pub mod reviews;
pub mod service_bookings;
pub mod users;
