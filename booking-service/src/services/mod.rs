//! Persistence, integrations and token handling behind the route handlers.

mod catalog_cache;
mod database;
pub mod email;
pub mod error;
mod jwt;
pub mod metrics;
mod notifications;
pub mod razorpay;
pub mod whatsapp;

pub use catalog_cache::CatalogCache;
pub use database::{
    AdminStats, BookingScope, Database, PanditFilter, PanditProfileUpdate, PaymentCapture,
};
pub use email::{BookingNotice, EmailProvider, EmailService, MockEmailService};
pub use error::ServiceError;
pub use jwt::{AccessTokenClaims, JwtService};
pub use notifications::Notifier;
pub use razorpay::{PaymentVerification, RazorpayClient};
pub use whatsapp::{MockWhatsAppProvider, WhatsAppCloudProvider, WhatsAppProvider};
