use std::sync::Arc;

use service_core::error::AppError;

use super::email::{BookingNotice, EmailProvider, EmailService, MockEmailService};
use super::whatsapp::{MockWhatsAppProvider, WhatsAppCloudProvider, WhatsAppProvider};
use crate::config::{BookingConfig, DeliveryMode};

/// Fans booking events out to email and WhatsApp. Delivery failures are
/// logged and never returned to the caller.
#[derive(Clone)]
pub struct Notifier {
    email: Arc<dyn EmailProvider>,
    whatsapp: Arc<dyn WhatsAppProvider>,
}

impl Notifier {
    pub fn new(email: Arc<dyn EmailProvider>, whatsapp: Arc<dyn WhatsAppProvider>) -> Self {
        Self { email, whatsapp }
    }

    pub fn from_config(config: &BookingConfig) -> Result<Self, AppError> {
        let email: Arc<dyn EmailProvider> = match config.email.mode {
            DeliveryMode::Live => Arc::new(EmailService::new(&config.email)?),
            DeliveryMode::Mock => {
                tracing::info!("Email delivery in mock mode");
                Arc::new(MockEmailService)
            }
        };

        let whatsapp: Arc<dyn WhatsAppProvider> = match config.whatsapp.mode {
            DeliveryMode::Live => Arc::new(WhatsAppCloudProvider::new(config.whatsapp.clone())),
            DeliveryMode::Mock => {
                tracing::info!("WhatsApp delivery in mock mode");
                Arc::new(MockWhatsAppProvider::new())
            }
        };

        Ok(Self::new(email, whatsapp))
    }

    pub async fn verification_email(&self, to: &str, name: &str, token: &str) {
        if let Err(e) = self.email.send_verification_email(to, name, token).await {
            tracing::warn!(error = %e, to = %to, "Verification email not delivered");
        }
    }

    /// Confirms a new booking to the customer and alerts the admin number.
    pub async fn booking_created(
        &self,
        to: &str,
        name: &str,
        notice: &BookingNotice,
        admin_whatsapp: Option<&str>,
    ) {
        if let Err(e) = self.email.send_booking_confirmation(to, name, notice).await {
            tracing::warn!(error = %e, booking_id = %notice.booking_id, "Booking confirmation email not delivered");
        }

        let Some(admin) = admin_whatsapp.filter(|n| !n.trim().is_empty()) else {
            tracing::debug!(booking_id = %notice.booking_id, "No admin WhatsApp number configured");
            return;
        };

        let body = format!(
            "New booking {}: {} on {} at {} by {} (₹{})",
            notice.booking_id, notice.ceremony_type, notice.date, notice.time, name, notice.amount
        );
        if let Err(e) = self.whatsapp.send_text(admin, &body).await {
            tracing::warn!(error = %e, booking_id = %notice.booking_id, "Admin WhatsApp alert not delivered");
        }
    }

    pub async fn booking_updated(&self, to: &str, name: &str, notice: &BookingNotice) {
        if let Err(e) = self.email.send_booking_update(to, name, notice).await {
            tracing::warn!(error = %e, booking_id = %notice.booking_id, "Booking update email not delivered");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FailingEmail;

    #[async_trait]
    impl EmailProvider for FailingEmail {
        async fn send_verification_email(&self, _: &str, _: &str, _: &str) -> Result<(), AppError> {
            Err(AppError::EmailError("smtp down".into()))
        }

        async fn send_booking_confirmation(
            &self,
            _: &str,
            _: &str,
            _: &BookingNotice,
        ) -> Result<(), AppError> {
            Err(AppError::EmailError("smtp down".into()))
        }

        async fn send_booking_update(
            &self,
            _: &str,
            _: &str,
            _: &BookingNotice,
        ) -> Result<(), AppError> {
            Err(AppError::EmailError("smtp down".into()))
        }
    }

    fn notice() -> BookingNotice {
        BookingNotice {
            booking_id: "b-1".into(),
            ceremony_type: "Griha Pravesh".into(),
            date: "2026-11-02".into(),
            time: "09:30".into(),
            status: "pending".into(),
            amount: "2500.00".into(),
        }
    }

    #[tokio::test]
    async fn email_failure_still_sends_admin_alert() {
        let whatsapp = Arc::new(MockWhatsAppProvider::new());
        let notifier = Notifier::new(Arc::new(FailingEmail), whatsapp.clone());

        notifier
            .booking_created("a@example.com", "Asha", &notice(), Some("+91 98765 43210"))
            .await;

        assert_eq!(whatsapp.send_count(), 1);
    }

    #[tokio::test]
    async fn blank_admin_number_skips_whatsapp() {
        let whatsapp = Arc::new(MockWhatsAppProvider::new());
        let notifier = Notifier::new(Arc::new(MockEmailService), whatsapp.clone());

        notifier
            .booking_created("a@example.com", "Asha", &notice(), Some("  "))
            .await;
        notifier
            .booking_created("a@example.com", "Asha", &notice(), None)
            .await;

        assert_eq!(whatsapp.send_count(), 0);
    }

    #[test]
    fn mock_modes_build_without_credentials() {
        let config = crate::config::tests::test_config();
        assert!(Notifier::from_config(&config).is_ok());
    }
}
