use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use std::time::Duration;

use crate::config::EmailConfig;

/// Facts about a booking worth telling its customer.
#[derive(Debug, Clone)]
pub struct BookingNotice {
    pub booking_id: String,
    pub ceremony_type: String,
    pub date: String,
    pub time: String,
    pub status: String,
    pub amount: String,
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send_verification_email(
        &self,
        to_email: &str,
        name: &str,
        verification_token: &str,
    ) -> Result<(), AppError>;

    async fn send_booking_confirmation(
        &self,
        to_email: &str,
        name: &str,
        notice: &BookingNotice,
    ) -> Result<(), AppError>;

    async fn send_booking_update(
        &self,
        to_email: &str,
        name: &str,
        notice: &BookingNotice,
    ) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct EmailService {
    mailer: SmtpTransport,
    from_email: String,
    frontend_url: String,
}

impl EmailService {
    pub fn new(config: &EmailConfig) -> Result<Self, AppError> {
        let creds = Credentials::new(
            config.smtp_user.clone(),
            config.smtp_password.expose_secret().clone(),
        );

        let mailer = SmtpTransport::starttls_relay(&config.smtp_host)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e.to_string())))?
            .credentials(creds)
            .port(config.smtp_port)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        tracing::info!(host = %config.smtp_host, "Email service initialized with SMTP relay");

        Ok(Self {
            mailer,
            from_email: config.from_address.clone(),
            frontend_url: config.frontend_url.clone(),
        })
    }

    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        plain_body: String,
        html_body: String,
    ) -> Result<(), AppError> {
        let email = Message::builder()
            .from(
                self.from_email
                    .parse()
                    .map_err(|e: lettre::address::AddressError| AppError::EmailError(e.to_string()))?,
            )
            .to(to_email
                .parse()
                .map_err(|e: lettre::address::AddressError| AppError::EmailError(e.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(plain_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )?;

        // SmtpTransport is blocking
        let mailer = self.mailer.clone();
        let result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::InternalError(e.into()))?;

        match result {
            Ok(_) => {
                tracing::info!(to = %to_email, subject = %subject, "Email sent successfully");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, to = %to_email, "Failed to send email");
                Err(AppError::EmailError(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl EmailProvider for EmailService {
    async fn send_verification_email(
        &self,
        to_email: &str,
        name: &str,
        verification_token: &str,
    ) -> Result<(), AppError> {
        let link = format!(
            "{}/verify-email?token={}",
            self.frontend_url, verification_token
        );

        let html_body = format!(
            r#"<html>
  <body style="font-family: Arial, sans-serif;">
    <h2>Namaste {name},</h2>
    <p>Thank you for registering. Please confirm your email address:</p>
    <p><a href="{link}" style="background-color: #e65100; color: white; padding: 12px 20px; text-decoration: none; border-radius: 4px;">Verify Email</a></p>
  </body>
</html>"#
        );
        let plain_body = format!(
            "Namaste {name},\n\nThank you for registering. Please confirm your email address:\n\n{link}\n"
        );

        self.send_email(to_email, "Verify your email address", plain_body, html_body)
            .await
    }

    async fn send_booking_confirmation(
        &self,
        to_email: &str,
        name: &str,
        notice: &BookingNotice,
    ) -> Result<(), AppError> {
        let html_body = format!(
            r#"<html>
  <body style="font-family: Arial, sans-serif;">
    <h2>Namaste {name},</h2>
    <p>Your booking for <strong>{ceremony}</strong> has been received.</p>
    <ul>
      <li>Booking ID: {id}</li>
      <li>Date: {date} at {time}</li>
      <li>Total: ₹{amount}</li>
    </ul>
    <p>We will confirm your pandit shortly.</p>
  </body>
</html>"#,
            ceremony = notice.ceremony_type,
            id = notice.booking_id,
            date = notice.date,
            time = notice.time,
            amount = notice.amount,
        );
        let plain_body = format!(
            "Namaste {name},\n\nYour booking for {} has been received.\nBooking ID: {}\nDate: {} at {}\nTotal: ₹{}\n",
            notice.ceremony_type, notice.booking_id, notice.date, notice.time, notice.amount
        );

        self.send_email(to_email, "Booking received", plain_body, html_body)
            .await
    }

    async fn send_booking_update(
        &self,
        to_email: &str,
        name: &str,
        notice: &BookingNotice,
    ) -> Result<(), AppError> {
        let html_body = format!(
            r#"<html>
  <body style="font-family: Arial, sans-serif;">
    <h2>Namaste {name},</h2>
    <p>Your booking <strong>{id}</strong> for {ceremony} on {date} is now <strong>{status}</strong>.</p>
  </body>
</html>"#,
            id = notice.booking_id,
            ceremony = notice.ceremony_type,
            date = notice.date,
            status = notice.status,
        );
        let plain_body = format!(
            "Namaste {name},\n\nYour booking {} for {} on {} is now {}.\n",
            notice.booking_id, notice.ceremony_type, notice.date, notice.status
        );

        self.send_email(
            to_email,
            &format!("Booking {}", notice.status),
            plain_body,
            html_body,
        )
        .await
    }
}

/// Logs instead of sending. Used when `EMAIL_MODE=mock`.
#[derive(Clone, Default)]
pub struct MockEmailService;

#[async_trait]
impl EmailProvider for MockEmailService {
    async fn send_verification_email(
        &self,
        to_email: &str,
        _name: &str,
        verification_token: &str,
    ) -> Result<(), AppError> {
        tracing::info!(to = %to_email, token = %verification_token, "Mock verification email");
        Ok(())
    }

    async fn send_booking_confirmation(
        &self,
        to_email: &str,
        _name: &str,
        notice: &BookingNotice,
    ) -> Result<(), AppError> {
        tracing::info!(to = %to_email, booking_id = %notice.booking_id, "Mock booking confirmation email");
        Ok(())
    }

    async fn send_booking_update(
        &self,
        to_email: &str,
        _name: &str,
        notice: &BookingNotice,
    ) -> Result<(), AppError> {
        tracing::info!(
            to = %to_email,
            booking_id = %notice.booking_id,
            status = %notice.status,
            "Mock booking update email"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeliveryMode;
    use secrecy::Secret;

    #[test]
    fn test_email_service_creation() {
        let config = EmailConfig {
            mode: DeliveryMode::Live,
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_user: "mailer@example.com".to_string(),
            smtp_password: Secret::new("app-password".to_string()),
            from_address: "no-reply@example.com".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
        };

        assert!(EmailService::new(&config).is_ok());
    }
}
