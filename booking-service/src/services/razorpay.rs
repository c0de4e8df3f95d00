//! Razorpay client: Orders API, Refunds API and checkout signature checks.

use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use service_core::utils::signature::verify_hmac_sha256_hex;
use std::time::Duration;

use super::ServiceError;
use crate::config::RazorpayConfig;
use crate::domain::payment::signature_payload;

/// Razorpay client for interacting with the Razorpay API.
#[derive(Clone)]
pub struct RazorpayClient {
    client: Client,
    config: RazorpayConfig,
}

/// Request to create a Razorpay order.
#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    /// Amount in smallest currency unit (paise for INR).
    amount: u64,
    currency: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<serde_json::Value>,
}

/// Response from Razorpay order creation.
#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
}

#[derive(Debug, Serialize)]
struct CreateRefundRequest {
    amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayRefund {
    pub id: String,
    pub payment_id: String,
    pub amount: u64,
    pub status: String,
}

/// Razorpay API error response.
#[derive(Debug, Deserialize)]
struct RazorpayErrorBody {
    error: RazorpayErrorDetail,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorDetail {
    code: String,
    description: String,
}

/// Payment verification parameters.
#[derive(Debug)]
pub struct PaymentVerification<'a> {
    pub razorpay_order_id: &'a str,
    pub razorpay_payment_id: &'a str,
    pub razorpay_signature: &'a str,
}

impl RazorpayClient {
    pub fn new(config: RazorpayConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, config }
    }

    /// Check if Razorpay is configured (credentials are set).
    pub fn is_configured(&self) -> bool {
        !self.config.key_id.is_empty() && !self.config.key_secret.expose_secret().is_empty()
    }

    /// Public key handed to the checkout widget.
    pub fn key_id(&self) -> &str {
        &self.config.key_id
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    /// Create a new order in Razorpay for `amount` paise.
    pub async fn create_order(
        &self,
        amount: u64,
        receipt: Option<String>,
        notes: Option<serde_json::Value>,
    ) -> Result<RazorpayOrder, ServiceError> {
        let request = CreateOrderRequest {
            amount,
            currency: &self.config.currency,
            receipt,
            notes,
        };

        let order: RazorpayOrder = self.post("/orders", &request).await?;

        tracing::info!(
            order_id = %order.id,
            amount = order.amount,
            currency = %order.currency,
            "Razorpay order created"
        );
        Ok(order)
    }

    /// Refund `amount` paise of a captured payment.
    pub async fn create_refund(
        &self,
        payment_id: &str,
        amount: u64,
        notes: Option<serde_json::Value>,
    ) -> Result<RazorpayRefund, ServiceError> {
        let path = format!("/payments/{}/refund", payment_id);
        let refund: RazorpayRefund = self
            .post(&path, &CreateRefundRequest { amount, notes })
            .await?;

        tracing::info!(
            refund_id = %refund.id,
            payment_id = %refund.payment_id,
            amount = refund.amount,
            "Razorpay refund created"
        );
        Ok(refund)
    }

    /// Verify payment signature from Razorpay checkout.
    ///
    /// The signature is `HMAC-SHA256(order_id + "|" + payment_id, key_secret)`.
    pub fn verify_payment_signature(
        &self,
        verification: &PaymentVerification<'_>,
    ) -> Result<bool, ServiceError> {
        let payload = signature_payload(
            verification.razorpay_order_id,
            verification.razorpay_payment_id,
        );

        let is_valid = verify_hmac_sha256_hex(
            self.config.key_secret.expose_secret(),
            &payload,
            verification.razorpay_signature,
        )?;

        if is_valid {
            tracing::info!(
                order_id = %verification.razorpay_order_id,
                payment_id = %verification.razorpay_payment_id,
                "Payment signature verified successfully"
            );
        } else {
            tracing::warn!(
                order_id = %verification.razorpay_order_id,
                payment_id = %verification.razorpay_payment_id,
                "Payment signature verification failed"
            );
        }

        Ok(is_valid)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        if !self.is_configured() {
            return Err(ServiceError::GatewayNotConfigured);
        }

        let url = format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path);

        let response = self
            .client
            .post(&url)
            .basic_auth(
                &self.config.key_id,
                Some(self.config.key_secret.expose_secret()),
            )
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, path = %path, "Razorpay request failed");
                ServiceError::Gateway(format!("Payment gateway unreachable: {}", e))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            ServiceError::Gateway(format!("Failed to read payment gateway response: {}", e))
        })?;

        tracing::debug!(status = %status, path = %path, "Razorpay response");

        if status.is_success() {
            serde_json::from_str(&text).map_err(|e| {
                ServiceError::Internal(anyhow::anyhow!("Unexpected Razorpay response: {}", e))
            })
        } else {
            let (message, code) = match serde_json::from_str::<RazorpayErrorBody>(&text) {
                Ok(RazorpayErrorBody { error }) => (
                    format!("{} ({})", error.description, error.code),
                    Some(error.code),
                ),
                Err(_) => (text, None),
            };
            tracing::error!(
                status = %status,
                path = %path,
                code = code.as_deref().unwrap_or("unknown"),
                description = %message,
                "Razorpay call rejected"
            );
            Err(ServiceError::Gateway(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;
    use service_core::utils::signature::hmac_sha256_hex;
    use wiremock::matchers::{basic_auth, body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> RazorpayConfig {
        RazorpayConfig {
            key_id: "rzp_test_123".to_string(),
            key_secret: Secret::new("test_secret".to_string()),
            api_base_url: base_url.to_string(),
            currency: "INR".to_string(),
        }
    }

    #[test]
    fn test_is_configured() {
        assert!(RazorpayClient::new(config("http://localhost")).is_configured());

        let mut empty = config("http://localhost");
        empty.key_id = String::new();
        assert!(!RazorpayClient::new(empty).is_configured());
    }

    #[test]
    fn test_payment_signature_verification() {
        let client = RazorpayClient::new(config("http://localhost"));
        let signature = hmac_sha256_hex("test_secret", "order_1|pay_1").unwrap();

        let ok = PaymentVerification {
            razorpay_order_id: "order_1",
            razorpay_payment_id: "pay_1",
            razorpay_signature: &signature,
        };
        assert!(client.verify_payment_signature(&ok).unwrap());

        let tampered = PaymentVerification {
            razorpay_order_id: "order_2",
            ..ok
        };
        assert!(!client.verify_payment_signature(&tampered).unwrap());

        let tampered = PaymentVerification {
            razorpay_payment_id: "pay_2",
            ..ok
        };
        assert!(!client.verify_payment_signature(&tampered).unwrap());
    }

    #[tokio::test]
    async fn create_order_posts_paise_with_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/orders"))
            .and(basic_auth("rzp_test_123", "test_secret"))
            .and(body_json(serde_json::json!({
                "amount": 62500,
                "currency": "INR",
                "receipt": "booking_1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "order_abc",
                "entity": "order",
                "amount": 62500,
                "amount_paid": 0,
                "amount_due": 62500,
                "currency": "INR",
                "receipt": "booking_1",
                "status": "created",
                "attempts": 0,
                "created_at": 1700000000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = RazorpayClient::new(config(&server.uri()));
        let order = client
            .create_order(62500, Some("booking_1".to_string()), None)
            .await
            .unwrap();

        assert_eq!(order.id, "order_abc");
        assert_eq!(order.amount, 62500);
    }

    #[tokio::test]
    async fn gateway_error_code_and_description_are_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payments/pay_1/refund"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {
                    "code": "BAD_REQUEST_ERROR",
                    "description": "The refund amount provided is greater than amount captured",
                    "source": "business",
                    "step": "payment_initiation",
                    "reason": "input_validation_failed"
                }
            })))
            .mount(&server)
            .await;

        let client = RazorpayClient::new(config(&server.uri()));
        let err = client.create_refund("pay_1", 99999, None).await.unwrap_err();

        match err {
            ServiceError::Gateway(msg) => assert_eq!(
                msg,
                "The refund amount provided is greater than amount captured (BAD_REQUEST_ERROR)"
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_refund_parses_refund_entity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payments/pay_1/refund"))
            .and(body_json(serde_json::json!({ "amount": 31250 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "rfnd_1",
                "entity": "refund",
                "amount": 31250,
                "currency": "INR",
                "payment_id": "pay_1",
                "status": "processed"
            })))
            .mount(&server)
            .await;

        let client = RazorpayClient::new(config(&server.uri()));
        let refund = client.create_refund("pay_1", 31250, None).await.unwrap();
        assert_eq!(refund.id, "rfnd_1");
        assert_eq!(refund.status, "processed");
    }

    #[tokio::test]
    async fn unconfigured_client_never_calls_out() {
        let mut cfg = config("http://127.0.0.1:9");
        cfg.key_secret = Secret::new(String::new());
        let client = RazorpayClient::new(cfg);

        assert!(matches!(
            client.create_order(100, None, None).await,
            Err(ServiceError::GatewayNotConfigured)
        ));
    }
}
