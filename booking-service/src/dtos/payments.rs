use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::payment::PaymentType;
use crate::models::RefundStatus;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub booking_id: Uuid,
    pub payment_type: PaymentType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    /// Minor units (paise).
    pub amount: u64,
    pub currency: String,
    pub key_id: String,
    pub booking_id: Uuid,
    pub payment_type: PaymentType,
}

/// Checkout callback fields. The gateway names its own fields in snake_case.
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyPaymentRequest {
    #[serde(rename = "bookingId")]
    pub booking_id: Uuid,

    #[validate(length(min = 1, message = "razorpay_order_id is required"))]
    pub razorpay_order_id: String,

    #[validate(length(min = 1, message = "razorpay_payment_id is required"))]
    pub razorpay_payment_id: String,

    #[validate(length(min = 1, message = "razorpay_signature is required"))]
    pub razorpay_signature: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRefundRequest {
    pub booking_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFailureRequest {
    pub booking_id: Uuid,

    #[serde(alias = "description")]
    #[validate(length(max = 1000, message = "Error description is too long"))]
    pub error_description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundStatusResponse {
    pub booking_id: Uuid,
    pub refund_amount: Decimal,
    pub refund_status: RefundStatus,
    pub refund_id: Option<String>,
}
