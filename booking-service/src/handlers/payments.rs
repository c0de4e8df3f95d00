use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use service_core::error::AppError;
use uuid::Uuid;

use super::bookings::{ensure_can_view, notify_customer};
use crate::{
    domain::payment::{
        ensure_order_matches, ensure_refundable, payment_amount, status_after_failure,
        to_minor_units, PaymentType,
    },
    dtos::{
        auth::MessageResponse,
        payments::{
            CreateOrderRequest, CreateOrderResponse, PaymentFailureRequest, ProcessRefundRequest,
            RefundStatusResponse, VerifyPaymentRequest,
        },
    },
    middleware::AuthUser,
    models::Booking,
    services::{metrics, PaymentCapture, PaymentVerification, ServiceError},
    utils::ValidatedJson,
    AppState,
};

/// Loads a booking the caller owns (admins may act on any).
async fn owned_booking(state: &AppState, auth: &AuthUser, id: Uuid) -> Result<Booking, AppError> {
    let booking = state
        .db
        .find_booking_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound("Booking"))?;

    if !auth.is_admin() && booking.user_id != auth.id() {
        return Err(AppError::forbidden("You can only pay for your own bookings"));
    }
    Ok(booking)
}

pub async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, AppError> {
    let booking = owned_booking(&state, &auth, req.booking_id).await?;

    let amount = payment_amount(&booking, req.payment_type).map_err(ServiceError::from)?;
    let paise = to_minor_units(amount).map_err(ServiceError::from)?;

    let receipt = format!("{}-{}", req.payment_type.as_str(), booking.booking_id.simple());
    let notes = json!({
        "bookingId": booking.booking_id,
        "paymentType": req.payment_type.as_str(),
    });
    let order = state
        .razorpay
        .create_order(paise, Some(receipt.chars().take(40).collect()), Some(notes))
        .await?;

    state
        .db
        .record_order(booking.booking_id, &order.id, req.payment_type)
        .await?;

    Ok(Json(CreateOrderResponse {
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
        key_id: state.razorpay.key_id().to_string(),
        booking_id: booking.booking_id,
        payment_type: req.payment_type,
    }))
}

async fn verify(
    state: &AppState,
    auth: &AuthUser,
    req: VerifyPaymentRequest,
    kind: PaymentType,
) -> Result<Booking, AppError> {
    let booking = owned_booking(state, auth, req.booking_id).await?;

    ensure_order_matches(&booking, kind, &req.razorpay_order_id).map_err(ServiceError::from)?;

    let verified = state.razorpay.verify_payment_signature(&PaymentVerification {
        razorpay_order_id: &req.razorpay_order_id,
        razorpay_payment_id: &req.razorpay_payment_id,
        razorpay_signature: &req.razorpay_signature,
    })?;
    metrics::record_payment_verification(kind.as_str(), verified);

    if !verified {
        return Err(ServiceError::InvalidSignature.into());
    }

    let booking = state
        .db
        .capture_payment(
            booking.booking_id,
            PaymentCapture {
                kind,
                order_id: &req.razorpay_order_id,
                payment_id: &req.razorpay_payment_id,
            },
        )
        .await?;

    tracing::info!(
        booking_id = %booking.booking_id,
        payment_type = kind.as_str(),
        payment_id = %req.razorpay_payment_id,
        "Payment captured"
    );

    notify_customer(state, &booking).await;
    Ok(booking)
}

pub async fn verify_advance(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = verify(&state, &auth, req, PaymentType::Advance).await?;
    Ok(Json(json!({
        "message": "Advance payment verified",
        "booking": booking,
    })))
}

pub async fn verify_remaining(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = verify(&state, &auth, req, PaymentType::Remaining).await?;
    Ok(Json(json!({
        "message": "Remaining payment verified",
        "booking": booking,
    })))
}

/// Sends the refund recorded at cancellation to the gateway.
pub async fn process_refund(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ProcessRefundRequest>,
) -> Result<Json<RefundStatusResponse>, AppError> {
    let booking = owned_booking(&state, &auth, req.booking_id).await?;

    ensure_refundable(booking.refund_status()).map_err(ServiceError::from)?;
    let payment_id = booking
        .advance_payment_id
        .as_deref()
        .ok_or_else(|| ServiceError::Conflict("No captured advance payment to refund".to_string()))?;
    let paise = to_minor_units(booking.refund_amount).map_err(ServiceError::from)?;

    let refund = state
        .razorpay
        .create_refund(
            payment_id,
            paise,
            Some(json!({ "bookingId": booking.booking_id })),
        )
        .await?;

    let booking = state
        .db
        .mark_refund_processed(booking.booking_id, &refund.id)
        .await?;
    metrics::record_refund_processed();

    tracing::info!(
        booking_id = %booking.booking_id,
        refund_id = %refund.id,
        amount = %booking.refund_amount,
        "Refund processed"
    );

    Ok(Json(RefundStatusResponse {
        booking_id: booking.booking_id,
        refund_amount: booking.refund_amount,
        refund_status: booking.refund_status(),
        refund_id: booking.refund_id,
    }))
}

pub async fn refund_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<RefundStatusResponse>, AppError> {
    let booking = state
        .db
        .find_booking_by_id(booking_id)
        .await?
        .ok_or(ServiceError::NotFound("Booking"))?;
    ensure_can_view(&auth, &booking)?;

    Ok(Json(RefundStatusResponse {
        booking_id: booking.booking_id,
        refund_amount: booking.refund_amount,
        refund_status: booking.refund_status(),
        refund_id: booking.refund_id,
    }))
}

/// Checkout reported a failure. Bookings with a captured portion keep
/// their payment status.
pub async fn payment_failure(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<PaymentFailureRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let booking = owned_booking(&state, &auth, req.booking_id).await?;

    tracing::warn!(
        booking_id = %booking.booking_id,
        description = req.error_description.as_deref().unwrap_or("-"),
        "Payment failed at checkout"
    );

    let current = booking.payment_status();
    let next = status_after_failure(current, booking.advance_paid);
    if next != current {
        state.db.set_payment_status(booking.booking_id, next).await?;
    }

    Ok(Json(MessageResponse::new("Payment failure recorded")))
}
