use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use super::ceremonies::{cached_ceremonies, matches_type};
use crate::{
    domain::{
        lifecycle::{ensure_assigned, transition},
        pricing::split_payment,
    },
    dtos::bookings::{
        BookingListQuery, CancelBookingRequest, CancelBookingResponse, CeremonyPriceResponse,
        CreateBookingRequest, UpdateBookingStatusRequest,
    },
    middleware::AuthUser,
    models::{Booking, BookingView, Role},
    services::{metrics, BookingNotice, BookingScope, ServiceError},
    utils::ValidatedJson,
    AppState,
};

/// Site setting holding the number that receives new-booking alerts.
pub const ADMIN_WHATSAPP_SETTING: &str = "whatsapp_number";

pub(crate) fn notice(booking: &Booking) -> BookingNotice {
    BookingNotice {
        booking_id: booking.booking_id.to_string(),
        ceremony_type: booking.ceremony_type.clone(),
        date: booking.booking_date.format("%d %b %Y").to_string(),
        time: booking.booking_time.format("%H:%M").to_string(),
        status: booking.status.clone(),
        amount: booking.total_amount.to_string(),
    }
}

/// Bookings visible to the caller: their own, those assigned to them, or all.
pub(crate) fn scope_for(auth: &AuthUser) -> BookingScope {
    match auth.role() {
        Role::Admin => BookingScope::All,
        Role::Pandit => BookingScope::Pandit(auth.id()),
        Role::User => BookingScope::User(auth.id()),
    }
}

pub(crate) fn ensure_can_view(auth: &AuthUser, booking: &Booking) -> Result<(), AppError> {
    let allowed = match auth.role() {
        Role::Admin => true,
        Role::Pandit => booking.pandit_id == Some(auth.id()),
        Role::User => booking.user_id == auth.id(),
    };
    if allowed {
        Ok(())
    } else {
        Err(AppError::forbidden("You do not have access to this booking"))
    }
}

async fn admin_whatsapp(state: &AppState) -> Option<String> {
    match state.db.find_setting(ADMIN_WHATSAPP_SETTING).await {
        Ok(setting) => setting.map(|s| s.setting_value),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read admin WhatsApp number");
            None
        }
    }
}

/// Tells the customer about a status change. Never fails the request.
pub(crate) async fn notify_customer(state: &AppState, booking: &Booking) {
    match state.db.find_user_by_id(booking.user_id).await {
        Ok(Some(user)) => {
            state
                .notifier
                .booking_updated(&user.email, &user.name, &notice(booking))
                .await
        }
        Ok(None) => tracing::warn!(booking_id = %booking.booking_id, "Booking owner not found"),
        Err(e) => tracing::warn!(error = %e, "Could not load booking owner for notification"),
    }
}

pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.date < Utc::now().date_naive() {
        return Err(AppError::bad_request("Booking date cannot be in the past"));
    }

    let user = state
        .db
        .find_user_by_id(auth.id())
        .await?
        .ok_or(ServiceError::NotFound("User"))?;

    if let Some(pandit_id) = req.pandit_id {
        state
            .db
            .find_pandit_by_id(pandit_id)
            .await?
            .ok_or(ServiceError::NotFound("Pandit"))?;
    }

    let total = match req.total_amount {
        Some(amount) => amount,
        None => {
            state
                .db
                .find_ceremony_for_type(&req.ceremony_type)
                .await?
                .ok_or(ServiceError::NotFound("Ceremony"))?
                .base_price
        }
    };
    let split = split_payment(total).map_err(ServiceError::from)?;

    let booking = Booking::new(
        user.user_id,
        req.pandit_id,
        req.ceremony_type.trim().to_string(),
        req.date,
        req.time,
        req.address,
        req.notes,
        split,
    );
    state.db.insert_booking(&booking).await?;
    metrics::record_booking_created("ceremony");

    tracing::info!(
        booking_id = %booking.booking_id,
        user_id = %user.user_id,
        total = %booking.total_amount,
        "Booking created"
    );

    let admin = admin_whatsapp(&state).await;
    state
        .notifier
        .booking_created(&user.email, &user.name, &notice(&booking), admin.as_deref())
        .await;

    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    let bookings = state
        .db
        .list_bookings(scope_for(&auth), query.status)
        .await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>, AppError> {
    let view = state
        .db
        .find_booking_view(id)
        .await?
        .ok_or(ServiceError::NotFound("Booking"))?;
    ensure_can_view(&auth, &view.booking)?;
    Ok(Json(view))
}

pub async fn update_booking_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBookingStatusRequest>,
) -> Result<Json<Booking>, AppError> {
    let current = state
        .db
        .find_booking_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound("Booking"))?;

    if auth.role() == Role::Pandit {
        ensure_assigned(current.pandit_id, auth.id()).map_err(ServiceError::from)?;
    }

    let change = transition(current.status(), req.status, auth.role(), current.advance_paid)
        .map_err(ServiceError::from)?;
    let booking = state
        .db
        .update_booking_status(id, current.status(), change)
        .await?;

    tracing::info!(
        booking_id = %id,
        from = %current.status(),
        to = %booking.status,
        actor = %auth.role(),
        "Booking status changed"
    );

    notify_customer(&state, &booking).await;
    Ok(Json(booking))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    body: Option<Json<CancelBookingRequest>>,
) -> Result<Json<CancelBookingResponse>, AppError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    req.validate()?;

    let caller = auth.clone();
    let (booking, refund) = state
        .db
        .cancel_booking(id, req.reason.as_deref(), Utc::now(), move |booking| {
            if caller.is_admin() || booking.user_id == caller.id() {
                Ok(())
            } else {
                Err(ServiceError::Forbidden(
                    "You can only cancel your own bookings".to_string(),
                ))
            }
        })
        .await?;

    metrics::record_booking_cancelled(refund.status.as_str());
    notify_customer(&state, &booking).await;

    Ok(Json(CancelBookingResponse {
        message: "Booking cancelled".to_string(),
        booking,
        refund_amount: refund.amount,
        refund_status: refund.status,
    }))
}

/// Public price quote with the advance/remaining split.
pub async fn ceremony_price(
    State(state): State<AppState>,
    Path(ceremony_type): Path<String>,
) -> Result<Json<CeremonyPriceResponse>, AppError> {
    let ceremonies = cached_ceremonies(&state).await?;
    let ceremony = ceremonies
        .iter()
        .find(|c| matches_type(c, &ceremony_type))
        .ok_or(ServiceError::NotFound("Ceremony"))?;

    let split = split_payment(ceremony.base_price).map_err(ServiceError::from)?;
    Ok(Json(CeremonyPriceResponse::new(ceremony.slug.clone(), split)))
}
