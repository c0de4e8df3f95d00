//! Dosha remedy and e-puja bookings, priced by a named catalog tier.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use super::bookings::scope_for;
use crate::{
    domain::lifecycle::ensure_assigned,
    dtos::service_bookings::{
        CreateDoshaBookingRequest, CreateEpujaBookingRequest, UpdateServiceBookingRequest,
    },
    middleware::AuthUser,
    models::{DoshaBooking, EpujaBooking},
    services::{metrics, ServiceError},
    utils::ValidatedJson,
    AppState,
};

/// Pandits may only move bookings assigned to them and never reassign.
async fn authorize_update(
    state: &AppState,
    auth: &AuthUser,
    assigned: Option<Uuid>,
    req: &UpdateServiceBookingRequest,
) -> Result<(), AppError> {
    if !auth.is_admin() {
        ensure_assigned(assigned, auth.id()).map_err(ServiceError::from)?;
        if req.pandit_id.is_some() {
            return Err(AppError::forbidden("Only admins can assign pandits"));
        }
    }

    if let Some(pandit_id) = req.pandit_id {
        state
            .db
            .find_pandit_by_id(pandit_id)
            .await?
            .ok_or(ServiceError::NotFound("Pandit"))?;
    }
    Ok(())
}

fn unknown_tier(name: &str) -> AppError {
    AppError::bad_request(format!("Unknown pricing tier: {}", name))
}

pub async fn create_dosha_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateDoshaBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let dosha = state
        .db
        .find_dosha_by_id(req.dosha_id)
        .await?
        .filter(|d| d.is_active)
        .ok_or(ServiceError::NotFound("Dosha"))?;
    let tier = dosha
        .tier(&req.tier_name)
        .ok_or_else(|| unknown_tier(&req.tier_name))?;

    let booking = req.into_booking(auth.id(), tier);
    state.db.insert_dosha_booking(&booking).await?;
    metrics::record_booking_created("dosha");

    tracing::info!(
        dosha_booking_id = %booking.dosha_booking_id,
        dosha = %dosha.slug,
        tier = %booking.tier_name,
        "Dosha booking created"
    );
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn list_dosha_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<DoshaBooking>>, AppError> {
    Ok(Json(state.db.list_dosha_bookings(scope_for(&auth)).await?))
}

pub async fn update_dosha_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateServiceBookingRequest>,
) -> Result<Json<DoshaBooking>, AppError> {
    if req.video_link.is_some() {
        return Err(AppError::bad_request("Video links only apply to e-puja bookings"));
    }

    let current = state
        .db
        .find_dosha_booking(id)
        .await?
        .ok_or(ServiceError::NotFound("Dosha booking"))?;
    authorize_update(&state, &auth, current.pandit_id, &req).await?;

    let booking = state
        .db
        .update_dosha_booking(id, req.status, req.pandit_id)
        .await?;

    tracing::info!(dosha_booking_id = %id, status = %booking.status, "Dosha booking updated");
    Ok(Json(booking))
}

pub async fn create_epuja_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateEpujaBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let epuja = state
        .db
        .find_epuja_by_id(req.epuja_id)
        .await?
        .filter(|e| e.is_active)
        .ok_or(ServiceError::NotFound("E-puja"))?;
    let tier = epuja
        .tier(&req.tier_name)
        .ok_or_else(|| unknown_tier(&req.tier_name))?;

    let booking = req.into_booking(auth.id(), tier);
    state.db.insert_epuja_booking(&booking).await?;
    metrics::record_booking_created("epuja");

    tracing::info!(
        epuja_booking_id = %booking.epuja_booking_id,
        epuja = %epuja.slug,
        tier = %booking.tier_name,
        "E-puja booking created"
    );
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn list_epuja_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<EpujaBooking>>, AppError> {
    Ok(Json(state.db.list_epuja_bookings(scope_for(&auth)).await?))
}

pub async fn update_epuja_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateServiceBookingRequest>,
) -> Result<Json<EpujaBooking>, AppError> {
    let current = state
        .db
        .find_epuja_booking(id)
        .await?
        .ok_or(ServiceError::NotFound("E-puja booking"))?;
    authorize_update(&state, &auth, current.pandit_id, &req).await?;

    let booking = state
        .db
        .update_epuja_booking(id, req.status, req.pandit_id, req.video_link.as_deref())
        .await?;

    tracing::info!(epuja_booking_id = %id, status = %booking.status, "E-puja booking updated");
    Ok(Json(booking))
}
