use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use super::bookings::notify_customer;
use crate::{
    domain::assignment::available_at,
    dtos::admin::{
        AssignPanditRequest, AssignPanditResponse, AvailablePandit, AvailablePanditsQuery,
        VerifyPanditRequest,
    },
    dtos::bookings::BookingListQuery,
    models::{AvailabilitySlot, BookingView, Pandit, User},
    services::{AdminStats, BookingScope, PanditFilter},
    AppState,
};

/// Assigns a pandit, booking the chosen slot or a synthesized one.
pub async fn assign_pandit(
    State(state): State<AppState>,
    Json(req): Json<AssignPanditRequest>,
) -> Result<Json<AssignPanditResponse>, AppError> {
    let (booking, slot) = state
        .db
        .assign_pandit(req.booking_id, req.pandit_id, req.slot_id)
        .await?;

    notify_customer(&state, &booking).await;

    Ok(Json(AssignPanditResponse {
        message: "Pandit assigned".to_string(),
        booking,
        slot,
    }))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<AdminStats>, AppError> {
    Ok(Json(state.db.admin_stats().await?))
}

/// Verified pandits free at `date`/`time`: an open slot covers the time, or
/// they are online with no booked slot covering it.
pub async fn available_pandits(
    State(state): State<AppState>,
    Query(query): Query<AvailablePanditsQuery>,
) -> Result<Json<Vec<AvailablePandit>>, AppError> {
    let pandits = state
        .db
        .list_verified_pandits(&PanditFilter::default())
        .await?;

    let mut by_pandit: HashMap<Uuid, Vec<AvailabilitySlot>> = HashMap::new();
    for slot in state.db.verified_slots_on_date(query.date).await? {
        by_pandit.entry(slot.pandit_id).or_default().push(slot);
    }

    let available = pandits
        .into_iter()
        .filter_map(|pandit| {
            let slots = by_pandit.remove(&pandit.pandit_id).unwrap_or_default();
            available_at(pandit.is_online, &slots, query.date, query.time).then(|| AvailablePandit {
                slots: slots.into_iter().filter(|s| s.is_bookable()).collect(),
                pandit,
            })
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        date = %query.date,
        time = %query.time,
        count = available.len(),
        "Available pandits resolved"
    );
    Ok(Json(available))
}

pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    Ok(Json(
        state.db.list_bookings(BookingScope::All, query.status).await?,
    ))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.db.list_users().await?))
}

pub async fn list_pandits(State(state): State<AppState>) -> Result<Json<Vec<Pandit>>, AppError> {
    Ok(Json(state.db.list_all_pandits().await?))
}

pub async fn verify_pandit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<VerifyPanditRequest>,
) -> Result<Json<Pandit>, AppError> {
    let pandit = state.db.set_pandit_verified(id, req.is_verified).await?;
    tracing::info!(pandit_id = %id, verified = req.is_verified, "Pandit verification changed");
    Ok(Json(pandit))
}
