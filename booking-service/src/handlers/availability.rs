use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;

use crate::{
    domain::assignment::ranges_overlap,
    dtos::{
        auth::MessageResponse,
        availability::{SlotRangeQuery, SlotRequest},
    },
    middleware::AuthUser,
    models::AvailabilitySlot,
    services::ServiceError,
    utils::ValidatedJson,
    AppState,
};

/// Rejects inverted ranges and overlaps with the pandit's other slots that day.
async fn check_slot(
    state: &AppState,
    pandit_id: Uuid,
    req: &SlotRequest,
    exclude: Option<Uuid>,
) -> Result<(), AppError> {
    if !req.has_valid_range() {
        return Err(AppError::bad_request("End time must be after start time"));
    }

    let existing = state.db.slots_on_date(pandit_id, req.date, exclude).await?;
    if existing
        .iter()
        .any(|s| ranges_overlap(s.start_time, s.end_time, req.start_time, req.end_time))
    {
        return Err(ServiceError::Conflict(
            "Slot overlaps an existing slot".to_string(),
        )
        .into());
    }
    Ok(())
}

/// Loads a slot owned by the calling pandit.
async fn own_slot(state: &AppState, auth: &AuthUser, id: Uuid) -> Result<AvailabilitySlot, AppError> {
    let slot = state
        .db
        .find_slot(id)
        .await?
        .ok_or(ServiceError::NotFound("Availability slot"))?;
    if slot.pandit_id != auth.id() {
        return Err(AppError::forbidden("You can only manage your own slots"));
    }
    Ok(slot)
}

pub async fn create_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<SlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    check_slot(&state, auth.id(), &req, None).await?;

    let slot = AvailabilitySlot::new(
        auth.id(),
        req.date,
        req.start_time,
        req.end_time,
        req.slot_type.into(),
        req.notes,
    );
    let slot = state.db.insert_slot(&slot).await?;

    tracing::info!(slot_id = %slot.slot_id, pandit_id = %auth.id(), "Availability slot created");
    Ok((StatusCode::CREATED, Json(slot)))
}

pub async fn list_own_slots(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SlotRangeQuery>,
) -> Result<Json<Vec<AvailabilitySlot>>, AppError> {
    Ok(Json(
        state.db.list_slots(auth.id(), query.from, query.to).await?,
    ))
}

/// Public: open slots of a pandit from today on.
pub async fn list_pandit_slots(
    State(state): State<AppState>,
    Path(pandit_id): Path<Uuid>,
) -> Result<Json<Vec<AvailabilitySlot>>, AppError> {
    Ok(Json(
        state
            .db
            .list_open_slots(pandit_id, Utc::now().date_naive())
            .await?,
    ))
}

pub async fn update_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<SlotRequest>,
) -> Result<Json<AvailabilitySlot>, AppError> {
    own_slot(&state, &auth, id).await?;
    check_slot(&state, auth.id(), &req, Some(id)).await?;

    let slot = state
        .db
        .update_slot(
            id,
            req.date,
            req.start_time,
            req.end_time,
            req.slot_type.into(),
            req.notes.as_deref(),
        )
        .await?;
    Ok(Json(slot))
}

pub async fn delete_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    own_slot(&state, &auth, id).await?;
    state.db.delete_slot(id).await?;

    tracing::info!(slot_id = %id, "Availability slot deleted");
    Ok(Json(MessageResponse::new("Slot deleted")))
}
