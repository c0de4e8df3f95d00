use axum::{
    extract::{Path, Query, State},
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::{
    dtos::users::{OnlineStatusRequest, PanditListQuery},
    middleware::AuthUser,
    models::Pandit,
    services::ServiceError,
    AppState,
};

/// Public directory of verified pandits.
pub async fn list_pandits(
    State(state): State<AppState>,
    Query(query): Query<PanditListQuery>,
) -> Result<Json<Vec<Pandit>>, AppError> {
    Ok(Json(state.db.list_verified_pandits(&query.into()).await?))
}

pub async fn get_pandit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Pandit>, AppError> {
    let pandit = state
        .db
        .find_pandit_by_id(id)
        .await?
        .filter(|p| p.is_verified)
        .ok_or(ServiceError::NotFound("Pandit"))?;
    Ok(Json(pandit))
}

pub async fn set_online_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<OnlineStatusRequest>,
) -> Result<Json<Pandit>, AppError> {
    let pandit = state.db.set_pandit_online(auth.id(), req.is_online).await?;
    tracing::info!(pandit_id = %auth.id(), online = req.is_online, "Online status changed");
    Ok(Json(pandit))
}
