use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use service_core::error::AppError;
use uuid::Uuid;

use crate::{
    domain::translation::{localize, OFFERING_FIELDS},
    dtos::{
        auth::MessageResponse,
        catalog::{normalize_slug, tiers_are_valid, DoshaRequest},
        LangQuery,
    },
    models::Dosha,
    services::ServiceError,
    utils::ValidatedJson,
    AppState,
};

fn localized(dosha: &Dosha, lang: Option<&str>) -> Result<Value, AppError> {
    let record = serde_json::to_value(dosha).map_err(anyhow::Error::from)?;
    Ok(localize(record, &dosha.translations, lang, OFFERING_FIELDS))
}

fn prepare(req: &DoshaRequest, existing: Option<&Dosha>) -> Result<String, AppError> {
    if !tiers_are_valid(&req.pricing_tiers) {
        return Err(AppError::bad_request(
            "Every pricing tier needs a name and a positive price",
        ));
    }
    match (&req.slug, existing) {
        (Some(raw), _) => normalize_slug(raw),
        (None, Some(d)) => Some(d.slug.clone()),
        (None, None) => normalize_slug(&req.name),
    }
    .ok_or_else(|| AppError::bad_request("A valid slug is required"))
}

pub async fn list_doshas(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Result<impl IntoResponse, AppError> {
    let doshas = state.db.list_active_doshas().await?;
    let items = doshas
        .iter()
        .map(|d| localized(d, query.language()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(items))
}

pub async fn get_dosha(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<impl IntoResponse, AppError> {
    let dosha = state
        .db
        .find_dosha_by_slug(&slug)
        .await?
        .ok_or(ServiceError::NotFound("Dosha"))?;
    Ok(Json(localized(&dosha, query.language())?))
}

pub async fn create_dosha(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<DoshaRequest>,
) -> Result<impl IntoResponse, AppError> {
    let slug = prepare(&req, None)?;
    let dosha = req.into_dosha(slug, None).map_err(anyhow::Error::from)?;
    let dosha = state.db.save_dosha(&dosha).await?;

    tracing::info!(dosha_id = %dosha.dosha_id, slug = %dosha.slug, "Dosha created");
    Ok((StatusCode::CREATED, Json(dosha)))
}

pub async fn update_dosha(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<DoshaRequest>,
) -> Result<impl IntoResponse, AppError> {
    let existing = state
        .db
        .find_dosha_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound("Dosha"))?;
    let slug = prepare(&req, Some(&existing))?;

    let dosha = req
        .into_dosha(slug, Some(&existing))
        .map_err(anyhow::Error::from)?;
    let dosha = state.db.save_dosha(&dosha).await?;

    tracing::info!(dosha_id = %id, "Dosha updated");
    Ok(Json(dosha))
}

pub async fn delete_dosha(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.db.deactivate_dosha(id).await?;
    tracing::info!(dosha_id = %id, "Dosha deactivated");
    Ok(Json(MessageResponse::new("Dosha deleted")))
}
