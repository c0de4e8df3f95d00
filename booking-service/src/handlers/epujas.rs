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
        catalog::{normalize_slug, tiers_are_valid, EpujaRequest},
        LangQuery,
    },
    models::Epuja,
    services::ServiceError,
    utils::ValidatedJson,
    AppState,
};

fn localized(epuja: &Epuja, lang: Option<&str>) -> Result<Value, AppError> {
    let record = serde_json::to_value(epuja).map_err(anyhow::Error::from)?;
    Ok(localize(record, &epuja.translations, lang, OFFERING_FIELDS))
}

fn prepare(req: &EpujaRequest, existing: Option<&Epuja>) -> Result<String, AppError> {
    if !tiers_are_valid(&req.pricing_tiers) {
        return Err(AppError::bad_request(
            "Every pricing tier needs a name and a positive price",
        ));
    }
    match (&req.slug, existing) {
        (Some(raw), _) => normalize_slug(raw),
        (None, Some(e)) => Some(e.slug.clone()),
        (None, None) => normalize_slug(&req.name),
    }
    .ok_or_else(|| AppError::bad_request("A valid slug is required"))
}

pub async fn list_epujas(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Result<impl IntoResponse, AppError> {
    let epujas = state.db.list_active_epujas().await?;
    let items = epujas
        .iter()
        .map(|e| localized(e, query.language()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(items))
}

pub async fn get_epuja(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<impl IntoResponse, AppError> {
    let epuja = state
        .db
        .find_epuja_by_slug(&slug)
        .await?
        .ok_or(ServiceError::NotFound("E-puja"))?;
    Ok(Json(localized(&epuja, query.language())?))
}

pub async fn create_epuja(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<EpujaRequest>,
) -> Result<impl IntoResponse, AppError> {
    let slug = prepare(&req, None)?;
    let epuja = req.into_epuja(slug, None).map_err(anyhow::Error::from)?;
    let epuja = state.db.save_epuja(&epuja).await?;

    tracing::info!(epuja_id = %epuja.epuja_id, slug = %epuja.slug, "E-puja created");
    Ok((StatusCode::CREATED, Json(epuja)))
}

pub async fn update_epuja(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<EpujaRequest>,
) -> Result<impl IntoResponse, AppError> {
    let existing = state
        .db
        .find_epuja_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound("E-puja"))?;
    let slug = prepare(&req, Some(&existing))?;

    let epuja = req
        .into_epuja(slug, Some(&existing))
        .map_err(anyhow::Error::from)?;
    let epuja = state.db.save_epuja(&epuja).await?;

    tracing::info!(epuja_id = %id, "E-puja updated");
    Ok(Json(epuja))
}

pub async fn delete_epuja(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.db.deactivate_epuja(id).await?;
    tracing::info!(epuja_id = %id, "E-puja deactivated");
    Ok(Json(MessageResponse::new("E-puja deleted")))
}
