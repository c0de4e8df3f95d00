//! Site settings and editable static pages.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use service_core::error::AppError;

use crate::{
    domain::translation::{localize, PAGE_FIELDS},
    dtos::{
        content::{SettingResponse, UpdatePageRequest, UpdateSettingRequest},
        LangQuery,
    },
    models::{PageContent, SettingValueType},
    services::ServiceError,
    utils::ValidatedJson,
    AppState,
};

/// Type implied by the JSON shape of a new setting's value.
fn inferred_type(value: &Value) -> SettingValueType {
    match value {
        Value::Bool(_) => SettingValueType::Boolean,
        Value::Number(_) => SettingValueType::Number,
        Value::Array(_) | Value::Object(_) => SettingValueType::Json,
        Value::String(_) | Value::Null => SettingValueType::String,
    }
}

pub async fn list_settings(
    State(state): State<AppState>,
) -> Result<Json<Vec<SettingResponse>>, AppError> {
    let settings = state.db.list_settings().await?;
    Ok(Json(settings.iter().map(SettingResponse::from).collect()))
}

pub async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SettingResponse>, AppError> {
    let setting = state
        .db
        .find_setting(&key)
        .await?
        .ok_or(ServiceError::NotFound("Setting"))?;
    Ok(Json(SettingResponse::from(&setting)))
}

/// Stores a value after checking it against the declared, stored or
/// inferred type, in that order.
pub async fn update_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateSettingRequest>,
) -> Result<Json<SettingResponse>, AppError> {
    let value_type = match req.value_type {
        Some(t) => t,
        None => state
            .db
            .find_setting(&key)
            .await?
            .map(|s| s.value_type())
            .unwrap_or_else(|| inferred_type(&req.value)),
    };

    let raw = req.raw_value();
    if !value_type.accepts(&raw) {
        return Err(AppError::bad_request(format!(
            "Value is not a valid {}",
            value_type.as_str()
        )));
    }

    let setting = state
        .db
        .upsert_setting(&key, &raw, value_type, req.description.as_deref())
        .await?;

    tracing::info!(key = %key, value_type = value_type.as_str(), "Setting updated");
    Ok(Json(SettingResponse::from(&setting)))
}

fn localized(page: &PageContent, lang: Option<&str>) -> Result<Value, AppError> {
    let record = serde_json::to_value(page).map_err(anyhow::Error::from)?;
    Ok(localize(record, &page.translations, lang, PAGE_FIELDS))
}

pub async fn get_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<Json<Value>, AppError> {
    let page = state
        .db
        .find_page(&slug)
        .await?
        .ok_or(ServiceError::NotFound("Page"))?;
    Ok(Json(localized(&page, query.language())?))
}

pub async fn update_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdatePageRequest>,
) -> Result<Json<PageContent>, AppError> {
    let page = state
        .db
        .upsert_page(&slug, req.title.trim(), &req.content, &req.translations)
        .await?;

    tracing::info!(slug = %slug, "Page updated");
    Ok(Json(page))
}
