use std::sync::Arc;

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
    domain::translation::{localize, CEREMONY_FIELDS},
    dtos::{
        auth::MessageResponse,
        catalog::{normalize_slug, CeremonyRequest},
        LangQuery,
    },
    models::Ceremony,
    services::ServiceError,
    utils::ValidatedJson,
    AppState,
};

/// Active ceremonies, served from the catalog cache.
pub(crate) async fn cached_ceremonies(state: &AppState) -> Result<Arc<Vec<Ceremony>>, AppError> {
    let db = state.db.clone();
    let ceremonies = state
        .catalog_cache
        .get_or_load(|| async move { db.list_active_ceremonies().await })
        .await?;
    Ok(ceremonies)
}

/// A booking's ceremony type may be the slug or the display title.
pub(crate) fn matches_type(ceremony: &Ceremony, ceremony_type: &str) -> bool {
    let wanted = ceremony_type.trim();
    ceremony.slug.eq_ignore_ascii_case(wanted) || ceremony.title.eq_ignore_ascii_case(wanted)
}

fn localized(ceremony: &Ceremony, lang: Option<&str>) -> Result<Value, AppError> {
    let record = serde_json::to_value(ceremony).map_err(anyhow::Error::from)?;
    Ok(localize(record, &ceremony.translations, lang, CEREMONY_FIELDS))
}

pub async fn list_ceremonies(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Result<impl IntoResponse, AppError> {
    let ceremonies = cached_ceremonies(&state).await?;
    let items = ceremonies
        .iter()
        .map(|c| localized(c, query.language()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(items))
}

pub async fn get_ceremony(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<impl IntoResponse, AppError> {
    let ceremony = state
        .db
        .find_ceremony_by_slug(&slug)
        .await?
        .ok_or(ServiceError::NotFound("Ceremony"))?;
    Ok(Json(localized(&ceremony, query.language())?))
}

fn slug_for(req: &CeremonyRequest, existing: Option<&Ceremony>) -> Result<String, AppError> {
    match (&req.slug, existing) {
        (Some(raw), _) => normalize_slug(raw),
        (None, Some(c)) => Some(c.slug.clone()),
        (None, None) => normalize_slug(&req.title),
    }
    .ok_or_else(|| AppError::bad_request("A valid slug is required"))
}

fn check_price(req: &CeremonyRequest) -> Result<(), AppError> {
    if req.base_price <= rust_decimal::Decimal::ZERO {
        return Err(AppError::bad_request("Base price must be greater than zero"));
    }
    Ok(())
}

pub async fn create_ceremony(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CeremonyRequest>,
) -> Result<impl IntoResponse, AppError> {
    check_price(&req)?;
    let slug = slug_for(&req, None)?;

    let ceremony = state.db.save_ceremony(&req.into_ceremony(slug, None)).await?;
    state.catalog_cache.invalidate().await;

    tracing::info!(ceremony_id = %ceremony.ceremony_id, slug = %ceremony.slug, "Ceremony created");
    Ok((StatusCode::CREATED, Json(ceremony)))
}

pub async fn update_ceremony(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<CeremonyRequest>,
) -> Result<impl IntoResponse, AppError> {
    check_price(&req)?;
    let existing = state
        .db
        .find_ceremony_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound("Ceremony"))?;
    let slug = slug_for(&req, Some(&existing))?;

    let ceremony = state
        .db
        .save_ceremony(&req.into_ceremony(slug, Some(&existing)))
        .await?;
    state.catalog_cache.invalidate().await;

    tracing::info!(ceremony_id = %id, "Ceremony updated");
    Ok(Json(ceremony))
}

pub async fn delete_ceremony(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.db.deactivate_ceremony(id).await?;
    state.catalog_cache.invalidate().await;

    tracing::info!(ceremony_id = %id, "Ceremony deactivated");
    Ok(Json(MessageResponse::new("Ceremony deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn ceremony() -> Ceremony {
        let now = Utc::now();
        Ceremony {
            ceremony_id: Uuid::new_v4(),
            slug: "satyanarayan-puja".into(),
            title: "Satyanarayan Puja".into(),
            description: "Monthly puja".into(),
            samagri: json!(["Banana leaves"]),
            process_steps: json!(["Sankalp"]),
            base_price: Decimal::from(2100),
            duration_minutes: Some(120),
            image_url: None,
            videos: json!([]),
            reviews: json!([]),
            translations: json!({ "hi": { "title": "सत्यनारायण पूजा", "process": ["संकल्प"] } }),
            is_active: true,
            created_utc: now,
            updated_utc: now,
        }
    }

    #[test]
    fn type_matches_slug_or_title() {
        let c = ceremony();
        assert!(matches_type(&c, "satyanarayan-puja"));
        assert!(matches_type(&c, "satyanarayan puja"));
        assert!(!matches_type(&c, "griha-pravesh"));
    }

    #[test]
    fn type_match_ignores_slug_case_and_padding() {
        let c = ceremony();
        assert!(matches_type(&c, "SATYANARAYAN-PUJA"));
        assert!(matches_type(&c, "  Satyanarayan-Puja "));
    }

    #[test]
    fn localized_overlays_requested_language() {
        let c = ceremony();
        let hi = localized(&c, Some("hi")).unwrap();
        assert_eq!(hi["title"], "सत्यनारायण पूजा");
        assert_eq!(hi["processSteps"], json!(["संकल्प"]));
        assert_eq!(hi["description"], "Monthly puja");

        let base = localized(&c, None).unwrap();
        assert_eq!(base["title"], "Satyanarayan Puja");
    }
}
