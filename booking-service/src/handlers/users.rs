use axum::{extract::State, Json};
use serde_json::Value;
use service_core::error::AppError;

use crate::{
    dtos::users::UpdateProfileRequest,
    middleware::AuthUser,
    models::Role,
    services::{PanditProfileUpdate, ServiceError},
    utils::ValidatedJson,
    AppState,
};

fn to_json<T: serde::Serialize>(value: &T) -> Result<Json<Value>, AppError> {
    Ok(Json(serde_json::to_value(value).map_err(anyhow::Error::from)?))
}

/// Full profile of the caller: the pandit record for pandits, else the user.
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    match auth.role() {
        Role::Pandit => {
            let pandit = state
                .db
                .find_pandit_by_id(auth.id())
                .await?
                .ok_or(ServiceError::NotFound("Pandit"))?;
            to_json(&pandit)
        }
        Role::User | Role::Admin => {
            let user = state
                .db
                .find_user_by_id(auth.id())
                .await?
                .ok_or(ServiceError::NotFound("User"))?;
            to_json(&user)
        }
    }
}

pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let updated = match auth.role() {
        Role::Pandit => {
            let update = PanditProfileUpdate::from(req);
            to_json(&state.db.update_pandit_profile(auth.id(), &update).await?)?
        }
        Role::User | Role::Admin => to_json(
            &state
                .db
                .update_user_profile(auth.id(), req.name.as_deref(), req.phone.as_deref())
                .await?,
        )?,
    };

    tracing::info!(principal_id = %auth.id(), role = %auth.role(), "Profile updated");
    Ok(updated)
}
