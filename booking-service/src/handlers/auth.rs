use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rand::{distributions::Alphanumeric, Rng};
use service_core::error::AppError;
use validator::Validate;

use crate::{
    dtos::auth::{
        AuthResponse, LoginRequest, LoginRole, MessageResponse, PrincipalResponse,
        RegisterPanditRequest, RegisterUserRequest, VerifyEmailQuery,
    },
    middleware::AuthUser,
    models::{Pandit, Role, User},
    services::ServiceError,
    utils::{hash_password, verify_password, Password, PasswordHashString, ValidatedJson},
    AppState,
};

const VERIFICATION_TOKEN_LENGTH: usize = 48;

fn verification_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(VERIFICATION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

fn issue(state: &AppState, id: uuid::Uuid, role: Role, user: PrincipalResponse) -> Result<AuthResponse, AppError> {
    let token = state.jwt.generate_token(id, role)?;
    Ok(AuthResponse { token, user })
}

async fn ensure_email_free(state: &AppState, email: &str) -> Result<(), AppError> {
    if state.db.email_taken(email).await? {
        return Err(ServiceError::Conflict("Email already registered".to_string()).into());
    }
    Ok(())
}

pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_email_free(&state, &req.email).await?;

    let password_hash = hash_password(&Password::new(req.password))?;
    let token = verification_token();
    let user = User::new(
        req.name.trim().to_string(),
        req.email,
        password_hash.into_string(),
        req.phone,
        token.clone(),
    );

    state.db.insert_user(&user).await?;
    tracing::info!(user_id = %user.user_id, "User registered");

    state
        .notifier
        .verification_email(&user.email, &user.name, &token)
        .await;

    let res = issue(&state, user.user_id, Role::User, PrincipalResponse::from(&user))?;
    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn register_pandit(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterPanditRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_email_free(&state, &req.email).await?;

    let password_hash = hash_password(&Password::new(req.password))?;
    let pandit = Pandit::new(
        req.name.trim().to_string(),
        req.email,
        password_hash.into_string(),
        req.phone,
        req.specialization,
        req.experience_years,
        req.languages,
        req.city,
        req.bio,
    );

    state.db.insert_pandit(&pandit).await?;
    tracing::info!(pandit_id = %pandit.pandit_id, "Pandit registered, awaiting verification");

    let res = issue(
        &state,
        pandit.pandit_id,
        Role::Pandit,
        PrincipalResponse::from(&pandit),
    )?;
    Ok((StatusCode::CREATED, Json(res)))
}

fn password_matches(password: &Password, hash: &str) -> bool {
    verify_password(password, &PasswordHashString::new(hash.to_string())).is_ok()
}

/// Checks customer accounts first unless the caller hints `pandit`.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let password = Password::new(req.password);

    let pandit_first = req.role == Some(LoginRole::Pandit);
    let mut found = None;

    for check_pandits in [pandit_first, !pandit_first] {
        if check_pandits {
            if let Some(pandit) = state.db.find_pandit_by_email(&req.email).await? {
                if password_matches(&password, &pandit.password_hash) {
                    found = Some((pandit.pandit_id, Role::Pandit, PrincipalResponse::from(&pandit)));
                    break;
                }
            }
        } else if let Some(user) = state.db.find_user_by_email(&req.email).await? {
            if password_matches(&password, &user.password_hash) {
                found = Some((user.user_id, user.role(), PrincipalResponse::from(&user)));
                break;
            }
        }
    }

    let Some((id, role, principal)) = found else {
        tracing::info!("Login rejected");
        return Err(ServiceError::InvalidCredentials.into());
    };

    tracing::info!(principal_id = %id, role = %role, "Login succeeded");
    Ok(Json(issue(&state, id, role, principal)?))
}

pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;

    let user = state
        .db
        .verify_user_email(&query.token)
        .await?
        .ok_or(ServiceError::InvalidVerificationToken)?;

    tracing::info!(user_id = %user.user_id, "Email verified");
    Ok(Json(MessageResponse::new("Email verified successfully")))
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let principal = match auth.role() {
        Role::Pandit => state
            .db
            .find_pandit_by_id(auth.id())
            .await?
            .map(|p| PrincipalResponse::from(&p)),
        Role::User | Role::Admin => state
            .db
            .find_user_by_id(auth.id())
            .await?
            .map(|u| PrincipalResponse::from(&u)),
    };

    principal
        .map(Json)
        .ok_or_else(|| AppError::not_found("Account not found"))
}
