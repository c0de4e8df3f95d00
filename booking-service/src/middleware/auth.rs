use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::{models::Role, services::AccessTokenClaims, AppState};

pub const ADMIN: &[Role] = &[Role::Admin];
pub const PANDIT: &[Role] = &[Role::Pandit];
pub const USER: &[Role] = &[Role::User];
pub const ADMIN_OR_PANDIT: &[Role] = &[Role::Admin, Role::Pandit];
pub const USER_OR_ADMIN: &[Role] = &[Role::User, Role::Admin];

/// Validates the bearer token and stores its claims in the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::unauthorized("Missing or invalid Authorization header"))?;

    let claims = state.jwt.validate_token(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected access token");
        AppError::unauthorized("Invalid or expired token")
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Rejects principals whose role is not in `allowed`. Must run after
/// [`auth_middleware`].
pub async fn require_roles(
    State(allowed): State<&'static [Role]>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = req
        .extensions()
        .get::<AccessTokenClaims>()
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    if !allowed.contains(&claims.role) {
        tracing::warn!(
            principal_id = %claims.id,
            role = %claims.role,
            "Role not permitted for route"
        );
        return Err(AppError::forbidden("Access denied"));
    }

    Ok(next.run(req).await)
}

/// Extractor for the authenticated principal.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AccessTokenClaims);

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn is_admin(&self) -> bool {
        self.0.role == Role::Admin
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<AccessTokenClaims>()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

        Ok(AuthUser(claims.clone()))
    }
}
