use service_core::error::AppError;
use thiserror::Error;

use crate::domain::DomainError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired verification token")]
    InvalidVerificationToken,

    #[error("Invalid payment signature")]
    InvalidSignature,

    #[error("Payment gateway is not configured")]
    GatewayNotConfigured,

    /// Gateway rejected the call; the message is the gateway's own.
    #[error("{0}")]
    Gateway(String),
}

impl ServiceError {
    /// Maps a unique-constraint violation to `Conflict`, leaving other errors as-is.
    pub fn on_unique_violation(err: sqlx::Error, message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ServiceError::Conflict(message.to_string())
            }
            _ => ServiceError::Database(err),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(e) => AppError::DatabaseError(anyhow::Error::new(e)),
            ServiceError::Domain(e) => match e {
                DomainError::Forbidden(msg) => AppError::Forbidden(anyhow::anyhow!(msg)),
                other => AppError::BadRequest(anyhow::anyhow!(other.to_string())),
            },
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::NotFound(what) => AppError::NotFound(anyhow::anyhow!("{} not found", what)),
            ServiceError::Forbidden(msg) => AppError::Forbidden(anyhow::anyhow!(msg)),
            ServiceError::Conflict(msg) | ServiceError::Validation(msg) => {
                AppError::BadRequest(anyhow::anyhow!(msg))
            }
            ServiceError::InvalidCredentials => {
                AppError::Unauthorized(anyhow::anyhow!("Invalid credentials"))
            }
            ServiceError::InvalidVerificationToken => {
                AppError::BadRequest(anyhow::anyhow!("Invalid or expired verification token"))
            }
            ServiceError::InvalidSignature => {
                AppError::BadRequest(anyhow::anyhow!("Invalid payment signature"))
            }
            ServiceError::GatewayNotConfigured => {
                AppError::UpstreamError("Payment gateway is not configured".to_string())
            }
            ServiceError::Gateway(msg) => AppError::UpstreamError(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn taxonomy_maps_to_http_statuses() {
        let cases = [
            (ServiceError::NotFound("Booking"), StatusCode::NOT_FOUND),
            (
                ServiceError::Forbidden("not yours".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                ServiceError::Conflict("duplicate".into()),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::InvalidSignature, StatusCode::BAD_REQUEST),
            (ServiceError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                ServiceError::Gateway("BAD_REQUEST_ERROR - amount".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ServiceError::Domain(DomainError::Forbidden("nope".into())),
                StatusCode::FORBIDDEN,
            ),
            (
                ServiceError::Domain(DomainError::Conflict("already cancelled".into())),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn gateway_message_is_preserved() {
        match AppError::from(ServiceError::Gateway("The amount is invalid".into())) {
            AppError::UpstreamError(msg) => assert_eq!(msg, "The amount is invalid"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
