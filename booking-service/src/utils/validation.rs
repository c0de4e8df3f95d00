use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use validator::Validate;

/// JSON body that has passed its `validator` rules. Malformed JSON and
/// rule violations both become 400 responses.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(format!("Invalid request body: {}", e.body_text())))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, response::IntoResponse, routing::post, Router};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
        password: String,
    }

    async fn handler(ValidatedJson(p): ValidatedJson<Probe>) -> impl IntoResponse {
        p.password.len().to_string()
    }

    fn app() -> Router {
        Router::new().route("/", post(handler))
    }

    fn request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_body_passes() {
        let res = app().oneshot(request(r#"{"password":"secret1"}"#)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn rule_violation_is_bad_request() {
        let res = app().oneshot(request(r#"{"password":"abc"}"#)).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let res = app().oneshot(request("{not json")).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
