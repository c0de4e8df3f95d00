use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::{
    dtos::reviews::{CreateReviewRequest, CreateReviewResponse},
    middleware::AuthUser,
    models::{Review, ReviewView},
    utils::ValidatedJson,
    AppState,
};

/// One review per customer and pandit, after a completed booking.
pub async fn create_review(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let review = Review::new(
        auth.id(),
        req.pandit_id,
        req.rating,
        req.comment,
        req.ceremony_type,
    );
    let (review, pandit_rating, total_reviews) = state.db.create_review(&review).await?;

    tracing::info!(
        review_id = %review.review_id,
        pandit_id = %review.pandit_id,
        rating = %pandit_rating,
        total_reviews,
        "Review recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateReviewResponse {
            review,
            pandit_rating,
            total_reviews,
        }),
    ))
}

pub async fn list_pandit_reviews(
    State(state): State<AppState>,
    Path(pandit_id): Path<Uuid>,
) -> Result<Json<Vec<ReviewView>>, AppError> {
    Ok(Json(state.db.list_reviews_for_pandit(pandit_id).await?))
}
