use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::Review;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub pandit_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,

    #[validate(length(max = 2000, message = "Comment must be at most 2000 characters"))]
    pub comment: Option<String>,

    #[validate(length(max = 200, message = "Ceremony type must be at most 200 characters"))]
    pub ceremony_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewResponse {
    pub review: Review,
    pub pandit_rating: Decimal,
    pub total_reviews: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_is_bounded() {
        for (rating, ok) in [(0, false), (1, true), (5, true), (6, false)] {
            let req: CreateReviewRequest = serde_json::from_value(serde_json::json!({
                "panditId": Uuid::new_v4(),
                "rating": rating
            }))
            .unwrap();
            assert_eq!(req.validate().is_ok(), ok, "rating {rating}");
        }
    }
}
