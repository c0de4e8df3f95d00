use rust_decimal::Decimal;
use uuid::Uuid;

use super::Database;
use crate::domain::rating;
use crate::models::{Review, ReviewView};
use crate::services::ServiceError;

impl Database {
    /// Inserts a review and recomputes the pandit's rating in one
    /// transaction. The pandit row is locked so concurrent reviews
    /// serialise on the aggregate.
    pub async fn create_review(&self, review: &Review) -> Result<(Review, Decimal, i32), ServiceError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_as::<_, (Uuid,)>(
            "SELECT pandit_id FROM pandits WHERE pandit_id = $1 FOR UPDATE",
        )
        .bind(review.pandit_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::NotFound("Pandit"))?;

        let (has_completed,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM bookings
                WHERE user_id = $1 AND pandit_id = $2 AND status = 'completed'
            )
            "#,
        )
        .bind(review.user_id)
        .bind(review.pandit_id)
        .fetch_one(&mut *tx)
        .await?;

        if !has_completed {
            return Err(ServiceError::Forbidden(
                "You can only review pandits who completed a booking for you".to_string(),
            ));
        }

        let saved = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (review_id, user_id, pandit_id, rating, comment, ceremony_type,
                                 created_utc, updated_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(review.review_id)
        .bind(review.user_id)
        .bind(review.pandit_id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(&review.ceremony_type)
        .bind(review.created_utc)
        .bind(review.updated_utc)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            ServiceError::on_unique_violation(e, "You have already reviewed this pandit")
        })?;

        let ratings: Vec<i16> =
            sqlx::query_scalar("SELECT rating FROM reviews WHERE pandit_id = $1")
                .bind(review.pandit_id)
                .fetch_all(&mut *tx)
                .await?;
        let (average, count) = rating::recompute(&ratings);

        sqlx::query(
            "UPDATE pandits SET rating = $2, total_reviews = $3, updated_utc = NOW() WHERE pandit_id = $1",
        )
        .bind(review.pandit_id)
        .bind(average)
        .bind(count)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            pandit_id = %review.pandit_id,
            rating = %average,
            total_reviews = count,
            "Pandit rating updated"
        );

        Ok((saved, average, count))
    }

    pub async fn list_reviews_for_pandit(
        &self,
        pandit_id: Uuid,
    ) -> Result<Vec<ReviewView>, ServiceError> {
        let reviews = sqlx::query_as::<_, ReviewView>(
            r#"
            SELECT r.*, u.name AS user_name
            FROM reviews r
            JOIN users u ON u.user_id = r.user_id
            WHERE r.pandit_id = $1
            ORDER BY r.created_utc DESC
            "#,
        )
        .bind(pandit_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }
}
