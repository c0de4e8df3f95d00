use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use super::Database;
use crate::services::ServiceError;

/// Dashboard counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: i64,
    pub total_pandits: i64,
    pub verified_pandits: i64,
    pub online_pandits: i64,
    pub total_bookings: i64,
    pub bookings_by_status: BTreeMap<String, i64>,
    /// Sum of all captured advance and remaining portions.
    pub revenue: Decimal,
    pub pending_refunds: i64,
}

impl Database {
    pub async fn admin_stats(&self) -> Result<AdminStats, ServiceError> {
        let (total_users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let (total_pandits, verified_pandits, online_pandits): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE is_verified),
                   COUNT(*) FILTER (WHERE is_online)
            FROM pandits
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let by_status: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM bookings GROUP BY status")
                .fetch_all(&self.pool)
                .await?;

        let (revenue, pending_refunds): (Decimal, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(
                       CASE WHEN advance_paid THEN advance_amount ELSE 0 END
                     + CASE WHEN remaining_paid THEN remaining_amount ELSE 0 END
                   ), 0)::NUMERIC(14, 2),
                   COUNT(*) FILTER (WHERE refund_status IN ('full', 'partial'))
            FROM bookings
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let total_bookings = by_status.iter().map(|(_, n)| n).sum();

        Ok(AdminStats {
            total_users,
            total_pandits,
            verified_pandits,
            online_pandits,
            total_bookings,
            bookings_by_status: by_status.into_iter().collect(),
            revenue,
            pending_refunds,
        })
    }
}
