//! PostgreSQL access for the marketplace.
//!
//! Runtime-checked `sqlx` queries. Multi-row mutations (cancel, assign,
//! review) run inside a single transaction with the touched rows locked.

mod admin;
mod availability;
mod bookings;
mod catalog;
mod content;
mod pandits;
mod reviews;
mod service_bookings;
mod users;

use sqlx::postgres::PgPool;

use super::ServiceError;

pub use admin::AdminStats;
pub use bookings::{BookingScope, PaymentCapture};
pub use pandits::{PanditFilter, PanditProfileUpdate};

/// PostgreSQL database wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Health check - ping the database.
    pub async fn health_check(&self) -> Result<(), ServiceError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Database health check failed");
                ServiceError::Database(e)
            })?;
        Ok(())
    }
}
