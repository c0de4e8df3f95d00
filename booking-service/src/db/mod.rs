//! Postgres pool and schema migrations for the booking store.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .connect(config.url.expose_secret())
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Booking database pool ready"
    );

    Ok(pool)
}

/// Applies pending migrations; already-applied ones are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    tracing::info!(
        known = MIGRATOR.iter().count(),
        "Applying booking schema migrations"
    );
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    #[tokio::test]
    #[ignore] // Requires running PostgreSQL
    async fn migrations_create_the_booking_tables() {
        let url = std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/booking_test".to_string());
        let config = DatabaseConfig {
            url: Secret::new(url),
            max_connections: 2,
            min_connections: 1,
        };

        let pool = create_pool(&config).await.expect("pool");
        run_migrations(&pool).await.expect("migrations");
        // Second run is a no-op
        run_migrations(&pool).await.expect("re-run migrations");

        for table in ["users", "pandits", "bookings", "pandit_availability", "reviews"] {
            let (exists,): (bool,) = sqlx::query_as("SELECT to_regclass($1) IS NOT NULL")
                .bind(format!("public.{table}"))
                .fetch_one(&pool)
                .await
                .expect("query");
            assert!(exists, "missing table {table}");
        }
    }
}
