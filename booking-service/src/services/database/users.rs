use uuid::Uuid;

use super::Database;
use crate::models::User;
use crate::services::ServiceError;

impl Database {
    pub async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    /// Whether any account, customer or pandit, already uses this email.
    pub async fn email_taken(&self, email: &str) -> Result<bool, ServiceError> {
        let (taken,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))
                OR EXISTS (SELECT 1 FROM pandits WHERE LOWER(email) = LOWER($1))
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    pub async fn insert_user(&self, user: &User) -> Result<(), ServiceError> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, name, email, password_hash, phone, role,
                               email_verified, email_verification_token, created_utc, updated_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.user_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(&user.role)
        .bind(user.email_verified)
        .bind(&user.email_verification_token)
        .bind(user.created_utc)
        .bind(user.updated_utc)
        .execute(&self.pool)
        .await
        .map_err(|e| ServiceError::on_unique_violation(e, "User already exists with this email"))?;
        Ok(())
    }

    /// Consumes a verification token. Returns the verified user, or `None`
    /// when no account carries the token.
    pub async fn verify_user_email(&self, token: &str) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email_verified = TRUE, email_verification_token = NULL, updated_utc = NOW()
            WHERE email_verification_token = $1
            RETURNING *
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn update_user_profile(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<User, ServiceError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name), phone = COALESCE($3, phone), updated_utc = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("User"))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_utc DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }
}
