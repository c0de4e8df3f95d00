use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Principal kinds carried in access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Pandit,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Pandit => "pandit",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "pandit" => Ok(Role::Pandit),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Customer or administrator account.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "id")]
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: String,
    pub email_verified: bool,
    #[serde(skip_serializing)]
    pub email_verification_token: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        phone: Option<String>,
        verification_token: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: Uuid::new_v4(),
            name,
            email: email.to_lowercase(),
            password_hash,
            phone,
            role: Role::User.as_str().to_string(),
            email_verified: false,
            email_verification_token: Some(verification_token),
            created_utc: now,
            updated_utc: now,
        }
    }

    /// Stored role; anything unrecognised is treated as a plain user.
    pub fn role(&self) -> Role {
        match self.role.parse() {
            Ok(Role::Admin) => Role::Admin,
            _ => Role::User,
        }
    }
}
