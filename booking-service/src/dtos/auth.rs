use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Role;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 7, max = 20, message = "Invalid phone number"))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPanditRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 7, max = 20, message = "Invalid phone number"))]
    pub phone: Option<String>,

    pub specialization: Option<String>,

    #[validate(range(min = 0, max = 80, message = "Experience must be between 0 and 80 years"))]
    #[serde(default, alias = "experience")]
    pub experience_years: i32,

    #[serde(default)]
    pub languages: Vec<String>,

    pub city: Option<String>,

    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,
}

/// Which account table to check first on login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginRole {
    User,
    Pandit,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    pub role: Option<LoginRole>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailQuery {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// Principal summary returned alongside a token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalResponse {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_online: Option<bool>,
}

impl From<&crate::models::User> for PrincipalResponse {
    fn from(user: &crate::models::User) -> Self {
        Self {
            id: user.user_id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role(),
            phone: user.phone.clone(),
            email_verified: Some(user.email_verified),
            is_verified: None,
            is_online: None,
        }
    }
}

impl From<&crate::models::Pandit> for PrincipalResponse {
    fn from(pandit: &crate::models::Pandit) -> Self {
        Self {
            id: pandit.pandit_id,
            name: pandit.name.clone(),
            email: pandit.email.clone(),
            role: Role::Pandit,
            phone: pandit.phone.clone(),
            email_verified: None,
            is_verified: Some(pandit.is_verified),
            is_online: Some(pandit.is_online),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PrincipalResponse,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_passwords_are_rejected() {
        let req: RegisterUserRequest = serde_json::from_value(serde_json::json!({
            "name": "Asha",
            "email": "asha@example.com",
            "password": "12345"
        }))
        .unwrap();

        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("password"));
    }

    #[test]
    fn pandit_accepts_experience_alias() {
        let req: RegisterPanditRequest = serde_json::from_value(serde_json::json!({
            "name": "Pandit Ravi",
            "email": "ravi@example.com",
            "password": "secret1",
            "experience": 12,
            "languages": ["Hindi", "Sanskrit"]
        }))
        .unwrap();

        assert!(req.validate().is_ok());
        assert_eq!(req.experience_years, 12);
        assert_eq!(req.languages.len(), 2);
    }

    #[test]
    fn login_role_hint_is_optional() {
        let req: LoginRequest = serde_json::from_value(serde_json::json!({
            "email": "ravi@example.com",
            "password": "x",
            "role": "pandit"
        }))
        .unwrap();
        assert_eq!(req.role, Some(LoginRole::Pandit));

        let req: LoginRequest =
            serde_json::from_value(serde_json::json!({ "email": "a@b.co", "password": "x" }))
                .unwrap();
        assert_eq!(req.role, None);
    }
}
