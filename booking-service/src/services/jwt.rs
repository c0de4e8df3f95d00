use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use service_core::middleware::rate_limit::RateLimitKey;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::models::Role;

/// JWT service for token generation and validation
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_days: i64,
}

/// Claims for access tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// User or pandit ID, depending on `role`
    pub id: Uuid,
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl RateLimitKey for AccessTokenClaims {
    fn rate_limit_key(&self) -> String {
        format!("{}:{}", self.role, self.id)
    }
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_days: config.expiry_days,
        }
    }

    /// Generate an access token for a principal
    pub fn generate_token(&self, id: Uuid, role: Role) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let exp = now + Duration::days(self.expiry_days);

        let claims = AccessTokenClaims {
            id,
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode access token: {}", e))
    }

    /// Validate and decode an access token
    pub fn validate_token(&self, token: &str) -> Result<AccessTokenClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.required_spec_claims = ["exp"].into_iter().map(String::from).collect();

        decode::<AccessTokenClaims>(token, &self.decoding_key, &validation).map(|data| data.claims)
    }

    pub fn expiry_seconds(&self) -> i64 {
        self.expiry_days * 24 * 60 * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn service(secret: &str) -> JwtService {
        JwtService::new(&JwtConfig {
            secret: Secret::new(secret.to_string()),
            expiry_days: 7,
        })
    }

    #[test]
    fn round_trips_id_and_role() {
        let jwt = service("a-test-secret-that-is-long-enough");
        let id = Uuid::new_v4();
        let token = jwt.generate_token(id, Role::Pandit).unwrap();

        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.id, id);
        assert_eq!(claims.role, Role::Pandit);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = service("first-secret-first-secret-first-secret")
            .generate_token(Uuid::new_v4(), Role::User)
            .unwrap();
        assert!(service("second-secret-second-secret-second")
            .validate_token(&token)
            .is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let jwt = service("a-test-secret-that-is-long-enough");
        let past = Utc::now() - Duration::days(1);
        let claims = AccessTokenClaims {
            id: Uuid::new_v4(),
            role: Role::Admin,
            iat: (past - Duration::days(7)).timestamp(),
            exp: past.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &jwt.encoding_key).unwrap();
        assert!(jwt.validate_token(&token).is_err());
    }

    #[test]
    fn rate_limit_key_is_role_scoped() {
        let id = Uuid::nil();
        let claims = AccessTokenClaims {
            id,
            role: Role::User,
            iat: 0,
            exp: 0,
        };
        assert_eq!(claims.rate_limit_key(), format!("user:{}", id));
    }
}
