use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub razorpay: RazorpayConfig,
    pub email: EmailConfig,
    pub whatsapp: WhatsAppConfig,
    pub security: SecurityConfig,
    pub catalog: CatalogConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    pub expiry_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: Secret<String>,
    pub api_base_url: String,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    Mock,
    Live,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub mode: DeliveryMode,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: Secret<String>,
    pub from_address: String,
    pub frontend_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfig {
    pub mode: DeliveryMode,
    pub api_url: String,
    pub access_token: Secret<String>,
    pub phone_number_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub cache_ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub general_limit: u32,
    pub general_window_seconds: u64,
    pub auth_limit: u32,
    pub auth_window_seconds: u64,
    pub payment_limit: u32,
    pub payment_window_seconds: u64,
}

impl BookingConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = BookingConfig {
            common: common_config,
            environment,
            service_name: get_env("SERVICE_NAME", Some("booking-service"), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            database: DatabaseConfig {
                url: Secret::new(get_env("DATABASE_URL", None, is_prod)?),
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", "10", is_prod)?,
                min_connections: parse_env("DATABASE_MIN_CONNECTIONS", "1", is_prod)?,
            },
            jwt: JwtConfig {
                secret: Secret::new(get_env(
                    "JWT_SECRET",
                    Some("dev-only-jwt-secret-change-me-please"),
                    is_prod,
                )?),
                expiry_days: parse_env("JWT_EXPIRY_DAYS", "7", is_prod)?,
            },
            razorpay: RazorpayConfig {
                key_id: get_env("RAZORPAY_KEY_ID", Some(""), is_prod)?,
                key_secret: Secret::new(get_env("RAZORPAY_KEY_SECRET", Some(""), is_prod)?),
                api_base_url: get_env(
                    "RAZORPAY_API_BASE_URL",
                    Some("https://api.razorpay.com/v1"),
                    is_prod,
                )?,
                currency: get_env("PAYMENT_CURRENCY", Some("INR"), is_prod)?,
            },
            email: EmailConfig {
                mode: parse_env("EMAIL_MODE", "mock", is_prod)?,
                smtp_host: get_env("SMTP_HOST", Some("smtp.gmail.com"), is_prod)?,
                smtp_port: parse_env("SMTP_PORT", "587", is_prod)?,
                smtp_user: get_env("SMTP_USER", Some(""), is_prod)?,
                smtp_password: Secret::new(get_env("SMTP_PASSWORD", Some(""), is_prod)?),
                from_address: get_env("EMAIL_FROM", Some("no-reply@localhost"), is_prod)?,
                frontend_url: get_env("FRONTEND_URL", Some("http://localhost:3000"), is_prod)?,
            },
            whatsapp: WhatsAppConfig {
                mode: parse_env("WHATSAPP_MODE", "mock", is_prod)?,
                api_url: get_env(
                    "WHATSAPP_API_URL",
                    Some("https://graph.facebook.com/v18.0"),
                    is_prod,
                )?,
                access_token: Secret::new(get_env("WHATSAPP_ACCESS_TOKEN", Some(""), is_prod)?),
                phone_number_id: get_env("WHATSAPP_PHONE_NUMBER_ID", Some(""), is_prod)?,
            },
            security: SecurityConfig {
                allowed_origins: get_env(
                    "ALLOWED_ORIGINS",
                    Some("http://localhost:3000"),
                    is_prod,
                )?
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            },
            catalog: CatalogConfig {
                cache_ttl_seconds: parse_env("CATALOG_CACHE_TTL_SECONDS", "300", is_prod)?,
            },
            rate_limit: RateLimitConfig {
                general_limit: parse_env("RATE_LIMIT_GENERAL_LIMIT", "100", is_prod)?,
                general_window_seconds: parse_env(
                    "RATE_LIMIT_GENERAL_WINDOW_SECONDS",
                    "900",
                    is_prod,
                )?,
                auth_limit: parse_env("RATE_LIMIT_AUTH_LIMIT", "10", is_prod)?,
                auth_window_seconds: parse_env("RATE_LIMIT_AUTH_WINDOW_SECONDS", "900", is_prod)?,
                payment_limit: parse_env("RATE_LIMIT_PAYMENT_LIMIT", "30", is_prod)?,
                payment_window_seconds: parse_env(
                    "RATE_LIMIT_PAYMENT_WINDOW_SECONDS",
                    "900",
                    is_prod,
                )?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.common.validate()?;

        if self.jwt.expiry_days <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_EXPIRY_DAYS must be positive"
            )));
        }

        if self.catalog.cache_ttl_seconds == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "CATALOG_CACHE_TTL_SECONDS must be positive"
            )));
        }

        if self.environment == Environment::Prod {
            if self.jwt.secret.expose_secret().len() < 32 {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "JWT_SECRET must be at least 32 bytes in production"
                )));
            }

            if self.security.allowed_origins.iter().any(|o| o == "*") {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "Wildcard CORS origin not allowed in production"
                )));
            }

            if self.razorpay.key_id.is_empty() {
                tracing::warn!("RAZORPAY_KEY_ID is empty in production - payments are disabled");
            }
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

fn parse_env<T>(key: &str, default: &str, is_prod: bool) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env(key, Some(default), is_prod)?
        .parse()
        .map_err(|e: T::Err| AppError::ConfigError(anyhow::anyhow!("Invalid {}: {}", key, e)))
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Dev),
            "prod" | "production" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

impl FromStr for DeliveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(DeliveryMode::Mock),
            "live" | "smtp" | "real" => Ok(DeliveryMode::Live),
            _ => Err(format!("Invalid delivery mode: {}", s)),
        }
    }
}
