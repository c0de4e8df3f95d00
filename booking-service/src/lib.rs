pub mod config;
pub mod db;
pub mod domain;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    rate_limit::{
        create_ip_rate_limiter, create_keyed_rate_limiter, ip_rate_limit_middleware,
        keyed_rate_limit_middleware, IpRateLimiter, KeyedRateLimiter,
    },
    security_headers::security_headers_middleware,
    tracing::{make_request_span, request_id_middleware, REQUEST_ID_HEADER},
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::BookingConfig;
use crate::middleware::{
    auth_middleware, require_roles, ADMIN, ADMIN_OR_PANDIT, PANDIT, USER, USER_OR_ADMIN,
};
use crate::models::Ceremony;
use crate::services::{AccessTokenClaims, CatalogCache, Database, JwtService, Notifier, RazorpayClient};

#[derive(Clone)]
pub struct AppState {
    pub config: BookingConfig,
    pub db: Database,
    pub jwt: JwtService,
    pub razorpay: RazorpayClient,
    pub notifier: Notifier,
    pub catalog_cache: CatalogCache<Ceremony>,
    pub ip_rate_limiter: IpRateLimiter,
    pub auth_rate_limiter: IpRateLimiter,
    pub payment_rate_limiter: KeyedRateLimiter,
}

impl AppState {
    /// Wires services for `config` on top of an existing pool.
    pub fn new(config: BookingConfig, pool: PgPool) -> Result<Self, AppError> {
        let notifier = Notifier::from_config(&config)?;
        Ok(Self::with_notifier(config, pool, notifier))
    }

    pub fn with_notifier(config: BookingConfig, pool: PgPool, notifier: Notifier) -> Self {
        let razorpay = RazorpayClient::new(config.razorpay.clone());
        if razorpay.is_configured() {
            tracing::info!("Razorpay client initialized");
        } else {
            tracing::warn!("Razorpay credentials not configured - payment features are disabled");
        }

        let limits = &config.rate_limit;
        Self {
            db: Database::new(pool),
            jwt: JwtService::new(&config.jwt),
            razorpay,
            notifier,
            catalog_cache: CatalogCache::new(Duration::from_secs(config.catalog.cache_ttl_seconds)),
            ip_rate_limiter: create_ip_rate_limiter(
                limits.general_limit,
                limits.general_window_seconds,
            ),
            auth_rate_limiter: create_ip_rate_limiter(limits.auth_limit, limits.auth_window_seconds),
            payment_rate_limiter: create_keyed_rate_limiter(
                limits.payment_limit,
                limits.payment_window_seconds,
            ),
            config,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    use handlers::{
        admin, auth, availability, bookings, ceremonies, content, doshas, epujas, pandits,
        payments, reviews, service_bookings, users,
    };

    // Registration and login, limited per client IP
    let auth_routes = Router::new()
        .route("/api/auth/register/user", post(auth::register_user))
        .route("/api/auth/register/pandit", post(auth::register_pandit))
        .route("/api/auth/login", post(auth::login))
        .layer(from_fn_with_state(
            state.auth_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    let public_routes = Router::new()
        .route("/api/auth/verify-email", get(auth::verify_email))
        .route(
            "/api/bookings/ceremony-price/:ceremony_type",
            get(bookings::ceremony_price),
        )
        .route("/api/ceremonies", get(ceremonies::list_ceremonies))
        .route("/api/ceremonies/:id", get(ceremonies::get_ceremony))
        .route("/api/doshas", get(doshas::list_doshas))
        .route("/api/doshas/:id", get(doshas::get_dosha))
        .route("/api/epujas", get(epujas::list_epujas))
        .route("/api/epujas/:id", get(epujas::get_epuja))
        .route("/api/pandits", get(pandits::list_pandits))
        .route("/api/pandits/:id", get(pandits::get_pandit))
        .route(
            "/api/availability/pandit/:id",
            get(availability::list_pandit_slots),
        )
        .route("/api/reviews/pandit/:id", get(reviews::list_pandit_reviews))
        .route("/api/settings", get(content::list_settings))
        .route("/api/settings/:key", get(content::get_setting))
        .route("/api/pages/:slug", get(content::get_page));

    // Any signed-in principal; handlers scope results to the caller
    let authenticated_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/bookings", get(bookings::list_bookings))
        .route("/api/bookings/:id", get(bookings::get_booking))
        .route(
            "/api/users/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route(
            "/api/dosha-bookings",
            get(service_bookings::list_dosha_bookings),
        )
        .route(
            "/api/epuja-bookings",
            get(service_bookings::list_epuja_bookings),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let customer_routes = Router::new()
        .route("/api/bookings", post(bookings::create_booking))
        .route("/api/reviews", post(reviews::create_review))
        .route(
            "/api/dosha-bookings",
            post(service_bookings::create_dosha_booking),
        )
        .route(
            "/api/epuja-bookings",
            post(service_bookings::create_epuja_booking),
        )
        .route_layer(from_fn_with_state(USER, require_roles))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let cancel_routes = Router::new()
        .route("/api/bookings/:id/cancel", put(bookings::cancel_booking))
        .route_layer(from_fn_with_state(USER_OR_ADMIN, require_roles))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    // Limited per principal; the limiter reads the claims set by auth
    let payment_routes = Router::new()
        .route("/api/payments/create-order", post(payments::create_order))
        .route("/api/payments/verify-advance", post(payments::verify_advance))
        .route(
            "/api/payments/verify-remaining",
            post(payments::verify_remaining),
        )
        .route("/api/payments/process-refund", post(payments::process_refund))
        .route(
            "/api/payments/refund-status/:booking_id",
            get(payments::refund_status),
        )
        .route("/api/payments/failure", post(payments::payment_failure))
        .route_layer(from_fn_with_state(USER_OR_ADMIN, require_roles))
        .route_layer(from_fn_with_state(
            state.payment_rate_limiter.clone(),
            keyed_rate_limit_middleware::<AccessTokenClaims>,
        ))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let fulfilment_routes = Router::new()
        .route(
            "/api/bookings/:id/status",
            put(bookings::update_booking_status),
        )
        .route(
            "/api/dosha-bookings/:id/status",
            put(service_bookings::update_dosha_booking),
        )
        .route(
            "/api/epuja-bookings/:id/status",
            put(service_bookings::update_epuja_booking),
        )
        .route_layer(from_fn_with_state(ADMIN_OR_PANDIT, require_roles))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let pandit_routes = Router::new()
        .route(
            "/api/availability",
            post(availability::create_slot).get(availability::list_own_slots),
        )
        .route(
            "/api/availability/:id",
            put(availability::update_slot).delete(availability::delete_slot),
        )
        .route("/api/pandits/online-status", put(pandits::set_online_status))
        .route_layer(from_fn_with_state(PANDIT, require_roles))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let admin_routes = Router::new()
        .route("/api/admin/assign", put(admin::assign_pandit))
        .route("/api/admin/stats", get(admin::stats))
        .route("/api/admin/available-pandits", get(admin::available_pandits))
        .route("/api/admin/bookings", get(admin::list_bookings))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/pandits", get(admin::list_pandits))
        .route("/api/admin/pandits/:id/verify", put(admin::verify_pandit))
        .route("/api/ceremonies", post(ceremonies::create_ceremony))
        .route(
            "/api/ceremonies/:id",
            put(ceremonies::update_ceremony).delete(ceremonies::delete_ceremony),
        )
        .route("/api/doshas", post(doshas::create_dosha))
        .route(
            "/api/doshas/:id",
            put(doshas::update_dosha).delete(doshas::delete_dosha),
        )
        .route("/api/epujas", post(epujas::create_epuja))
        .route(
            "/api/epujas/:id",
            put(epujas::update_epuja).delete(epujas::delete_epuja),
        )
        .route("/api/settings/:key", put(content::update_setting))
        .route("/api/pages/:slug", put(content::update_page))
        .route_layer(from_fn_with_state(ADMIN, require_roles))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let ip_limiter = state.ip_rate_limiter.clone();
    let cors = cors_layer(&state.config.security.allowed_origins);

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .merge(auth_routes)
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(customer_routes)
        .merge(cancel_routes)
        .merge(payment_routes)
        .merge(fulfilment_routes)
        .merge(pandit_routes)
        .merge(admin_routes)
        .with_state(state)
        // Global IP rate limiting
        .layer(from_fn_with_state(ip_limiter, ip_rate_limit_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

/// Liveness plus a database ping.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.db.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "Health check failed");
        AppError::ServiceUnavailable
    })?;

    Ok(Json(json!({
        "status": "ok",
        "service": state.config.service_name,
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
