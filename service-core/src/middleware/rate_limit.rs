use crate::error::AppError;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DashMapStateStore,
    Quota, RateLimiter,
};
use std::{
    net::{IpAddr, SocketAddr},
    num::NonZeroU32,
    sync::Arc,
    time::Duration,
};

/// Rate limiter keyed by IP address
pub type IpRateLimiter = Arc<RateLimiter<IpAddr, DashMapStateStore<IpAddr>, DefaultClock>>;

/// Rate limiter keyed by an arbitrary principal string (user id, or `ip:<addr>`)
pub type KeyedRateLimiter = Arc<RateLimiter<String, DashMapStateStore<String>, DefaultClock>>;

/// Implemented by request extensions that identify the caller for keyed limits.
pub trait RateLimitKey: Send + Sync + 'static {
    fn rate_limit_key(&self) -> String;
}

/// `attempts` requests per `window_seconds`, replenished evenly across the window.
fn quota(attempts: u32, window_seconds: u64) -> Quota {
    let burst = NonZeroU32::new(attempts).unwrap_or(NonZeroU32::MIN);
    let period_ms = ((window_seconds * 1000) / u64::from(burst.get())).max(1);
    Quota::with_period(Duration::from_millis(period_ms))
        .unwrap_or_else(|| Quota::per_second(burst))
        .allow_burst(burst)
}

pub fn create_ip_rate_limiter(attempts: u32, window_seconds: u64) -> IpRateLimiter {
    Arc::new(RateLimiter::dashmap(quota(attempts, window_seconds)))
}

pub fn create_keyed_rate_limiter(attempts: u32, window_seconds: u64) -> KeyedRateLimiter {
    Arc::new(RateLimiter::dashmap(quota(attempts, window_seconds)))
}

/// Client IP from the first `x-forwarded-for` hop, else the socket peer.
pub fn client_ip(request: &Request) -> Option<IpAddr> {
    let forwarded_ip = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok());

    forwarded_ip.or_else(|| {
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    })
}

fn too_many(message: &str, wait: Duration) -> AppError {
    AppError::TooManyRequests(message.to_string(), Some(wait.as_secs().max(1)))
}

/// Middleware for IP-based rate limiting
pub async fn ip_rate_limit_middleware(
    State(limiter): State<IpRateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match client_ip(&request) {
        Some(ip) => match limiter.check_key(&ip) {
            Ok(_) => Ok(next.run(request).await),
            Err(negative) => Err(too_many(
                "Too many requests from this IP. Please try again later.",
                negative.wait_time_from(DefaultClock::default().now()),
            )),
        },
        None => {
            tracing::warn!("Could not determine IP for rate limiting");
            Ok(next.run(request).await)
        }
    }
}

/// Middleware keyed by the authenticated principal `T`, falling back to the client IP.
///
/// Must run after whatever middleware inserts `T` into the request extensions.
pub async fn keyed_rate_limit_middleware<T>(
    State(limiter): State<KeyedRateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, AppError>
where
    T: RateLimitKey + Clone,
{
    let key = request
        .extensions()
        .get::<T>()
        .map(|principal| principal.rate_limit_key())
        .or_else(|| client_ip(&request).map(|ip| format!("ip:{ip}")));

    let Some(key) = key else {
        tracing::warn!("Could not determine caller for rate limiting");
        return Ok(next.run(request).await);
    };

    match limiter.check_key(&key) {
        Ok(_) => Ok(next.run(request).await),
        Err(negative) => Err(too_many(
            "Too many requests. Please try again later.",
            negative.wait_time_from(DefaultClock::default().now()),
        )),
    }
}
