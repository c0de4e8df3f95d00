mod common;

use axum::http::{Method, StatusCode};
use booking_service::models::Role;
use common::{body_json, offline_app, request, token};
use serde_json::json;
use tower::util::ServiceExt;
use uuid::Uuid;

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let (app, _) = offline_app();

    for (method, uri) in [
        (Method::GET, "/api/bookings"),
        (Method::GET, "/api/auth/me"),
        (Method::POST, "/api/payments/create-order"),
        (Method::GET, "/api/admin/stats"),
        (Method::PUT, "/api/pandits/online-status"),
    ] {
        let res = app
            .clone()
            .oneshot(request(method.clone(), uri, None, None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}

#[tokio::test]
async fn tampered_tokens_are_rejected() {
    let (app, state) = offline_app();
    let mut forged = token(&state, Uuid::new_v4(), Role::Admin);
    forged.push('x');

    let res = app
        .oneshot(request(Method::GET, "/api/admin/stats", Some(&forged), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(res).await;
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn roles_gate_each_route_group() {
    let (app, state) = offline_app();
    let user = token(&state, Uuid::new_v4(), Role::User);
    let pandit = token(&state, Uuid::new_v4(), Role::Pandit);
    let admin = token(&state, Uuid::new_v4(), Role::Admin);
    let booking = Uuid::new_v4();

    let cases = [
        (Method::GET, "/api/admin/stats".to_string(), &user),
        (Method::GET, "/api/admin/users".to_string(), &pandit),
        (Method::POST, "/api/bookings".to_string(), &pandit),
        (Method::POST, "/api/bookings".to_string(), &admin),
        (Method::POST, "/api/reviews".to_string(), &admin),
        (Method::PUT, format!("/api/bookings/{booking}/status"), &user),
        (Method::PUT, format!("/api/bookings/{booking}/cancel"), &pandit),
        (Method::POST, "/api/payments/create-order".to_string(), &pandit),
        (Method::POST, "/api/availability".to_string(), &user),
        (Method::PUT, "/api/pandits/online-status".to_string(), &admin),
        (Method::POST, "/api/ceremonies".to_string(), &user),
        (Method::PUT, "/api/settings/whatsapp_number".to_string(), &pandit),
    ];

    for (method, uri, bearer) in cases {
        let res = app
            .clone()
            .oneshot(request(method.clone(), &uri, Some(bearer), Some(json!({}))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "{method} {uri}");
    }
}

#[tokio::test]
async fn invalid_bodies_fail_validation_before_storage() {
    let (app, state) = offline_app();
    let user = token(&state, Uuid::new_v4(), Role::User);

    let res = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/reviews",
            Some(&user),
            Some(json!({ "panditId": Uuid::new_v4(), "rating": 9 })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["details"]["rating"][0], "Rating must be between 1 and 5");

    let res = app
        .oneshot(request(
            Method::POST,
            "/api/auth/register/user",
            None,
            Some(json!({ "name": "A", "email": "not-an-email", "password": "123" })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn auth_endpoints_are_rate_limited_per_ip() {
    let (app, _) = offline_app();
    let attempt = || {
        request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "bad", "password": "x" })),
        )
    };

    for _ in 0..5 {
        let res = app.clone().oneshot(attempt()).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    let res = app.oneshot(attempt()).await.unwrap();
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(res.headers().contains_key("retry-after"));
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let (app, _) = offline_app();

    let mut req = request(Method::GET, "/api/bookings", None, None);
    req.headers_mut()
        .insert("x-request-id", "req-1234".parse().unwrap());
    let res = app.oneshot(req).await.unwrap();

    assert_eq!(res.headers()["x-request-id"], "req-1234");
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn health_reports_unavailable_database() {
    let (app, _) = offline_app();

    let res = app
        .oneshot(request(Method::GET, "/health", None, None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn unknown_routes_return_not_found() {
    let (app, _) = offline_app();

    let res = app
        .oneshot(request(Method::GET, "/api/nothing-here", None, None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
