//! Checkout, capture and refund flows against a real Postgres and a mocked
//! Razorpay.
//!
//! Run with `TEST_DATABASE_URL=... cargo test -- --ignored`.

mod common;

use common::{checkout_signature, decimal, TestApp};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Gateway that opens a fresh order for whatever amount it is asked for.
async fn gateway() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(|req: &Request| {
            let body: Value = serde_json::from_slice(&req.body).unwrap_or_default();
            ResponseTemplate::new(200).set_body_json(json!({
                "id": format!("order_{}", Uuid::new_v4().simple()),
                "entity": "order",
                "amount": body["amount"],
                "currency": "INR",
                "receipt": body["receipt"],
                "status": "created",
            }))
        })
        .mount(&server)
        .await;
    server
}

async fn open_order(app: &TestApp, token: &str, booking_id: &str, payment_type: &str) -> Value {
    let res = app
        .client
        .post(app.url("/api/payments/create-order"))
        .bearer_auth(token)
        .json(&json!({ "bookingId": booking_id, "paymentType": payment_type }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200, "order for {payment_type}");
    res.json().await.unwrap()
}

fn checkout(booking_id: &str, order_id: &str, payment_id: &str) -> Value {
    json!({
        "bookingId": booking_id,
        "razorpay_order_id": order_id,
        "razorpay_payment_id": payment_id,
        "razorpay_signature": checkout_signature(order_id, payment_id),
    })
}

async fn post(app: &TestApp, token: &str, uri: &str, body: &Value) -> reqwest::Response {
    app.client
        .post(app.url(uri))
        .bearer_auth(token)
        .json(body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
#[ignore]
async fn advance_captures_once_then_refunds_after_cancellation() {
    let gateway = gateway().await;
    let app = TestApp::spawn_with_gateway(&gateway.uri()).await;
    let slug = app.create_ceremony(1000).await;
    let (token, _) = app.register_user().await;

    let booking = app.create_booking(&token, &slug, 10).await;
    let id = booking["id"].as_str().unwrap().to_string();

    let order = open_order(&app, &token, &id, "advance").await;
    assert_eq!(order["amount"], 25000);
    assert_eq!(order["keyId"], "rzp_test_integration");
    let order_id = order["orderId"].as_str().unwrap().to_string();

    let paid = checkout(&id, &order_id, "pay_advance_1");
    let res = post(&app, &token, "/api/payments/verify-advance", &paid).await;
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["booking"]["advancePaid"], true);
    assert_eq!(body["booking"]["paymentStatus"], "advance_paid");

    // The advance checkout cannot be replayed for either portion
    let res = post(&app, &token, "/api/payments/verify-remaining", &paid).await;
    assert_eq!(res.status().as_u16(), 400);
    let res = post(&app, &token, "/api/payments/verify-advance", &paid).await;
    assert_eq!(res.status().as_u16(), 400);

    let res = app
        .client
        .put(app.url(&format!("/api/bookings/{id}/cancel")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["refundStatus"], "full");
    assert_eq!(decimal(&body["refundAmount"]), Decimal::from(250));

    Mock::given(method("POST"))
        .and(path("/payments/pay_advance_1/refund"))
        .and(body_json(json!({ "amount": 25000, "notes": { "bookingId": id } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "rfnd_integration_1",
            "entity": "refund",
            "payment_id": "pay_advance_1",
            "amount": 25000,
            "currency": "INR",
            "status": "processed",
        })))
        .expect(1)
        .mount(&gateway)
        .await;

    let res = post(&app, &token, "/api/payments/process-refund", &json!({ "bookingId": id })).await;
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["refundStatus"], "processed");
    assert_eq!(body["refundId"], "rfnd_integration_1");

    // Only once
    let res = post(&app, &token, "/api/payments/process-refund", &json!({ "bookingId": id })).await;
    assert_eq!(res.status().as_u16(), 400);
}

#[tokio::test]
#[ignore]
async fn checkout_only_settles_the_booking_it_was_opened_for() {
    let gateway = gateway().await;
    let app = TestApp::spawn_with_gateway(&gateway.uri()).await;
    let slug = app.create_ceremony(1200).await;
    let (token, _) = app.register_user().await;

    let first = app.create_booking(&token, &slug, 7).await;
    let first_id = first["id"].as_str().unwrap().to_string();
    let second = app.create_booking(&token, &slug, 8).await;
    let second_id = second["id"].as_str().unwrap().to_string();

    let order = open_order(&app, &token, &first_id, "advance").await;
    let order_id = order["orderId"].as_str().unwrap().to_string();

    // No order open on the second booking yet
    let res = post(
        &app,
        &token,
        "/api/payments/verify-advance",
        &checkout(&second_id, &order_id, "pay_cross_1"),
    )
    .await;
    assert_eq!(res.status().as_u16(), 400);

    // Nor once it has its own
    open_order(&app, &token, &second_id, "advance").await;
    let res = post(
        &app,
        &token,
        "/api/payments/verify-advance",
        &checkout(&second_id, &order_id, "pay_cross_1"),
    )
    .await;
    assert_eq!(res.status().as_u16(), 400);

    let mut forged = checkout(&first_id, &order_id, "pay_cross_1");
    forged["razorpay_signature"] = json!(checkout_signature(&order_id, "pay_other"));
    let res = post(&app, &token, "/api/payments/verify-advance", &forged).await;
    assert_eq!(res.status().as_u16(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid payment signature");

    let res = post(
        &app,
        &token,
        "/api/payments/verify-advance",
        &checkout(&first_id, &order_id, "pay_cross_1"),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);

    let second: Value = app
        .client
        .get(app.url(&format!("/api/bookings/{second_id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["advancePaid"], false);
}

#[tokio::test]
#[ignore]
async fn remaining_portion_needs_its_own_order() {
    let gateway = gateway().await;
    let app = TestApp::spawn_with_gateway(&gateway.uri()).await;
    let slug = app.create_ceremony(2000).await;
    let (token, _) = app.register_user().await;

    let booking = app.create_booking(&token, &slug, 12).await;
    let id = booking["id"].as_str().unwrap().to_string();

    let advance = open_order(&app, &token, &id, "advance").await;
    let advance_id = advance["orderId"].as_str().unwrap().to_string();
    let res = post(
        &app,
        &token,
        "/api/payments/verify-advance",
        &checkout(&id, &advance_id, "pay_adv_2"),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);

    // A fresh payment on the spent advance order is still refused
    let res = post(
        &app,
        &token,
        "/api/payments/verify-remaining",
        &checkout(&id, &advance_id, "pay_rem_2"),
    )
    .await;
    assert_eq!(res.status().as_u16(), 400);

    let remaining = open_order(&app, &token, &id, "remaining").await;
    assert_eq!(remaining["amount"], 150000);
    let remaining_id = remaining["orderId"].as_str().unwrap().to_string();

    let res = post(
        &app,
        &token,
        "/api/payments/verify-remaining",
        &checkout(&id, &remaining_id, "pay_rem_2"),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["booking"]["remainingPaid"], true);
    assert_eq!(body["booking"]["paymentStatus"], "paid");
}

#[tokio::test]
#[ignore]
async fn cancelled_booking_refuses_a_late_checkout() {
    let gateway = gateway().await;
    let app = TestApp::spawn_with_gateway(&gateway.uri()).await;
    let slug = app.create_ceremony(800).await;
    let (token, _) = app.register_user().await;

    let booking = app.create_booking(&token, &slug, 9).await;
    let id = booking["id"].as_str().unwrap().to_string();

    let order = open_order(&app, &token, &id, "advance").await;
    let order_id = order["orderId"].as_str().unwrap().to_string();

    let res = app
        .client
        .put(app.url(&format!("/api/bookings/{id}/cancel")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["refundStatus"], "none");

    let res = post(
        &app,
        &token,
        "/api/payments/verify-advance",
        &checkout(&id, &order_id, "pay_late_1"),
    )
    .await;
    assert_eq!(res.status().as_u16(), 400);

    let booking: Value = app
        .client
        .get(app.url(&format!("/api/bookings/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(booking["status"], "cancelled");
    assert_eq!(booking["advancePaid"], false);
    assert_eq!(booking["advancePaymentId"], Value::Null);
}
