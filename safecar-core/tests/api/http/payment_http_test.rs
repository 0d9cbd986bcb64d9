//! Payments HTTP Handler Tests: plans, Stripe checkout and webhooks

use super::mock_upstream::MockUpstreamServer;
use super::{
    build_test_router, get_json, post_json, post_raw, TestAppState, TEST_WEBHOOK_SECRET,
};
use axum::http::StatusCode;
use chrono::Utc;
use safecar_core::api::SuccessResponse;
use safecar_core::domain::{Role, Subscription, SubscriptionStatus};
use safecar_core::stripe::sign_webhook_payload;
use serde_json::{json, Value};

fn checkout_body(plan: &str) -> Value {
    json!({
        "plan": plan,
        "success_url": "https://app.safecar.test/billing/success",
        "cancel_url": "https://app.safecar.test/billing/cancel"
    })
}

fn signed_event(event: &Value) -> (Vec<u8>, String) {
    let body = serde_json::to_vec(event).unwrap();
    let header = sign_webhook_payload(TEST_WEBHOOK_SECRET, &body, Utc::now().timestamp()).unwrap();
    (body, header)
}

#[tokio::test]
async fn test_list_plans_is_public() {
    let state = TestAppState::offline();
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<Value>>>) =
        get_json(&app, "/api/v1/payments/plans", None).await;

    assert_eq!(status, StatusCode::OK);
    let codes: Vec<String> = body
        .unwrap()
        .data
        .iter()
        .map(|p| p["code"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(codes, vec!["basic", "premium"]);
}

#[tokio::test]
async fn test_checkout_creates_pending_subscription() {
    let mock = MockUpstreamServer::new().await;
    mock.mock_checkout_session("cs_test_1").await;
    let state = TestAppState::with_mock_upstream(&mock);
    let (user, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Value>>) = post_json(
        &app,
        "/api/v1/payments/checkout",
        Some(&token),
        &checkout_body("Premium"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let checkout = body.unwrap().data;
    assert_eq!(checkout["session_id"], "cs_test_1");
    assert_eq!(checkout["checkout_url"], "https://checkout.stripe.test/pay/cs_test_1");

    let (status, body): (StatusCode, Option<SuccessResponse<Value>>) = get_json(
        &app,
        &format!("/api/v1/subscriptions/user/{}", user.id),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let subscription = body.unwrap().data;
    assert_eq!(subscription["id"], checkout["subscription_id"]);
    assert_eq!(subscription["plan"], "premium");
    assert_eq!(subscription["status"], "PENDING");
}

#[tokio::test]
async fn test_checkout_unknown_plan() {
    let state = TestAppState::offline();
    let (_, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/payments/checkout",
        Some(&token),
        &checkout_body("platinum"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["error"], "bad_request");
}

#[tokio::test]
async fn test_checkout_stripe_failure_is_bad_gateway() {
    let mock = MockUpstreamServer::new().await;
    mock.mock_checkout_session_failure().await;
    let state = TestAppState::with_mock_upstream(&mock);
    let (_, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/payments/checkout",
        Some(&token),
        &checkout_body("basic"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_checkout_requires_authentication() {
    let state = TestAppState::offline();
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/payments/checkout", None, &checkout_body("basic")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_without_signature_is_rejected() {
    let state = TestAppState::offline();
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = post_raw(
        &app,
        "/api/v1/payments/webhook",
        &[("content-type", "application/json")],
        br#"{"id":"evt_1","type":"customer.created","data":{"object":{}}}"#.to_vec(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_webhook_with_forged_signature_is_rejected() {
    let state = TestAppState::offline();
    let app = build_test_router(state);

    let event = json!({ "id": "evt_1", "type": "customer.created", "data": { "object": {} } });
    let body = serde_json::to_vec(&event).unwrap();
    let forged = sign_webhook_payload("whsec_wrong", &body, Utc::now().timestamp()).unwrap();

    let (status, _): (StatusCode, Option<Value>) = post_raw(
        &app,
        "/api/v1/payments/webhook",
        &[("stripe-signature", forged.as_str())],
        body,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_webhook_with_out_of_range_timestamp_is_rejected() {
    let state = TestAppState::offline();
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = post_raw(
        &app,
        "/api/v1/payments/webhook",
        &[("stripe-signature", "t=-9223372036854775808,v1=00")],
        br#"{"id":"evt_1","type":"customer.created","data":{"object":{}}}"#.to_vec(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_webhook_checkout_completed_activates_subscription() {
    let state = TestAppState::offline();
    let (user, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    let pending = Subscription {
        user_id: user.id,
        plan: "basic".to_string(),
        stripe_checkout_session_id: Some("cs_live_9".to_string()),
        ..Subscription::default()
    };
    state.subscription_repo.add_subscription(pending.clone()).await;
    let app = build_test_router(state);

    let (body, header) = signed_event(&json!({
        "id": "evt_42",
        "type": "checkout.session.completed",
        "data": { "object": { "id": "cs_live_9", "customer": "cus_9", "subscription": "sub_9" } }
    }));
    let (status, ack): (StatusCode, Option<Value>) = post_raw(
        &app,
        "/api/v1/payments/webhook",
        &[("stripe-signature", header.as_str())],
        body,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack.unwrap()["received"], true);

    let (status, found): (StatusCode, Option<SuccessResponse<Subscription>>) = get_json(
        &app,
        &format!("/api/v1/subscriptions/{}", pending.id),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let subscription = found.unwrap().data;
    assert_eq!(subscription.status, SubscriptionStatus::Active);
    assert_eq!(subscription.stripe_subscription_id.as_deref(), Some("sub_9"));
}

#[tokio::test]
async fn test_webhook_for_unknown_subscription_is_acknowledged() {
    let state = TestAppState::offline();
    let app = build_test_router(state);

    let (body, header) = signed_event(&json!({
        "id": "evt_7",
        "type": "invoice.payment_failed",
        "data": { "object": { "subscription": "sub_missing" } }
    }));
    let (status, _): (StatusCode, Option<Value>) = post_raw(
        &app,
        "/api/v1/payments/webhook",
        &[("stripe-signature", header.as_str())],
        body,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cancel_subscription_calls_stripe() {
    let mock = MockUpstreamServer::new().await;
    mock.mock_cancel_subscription().await;
    let state = TestAppState::with_mock_upstream(&mock);
    let (user, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    let active = Subscription {
        user_id: user.id,
        plan: "basic".to_string(),
        status: SubscriptionStatus::Active,
        stripe_subscription_id: Some("sub_live_1".to_string()),
        ..Subscription::default()
    };
    state.subscription_repo.add_subscription(active.clone()).await;
    let app = build_test_router(state);
    let cancel_path = format!("/api/v1/subscriptions/{}/cancel", active.id);

    let (status, body): (StatusCode, Option<SuccessResponse<Value>>) =
        post_json(&app, &cancel_path, Some(&token), &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data["status"], "CANCELLED");

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, &cancel_path, Some(&token), &json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_subscription_of_another_user_is_forbidden() {
    let state = TestAppState::offline();
    let (owner, _) = state.seed_user("fleetco", &[Role::Owner]).await;
    let (_, other_token) = state.seed_user("rival", &[Role::Owner]).await;
    let subscription = Subscription {
        user_id: owner.id,
        plan: "basic".to_string(),
        ..Subscription::default()
    };
    state.subscription_repo.add_subscription(subscription.clone()).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = get_json(
        &app,
        &format!("/api/v1/subscriptions/{}", subscription.id),
        Some(&other_token),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
