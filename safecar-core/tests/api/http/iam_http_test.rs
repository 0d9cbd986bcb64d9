//! IAM HTTP Handler Tests: sign-up, sign-in, users and roles

use super::{build_test_router, get_json, post_json, TestAppState};
use axum::http::StatusCode;
use safecar_core::api::{PaginatedResponse, SuccessResponse};
use safecar_core::domain::Role;
use serde_json::{json, Value};

// ============================================================================
// Sign-up / Sign-in
// ============================================================================

#[tokio::test]
async fn test_sign_up_defaults_to_driver_role() {
    let app = build_test_router(TestAppState::offline());

    let (status, body): (StatusCode, Option<SuccessResponse<Value>>) = post_json(
        &app,
        "/api/v1/authentication/sign-up",
        None,
        &json!({ "username": "  maria ", "password": "correct-horse" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let user = body.unwrap().data;
    assert_eq!(user["username"], "maria");
    assert_eq!(user["roles"], json!(["ROLE_DRIVER"]));
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn test_sign_up_with_requested_roles() {
    let app = build_test_router(TestAppState::offline());

    let (status, body): (StatusCode, Option<SuccessResponse<Value>>) = post_json(
        &app,
        "/api/v1/authentication/sign-up",
        None,
        &json!({
            "username": "fleetco",
            "password": "correct-horse",
            "roles": ["ROLE_OWNER", "owner", "ROLE_MECHANIC"]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body.unwrap().data["roles"],
        json!(["ROLE_OWNER", "ROLE_MECHANIC"])
    );
}

#[tokio::test]
async fn test_sign_up_duplicate_username_conflicts() {
    let state = TestAppState::offline();
    state.seed_user("maria", &[Role::Driver]).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/authentication/sign-up",
        None,
        &json!({ "username": "maria", "password": "correct-horse" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_sign_up_unknown_role_is_rejected() {
    let app = build_test_router(TestAppState::offline());

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/authentication/sign-up",
        None,
        &json!({ "username": "maria", "password": "correct-horse", "roles": ["ROLE_PILOT"] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_up_cannot_self_assign_admin() {
    let app = build_test_router(TestAppState::offline());

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/authentication/sign-up",
        None,
        &json!({ "username": "mallory", "password": "correct-horse", "roles": ["ROLE_ADMIN"] }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body.unwrap()["error"], "forbidden");

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/authentication/sign-in",
        None,
        &json!({ "username": "mallory", "password": "correct-horse" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_up_short_password_fails_validation() {
    let app = build_test_router(TestAppState::offline());

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/authentication/sign-up",
        None,
        &json!({ "username": "maria", "password": "short" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.unwrap()["error"], "validation");
}

#[tokio::test]
async fn test_sign_in_returns_usable_token() {
    let app = build_test_router(TestAppState::offline());

    let _: (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/authentication/sign-up",
        None,
        &json!({ "username": "maria", "password": "correct-horse", "roles": ["ROLE_OWNER"] }),
    )
    .await;

    let (status, body): (StatusCode, Option<SuccessResponse<Value>>) = post_json(
        &app,
        "/api/v1/authentication/sign-in",
        None,
        &json!({ "username": "maria", "password": "correct-horse" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let signed_in = body.unwrap().data;
    assert_eq!(signed_in["roles"], json!(["ROLE_OWNER"]));
    let token = signed_in["token"].as_str().unwrap().to_string();

    let (status, me): (StatusCode, Option<SuccessResponse<Value>>) =
        get_json(&app, "/api/v1/users/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me.unwrap().data["username"], "maria");
}

#[tokio::test]
async fn test_sign_in_wrong_password_is_unauthorized() {
    let app = build_test_router(TestAppState::offline());

    let _: (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/authentication/sign-up",
        None,
        &json!({ "username": "maria", "password": "correct-horse" }),
    )
    .await;

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/authentication/sign-in",
        None,
        &json!({ "username": "maria", "password": "battery-staple" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body.unwrap()["error"], "unauthorized");
}

#[tokio::test]
async fn test_sign_in_unknown_user_is_unauthorized() {
    let app = build_test_router(TestAppState::offline());

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/authentication/sign-in",
        None,
        &json!({ "username": "ghost", "password": "whatever-pass" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Authentication enforcement
// ============================================================================

#[tokio::test]
async fn test_protected_route_without_token_is_unauthorized() {
    let app = build_test_router(TestAppState::offline());

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/users/me", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body.unwrap()["message"], "Missing authorization token");
}

#[tokio::test]
async fn test_protected_route_with_garbage_token_is_unauthorized() {
    let app = build_test_router(TestAppState::offline());

    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/vehicles", Some("not-a-jwt")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_list_users_requires_admin() {
    let state = TestAppState::offline();
    let (_, token) = state.seed_user("maria", &[Role::Owner]).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/users", Some(&token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_users_as_admin_is_paginated() {
    let state = TestAppState::offline();
    let (_, token) = state.seed_user("root", &[Role::Admin]).await;
    for i in 0..4 {
        state.seed_user(&format!("driver{}", i), &[Role::Driver]).await;
    }
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<PaginatedResponse<Value>>) =
        get_json(&app, "/api/v1/users?page=2&per_page=2", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body.data.len(), 2);
    assert_eq!(body.pagination.total, 5);
    assert_eq!(body.pagination.total_pages, 3);
}

#[tokio::test]
async fn test_get_other_user_is_forbidden() {
    let state = TestAppState::offline();
    let (_, token) = state.seed_user("maria", &[Role::Driver]).await;
    let (other, _) = state.seed_user("pedro", &[Role::Driver]).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, &format!("/api/v1/users/{}", other.id), Some(&token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_user_by_username_as_admin() {
    let state = TestAppState::offline();
    let (_, token) = state.seed_user("root", &[Role::Admin]).await;
    let (pedro, _) = state.seed_user("pedro", &[Role::Driver]).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Value>>) =
        get_json(&app, "/api/v1/users/username/pedro", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data["id"], pedro.id.to_string());
}

#[tokio::test]
async fn test_get_missing_user_as_admin_is_not_found() {
    let state = TestAppState::offline();
    let (_, token) = state.seed_user("root", &[Role::Admin]).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = get_json(
        &app,
        &format!("/api/v1/users/{}", uuid::Uuid::new_v4()),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Roles
// ============================================================================

#[tokio::test]
async fn test_list_roles_after_seed() {
    let state = TestAppState::offline();
    state.role_service.seed().await.unwrap();
    let (_, token) = state.seed_user("maria", &[Role::Driver]).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<Value>>>) =
        get_json(&app, "/api/v1/roles", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<Value> = body.unwrap().data.into_iter().map(|r| r["name"].clone()).collect();
    assert_eq!(
        names,
        vec![
            json!("ROLE_ADMIN"),
            json!("ROLE_OWNER"),
            json!("ROLE_DRIVER"),
            json!("ROLE_MECHANIC")
        ]
    );
}
