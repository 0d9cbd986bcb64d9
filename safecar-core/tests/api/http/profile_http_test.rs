//! Profiles HTTP Handler Tests

use super::{build_test_router, get_json, post_json, put_json, TestAppState};
use axum::http::StatusCode;
use safecar_core::api::{PaginatedResponse, SuccessResponse};
use safecar_core::domain::Role;
use serde_json::{json, Value};

fn person_body() -> Value {
    json!({
        "first_name": "Lucia",
        "last_name": "Quispe",
        "dni": "45879632",
        "phone": "987654321",
        "email": "Lucia.Quispe@Example.com",
        "address": "Av. Arequipa 123"
    })
}

fn business_body() -> Value {
    json!({
        "business_name": "Taller Los Andes",
        "ruc": "20123456789",
        "phone": "912345678",
        "address": "Jr. Junin 456"
    })
}

// ============================================================================
// Person profiles
// ============================================================================

#[tokio::test]
async fn test_create_person_profile_for_caller() {
    let state = TestAppState::offline();
    let (user, token) = state.seed_user("lucia", &[Role::Driver]).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Value>>) =
        post_json(&app, "/api/v1/person-profiles", Some(&token), &person_body()).await;

    assert_eq!(status, StatusCode::CREATED);
    let profile = body.unwrap().data;
    assert_eq!(profile["user_id"], user.id.to_string());
    assert_eq!(profile["email"], "lucia.quispe@example.com");
}

#[tokio::test]
async fn test_create_person_profile_twice_conflicts() {
    let state = TestAppState::offline();
    let (_, token) = state.seed_user("lucia", &[Role::Driver]).await;
    let app = build_test_router(state);

    let _: (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/person-profiles", Some(&token), &person_body()).await;
    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/person-profiles", Some(&token), &person_body()).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_person_profile_invalid_dni() {
    let state = TestAppState::offline();
    let (_, token) = state.seed_user("lucia", &[Role::Driver]).await;
    let app = build_test_router(state);

    let mut body = person_body();
    body["dni"] = json!("1234");
    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/person-profiles", Some(&token), &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_person_profile_for_someone_else_is_forbidden() {
    let state = TestAppState::offline();
    let (_, token) = state.seed_user("lucia", &[Role::Owner]).await;
    let (other, _) = state.seed_user("pedro", &[Role::Driver]).await;
    let app = build_test_router(state);

    let mut body = person_body();
    body["user_id"] = json!(other.id);
    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/person-profiles", Some(&token), &body).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_and_update_person_profile_by_user() {
    let state = TestAppState::offline();
    let (user, token) = state.seed_user("lucia", &[Role::Driver]).await;
    let app = build_test_router(state);

    let _: (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/person-profiles", Some(&token), &person_body()).await;

    let (status, body): (StatusCode, Option<SuccessResponse<Value>>) = get_json(
        &app,
        &format!("/api/v1/person-profiles/user/{}", user.id),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let profile_id = body.unwrap().data["id"].as_str().unwrap().to_string();

    let (status, body): (StatusCode, Option<SuccessResponse<Value>>) = put_json(
        &app,
        &format!("/api/v1/person-profiles/{}", profile_id),
        Some(&token),
        &json!({ "phone": "999888777" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let profile = body.unwrap().data;
    assert_eq!(profile["phone"], "999888777");
    assert_eq!(profile["first_name"], "Lucia");
}

#[tokio::test]
async fn test_update_person_profile_of_another_user_is_forbidden() {
    let state = TestAppState::offline();
    let (_, owner_token) = state.seed_user("lucia", &[Role::Driver]).await;
    let (_, other_token) = state.seed_user("pedro", &[Role::Driver]).await;
    let app = build_test_router(state);

    let (_, created): (StatusCode, Option<SuccessResponse<Value>>) = post_json(
        &app,
        "/api/v1/person-profiles",
        Some(&owner_token),
        &person_body(),
    )
    .await;
    let profile_id = created.unwrap().data["id"].as_str().unwrap().to_string();

    let (status, _): (StatusCode, Option<Value>) = put_json(
        &app,
        &format!("/api/v1/person-profiles/{}", profile_id),
        Some(&other_token),
        &json!({ "first_name": "Hacker" }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_person_profile_for_user_without_one_is_not_found() {
    let state = TestAppState::offline();
    let (user, token) = state.seed_user("lucia", &[Role::Driver]).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = get_json(
        &app,
        &format!("/api/v1/person-profiles/user/{}", user.id),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Business profiles
// ============================================================================

#[tokio::test]
async fn test_create_and_list_business_profiles() {
    let state = TestAppState::offline();
    let (_, token) = state.seed_user("andes", &[Role::Mechanic]).await;
    let (_, admin_token) = state.seed_user("root", &[Role::Admin]).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/business-profiles", Some(&token), &business_body()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body): (StatusCode, Option<PaginatedResponse<Value>>) =
        get_json(&app, "/api/v1/business-profiles", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body.pagination.total, 1);
    assert_eq!(body.data[0]["ruc"], "20123456789");
}

#[tokio::test]
async fn test_create_business_profile_invalid_ruc() {
    let state = TestAppState::offline();
    let (_, token) = state.seed_user("andes", &[Role::Mechanic]).await;
    let app = build_test_router(state);

    let mut body = business_body();
    body["ruc"] = json!("30123456789");
    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/business-profiles", Some(&token), &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_duplicate_ruc_conflicts() {
    let state = TestAppState::offline();
    let (_, first) = state.seed_user("andes", &[Role::Mechanic]).await;
    let (_, second) = state.seed_user("copycat", &[Role::Mechanic]).await;
    let app = build_test_router(state);

    let _: (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/business-profiles", Some(&first), &business_body()).await;
    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/business-profiles", Some(&second), &business_body()).await;

    assert_eq!(status, StatusCode::CONFLICT);
}
