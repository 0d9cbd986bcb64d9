//! Device management HTTP Handler Tests: vehicles and drivers

use super::{build_test_router, delete_json, get_json, post_json, put_json, TestAppState};
use axum::http::StatusCode;
use safecar_core::api::{MessageResponse, PaginatedResponse, SuccessResponse};
use safecar_core::domain::Role;
use serde_json::{json, Value};

fn vehicle_body(plate: &str) -> Value {
    json!({
        "license_plate": plate,
        "brand": "Hyundai",
        "model": "Accent",
        "year": 2019,
        "color": "Silver"
    })
}

// ============================================================================
// Vehicles
// ============================================================================

#[tokio::test]
async fn test_register_vehicle_normalizes_plate() {
    let state = TestAppState::offline();
    let (owner, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Value>>) =
        post_json(&app, "/api/v1/vehicles", Some(&token), &vehicle_body(" abc-123 ")).await;

    assert_eq!(status, StatusCode::CREATED);
    let vehicle = body.unwrap().data;
    assert_eq!(vehicle["license_plate"], "ABC-123");
    assert_eq!(vehicle["owner_id"], owner.id.to_string());
    assert_eq!(vehicle["mileage_km"], 0);
    assert_eq!(vehicle["status"], "ACTIVE");
}

#[tokio::test]
async fn test_register_vehicle_duplicate_plate_conflicts() {
    let state = TestAppState::offline();
    let (owner, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    state.seed_vehicle(&owner, "ABC-123").await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/vehicles", Some(&token), &vehicle_body("abc-123")).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_vehicle_invalid_plate() {
    let state = TestAppState::offline();
    let (_, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/vehicles", Some(&token), &vehicle_body("??")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_admin_registers_vehicle_for_owner() {
    let state = TestAppState::offline();
    let (owner, _) = state.seed_user("fleetco", &[Role::Owner]).await;
    let (_, admin_token) = state.seed_user("root", &[Role::Admin]).await;
    let app = build_test_router(state);

    let mut body = vehicle_body("XYZ-987");
    body["owner_id"] = json!(owner.id);
    let (status, created): (StatusCode, Option<SuccessResponse<Value>>) =
        post_json(&app, "/api/v1/vehicles", Some(&admin_token), &body).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.unwrap().data["owner_id"], owner.id.to_string());
}

#[tokio::test]
async fn test_list_vehicles_defaults_to_own_fleet() {
    let state = TestAppState::offline();
    let (owner, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    let (other, _) = state.seed_user("rival", &[Role::Owner]).await;
    state.seed_vehicle(&owner, "AAA-111").await;
    state.seed_vehicle(&owner, "AAA-222").await;
    state.seed_vehicle(&other, "BBB-111").await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<PaginatedResponse<Value>>) =
        get_json(&app, "/api/v1/vehicles", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body.pagination.total, 2);
    assert!(body
        .data
        .iter()
        .all(|v| v["owner_id"] == owner.id.to_string()));
}

#[tokio::test]
async fn test_list_vehicles_past_the_last_page_is_empty() {
    let state = TestAppState::offline();
    let (owner, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    state.seed_vehicle(&owner, "AAA-111").await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<PaginatedResponse<Value>>) = get_json(
        &app,
        &format!("/api/v1/vehicles?page={}&per_page=100", i64::MAX),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert!(body.data.is_empty());
    assert_eq!(body.pagination.total, 1);
}

#[tokio::test]
async fn test_list_vehicles_of_another_owner_is_forbidden() {
    let state = TestAppState::offline();
    let (_, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    let (other, _) = state.seed_user("rival", &[Role::Owner]).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = get_json(
        &app,
        &format!("/api/v1/vehicles?owner_id={}", other.id),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_lists_every_vehicle() {
    let state = TestAppState::offline();
    let (owner, _) = state.seed_user("fleetco", &[Role::Owner]).await;
    let (other, _) = state.seed_user("rival", &[Role::Owner]).await;
    let (_, admin_token) = state.seed_user("root", &[Role::Admin]).await;
    state.seed_vehicle(&owner, "AAA-111").await;
    state.seed_vehicle(&other, "BBB-111").await;
    let app = build_test_router(state);

    let (_, body): (StatusCode, Option<PaginatedResponse<Value>>) =
        get_json(&app, "/api/v1/vehicles", Some(&admin_token)).await;

    assert_eq!(body.unwrap().pagination.total, 2);
}

#[tokio::test]
async fn test_update_vehicle_mileage_cannot_decrease() {
    let state = TestAppState::offline();
    let (owner, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    let vehicle = state.seed_vehicle(&owner, "AAA-111").await;
    let app = build_test_router(state);
    let path = format!("/api/v1/vehicles/{}", vehicle.id);

    let (status, body): (StatusCode, Option<SuccessResponse<Value>>) = put_json(
        &app,
        &path,
        Some(&token),
        &json!({ "mileage_km": 15000, "status": "IN_MAINTENANCE" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated = body.unwrap().data;
    assert_eq!(updated["mileage_km"], 15000);
    assert_eq!(updated["status"], "IN_MAINTENANCE");

    let (status, _): (StatusCode, Option<Value>) =
        put_json(&app, &path, Some(&token), &json!({ "mileage_km": 100 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_vehicle_of_another_owner_is_forbidden() {
    let state = TestAppState::offline();
    let (_, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    let (other, _) = state.seed_user("rival", &[Role::Owner]).await;
    let vehicle = state.seed_vehicle(&other, "BBB-111").await;
    let app = build_test_router(state);
    let path = format!("/api/v1/vehicles/{}", vehicle.id);

    let (status, _): (StatusCode, Option<Value>) =
        put_json(&app, &path, Some(&token), &json!({ "color": "Black" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _): (StatusCode, Option<Value>) = delete_json(&app, &path, Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_vehicle() {
    let state = TestAppState::offline();
    let (owner, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    let vehicle = state.seed_vehicle(&owner, "AAA-111").await;
    let app = build_test_router(state);
    let path = format!("/api/v1/vehicles/{}", vehicle.id);

    let (status, body): (StatusCode, Option<MessageResponse>) =
        delete_json(&app, &path, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.unwrap().message.contains("deleted"));

    let (status, _): (StatusCode, Option<Value>) = get_json(&app, &path, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_vehicle_releases_devices_and_drivers() {
    let state = TestAppState::offline();
    let (owner, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    let (driver_user, _) = state.seed_user("jorge", &[Role::Driver]).await;
    let vehicle = state.seed_vehicle(&owner, "AAA-111").await;
    let app = build_test_router(state);

    let (_, device): (StatusCode, Option<SuccessResponse<Value>>) = post_json(
        &app,
        "/api/v1/devices",
        Some(&token),
        &json!({ "mac_address": "AA:BB:CC:DD:EE:10", "vehicle_id": vehicle.id }),
    )
    .await;
    let device_id = device.unwrap().data["id"].as_str().unwrap().to_string();

    let (_, driver): (StatusCode, Option<SuccessResponse<Value>>) = post_json(
        &app,
        "/api/v1/drivers",
        Some(&token),
        &driver_body(&driver_user.id),
    )
    .await;
    let driver_id = driver.unwrap().data["id"].as_str().unwrap().to_string();
    let (status, _): (StatusCode, Option<Value>) = put_json(
        &app,
        &format!("/api/v1/drivers/{}/vehicle", driver_id),
        Some(&token),
        &json!({ "vehicle_id": vehicle.id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _): (StatusCode, Option<MessageResponse>) = delete_json(
        &app,
        &format!("/api/v1/vehicles/{}", vehicle.id),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, device): (StatusCode, Option<SuccessResponse<Value>>) = get_json(
        &app,
        &format!("/api/v1/devices/{}", device_id),
        Some(&token),
    )
    .await;
    assert!(device.unwrap().data["vehicle_id"].is_null());

    let (_, driver): (StatusCode, Option<SuccessResponse<Value>>) = get_json(
        &app,
        &format!("/api/v1/drivers/{}", driver_id),
        Some(&token),
    )
    .await;
    assert!(driver.unwrap().data["vehicle_id"].is_null());

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        &format!("/api/v1/devices/{}/telemetry", device_id),
        Some(&token),
        &json!({
            "speed_kmh": 50.0,
            "rpm": 2000,
            "engine_temperature_c": 90.0,
            "fuel_level_pct": 70.0,
            "battery_voltage": 12.6
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// ============================================================================
// Drivers
// ============================================================================

fn driver_body(user_id: &impl serde::Serialize) -> Value {
    json!({
        "user_id": user_id,
        "full_name": "Jorge Huaman",
        "dni": "71234567",
        "license_number": "q12345678",
        "phone": "934567890"
    })
}

#[tokio::test]
async fn test_create_driver_requires_fleet_manager() {
    let state = TestAppState::offline();
    let (driver_user, token) = state.seed_user("jorge", &[Role::Driver]).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/drivers",
        Some(&token),
        &driver_body(&driver_user.id),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_driver_assignment_lifecycle() {
    let state = TestAppState::offline();
    let (owner, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    let (driver_user, _) = state.seed_user("jorge", &[Role::Driver]).await;
    let vehicle = state.seed_vehicle(&owner, "AAA-111").await;
    let app = build_test_router(state);

    let (status, created): (StatusCode, Option<SuccessResponse<Value>>) = post_json(
        &app,
        "/api/v1/drivers",
        Some(&token),
        &driver_body(&driver_user.id),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let driver = created.unwrap().data;
    assert_eq!(driver["license_number"], "Q12345678");
    assert!(driver["vehicle_id"].is_null());
    let driver_path = format!("/api/v1/drivers/{}/vehicle", driver["id"].as_str().unwrap());

    let (status, assigned): (StatusCode, Option<SuccessResponse<Value>>) = put_json(
        &app,
        &driver_path,
        Some(&token),
        &json!({ "vehicle_id": vehicle.id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assigned.unwrap().data["vehicle_id"], vehicle.id.to_string());

    let (status, unassigned): (StatusCode, Option<SuccessResponse<Value>>) =
        delete_json(&app, &driver_path, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(unassigned.unwrap().data["vehicle_id"].is_null());
}

#[tokio::test]
async fn test_assign_driver_to_missing_vehicle_is_not_found() {
    let state = TestAppState::offline();
    let (_, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    let (driver_user, _) = state.seed_user("jorge", &[Role::Driver]).await;
    let app = build_test_router(state);

    let (_, created): (StatusCode, Option<SuccessResponse<Value>>) = post_json(
        &app,
        "/api/v1/drivers",
        Some(&token),
        &driver_body(&driver_user.id),
    )
    .await;
    let driver_id = created.unwrap().data["id"].as_str().unwrap().to_string();

    let (status, _): (StatusCode, Option<Value>) = put_json(
        &app,
        &format!("/api/v1/drivers/{}/vehicle", driver_id),
        Some(&token),
        &json!({ "vehicle_id": uuid::Uuid::new_v4() }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_driver_dni_conflicts() {
    let state = TestAppState::offline();
    let (_, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    let (first, _) = state.seed_user("jorge", &[Role::Driver]).await;
    let (second, _) = state.seed_user("jorge2", &[Role::Driver]).await;
    let app = build_test_router(state);

    let _: (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/drivers", Some(&token), &driver_body(&first.id)).await;
    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/drivers", Some(&token), &driver_body(&second.id)).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_drivers_on_another_owners_vehicle_are_off_limits() {
    let state = TestAppState::offline();
    let (owner, token) = state.seed_user("fleetco", &[Role::Owner]).await;
    let (_, rival_token) = state.seed_user("rivalco", &[Role::Owner]).await;
    let (driver_user, _) = state.seed_user("jorge", &[Role::Driver]).await;
    let vehicle = state.seed_vehicle(&owner, "AAA-111").await;
    let app = build_test_router(state);

    let (_, created): (StatusCode, Option<SuccessResponse<Value>>) = post_json(
        &app,
        "/api/v1/drivers",
        Some(&rival_token),
        &driver_body(&driver_user.id),
    )
    .await;
    let driver_id = created.unwrap().data["id"].as_str().unwrap().to_string();
    let assign_path = format!("/api/v1/drivers/{}/vehicle", driver_id);

    // Cannot put a driver on someone else's vehicle
    let (status, _): (StatusCode, Option<Value>) = put_json(
        &app,
        &assign_path,
        Some(&rival_token),
        &json!({ "vehicle_id": vehicle.id }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _): (StatusCode, Option<Value>) = put_json(
        &app,
        &assign_path,
        Some(&token),
        &json!({ "vehicle_id": vehicle.id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Once assigned, the driver belongs to the vehicle owner
    let (status, _): (StatusCode, Option<Value>) =
        delete_json(&app, &assign_path, Some(&rival_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _): (StatusCode, Option<Value>) = delete_json(
        &app,
        &format!("/api/v1/drivers/{}", driver_id),
        Some(&rival_token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, driver): (StatusCode, Option<SuccessResponse<Value>>) = get_json(
        &app,
        &format!("/api/v1/drivers/{}", driver_id),
        Some(&token),
    )
    .await;
    assert_eq!(driver.unwrap().data["vehicle_id"], vehicle.id.to_string());
}
