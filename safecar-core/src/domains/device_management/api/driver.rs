//! Driver endpoints

use crate::api::{MessageResponse, PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{CreateDriverCommand, Driver, Role, StringUuid};
use crate::domains::device_management::api::vehicle::require_vehicle_owner;
use crate::domains::device_management::context::DeviceManagementContext;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::HasFleet;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

const FLEET_MANAGERS: &[Role] = &[Role::Owner, Role::Admin];

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateDriverResource {
    pub user_id: Uuid,
    pub full_name: String,
    pub dni: String,
    pub license_number: String,
    pub phone: String,
}

impl From<CreateDriverResource> for CreateDriverCommand {
    fn from(resource: CreateDriverResource) -> Self {
        Self {
            user_id: resource.user_id.into(),
            full_name: resource.full_name,
            dni: resource.dni,
            license_number: resource.license_number.trim().to_uppercase(),
            phone: resource.phone,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AssignVehicleResource {
    pub vehicle_id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/v1/drivers",
    tag = "DeviceManagement",
    request_body = CreateDriverResource,
    responses(
        (status = 201, description = "Driver created", body = Driver),
        (status = 403, description = "Caller does not manage a fleet"),
        (status = 409, description = "DNI or license already registered")
    )
)]
pub async fn create_driver<S: DeviceManagementContext>(
    State(state): State<S>,
    auth: AuthUser,
    Json(resource): Json<CreateDriverResource>,
) -> Result<impl IntoResponse> {
    auth.require_any_role(FLEET_MANAGERS)?;
    let driver = state.driver_service().create(resource.into()).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(driver))))
}

#[utoipa::path(
    get,
    path = "/api/v1/drivers",
    tag = "DeviceManagement",
    responses((status = 200, description = "Paginated drivers"))
)]
pub async fn list_drivers<S: DeviceManagementContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let (drivers, total) = state
        .driver_service()
        .list(pagination.page, pagination.per_page)
        .await?;
    Ok(Json(PaginatedResponse::new(
        drivers,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/drivers/{id}",
    tag = "DeviceManagement",
    params(("id" = Uuid, Path, description = "Driver ID")),
    responses(
        (status = 200, description = "Driver", body = Driver),
        (status = 404, description = "Driver not found")
    )
)]
pub async fn get_driver<S: DeviceManagementContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let driver = state.driver_service().get(id.into()).await?;
    Ok(Json(SuccessResponse::new(driver)))
}

#[utoipa::path(
    put,
    path = "/api/v1/drivers/{id}/vehicle",
    tag = "DeviceManagement",
    params(("id" = Uuid, Path, description = "Driver ID")),
    request_body = AssignVehicleResource,
    responses(
        (status = 200, description = "Driver assigned", body = Driver),
        (status = 403, description = "Driver or vehicle belongs to another owner"),
        (status = 404, description = "Driver or vehicle not found")
    )
)]
pub async fn assign_driver<S: DeviceManagementContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(resource): Json<AssignVehicleResource>,
) -> Result<impl IntoResponse> {
    auth.require_any_role(FLEET_MANAGERS)?;
    let id = StringUuid::from(id);
    let vehicle_id = StringUuid::from(resource.vehicle_id);
    let current = state.driver_service().get(id).await?;
    if let Some(current_vehicle) = current.vehicle_id {
        require_vehicle_owner(&state, &auth, current_vehicle).await?;
    }
    require_vehicle_owner(&state, &auth, vehicle_id).await?;
    let driver = state
        .driver_service()
        .assign_to_vehicle(id, vehicle_id)
        .await?;
    Ok(Json(SuccessResponse::new(driver)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/drivers/{id}/vehicle",
    tag = "DeviceManagement",
    params(("id" = Uuid, Path, description = "Driver ID")),
    responses(
        (status = 200, description = "Driver unassigned", body = Driver),
        (status = 403, description = "Driver belongs to another owner's vehicle"),
        (status = 404, description = "Driver not found")
    )
)]
pub async fn unassign_driver<S: DeviceManagementContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    auth.require_any_role(FLEET_MANAGERS)?;
    let id = StringUuid::from(id);
    let current = state.driver_service().get(id).await?;
    if let Some(vehicle_id) = current.vehicle_id {
        require_vehicle_owner(&state, &auth, vehicle_id).await?;
    }
    let driver = state.driver_service().unassign(id).await?;
    Ok(Json(SuccessResponse::new(driver)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/drivers/{id}",
    tag = "DeviceManagement",
    params(("id" = Uuid, Path, description = "Driver ID")),
    responses(
        (status = 200, description = "Driver deleted", body = MessageResponse),
        (status = 403, description = "Driver belongs to another owner's vehicle"),
        (status = 404, description = "Driver not found")
    )
)]
pub async fn delete_driver<S: DeviceManagementContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    auth.require_any_role(FLEET_MANAGERS)?;
    let id = StringUuid::from(id);
    let current = state.driver_service().get(id).await?;
    if let Some(vehicle_id) = current.vehicle_id {
        require_vehicle_owner(&state, &auth, vehicle_id).await?;
    }
    state.driver_service().delete(id).await?;
    Ok(Json(MessageResponse::new("Driver deleted successfully")))
}
