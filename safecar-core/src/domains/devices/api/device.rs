//! Device registry endpoints

use crate::api::{MessageResponse, PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{Device, DeviceStatus, DeviceType, RegisterDeviceCommand, Role, StringUuid};
use crate::domains::device_management::api::vehicle::require_vehicle_owner;
use crate::domains::devices::context::DevicesContext;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::HasDevices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

const DEVICE_MANAGERS: &[Role] = &[Role::Owner, Role::Admin];

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterDeviceResource {
    pub mac_address: String,
    #[serde(default)]
    pub device_type: DeviceType,
    pub firmware_version: Option<String>,
    pub vehicle_id: Option<Uuid>,
}

impl From<RegisterDeviceResource> for RegisterDeviceCommand {
    fn from(resource: RegisterDeviceResource) -> Self {
        Self {
            mac_address: resource.mac_address,
            device_type: resource.device_type,
            firmware_version: resource.firmware_version,
            vehicle_id: resource.vehicle_id.map(StringUuid::from),
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AssignDeviceResource {
    pub vehicle_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateDeviceStatusResource {
    pub status: DeviceStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceFilter {
    pub vehicle_id: Option<Uuid>,
}

/// Devices not yet assigned to a vehicle are open to any device manager
async fn require_current_owner<S: DevicesContext>(
    state: &S,
    auth: &AuthUser,
    device_id: StringUuid,
) -> Result<()> {
    let device = state.device_service().get(device_id).await?;
    match device.vehicle_id {
        Some(vehicle_id) => require_vehicle_owner(state, auth, vehicle_id).await,
        None => Ok(()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/devices",
    tag = "Devices",
    request_body = RegisterDeviceResource,
    responses(
        (status = 201, description = "Device registered", body = Device),
        (status = 403, description = "Vehicle belongs to another owner"),
        (status = 404, description = "Vehicle not found"),
        (status = 409, description = "MAC address already registered"),
        (status = 422, description = "Malformed MAC address")
    )
)]
pub async fn register_device<S: DevicesContext>(
    State(state): State<S>,
    auth: AuthUser,
    Json(resource): Json<RegisterDeviceResource>,
) -> Result<impl IntoResponse> {
    auth.require_any_role(DEVICE_MANAGERS)?;
    if let Some(vehicle_id) = resource.vehicle_id {
        require_vehicle_owner(&state, &auth, vehicle_id.into()).await?;
    }
    let device = state.device_service().register(resource.into()).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(device))))
}

#[utoipa::path(
    get,
    path = "/api/v1/devices",
    tag = "Devices",
    params(("vehicle_id" = Option<Uuid>, Query, description = "Filter by vehicle")),
    responses((status = 200, description = "Paginated devices"))
)]
pub async fn list_devices<S: DevicesContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<DeviceFilter>,
) -> Result<impl IntoResponse> {
    let (devices, total) = state
        .device_service()
        .list(
            filter.vehicle_id.map(StringUuid::from),
            pagination.page,
            pagination.per_page,
        )
        .await?;
    Ok(Json(PaginatedResponse::new(
        devices,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/devices/{id}",
    tag = "Devices",
    params(("id" = Uuid, Path, description = "Device ID")),
    responses(
        (status = 200, description = "Device", body = Device),
        (status = 404, description = "Device not found")
    )
)]
pub async fn get_device<S: DevicesContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let device = state.device_service().get(id.into()).await?;
    Ok(Json(SuccessResponse::new(device)))
}

#[utoipa::path(
    get,
    path = "/api/v1/devices/mac/{mac_address}",
    tag = "Devices",
    params(("mac_address" = String, Path, description = "MAC address, any case")),
    responses(
        (status = 200, description = "Device", body = Device),
        (status = 404, description = "Device not found")
    )
)]
pub async fn get_device_by_mac<S: DevicesContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(mac_address): Path<String>,
) -> Result<impl IntoResponse> {
    let device = state.device_service().get_by_mac(&mac_address).await?;
    Ok(Json(SuccessResponse::new(device)))
}

#[utoipa::path(
    put,
    path = "/api/v1/devices/{id}/vehicle",
    tag = "Devices",
    params(("id" = Uuid, Path, description = "Device ID")),
    request_body = AssignDeviceResource,
    responses(
        (status = 200, description = "Device assigned", body = Device),
        (status = 403, description = "Device or vehicle belongs to another owner"),
        (status = 404, description = "Device or vehicle not found")
    )
)]
pub async fn assign_device<S: DevicesContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(resource): Json<AssignDeviceResource>,
) -> Result<impl IntoResponse> {
    auth.require_any_role(DEVICE_MANAGERS)?;
    let id = StringUuid::from(id);
    let vehicle_id = StringUuid::from(resource.vehicle_id);
    require_current_owner(&state, &auth, id).await?;
    require_vehicle_owner(&state, &auth, vehicle_id).await?;
    let device = state
        .device_service()
        .assign_to_vehicle(id, vehicle_id)
        .await?;
    Ok(Json(SuccessResponse::new(device)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/devices/{id}/vehicle",
    tag = "Devices",
    params(("id" = Uuid, Path, description = "Device ID")),
    responses(
        (status = 200, description = "Device unassigned", body = Device),
        (status = 403, description = "Device belongs to another owner's vehicle"),
        (status = 404, description = "Device not found")
    )
)]
pub async fn unassign_device<S: DevicesContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    auth.require_any_role(DEVICE_MANAGERS)?;
    let id = StringUuid::from(id);
    require_current_owner(&state, &auth, id).await?;
    let device = state.device_service().unassign(id).await?;
    Ok(Json(SuccessResponse::new(device)))
}

/// Mechanics may also move a device in and out of maintenance
#[utoipa::path(
    put,
    path = "/api/v1/devices/{id}/status",
    tag = "Devices",
    params(("id" = Uuid, Path, description = "Device ID")),
    request_body = UpdateDeviceStatusResource,
    responses(
        (status = 200, description = "Status changed", body = Device),
        (status = 403, description = "Device belongs to another owner's vehicle"),
        (status = 404, description = "Device not found")
    )
)]
pub async fn update_device_status<S: DevicesContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(resource): Json<UpdateDeviceStatusResource>,
) -> Result<impl IntoResponse> {
    auth.require_any_role(&[Role::Owner, Role::Mechanic, Role::Admin])?;
    let id = StringUuid::from(id);
    if !auth.has_role(Role::Mechanic) {
        require_current_owner(&state, &auth, id).await?;
    }
    let device = state
        .device_service()
        .update_status(id, resource.status)
        .await?;
    Ok(Json(SuccessResponse::new(device)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/devices/{id}",
    tag = "Devices",
    params(("id" = Uuid, Path, description = "Device ID")),
    responses(
        (status = 200, description = "Device deleted", body = MessageResponse),
        (status = 403, description = "Device belongs to another owner's vehicle"),
        (status = 404, description = "Device not found")
    )
)]
pub async fn delete_device<S: DevicesContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    auth.require_any_role(DEVICE_MANAGERS)?;
    let id = StringUuid::from(id);
    require_current_owner(&state, &auth, id).await?;
    state.device_service().delete(id).await?;
    Ok(Json(MessageResponse::new("Device deleted successfully")))
}
