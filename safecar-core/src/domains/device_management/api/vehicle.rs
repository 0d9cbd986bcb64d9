//! Vehicle endpoints

use crate::api::{MessageResponse, PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{
    RegisterVehicleCommand, StringUuid, UpdateVehicleCommand, Vehicle, VehicleStatus,
};
use crate::domains::device_management::context::DeviceManagementContext;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::{HasDevices, HasFleet};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterVehicleResource {
    /// Defaults to the authenticated user
    pub owner_id: Option<Uuid>,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: Option<String>,
    #[serde(default)]
    pub mileage_km: i64,
}

impl RegisterVehicleResource {
    pub fn into_command(self, caller: StringUuid) -> RegisterVehicleCommand {
        RegisterVehicleCommand {
            owner_id: self.owner_id.map(StringUuid::from).unwrap_or(caller),
            license_plate: self.license_plate.trim().to_uppercase(),
            brand: self.brand,
            model: self.model,
            year: self.year,
            color: self.color,
            mileage_km: self.mileage_km,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateVehicleResource {
    pub color: Option<String>,
    pub mileage_km: Option<i64>,
    pub status: Option<VehicleStatus>,
}

impl From<UpdateVehicleResource> for UpdateVehicleCommand {
    fn from(resource: UpdateVehicleResource) -> Self {
        Self {
            color: resource.color,
            mileage_km: resource.mileage_km,
            status: resource.status,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleFilter {
    pub owner_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    tag = "DeviceManagement",
    request_body = RegisterVehicleResource,
    responses(
        (status = 201, description = "Vehicle registered", body = Vehicle),
        (status = 404, description = "Owner not found"),
        (status = 409, description = "License plate already registered")
    )
)]
pub async fn register_vehicle<S: DeviceManagementContext>(
    State(state): State<S>,
    auth: AuthUser,
    Json(resource): Json<RegisterVehicleResource>,
) -> Result<impl IntoResponse> {
    let cmd = resource.into_command(auth.id());
    auth.require_self_or_admin(cmd.owner_id)?;
    let vehicle = state.vehicle_service().register(cmd).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(vehicle))))
}

/// Non-administrators only see their own vehicles
#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    tag = "DeviceManagement",
    params(("owner_id" = Option<Uuid>, Query, description = "Filter by owner")),
    responses((status = 200, description = "Paginated vehicles"))
)]
pub async fn list_vehicles<S: DeviceManagementContext>(
    State(state): State<S>,
    auth: AuthUser,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<VehicleFilter>,
) -> Result<impl IntoResponse> {
    let owner = match filter.owner_id.map(StringUuid::from) {
        Some(owner) => {
            auth.require_self_or_admin(owner)?;
            Some(owner)
        }
        None if auth.is_admin() => None,
        None => Some(auth.id()),
    };
    let (vehicles, total) = state
        .vehicle_service()
        .list(owner, pagination.page, pagination.per_page)
        .await?;
    Ok(Json(PaginatedResponse::new(
        vehicles,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}",
    tag = "DeviceManagement",
    params(("id" = Uuid, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle", body = Vehicle),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn get_vehicle<S: DeviceManagementContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let vehicle = state.vehicle_service().get(id.into()).await?;
    Ok(Json(SuccessResponse::new(vehicle)))
}

#[utoipa::path(
    put,
    path = "/api/v1/vehicles/{id}",
    tag = "DeviceManagement",
    params(("id" = Uuid, Path, description = "Vehicle ID")),
    request_body = UpdateVehicleResource,
    responses(
        (status = 200, description = "Vehicle updated", body = Vehicle),
        (status = 400, description = "Mileage would decrease"),
        (status = 403, description = "Vehicle belongs to another owner"),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn update_vehicle<S: DeviceManagementContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(resource): Json<UpdateVehicleResource>,
) -> Result<impl IntoResponse> {
    let id = StringUuid::from(id);
    let existing = state.vehicle_service().get(id).await?;
    auth.require_self_or_admin(existing.owner_id)?;
    let vehicle = state.vehicle_service().update(id, resource.into()).await?;
    Ok(Json(SuccessResponse::new(vehicle)))
}

/// Fail with `Forbidden` unless the caller owns the vehicle or is an admin.
///
/// Drivers and devices carry no owner of their own; they belong to whoever owns
/// the vehicle they are assigned to.
pub(crate) async fn require_vehicle_owner<S: HasFleet>(
    state: &S,
    auth: &AuthUser,
    vehicle_id: StringUuid,
) -> Result<()> {
    let vehicle = state.vehicle_service().get(vehicle_id).await?;
    auth.require_self_or_admin(vehicle.owner_id)
}

#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{id}",
    tag = "DeviceManagement",
    params(("id" = Uuid, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle deleted, drivers and devices unassigned", body = MessageResponse),
        (status = 403, description = "Vehicle belongs to another owner"),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn delete_vehicle<S: DeviceManagementContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let id = StringUuid::from(id);
    let existing = state.vehicle_service().get(id).await?;
    auth.require_self_or_admin(existing.owner_id)?;
    state.driver_service().release_vehicle(id).await?;
    state.device_service().release_vehicle(id).await?;
    state.vehicle_service().delete(id).await?;
    Ok(Json(MessageResponse::new("Vehicle deleted successfully")))
}
