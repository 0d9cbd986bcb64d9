//! Telemetry intake and history

use crate::api::SuccessResponse;
use crate::domain::{RecordTelemetryCommand, TelemetryRecord};
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
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecordTelemetryResource {
    pub speed_kmh: f64,
    pub rpm: i32,
    pub engine_temperature_c: f64,
    pub fuel_level_pct: f64,
    pub battery_voltage: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub recorded_at: Option<DateTime<Utc>>,
}

impl From<RecordTelemetryResource> for RecordTelemetryCommand {
    fn from(resource: RecordTelemetryResource) -> Self {
        Self {
            speed_kmh: resource.speed_kmh,
            rpm: resource.rpm,
            engine_temperature_c: resource.engine_temperature_c,
            fuel_level_pct: resource.fuel_level_pct,
            battery_voltage: resource.battery_voltage,
            latitude: resource.latitude,
            longitude: resource.longitude,
            recorded_at: resource.recorded_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[utoipa::path(
    post,
    path = "/api/v1/devices/{id}/telemetry",
    tag = "Devices",
    params(("id" = Uuid, Path, description = "Device ID")),
    request_body = RecordTelemetryResource,
    responses(
        (status = 201, description = "Reading stored", body = TelemetryRecord),
        (status = 404, description = "Device not found"),
        (status = 409, description = "Device inactive or not installed in a vehicle"),
        (status = 422, description = "Reading out of range")
    )
)]
pub async fn record_telemetry<S: DevicesContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(resource): Json<RecordTelemetryResource>,
) -> Result<impl IntoResponse> {
    let record = state
        .device_service()
        .record_telemetry(id.into(), resource.into())
        .await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(record))))
}

/// Most recent readings first
#[utoipa::path(
    get,
    path = "/api/v1/devices/{id}/telemetry",
    tag = "Devices",
    params(
        ("id" = Uuid, Path, description = "Device ID"),
        ("limit" = Option<i64>, Query, description = "Maximum readings, 1 to 500")
    ),
    responses(
        (status = 200, description = "Telemetry readings", body = [TelemetryRecord]),
        (status = 404, description = "Device not found")
    )
)]
pub async fn list_telemetry<S: DevicesContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<TelemetryQuery>,
) -> Result<impl IntoResponse> {
    let records = state
        .device_service()
        .list_telemetry(id.into(), query.limit)
        .await?;
    Ok(Json(SuccessResponse::new(records)))
}
