use crate::domains::devices::api as devices_api;
use crate::domains::devices::context::DevicesContext;
use axum::{
    routing::{get, put},
    Router,
};

pub fn protected_routes<S>() -> Router<S>
where
    S: DevicesContext,
{
    Router::new()
        .route(
            "/api/v1/devices",
            get(devices_api::device::list_devices::<S>)
                .post(devices_api::device::register_device::<S>),
        )
        .route(
            "/api/v1/devices/mac/{mac_address}",
            get(devices_api::device::get_device_by_mac::<S>),
        )
        .route(
            "/api/v1/devices/{id}",
            get(devices_api::device::get_device::<S>)
                .delete(devices_api::device::delete_device::<S>),
        )
        .route(
            "/api/v1/devices/{id}/vehicle",
            put(devices_api::device::assign_device::<S>)
                .delete(devices_api::device::unassign_device::<S>),
        )
        .route(
            "/api/v1/devices/{id}/status",
            put(devices_api::device::update_device_status::<S>),
        )
        .route(
            "/api/v1/devices/{id}/telemetry",
            get(devices_api::telemetry::list_telemetry::<S>)
                .post(devices_api::telemetry::record_telemetry::<S>),
        )
}
